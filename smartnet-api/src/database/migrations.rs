use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            primary_job_location TEXT,
            status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'engaged', 'qualified', 'quoted', 'booked', 'won', 'lost', 'dormant')),
            lead_source TEXT NOT NULL DEFAULT 'smartnet_funnel',
            last_estimate_total REAL,
            last_estimate_currency TEXT NOT NULL DEFAULT 'USD',
            last_interaction_at BIGINT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Leads are matched by normalized email first, then phone
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_email ON leads(email)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_phone ON leads(phone)",
        [],
    )?;

    // id is the deterministic record id derived from the idempotency key
    conn.execute(
        "CREATE TABLE IF NOT EXISTS walkthrough_bookings (
            id TEXT PRIMARY KEY,
            idempotency_key TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'confirmed', 'in_progress', 'completed', 'cancelled', 'no_show')),
            appointment_type TEXT NOT NULL,
            date_iso TEXT NOT NULL,
            time_slot TEXT NOT NULL,
            contact_name TEXT NOT NULL,
            contact_email TEXT,
            contact_phone TEXT,
            location_type TEXT,
            location_label TEXT NOT NULL,
            location_note TEXT,
            needs_onsite_walkthrough BOOLEAN NOT NULL DEFAULT 0,
            is_virtual_call BOOLEAN NOT NULL DEFAULT 0,
            is_phone_call BOOLEAN NOT NULL DEFAULT 0,
            estimate_summary TEXT NOT NULL,
            estimate_rough_range TEXT NOT NULL,
            estimate_total REAL,
            estimate_json TEXT,
            lead_id TEXT,
            followup_date_iso TEXT,
            followup_time_slot TEXT,
            followup_scheduled_at BIGINT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (lead_id) REFERENCES leads (id) ON DELETE SET NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_walkthrough_bookings_slot
            ON walkthrough_bookings(date_iso, time_slot)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_walkthrough_bookings_created
            ON walkthrough_bookings(created_at)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS magic_link_sessions (
            id TEXT PRIMARY KEY,
            token TEXT NOT NULL UNIQUE,
            lead_id TEXT,
            contact_name TEXT,
            email TEXT,
            phone TEXT,
            job_location TEXT,
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'redeemed', 'expired')),
            estimate_total REAL,
            estimate_summary TEXT NOT NULL,
            estimate_json TEXT,
            expires_at BIGINT NOT NULL,
            created_at BIGINT NOT NULL,
            last_accessed_at BIGINT,
            restored BOOLEAN NOT NULL DEFAULT 0,
            restored_at BIGINT,
            FOREIGN KEY (lead_id) REFERENCES leads (id) ON DELETE SET NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_magic_link_sessions_status_expiry
            ON magic_link_sessions(status, expires_at)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('leads', 'walkthrough_bookings', 'magic_link_sessions')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
