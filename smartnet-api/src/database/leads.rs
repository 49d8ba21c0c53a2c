use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{OptionalExtension, Row};
use shared_types::{Lead, LeadSource, LeadStatus};

const LEAD_COLUMNS: &str = "id, full_name, email, phone, primary_job_location, status, lead_source,
    last_estimate_total, last_estimate_currency, last_interaction_at, created_at, updated_at";

pub const LEAD_ID_PREFIX: &str = "smartnetLead";

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let status: String = row.get(5)?;
    let source: String = row.get(6)?;

    Ok(Lead {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        primary_job_location: row.get(4)?,
        status: status.parse().unwrap_or_default(),
        lead_source: source.parse().unwrap_or(LeadSource::Other),
        last_estimate_total: row.get(7)?,
        last_estimate_currency: row.get(8)?,
        last_interaction_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Contact details and pipeline movement for a find-or-create
#[derive(Debug, Clone, Default)]
pub struct LeadUpsert {
    pub full_name: Option<String>,
    /// Normalized (trimmed, lowercased) email
    pub email: Option<String>,
    /// Normalized phone
    pub phone: Option<String>,
    pub job_location: Option<String>,
    pub estimate_total: Option<f64>,
    /// Status for a newly created lead
    pub status_if_new: LeadStatus,
    /// Status an existing lead moves to
    pub status_if_existing: LeadStatus,
}

fn fallback_name(upsert: &LeadUpsert) -> String {
    if let Some(name) = upsert.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match upsert.email.as_deref().and_then(|e| e.split('@').next()) {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "SmartNET Lead".to_string(),
    }
}

/// Oldest lead whose `column` equals `value`
fn find_lead_by(conn: &rusqlite::Connection, column: &str, value: &str) -> Result<Option<Lead>> {
    let lead = conn
        .query_row(
            &format!(
                "SELECT {} FROM leads WHERE {} = ? ORDER BY created_at LIMIT 1",
                LEAD_COLUMNS, column
            ),
            [value],
            row_to_lead,
        )
        .optional()?;

    Ok(lead)
}

/// Find the lead by email, then by phone, and update it; create one when neither matches.
///
/// Runs in one transaction so two concurrent submissions from the same person
/// cannot both create a lead.
pub async fn upsert_lead(conn: AsyncDbConnection, upsert: &LeadUpsert) -> Result<Lead> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    let mut existing = None;
    if let Some(email) = upsert.email.as_deref() {
        existing = find_lead_by(&tx, "email", email)?;
    }
    if existing.is_none() {
        if let Some(phone) = upsert.phone.as_deref() {
            existing = find_lead_by(&tx, "phone", phone)?;
        }
    }

    let id = match existing {
        Some(lead) => {
            tx.execute(
                "UPDATE leads SET
                    full_name = CASE WHEN ?1 IS NOT NULL THEN ?1 ELSE full_name END,
                    email = COALESCE(email, ?2),
                    phone = COALESCE(?3, phone),
                    primary_job_location = COALESCE(?4, primary_job_location),
                    last_estimate_total = COALESCE(?5, last_estimate_total),
                    status = ?6,
                    last_interaction_at = ?7,
                    updated_at = ?7
                 WHERE id = ?8",
                rusqlite::params![
                    upsert.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
                    &upsert.email,
                    &upsert.phone,
                    &upsert.job_location,
                    upsert.estimate_total,
                    upsert.status_if_existing.as_str(),
                    now,
                    &lead.id,
                ],
            )?;
            lead.id
        }
        None => {
            let id = format!("{}.{}", LEAD_ID_PREFIX, uuid::Uuid::new_v4());
            tx.execute(
                "INSERT INTO leads
                 (id, full_name, email, phone, primary_job_location, status, lead_source,
                  last_estimate_total, last_estimate_currency, last_interaction_at, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'USD', ?, ?, ?)",
                rusqlite::params![
                    &id,
                    fallback_name(upsert),
                    &upsert.email,
                    &upsert.phone,
                    &upsert.job_location,
                    upsert.status_if_new.as_str(),
                    LeadSource::SmartnetFunnel.as_str(),
                    upsert.estimate_total,
                    now,
                    now,
                    now,
                ],
            )?;
            id
        }
    };

    let lead = tx.query_row(
        &format!("SELECT {} FROM leads WHERE id = ?", LEAD_COLUMNS),
        [&id],
        row_to_lead,
    )?;
    tx.commit()?;

    Ok(lead)
}

/// Record that the lead came back (opened a quote link)
pub async fn touch_lead(conn: AsyncDbConnection, id: &str, status: LeadStatus) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE leads SET status = ?, last_interaction_at = ?, updated_at = ? WHERE id = ?",
        rusqlite::params![status.as_str(), now, now, id],
    )?;

    Ok(())
}

pub async fn get_lead(conn: AsyncDbConnection, id: &str) -> Result<Option<Lead>> {
    let conn = conn.lock().await?;

    let lead = conn
        .query_row(
            &format!("SELECT {} FROM leads WHERE id = ?", LEAD_COLUMNS),
            [id],
            row_to_lead,
        )
        .optional()?;

    Ok(lead)
}
