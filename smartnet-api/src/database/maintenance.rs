use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::Transaction;

// name / email / phone columns per table, checked for test-looking values
const TEST_DATA_TABLES: [(&str, &str, &str, &str); 3] = [
    ("magic_link_sessions", "contact_name", "email", "phone"),
    ("walkthrough_bookings", "contact_name", "contact_email", "contact_phone"),
    ("leads", "full_name", "email", "phone"),
];

fn test_looking_ids(
    tx: &Transaction<'_>,
    table: &str,
    name_col: &str,
    email_col: &str,
    phone_col: &str,
    since: i64,
) -> Result<Vec<String>> {
    let mut stmt = tx.prepare(&format!(
        "SELECT id FROM {table}
         WHERE created_at > ?1 AND (
            lower(coalesce({name_col}, '')) LIKE '%test%'
            OR lower(coalesce({email_col}, '')) LIKE '%test%'
            OR lower(coalesce({email_col}, '')) LIKE '%example.com%'
            OR coalesce({phone_col}, '') LIKE '%555%'
         )
         ORDER BY created_at, id"
    ))?;

    let ids = stmt
        .query_map([since], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ids)
}

/// Delete test-looking sessions, bookings and leads created after `since`.
///
/// Everything goes in one transaction; returns the deleted record ids.
pub async fn clear_test_data(conn: AsyncDbConnection, since: i64) -> Result<Vec<String>> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let mut deleted = Vec::new();
    for (table, name_col, email_col, phone_col) in TEST_DATA_TABLES {
        let ids = test_looking_ids(&tx, table, name_col, email_col, phone_col, since)?;
        for id in &ids {
            tx.execute(&format!("DELETE FROM {table} WHERE id = ?"), [id])?;
        }
        deleted.extend(ids);
    }

    tx.commit()?;
    Ok(deleted)
}
