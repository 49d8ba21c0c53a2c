use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{OptionalExtension, Row};
use shared_types::{EstimateSnapshot, MagicLinkSession, MagicLinkStatus};

const SESSION_COLUMNS: &str = "id, token, lead_id, contact_name, email, phone, job_location, status,
    estimate_total, estimate_summary, estimate_json, expires_at, created_at, last_accessed_at,
    restored, restored_at";

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<MagicLinkSession> {
    let status: String = row.get(7)?;
    let estimate_json: Option<String> = row.get(10)?;

    Ok(MagicLinkSession {
        id: row.get(0)?,
        token: row.get(1)?,
        lead_id: row.get(2)?,
        contact_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        job_location: row.get(6)?,
        status: status.parse().unwrap_or_default(),
        estimate_total: row.get(8)?,
        estimate_summary: row.get(9)?,
        estimate: estimate_json.and_then(|json| serde_json::from_str::<EstimateSnapshot>(&json).ok()),
        expires_at: row.get(11)?,
        created_at: row.get(12)?,
        last_accessed_at: row.get(13)?,
        restored: row.get(14)?,
        restored_at: row.get(15)?,
    })
}

pub async fn insert_session(conn: AsyncDbConnection, session: &MagicLinkSession) -> Result<()> {
    let conn = conn.lock().await?;

    let estimate_json = session
        .estimate
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO magic_link_sessions
         (id, token, lead_id, contact_name, email, phone, job_location, status,
          estimate_total, estimate_summary, estimate_json, expires_at, created_at,
          last_accessed_at, restored, restored_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            &session.id,
            &session.token,
            &session.lead_id,
            &session.contact_name,
            &session.email,
            &session.phone,
            &session.job_location,
            session.status.as_str(),
            session.estimate_total,
            &session.estimate_summary,
            estimate_json,
            session.expires_at,
            session.created_at,
            session.last_accessed_at,
            session.restored,
            session.restored_at,
        ],
    )?;

    Ok(())
}

pub async fn get_session_by_token(
    conn: AsyncDbConnection,
    token: &str,
) -> Result<Option<MagicLinkSession>> {
    let conn = conn.lock().await?;

    let session = conn
        .query_row(
            &format!("SELECT {} FROM magic_link_sessions WHERE token = ?", SESSION_COLUMNS),
            [token],
            row_to_session,
        )
        .optional()?;

    Ok(session)
}

/// Mark a session as opened at `now`.
///
/// Sessions past `expires_at` become `expired`, everything else `redeemed`.
/// The first `restored_at` is kept on later visits.
pub async fn record_restore(
    conn: AsyncDbConnection,
    token: &str,
    now: i64,
) -> Result<Option<MagicLinkSession>> {
    let conn = conn.lock().await?;

    let updated = conn.execute(
        "UPDATE magic_link_sessions SET
            status = CASE WHEN expires_at < ?1 THEN 'expired' ELSE 'redeemed' END,
            last_accessed_at = ?1,
            restored = 1,
            restored_at = COALESCE(restored_at, ?1)
         WHERE token = ?2",
        rusqlite::params![now, token],
    )?;

    if updated == 0 {
        return Ok(None);
    }

    let session = conn.query_row(
        &format!("SELECT {} FROM magic_link_sessions WHERE token = ?", SESSION_COLUMNS),
        [token],
        row_to_session,
    )?;

    Ok(Some(session))
}

/// Newest sessions first
pub async fn list_sessions(conn: AsyncDbConnection, limit: usize) -> Result<Vec<MagicLinkSession>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM magic_link_sessions ORDER BY created_at DESC, id LIMIT ?",
        SESSION_COLUMNS
    ))?;

    let sessions = stmt
        .query_map([limit as i64], row_to_session)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(sessions)
}

/// Flip active sessions whose expiry has passed. Returns how many changed.
pub async fn expire_stale_sessions(conn: AsyncDbConnection, now: i64) -> Result<usize> {
    let conn = conn.lock().await?;

    let expired = conn.execute(
        "UPDATE magic_link_sessions SET status = ? WHERE status = ? AND expires_at < ?",
        rusqlite::params![
            MagicLinkStatus::Expired.as_str(),
            MagicLinkStatus::Active.as_str(),
            now
        ],
    )?;

    Ok(expired)
}

#[cfg(test)]
pub(crate) fn sample_session(token: &str, created_at: i64, expires_at: i64) -> MagicLinkSession {
    MagicLinkSession {
        id: format!("magicLinkSession.{}", token),
        token: token.to_string(),
        lead_id: None,
        contact_name: Some("Jane Doe".to_string()),
        email: Some("jane@smartnet.dev".to_string()),
        phone: None,
        job_location: None,
        status: MagicLinkStatus::Active,
        estimate_total: Some(3861.0),
        estimate_summary: "Type: office".to_string(),
        estimate: None,
        expires_at,
        created_at,
        last_accessed_at: None,
        restored: false,
        restored_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;

    #[tokio::test]
    async fn test_restore_keeps_first_restored_at() {
        let (db, _dir) = test_database();
        let session = sample_session("tok-1", 1_000, 10_000);
        insert_session(db.async_connection.clone(), &session).await.unwrap();

        let first = record_restore(db.async_connection.clone(), "tok-1", 2_000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, MagicLinkStatus::Redeemed);
        assert!(first.restored);
        assert_eq!(first.restored_at, Some(2_000));

        let second = record_restore(db.async_connection.clone(), "tok-1", 3_000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.restored_at, Some(2_000));
        assert_eq!(second.last_accessed_at, Some(3_000));
    }

    #[tokio::test]
    async fn test_restore_after_expiry_marks_expired() {
        let (db, _dir) = test_database();
        insert_session(db.async_connection.clone(), &sample_session("tok-1", 1_000, 5_000))
            .await
            .unwrap();

        let restored = record_restore(db.async_connection.clone(), "tok-1", 6_000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.status, MagicLinkStatus::Expired);

        assert!(record_restore(db.async_connection.clone(), "nope", 6_000)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_expire_stale_sessions() {
        let (db, _dir) = test_database();
        insert_session(db.async_connection.clone(), &sample_session("old", 1_000, 5_000))
            .await
            .unwrap();
        insert_session(db.async_connection.clone(), &sample_session("fresh", 2_000, 50_000))
            .await
            .unwrap();

        let expired = expire_stale_sessions(db.async_connection.clone(), 10_000).await.unwrap();
        assert_eq!(expired, 1);

        let old = get_session_by_token(db.async_connection.clone(), "old")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(old.status, MagicLinkStatus::Expired);

        let sessions = list_sessions(db.async_connection.clone(), 10).await.unwrap();
        assert_eq!(sessions[0].token, "fresh");
    }
}
