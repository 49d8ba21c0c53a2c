use crate::database::magic_links as db;
use crate::database::AsyncDbConnection;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodically flips active magic-link sessions past their expiry to `expired`
pub struct MagicLinkExpiryManager {
    db_conn: AsyncDbConnection,
    shutting_down: AtomicBool,
}

impl MagicLinkExpiryManager {
    pub fn new(db_conn: AsyncDbConnection) -> Self {
        Self {
            db_conn,
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Run one sweep; returns how many sessions expired
    pub async fn sweep(&self) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();
        let expired = db::expire_stale_sessions(self.db_conn.clone(), now).await?;
        if expired > 0 {
            tracing::info!("Marked {} magic link sessions as expired", expired);
        }
        Ok(expired)
    }

    /// Spawn the sweep loop; the first tick fires immediately
    pub fn spawn(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                if self.is_shutting_down() {
                    break;
                }
                if let Err(e) = self.sweep().await {
                    tracing::error!("Magic link expiry sweep failed: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::magic_links::{get_session_by_token, insert_session, sample_session};
    use crate::database::test_database;
    use shared_types::MagicLinkStatus;

    #[tokio::test]
    async fn test_sweep_expires_stale_sessions() {
        let (db, _dir) = test_database();
        let now = chrono::Utc::now().timestamp();
        insert_session(db.async_connection.clone(), &sample_session("stale", now - 100, now - 10))
            .await
            .unwrap();
        insert_session(db.async_connection.clone(), &sample_session("live", now, now + 3_600))
            .await
            .unwrap();

        let manager = MagicLinkExpiryManager::new(db.async_connection.clone());
        assert_eq!(manager.sweep().await.unwrap(), 1);
        assert_eq!(manager.sweep().await.unwrap(), 0);

        let live = get_session_by_token(db.async_connection.clone(), "live")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(live.status, MagicLinkStatus::Active);
    }

    #[tokio::test]
    async fn test_loop_stops_after_shutdown() {
        let (db, _dir) = test_database();
        let manager = Arc::new(MagicLinkExpiryManager::new(db.async_connection.clone()));
        manager.shutdown();

        let handle = manager.clone().spawn(Duration::from_millis(10));
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
