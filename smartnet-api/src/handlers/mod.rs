pub mod booking;
pub mod dashboard;
pub mod error;
pub mod estimate;
pub mod magic_link;
pub mod owner;
pub mod quote;

use actix_web::web;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::database::Database;
use crate::helpers::owner_session::OwnerSessionStore;
use crate::helpers::rate_limiter::{FixedWindowLimiter, RateLimiter};
use crate::integrations::mailer::Mailer;
use error::ApiError;

/// Shared state handed to every handler
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<ApiConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub owner_sessions: OwnerSessionStore,
    pub login_limiter: Arc<dyn RateLimiter>,
    pub login_window: Duration,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Arc<ApiConfig>, mailer: Arc<dyn Mailer>) -> Self {
        let login_window = Duration::from_secs(config.rate_limit.window_secs);
        Self {
            owner_sessions: OwnerSessionStore::new(config.owner.session_days),
            login_limiter: Arc::new(FixedWindowLimiter::new(
                config.rate_limit.owner_login_attempts,
                login_window,
            )),
            login_window,
            db,
            config,
            mailer,
        }
    }
}

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(format!("Invalid JSON body: {}", err)).into()),
    )
    .route("/api/estimate", web::post().to(estimate::compute))
    .route("/api/booking", web::post().to(booking::create_booking))
    .route("/api/booking/slots", web::get().to(booking::list_slots))
    .route("/api/booking/followup", web::post().to(booking::schedule_followup))
    .route("/api/magic-link", web::post().to(magic_link::create_magic_link))
    .route("/api/magic-link/{token}", web::get().to(magic_link::restore_magic_link))
    .route("/api/quote/pdf", web::post().to(quote::quote_pdf_from_request))
    .route("/api/owner/access", web::post().to(owner::login))
    .route("/api/owner/access", web::delete().to(owner::logout))
    .route("/api/owner/logout", web::post().to(owner::logout))
    .route("/api/owner/dev", web::delete().to(owner::clear_test_data))
    .route("/api/owner/dashboard", web::get().to(dashboard::get_dashboard))
    .route("/api/owner/calendar", web::get().to(dashboard::get_calendar))
    .route("/api/owner/bookings", web::get().to(dashboard::list_bookings))
    .route("/api/owner/bookings/{id}", web::get().to(dashboard::get_booking))
    .route("/api/owner/bookings/{id}/status", web::put().to(dashboard::update_booking_status))
    .route("/api/owner/bookings/{id}/quote.pdf", web::get().to(quote::quote_pdf_for_booking));
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::database::test_database;
    use crate::helpers::owner_session::OWNER_COOKIE;
    use crate::integrations::mailer::RecordingMailer;
    use actix_web::cookie::Cookie;

    pub struct TestContext {
        pub state: web::Data<AppState>,
        pub mailer: Arc<RecordingMailer>,
        _dir: tempfile::TempDir,
    }

    impl TestContext {
        pub async fn owner_cookie(&self) -> Cookie<'static> {
            let token = self.state.owner_sessions.issue().await;
            Cookie::new(OWNER_COOKIE, token)
        }
    }

    pub fn test_config() -> ApiConfig {
        let mut config = ApiConfig::default();
        config.owner.user = Some("owner".to_string());
        config.owner.pass = Some("hunter2".to_string());
        config.email.booking_inbox = Some("bookings@smartnet.dev".to_string());
        config.email.fallback_notify = Some("owner@smartnet.dev".to_string());
        config
    }

    pub fn context_with(config: ApiConfig) -> TestContext {
        let (db, dir) = test_database();
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(db, Arc::new(config), mailer.clone());
        TestContext {
            state: web::Data::new(state),
            mailer,
            _dir: dir,
        }
    }

    pub fn context() -> TestContext {
        context_with(test_config())
    }

    /// Build the app from a context; a macro because `init_service`'s return type cannot be named
    macro_rules! test_app {
        ($ctx:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data($ctx.state.clone())
                    .configure(crate::handlers::configure),
            )
            .await
        };
    }
    pub(crate) use test_app;
}
