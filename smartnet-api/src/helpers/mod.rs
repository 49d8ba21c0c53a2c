pub mod database;
pub mod owner_session;
pub mod rate_limiter;
pub mod request;
