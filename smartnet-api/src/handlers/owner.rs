use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use constant_time_eq::constant_time_eq;
use shared_types::{ClearTestDataResponse, OwnerAccessRequest, OwnerAccessResponse};

use crate::database::maintenance;
use crate::handlers::error::ApiError;
use crate::handlers::AppState;
use crate::helpers::owner_session::{OwnerSession, OWNER_COOKIE};
use crate::helpers::rate_limiter::RateDecision;
use crate::helpers::request::client_ip;

const DEV_SECRET_HEADER: &str = "x-owner-dev-secret";
const TEST_DATA_WINDOW_DAYS: i64 = 14;

/// `POST /api/owner/access`: check owner credentials and issue the session cookie
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let ip = client_ip(&req);

    // Counted before the body is read so malformed attempts still use up the window
    if let RateDecision::Limited { .. } = state.login_limiter.hit(&ip).await {
        tracing::warn!("Owner login rate limited for {}", ip);
        return Err(ApiError::TooManyRequests {
            retry_after_secs: state.login_window.as_secs(),
            message: "Too many attempts. Try again shortly.".to_string(),
        });
    }

    let credentials: OwnerAccessRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Validation("Invalid request body".to_string()))?;

    let owner = &state.config.owner;
    let (Some(expected_user), Some(expected_pass)) = (
        owner.user.as_deref().filter(|u| !u.is_empty()),
        owner.pass.as_deref().filter(|p| !p.is_empty()),
    ) else {
        tracing::error!("Owner credentials are not configured");
        return Err(ApiError::Misconfigured(
            "Server missing owner credentials".to_string(),
        ));
    };

    // Evaluate both so a wrong user costs the same as a wrong password
    let user_ok = constant_time_eq(credentials.user.trim().as_bytes(), expected_user.as_bytes());
    let pass_ok = constant_time_eq(credentials.pass.as_bytes(), expected_pass.as_bytes());
    if !(user_ok && pass_ok) {
        tracing::warn!("Owner login failed from {}", ip);
        return Err(ApiError::Unauthorized);
    }

    let token = state.owner_sessions.issue().await;
    let cookie = Cookie::build(OWNER_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.is_production())
        .max_age(time::Duration::seconds(state.owner_sessions.ttl().num_seconds()))
        .finish();

    tracing::info!("Owner signed in from {}", ip);
    Ok(HttpResponse::Ok().cookie(cookie).json(OwnerAccessResponse {
        ok: true,
        error: None,
    }))
}

/// Revoke the current session (if any) and clear the cookie
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(OWNER_COOKIE) {
        state.owner_sessions.revoke(cookie.value()).await;
    }

    let mut removal = Cookie::build(OWNER_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(OwnerAccessResponse {
        ok: true,
        error: None,
    })
}

/// `DELETE /api/owner/dev`: remove recent test-looking records outside production
pub async fn clear_test_data(
    _owner: OwnerSession,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if state.config.is_production() {
        return Err(ApiError::Forbidden("Disabled in production.".to_string()));
    }

    if let Some(secret) = state.config.owner.dev_secret.as_deref().filter(|s| !s.is_empty()) {
        let provided = req
            .headers()
            .get(DEV_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !constant_time_eq(provided.as_bytes(), secret.as_bytes()) {
            return Err(ApiError::Forbidden("Forbidden.".to_string()));
        }
    }

    let since = (chrono::Utc::now() - chrono::Duration::days(TEST_DATA_WINDOW_DAYS)).timestamp();
    let ids = maintenance::clear_test_data(state.db.async_connection.clone(), since)
        .await
        .map_err(|e| {
            tracing::error!("Clearing test data failed: {:#}", e);
            ApiError::Internal("Failed to clear test data.".to_string())
        })?;

    tracing::info!("Cleared {} test records", ids.len());
    Ok(HttpResponse::Ok().json(ClearTestDataResponse {
        ok: true,
        deleted: ids.len() as u32,
        ids,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::bookings::{insert_booking_if_absent, list_bookings, sample_booking};
    use crate::handlers::test_support::{context, context_with, test_app, test_config};
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn login_request(user: &str, pass: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/owner/access")
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .set_json(serde_json::json!({ "user": user, "pass": pass }))
    }

    #[actix_web::test]
    async fn test_login_sets_session_cookie() {
        let ctx = context();
        let app = test_app!(ctx);

        let resp = test::call_service(&app, login_request(" owner ", "hunter2").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == OWNER_COOKIE)
            .unwrap()
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert!(ctx.state.owner_sessions.is_valid(cookie.value()).await);

        // The cookie opens owner endpoints
        let req = test::TestRequest::get()
            .uri("/api/owner/dashboard")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Logout revokes it
        let req = test::TestRequest::post()
            .uri("/api/owner/logout")
            .cookie(cookie.clone())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/owner/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_wrong_credentials_and_bad_body() {
        let ctx = context();
        let app = test_app!(ctx);

        let resp = test::call_service(&app, login_request("owner", "wrong").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Prefixes and extensions of the real secrets are rejected too
        for (user, pass) in [("owner", "hunter"), ("owner", "hunter22"), ("own", "hunter2"), ("", "")] {
            let resp = test::call_service(&app, login_request(user, pass).to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }

        let req = test::TestRequest::post()
            .uri("/api/owner/access")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_access_signs_out() {
        let ctx = context();
        let app = test_app!(ctx);
        let cookie = ctx.owner_cookie().await;

        let req = test::TestRequest::delete()
            .uri("/api/owner/access")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == OWNER_COOKIE)
            .unwrap()
            .into_owned();
        assert_eq!(cleared.value(), "");
        assert!(!ctx.state.owner_sessions.is_valid(cookie.value()).await);

        let req = test::TestRequest::get()
            .uri("/api/owner/calendar")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_thirteenth_attempt_is_rate_limited() {
        let ctx = context();
        let app = test_app!(ctx);

        for _ in 0..12 {
            let resp = test::call_service(&app, login_request("owner", "wrong").to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }

        // Even correct credentials are refused once the window is used up
        let resp = test::call_service(&app, login_request("owner", "hunter2").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("Retry-After").unwrap(), "60");

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Too many attempts. Try again shortly.");
    }

    #[actix_web::test]
    async fn test_missing_credentials_is_server_error() {
        let mut config = test_config();
        config.owner.pass = None;
        let ctx = context_with(config);
        let app = test_app!(ctx);

        let resp = test::call_service(&app, login_request("owner", "hunter2").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_clear_test_data() {
        let ctx = context();
        let app = test_app!(ctx);

        let mut fake = sample_booking("fake", "2025-12-15", "9:00 AM");
        fake.created_at = chrono::Utc::now().timestamp();
        insert_booking_if_absent(ctx.state.db.async_connection.clone(), &fake)
            .await
            .unwrap();

        let req = test::TestRequest::delete().uri("/api/owner/dev").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri("/api/owner/dev")
            .cookie(ctx.owner_cookie().await)
            .to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["deleted"], 1);
        assert_eq!(json["ids"][0], "fake");

        let left = list_bookings(ctx.state.db.async_connection.clone(), 10).await.unwrap();
        assert!(left.is_empty());
    }

    #[actix_web::test]
    async fn test_clear_test_data_guards() {
        let mut config = test_config();
        config.owner.dev_secret = Some("s3cret".to_string());
        let ctx = context_with(config);
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri("/api/owner/dev")
            .cookie(ctx.owner_cookie().await)
            .insert_header((DEV_SECRET_HEADER, "nope"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "Forbidden.");

        let req = test::TestRequest::delete()
            .uri("/api/owner/dev")
            .cookie(ctx.owner_cookie().await)
            .insert_header((DEV_SECRET_HEADER, "s3cret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let mut config = test_config();
        config.app.environment = "production".to_string();
        let ctx = context_with(config);
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri("/api/owner/dev")
            .cookie(ctx.owner_cookie().await)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "Disabled in production.");
    }
}
