use actix_web::{web, HttpResponse};
use funnel_core::identity::{normalize_email, normalize_phone};
use funnel_core::summary::MAGIC_LINK_SUMMARY_FALLBACK;
use funnel_core::{estimate_summary, estimate_total};
use shared_types::{
    CreateMagicLinkRequest, CreateMagicLinkResponse, LeadStatus, MagicLinkSession,
    MagicLinkStatus, RestoreMagicLinkResponse,
};

use crate::database::leads::{self, LeadUpsert};
use crate::database::magic_links as db;
use crate::handlers::error::ApiError;
use crate::handlers::AppState;
use crate::integrations::email_templates::{magic_link_email_html, MAGIC_LINK_SUBJECT};
use crate::integrations::mailer::OutgoingEmail;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn create_magic_link(
    state: web::Data<AppState>,
    request: web::Json<CreateMagicLinkRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();

    let email = normalize_email(req.contact.email.as_deref());
    let phone = normalize_phone(req.contact.phone.as_deref());
    if email.is_none() && phone.is_none() {
        return Err(ApiError::Validation("Email or phone is required".to_string()));
    }

    let full_name = trimmed(req.contact.full_name.as_deref());
    let job_location = trimmed(req.contact.job_location.as_deref());
    let estimate = req.estimate;
    let total = estimate_total(estimate.as_ref());

    let token = uuid::Uuid::new_v4().to_string();
    let quote_url = format!(
        "{}/quote/{}",
        state.config.app.public_url.trim_end_matches('/'),
        token
    );

    let lead = leads::upsert_lead(
        state.db.async_connection.clone(),
        &LeadUpsert {
            full_name: full_name.clone(),
            email: email.clone(),
            phone: phone.clone(),
            job_location: job_location.clone(),
            estimate_total: total,
            status_if_new: LeadStatus::New,
            status_if_existing: LeadStatus::Engaged,
        },
    )
    .await?;

    let now = chrono::Utc::now().timestamp();
    let session = MagicLinkSession {
        id: format!("magicLinkSession.{}", uuid::Uuid::new_v4()),
        token: token.clone(),
        lead_id: Some(lead.id.clone()),
        contact_name: full_name.clone(),
        email: email.clone(),
        phone,
        job_location,
        status: MagicLinkStatus::Active,
        estimate_total: total,
        estimate_summary: estimate_summary(estimate.as_ref(), MAGIC_LINK_SUMMARY_FALLBACK),
        estimate,
        expires_at: now + state.config.magic_link.ttl_days * SECONDS_PER_DAY,
        created_at: now,
        last_accessed_at: None,
        restored: false,
        restored_at: None,
    };

    db::insert_session(state.db.async_connection.clone(), &session).await?;

    tracing::info!(
        "Magic link created: lead {}, session {}, url {}",
        lead.id,
        session.id,
        quote_url
    );

    if let Some(email) = email {
        let message = OutgoingEmail {
            from: state.config.email.from.clone(),
            to: vec![email],
            subject: MAGIC_LINK_SUBJECT.to_string(),
            html: magic_link_email_html(full_name.as_deref(), &quote_url),
        };
        if let Err(e) = state.mailer.send(&message).await {
            tracing::error!("Magic link email for session {} failed: {}", session.id, e);
        }
    }

    Ok(HttpResponse::Ok().json(CreateMagicLinkResponse {
        ok: true,
        quote_url,
        token,
        lead_id: lead.id,
        session_id: session.id,
    }))
}

pub async fn restore_magic_link(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let token = path.into_inner();

    let session = db::get_session_by_token(state.db.async_connection.clone(), &token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Magic link not found".to_string()))?;

    let now = chrono::Utc::now().timestamp();
    let is_expired = session.expires_at < now;

    // Tracking is best effort; the saved estimate is returned either way
    let session = match db::record_restore(state.db.async_connection.clone(), &token, now).await {
        Ok(Some(updated)) => updated,
        Ok(None) => session,
        Err(e) => {
            tracing::error!("Failed updating magic link tracking for {}: {:#}", session.id, e);
            MagicLinkSession {
                status: if is_expired {
                    MagicLinkStatus::Expired
                } else {
                    MagicLinkStatus::Redeemed
                },
                last_accessed_at: Some(now),
                restored: true,
                restored_at: session.restored_at.or(Some(now)),
                ..session
            }
        }
    };

    if let Some(lead_id) = session.lead_id.as_deref() {
        if let Err(e) =
            leads::touch_lead(state.db.async_connection.clone(), lead_id, LeadStatus::Engaged).await
        {
            tracing::error!("Failed updating lead {} interaction: {:#}", lead_id, e);
        }
    }

    Ok(HttpResponse::Ok().json(RestoreMagicLinkResponse {
        ok: true,
        is_expired,
        estimate: session.estimate.clone(),
        session,
    }))
}
