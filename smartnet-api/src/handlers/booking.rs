use actix_web::{web, HttpResponse};
use funnel_core::identity::{normalize_email, normalize_phone};
use funnel_core::summary::BOOKING_SUMMARY_FALLBACK;
use funnel_core::{
    booking_record_id, canonical_date, derive_idempotency_key, estimate_summary, estimate_total,
    rough_range_label, AppointmentFlags, BookingIdentity, TIME_SLOTS,
};
use serde::Deserialize;
use shared_types::{
    BookingStatus, CreateBookingRequest, CreateBookingResponse, FollowupRequest, FollowupResponse,
    LeadStatus, SlotAvailability, SlotsResponse, WalkthroughBooking,
};

use crate::database::bookings as db;
use crate::database::leads::{self, LeadUpsert};
use crate::handlers::error::ApiError;
use crate::handlers::AppState;
use crate::helpers::owner_session::OwnerSession;
use crate::integrations::email_templates::{booking_email_html, booking_subject};
use crate::integrations::mailer::OutgoingEmail;

const DEFAULT_APPOINTMENT_TYPE: &str = "Walkthrough";
const LOCATION_NOT_SPECIFIED: &str = "Not specified";

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

pub async fn create_booking(
    state: web::Data<AppState>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();

    let (Some(full_name), Some(email), Some(_), Some(time_slot)) = (
        non_empty(&req.contact.full_name),
        non_empty(&req.contact.email),
        non_empty(&req.date_iso),
        non_empty(&req.time_slot),
    ) else {
        return Err(ApiError::Validation(
            "Missing required fields (name, email, date, timeSlot)".to_string(),
        ));
    };

    let date = canonical_date(&req.date_iso)
        .ok_or_else(|| ApiError::Validation("dateISO must be a date (YYYY-MM-DD)".to_string()))?
        .format("%Y-%m-%d")
        .to_string();

    let appointment_type = req
        .appointment_type
        .as_deref()
        .and_then(non_empty)
        .unwrap_or(DEFAULT_APPOINTMENT_TYPE)
        .to_string();
    let flags = AppointmentFlags::from_type(&appointment_type);
    let phone = non_empty(&req.contact.phone);

    let idempotency_key = derive_idempotency_key(&BookingIdentity {
        email: Some(email),
        phone,
        date: &date,
        time_slot,
        appointment_type: &appointment_type,
    });
    let id = booking_record_id(&idempotency_key);

    let location_type = req.job_location.as_ref().and_then(|l| l.location_type);
    let estimate = req.estimate.as_ref();
    let now = chrono::Utc::now().timestamp();

    let booking = WalkthroughBooking {
        id: id.clone(),
        idempotency_key,
        status: BookingStatus::New,
        appointment_type,
        date_iso: date,
        time_slot: time_slot.to_string(),
        contact_name: full_name.to_string(),
        contact_email: Some(email.to_string()),
        contact_phone: phone.map(str::to_string),
        location_type,
        location_label: location_type
            .map(|t| t.label())
            .unwrap_or(LOCATION_NOT_SPECIFIED)
            .to_string(),
        location_note: req
            .job_location
            .as_ref()
            .and_then(|l| l.note.as_deref())
            .and_then(non_empty)
            .map(str::to_string),
        needs_onsite_walkthrough: flags.needs_onsite_walkthrough(),
        is_virtual_call: flags.is_virtual,
        is_phone_call: flags.is_phone,
        estimate_summary: estimate_summary(estimate, BOOKING_SUMMARY_FALLBACK),
        estimate_rough_range: rough_range_label(estimate),
        estimate_total: estimate_total(estimate),
        estimate: req.estimate.clone(),
        lead_id: None,
        followup_date_iso: None,
        followup_time_slot: None,
        followup_scheduled_at: None,
        created_at: now,
        updated_at: now,
    };

    let created = db::insert_booking_if_absent(state.db.async_connection.clone(), &booking).await?;
    if !created {
        tracing::info!("Duplicate booking submission for {}, skipping notification", id);
        return Ok(HttpResponse::Ok().json(CreateBookingResponse {
            ok: true,
            id,
            deduped: true,
        }));
    }

    tracing::info!(
        "Created booking {} ({} on {} at {})",
        booking.id,
        booking.appointment_type,
        booking.date_iso,
        booking.time_slot
    );

    link_lead(&state, &booking).await;
    notify_owner(&state, &booking).await;

    Ok(HttpResponse::Ok().json(CreateBookingResponse {
        ok: true,
        id,
        deduped: false,
    }))
}

/// Attach the booking to the person's lead, creating the lead when needed
async fn link_lead(state: &AppState, booking: &WalkthroughBooking) {
    let upsert = LeadUpsert {
        full_name: Some(booking.contact_name.clone()),
        email: normalize_email(booking.contact_email.as_deref()),
        phone: normalize_phone(booking.contact_phone.as_deref()),
        job_location: booking.location_note.clone(),
        estimate_total: booking.estimate_total,
        status_if_new: LeadStatus::Booked,
        status_if_existing: LeadStatus::Booked,
    };

    let result = async {
        let lead = leads::upsert_lead(state.db.async_connection.clone(), &upsert).await?;
        db::set_booking_lead(state.db.async_connection.clone(), &booking.id, &lead.id).await?;
        anyhow::Ok(lead.id)
    }
    .await;

    match result {
        Ok(lead_id) => tracing::info!("Linked booking {} to lead {}", booking.id, lead_id),
        Err(e) => tracing::warn!("Failed to link booking {} to a lead: {:#}", booking.id, e),
    }
}

async fn notify_owner(state: &AppState, booking: &WalkthroughBooking) {
    let recipients = state.config.email.booking_recipients();
    if recipients.is_empty() {
        tracing::warn!("No booking notification recipients configured");
        return;
    }

    let owner_booking_url = format!(
        "{}/owner/booking/{}",
        state.config.app.public_url.trim_end_matches('/'),
        booking.id
    );
    tracing::info!("Owner booking URL: {}", owner_booking_url);

    let email = OutgoingEmail {
        from: state.config.email.from.clone(),
        to: recipients,
        subject: booking_subject(booking),
        html: booking_email_html(booking, &owner_booking_url),
    };

    match state.mailer.send(&email).await {
        Ok(()) => tracing::info!("Booking email sent to {:?}", email.to),
        Err(e) => tracing::error!("Booking email for {} failed: {}", booking.id, e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    #[serde(default)]
    pub date: String,
}

pub async fn list_slots(
    state: web::Data<AppState>,
    query: web::Query<SlotsQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = canonical_date(&query.date)
        .ok_or_else(|| ApiError::Validation("A valid date (YYYY-MM-DD) is required".to_string()))?
        .format("%Y-%m-%d")
        .to_string();

    let taken = db::taken_slots(state.db.async_connection.clone(), &date).await?;

    let slots = TIME_SLOTS
        .iter()
        .map(|slot| SlotAvailability {
            slot: slot.to_string(),
            available: !taken.iter().any(|t| t.as_str() == *slot),
        })
        .collect();

    Ok(HttpResponse::Ok().json(SlotsResponse { date, slots }))
}

pub async fn schedule_followup(
    _owner: OwnerSession,
    state: web::Data<AppState>,
    request: web::Json<FollowupRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();

    let (Some(booking_id), Some(_), Some(time_slot)) = (
        non_empty(&req.booking_id),
        non_empty(&req.followup_date_iso),
        non_empty(&req.followup_time_slot),
    ) else {
        return Err(ApiError::Validation(
            "bookingId, followupDateISO, and followupTimeSlot are required.".to_string(),
        ));
    };

    let followup_date = canonical_date(&req.followup_date_iso)
        .ok_or_else(|| {
            ApiError::Validation("followupDateISO must be a date (YYYY-MM-DD)".to_string())
        })?
        .format("%Y-%m-%d")
        .to_string();

    let booking = db::schedule_followup(
        state.db.async_connection.clone(),
        booking_id,
        &followup_date,
        time_slot,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    tracing::info!(
        "Follow-up walkthrough for {} set to {} at {}",
        booking.id,
        followup_date,
        time_slot
    );

    Ok(HttpResponse::Ok().json(FollowupResponse {
        ok: true,
        id: booking.id,
        followup_date_iso: booking.followup_date_iso.unwrap_or(followup_date),
        followup_time_slot: booking
            .followup_time_slot
            .unwrap_or_else(|| time_slot.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn booking_body() -> serde_json::Value {
        serde_json::json!({
            "dateISO": "2025-12-15",
            "timeSlot": "9:00 AM",
            "appointmentType": "Virtual call",
            "contact": { "fullName": "Jane Doe", "email": " Jane@Example.com ", "phone": "(404) 555-0000" },
            "jobLocation": { "type": "office", "note": "Suite 200" },
            "estimate": { "projectType": "office", "roughLow": 3366, "roughHigh": 4356 }
        })
    }

    #[actix_web::test]
    async fn test_duplicate_submission_is_deduped_without_second_email() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/booking")
            .set_json(booking_body())
            .to_request();
        let first: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(first["ok"], true);
        assert!(first.get("deduped").is_none());

        let id = first["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("walkthroughBooking."));
        assert_eq!(id.len(), "walkthroughBooking.".len() + 64);

        // Same person, different casing and a full timestamp for the same day
        let mut retry = booking_body();
        retry["contact"]["email"] = serde_json::json!("jane@example.com");
        retry["dateISO"] = serde_json::json!("2025-12-15T14:00:00Z");
        let req = test::TestRequest::post()
            .uri("/api/booking")
            .set_json(retry)
            .to_request();
        let second: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second["id"], id);
        assert_eq!(second["deduped"], true);

        let sent = ctx.mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["bookings@smartnet.dev", "owner@smartnet.dev"]);
        assert!(sent[0].subject.starts_with("New SmartNET Booking – Virtual call on Monday"));

        let stored = db::get_booking(ctx.state.db.async_connection.clone(), &id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.needs_onsite_walkthrough);
        assert!(stored.is_virtual_call);
        assert_eq!(stored.location_label, "Office / suite");
        assert_eq!(stored.estimate_total, Some(3861.0));
        assert!(stored.lead_id.is_some());
    }

    #[actix_web::test]
    async fn test_missing_fields_rejected() {
        let ctx = context();
        let app = test_app!(ctx);

        let mut body = booking_body();
        body["contact"]["email"] = serde_json::json!("  ");
        let req = test::TestRequest::post()
            .uri("/api/booking")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "Missing required fields (name, email, date, timeSlot)");
        assert!(ctx.mailer.sent.lock().await.is_empty());
    }

    #[actix_web::test]
    async fn test_slots_reflect_existing_bookings() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/booking")
            .set_json(booking_body())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/booking/slots?date=2025-12-15")
            .to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let slots = json["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0]["slot"], "9:00 AM");
        assert_eq!(slots[0]["available"], false);
        assert_eq!(slots[1]["available"], true);

        let req = test::TestRequest::get()
            .uri("/api/booking/slots?date=someday")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_followup_requires_owner_session() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/booking")
            .set_json(booking_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let followup = serde_json::json!({
            "bookingId": id,
            "followupDateISO": "2025-12-20",
            "followupTimeSlot": "1:00 PM"
        });

        let req = test::TestRequest::post()
            .uri("/api/booking/followup")
            .set_json(&followup)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/booking/followup")
            .cookie(ctx.owner_cookie().await)
            .set_json(&followup)
            .to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["followupWalkthroughDateISO"], "2025-12-20");
        assert_eq!(json["followupWalkthroughTimeSlot"], "1:00 PM");

        let req = test::TestRequest::post()
            .uri("/api/booking/followup")
            .cookie(ctx.owner_cookie().await)
            .set_json(serde_json::json!({ "bookingId": "walkthroughBooking.nope", "followupDateISO": "2025-12-20", "followupTimeSlot": "1:00 PM" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/booking/followup")
            .cookie(ctx.owner_cookie().await)
            .set_json(serde_json::json!({ "bookingId": id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
