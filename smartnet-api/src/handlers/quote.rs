use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use funnel_core::{canonical_date, QuoteBooking, QuoteDocument};
use shared_types::{CreateBookingRequest, EstimateSnapshot};

use crate::database::bookings as db;
use crate::handlers::error::ApiError;
use crate::handlers::AppState;
use crate::helpers::owner_session::OwnerSession;

const LOCATION_NOT_SPECIFIED: &str = "Not specified";

fn render_pdf(
    booking: &QuoteBooking<'_>,
    estimate: Option<&EstimateSnapshot>,
) -> Result<HttpResponse, ApiError> {
    let generated_at = chrono::Local::now().naive_local();
    let document = QuoteDocument::for_booking(booking, estimate, generated_at);

    let bytes = document.render().map_err(|e| {
        tracing::error!("Quote PDF rendering failed: {}", e);
        ApiError::Internal("Failed to generate quote PDF".to_string())
    })?;

    let date = canonical_date(booking.date_iso)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| generated_at.format("%Y-%m-%d").to_string());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(QuoteDocument::file_name(&date))],
        })
        .body(bytes))
}

/// `POST /api/quote/pdf`: quote for a booking payload that has not been stored
pub async fn quote_pdf_from_request(
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();
    let location_type = req.job_location.as_ref().and_then(|l| l.location_type);

    let booking = QuoteBooking {
        date_iso: &req.date_iso,
        time_slot: &req.time_slot,
        appointment_type: req.appointment_type.as_deref().unwrap_or("Walkthrough"),
        contact_name: Some(req.contact.full_name.as_str()),
        contact_email: Some(req.contact.email.as_str()),
        contact_phone: Some(req.contact.phone.as_str()),
        location_label: location_type
            .map(|t| t.label())
            .unwrap_or(LOCATION_NOT_SPECIFIED),
        location_note: req.job_location.as_ref().and_then(|l| l.note.as_deref()),
    };

    render_pdf(&booking, req.estimate.as_ref())
}

/// `GET /api/owner/bookings/{id}/quote.pdf`
pub async fn quote_pdf_for_booking(
    _owner: OwnerSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let stored = db::get_booking(state.db.async_connection.clone(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let booking = QuoteBooking {
        date_iso: &stored.date_iso,
        time_slot: &stored.time_slot,
        appointment_type: &stored.appointment_type,
        contact_name: Some(stored.contact_name.as_str()),
        contact_email: stored.contact_email.as_deref(),
        contact_phone: stored.contact_phone.as_deref(),
        location_label: &stored.location_label,
        location_note: stored.location_note.as_deref(),
    };

    render_pdf(&booking, stored.estimate.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::bookings::{insert_booking_if_absent, sample_booking};
    use crate::handlers::test_support::{context, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_quote_pdf_from_payload() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/quote/pdf")
            .set_json(serde_json::json!({
                "dateISO": "2025-12-15",
                "timeSlot": "9:00 AM",
                "contact": { "fullName": "Jane Doe", "email": "jane@smartnet.dev", "phone": "" },
                "estimate": { "projectType": "office", "roughLow": 3366, "roughHigh": 4356 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");

        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("SmartNET-Estimate-2025-12-15.pdf"));

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF-"));
    }

    #[actix_web::test]
    async fn test_quote_pdf_for_stored_booking() {
        let ctx = context();
        let app = test_app!(ctx);
        insert_booking_if_absent(
            ctx.state.db.async_connection.clone(),
            &sample_booking("b1", "2025-12-15", "9:00 AM"),
        )
        .await
        .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/owner/bookings/b1/quote.pdf")
            .cookie(ctx.owner_cookie().await)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/owner/bookings/missing/quote.pdf")
            .cookie(ctx.owner_cookie().await)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
