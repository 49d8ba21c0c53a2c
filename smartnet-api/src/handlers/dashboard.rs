use actix_web::{web, HttpResponse};
use funnel_core::{build_dashboard, calendar_events};
use shared_types::{BookingsResponse, CalendarResponse, UpdateBookingStatusRequest};

use crate::database::bookings as db;
use crate::database::magic_links;
use crate::handlers::error::ApiError;
use crate::handlers::AppState;
use crate::helpers::owner_session::OwnerSession;

const DASHBOARD_BOOKING_LIMIT: usize = 150;
const DASHBOARD_SESSION_LIMIT: usize = 200;
const CALENDAR_BOOKING_LIMIT: usize = 500;

pub async fn get_dashboard(
    _owner: OwnerSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let bookings =
        db::list_bookings(state.db.async_connection.clone(), DASHBOARD_BOOKING_LIMIT).await?;
    let sessions =
        magic_links::list_sessions(state.db.async_connection.clone(), DASHBOARD_SESSION_LIMIT)
            .await?;

    let today = chrono::Local::now().date_naive();
    let dashboard = build_dashboard(&bookings, &sessions, today);

    Ok(HttpResponse::Ok().json(dashboard))
}

pub async fn get_calendar(
    _owner: OwnerSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let bookings =
        db::list_bookings(state.db.async_connection.clone(), CALENDAR_BOOKING_LIMIT).await?;

    Ok(HttpResponse::Ok().json(CalendarResponse {
        events: calendar_events(&bookings),
    }))
}

pub async fn list_bookings(
    _owner: OwnerSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let bookings =
        db::list_bookings(state.db.async_connection.clone(), DASHBOARD_BOOKING_LIMIT).await?;

    Ok(HttpResponse::Ok().json(BookingsResponse { bookings }))
}

pub async fn get_booking(
    _owner: OwnerSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let booking = db::get_booking(state.db.async_connection.clone(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    Ok(HttpResponse::Ok().json(booking))
}

pub async fn update_booking_status(
    _owner: OwnerSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let status = request.into_inner().status;

    let booking = db::update_booking_status(state.db.async_connection.clone(), &id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    tracing::info!("Booking {} marked {}", booking.id, status.as_str());
    Ok(HttpResponse::Ok().json(booking))
}
