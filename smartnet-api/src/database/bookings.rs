use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{OptionalExtension, Row};
use shared_types::{BookingStatus, EstimateSnapshot, LocationType, WalkthroughBooking};

const BOOKING_COLUMNS: &str = "id, idempotency_key, status, appointment_type, date_iso, time_slot,
    contact_name, contact_email, contact_phone, location_type, location_label, location_note,
    needs_onsite_walkthrough, is_virtual_call, is_phone_call, estimate_summary,
    estimate_rough_range, estimate_total, estimate_json, lead_id, followup_date_iso,
    followup_time_slot, followup_scheduled_at, created_at, updated_at";

fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<WalkthroughBooking> {
    let status: String = row.get(2)?;
    let location_type: Option<String> = row.get(9)?;
    let estimate_json: Option<String> = row.get(18)?;

    Ok(WalkthroughBooking {
        id: row.get(0)?,
        idempotency_key: row.get(1)?,
        status: status.parse().unwrap_or_default(),
        appointment_type: row.get(3)?,
        date_iso: row.get(4)?,
        time_slot: row.get(5)?,
        contact_name: row.get(6)?,
        contact_email: row.get(7)?,
        contact_phone: row.get(8)?,
        location_type: location_type.and_then(|t| t.parse::<LocationType>().ok()),
        location_label: row.get(10)?,
        location_note: row.get(11)?,
        needs_onsite_walkthrough: row.get(12)?,
        is_virtual_call: row.get(13)?,
        is_phone_call: row.get(14)?,
        estimate_summary: row.get(15)?,
        estimate_rough_range: row.get(16)?,
        estimate_total: row.get(17)?,
        estimate: estimate_json.and_then(|json| serde_json::from_str::<EstimateSnapshot>(&json).ok()),
        lead_id: row.get(19)?,
        followup_date_iso: row.get(20)?,
        followup_time_slot: row.get(21)?,
        followup_scheduled_at: row.get(22)?,
        created_at: row.get(23)?,
        updated_at: row.get(24)?,
    })
}

/// Insert a booking unless a record with the same id already exists.
///
/// Returns `true` when this call created the record. Concurrent duplicate
/// submissions race on the primary key, so exactly one of them sees `true`.
pub async fn insert_booking_if_absent(
    conn: AsyncDbConnection,
    booking: &WalkthroughBooking,
) -> Result<bool> {
    let conn = conn.lock().await?;

    let estimate_json = booking
        .estimate
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let inserted = conn.execute(
        "INSERT INTO walkthrough_bookings
         (id, idempotency_key, status, appointment_type, date_iso, time_slot,
          contact_name, contact_email, contact_phone, location_type, location_label, location_note,
          needs_onsite_walkthrough, is_virtual_call, is_phone_call, estimate_summary,
          estimate_rough_range, estimate_total, estimate_json, lead_id, followup_date_iso,
          followup_time_slot, followup_scheduled_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO NOTHING",
        rusqlite::params![
            &booking.id,
            &booking.idempotency_key,
            booking.status.as_str(),
            &booking.appointment_type,
            &booking.date_iso,
            &booking.time_slot,
            &booking.contact_name,
            &booking.contact_email,
            &booking.contact_phone,
            booking.location_type.map(|t| t.as_str()),
            &booking.location_label,
            &booking.location_note,
            booking.needs_onsite_walkthrough,
            booking.is_virtual_call,
            booking.is_phone_call,
            &booking.estimate_summary,
            &booking.estimate_rough_range,
            booking.estimate_total,
            estimate_json,
            &booking.lead_id,
            &booking.followup_date_iso,
            &booking.followup_time_slot,
            booking.followup_scheduled_at,
            booking.created_at,
            booking.updated_at,
        ],
    )?;

    Ok(inserted == 1)
}

pub async fn get_booking(conn: AsyncDbConnection, id: &str) -> Result<Option<WalkthroughBooking>> {
    let conn = conn.lock().await?;

    let booking = conn
        .query_row(
            &format!("SELECT {} FROM walkthrough_bookings WHERE id = ?", BOOKING_COLUMNS),
            [id],
            row_to_booking,
        )
        .optional()?;

    Ok(booking)
}

/// Newest bookings first
pub async fn list_bookings(conn: AsyncDbConnection, limit: usize) -> Result<Vec<WalkthroughBooking>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM walkthrough_bookings ORDER BY created_at DESC, id LIMIT ?",
        BOOKING_COLUMNS
    ))?;

    let bookings = stmt
        .query_map([limit as i64], row_to_booking)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(bookings)
}

/// Slots already held on a date by bookings that were not cancelled
pub async fn taken_slots(conn: AsyncDbConnection, date_iso: &str) -> Result<Vec<String>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT DISTINCT time_slot FROM walkthrough_bookings
         WHERE date_iso = ? AND status != 'cancelled'",
    )?;

    let slots = stmt
        .query_map([date_iso], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(slots)
}

pub async fn set_booking_lead(conn: AsyncDbConnection, id: &str, lead_id: &str) -> Result<()> {
    let conn = conn.lock().await?;

    conn.execute(
        "UPDATE walkthrough_bookings SET lead_id = ? WHERE id = ?",
        rusqlite::params![lead_id, id],
    )?;

    Ok(())
}

/// Record a follow-up walkthrough. Returns `None` for an unknown booking.
pub async fn schedule_followup(
    conn: AsyncDbConnection,
    id: &str,
    followup_date_iso: &str,
    followup_time_slot: &str,
) -> Result<Option<WalkthroughBooking>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let updated = conn.execute(
        "UPDATE walkthrough_bookings
         SET followup_date_iso = ?, followup_time_slot = ?, followup_scheduled_at = ?, updated_at = ?
         WHERE id = ?",
        rusqlite::params![followup_date_iso, followup_time_slot, now, now, id],
    )?;

    if updated == 0 {
        return Ok(None);
    }

    let booking = conn.query_row(
        &format!("SELECT {} FROM walkthrough_bookings WHERE id = ?", BOOKING_COLUMNS),
        [id],
        row_to_booking,
    )?;

    Ok(Some(booking))
}

pub async fn update_booking_status(
    conn: AsyncDbConnection,
    id: &str,
    status: BookingStatus,
) -> Result<Option<WalkthroughBooking>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let updated = conn.execute(
        "UPDATE walkthrough_bookings SET status = ?, updated_at = ? WHERE id = ?",
        rusqlite::params![status.as_str(), now, id],
    )?;

    if updated == 0 {
        return Ok(None);
    }

    let booking = conn.query_row(
        &format!("SELECT {} FROM walkthrough_bookings WHERE id = ?", BOOKING_COLUMNS),
        [id],
        row_to_booking,
    )?;

    Ok(Some(booking))
}

#[cfg(test)]
pub(crate) fn sample_booking(id: &str, date_iso: &str, time_slot: &str) -> WalkthroughBooking {
    WalkthroughBooking {
        id: id.to_string(),
        idempotency_key: format!("key-{}", id),
        status: BookingStatus::New,
        appointment_type: "On-site walkthrough".to_string(),
        date_iso: date_iso.to_string(),
        time_slot: time_slot.to_string(),
        contact_name: "Jane Doe".to_string(),
        contact_email: Some("jane@smartnet.dev".to_string()),
        contact_phone: Some("4045550000".to_string()),
        location_type: Some(LocationType::Office),
        location_label: LocationType::Office.label().to_string(),
        location_note: None,
        needs_onsite_walkthrough: false,
        is_virtual_call: false,
        is_phone_call: false,
        estimate_summary: "Type: office".to_string(),
        estimate_rough_range: "$3,366 – $4,356".to_string(),
        estimate_total: Some(3861.0),
        estimate: Some(EstimateSnapshot {
            project_type: Some("office".to_string()),
            rough_low: Some(3366.0),
            rough_high: Some(4356.0),
            ..EstimateSnapshot::default()
        }),
        lead_id: None,
        followup_date_iso: None,
        followup_time_slot: None,
        followup_scheduled_at: None,
        created_at: 1_765_000_000,
        updated_at: 1_765_000_000,
    }
}
