use chrono::{DateTime, NaiveDate, NaiveTime};

/// Appointment slots offered by the booking calendar
pub const TIME_SLOTS: [&str; 5] = ["9:00 AM", "11:00 AM", "1:00 PM", "3:00 PM", "5:00 PM"];

/// Reduce a submitted date (`2025-12-15` or an RFC 3339 timestamp) to `YYYY-MM-DD`.
pub fn canonical_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a slot label such as `9:00 AM` or `3:30 pm`.
///
/// Range labels (`10:00 AM – 11:00 AM`) resolve to their start time.
pub fn parse_time_slot(slot: &str) -> Option<NaiveTime> {
    let mut words = slot.split_whitespace();
    let time = words.next()?;
    let meridiem = words.next()?.to_uppercase();

    let (hours, minutes) = time.split_once(':').unwrap_or((time, "0"));
    let mut hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;

    match meridiem.as_str() {
        "PM" if hours < 12 => hours += 12,
        "AM" if hours == 12 => hours = 0,
        "AM" | "PM" => {}
        _ => return None,
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Local start time for a date + slot, e.g. `2025-12-15T15:00:00`.
/// Falls back to the bare date when the slot cannot be read.
pub fn slot_start_iso(date: &str, slot: Option<&str>) -> String {
    let Some(day) = canonical_date(date) else {
        return date.to_string();
    };

    match slot.and_then(parse_time_slot) {
        Some(time) => day.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => day.format("%Y-%m-%d").to_string(),
    }
}
