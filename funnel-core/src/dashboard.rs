//! Owner dashboard and calendar view models.
//!
//! Everything here is recomputed per request from the stored bookings and
//! magic-link sessions; nothing is persisted.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use shared_types::{
    BookingKind, BookingStatus, CalendarEventKind, DashboardKpis, LeadEvent, LeadEventType,
    MagicLinkSession, OwnerBooking, OwnerBookingStatus, OwnerCalendarEvent, OwnerDashboardData,
    ReminderBucket, ReminderItem, ReminderKind, WalkthroughBooking,
};

use crate::identity::{person_key, resolve_display_name, PersonKey};
use crate::schedule::{canonical_date, slot_start_iso};
use crate::summary::parse_estimate_range;

const WEEK_AHEAD_DAYS: i64 = 7;

pub fn owner_status(status: BookingStatus) -> OwnerBookingStatus {
    match status {
        BookingStatus::New => OwnerBookingStatus::New,
        BookingStatus::Confirmed | BookingStatus::InProgress => OwnerBookingStatus::Scheduled,
        BookingStatus::Completed => OwnerBookingStatus::Completed,
        BookingStatus::Cancelled | BookingStatus::NoShow => OwnerBookingStatus::Unknown,
    }
}

/// Dashboard status for a booking; open bookings with a follow-up on the books show as `followup`
pub fn owner_booking_status(booking: &WalkthroughBooking) -> OwnerBookingStatus {
    let has_followup = booking
        .followup_date_iso
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());

    if has_followup && !booking.status.is_closed() {
        OwnerBookingStatus::Followup
    } else {
        owner_status(booking.status)
    }
}

pub fn booking_kind(appointment_type: &str) -> BookingKind {
    if appointment_type.to_lowercase().contains("follow") {
        BookingKind::Followup
    } else {
        BookingKind::Initial
    }
}

/// Bucket a day relative to today; days more than a week out get no reminder.
pub fn classify_bucket(day: NaiveDate, today: NaiveDate) -> Option<ReminderBucket> {
    let week_end = today + Duration::days(WEEK_AHEAD_DAYS);

    if day == today {
        Some(ReminderBucket::Today)
    } else if day > today && day <= week_end {
        Some(ReminderBucket::Week)
    } else if day < today {
        Some(ReminderBucket::Overdue)
    } else {
        None
    }
}

/// `Dec 15 • 9:00 AM`
pub fn friendly_when(day: NaiveDate, time_slot: Option<&str>) -> String {
    let date = day.format("%b %-d").to_string();
    match time_slot.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slot) => format!("{} • {}", date, slot),
        None => date,
    }
}

pub fn timestamp_iso(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Display names keyed by person, bookings taking precedence over quote sessions
struct NameBook {
    names: HashMap<PersonKey, String>,
}

impl NameBook {
    fn build(bookings: &[WalkthroughBooking], sessions: &[MagicLinkSession]) -> Self {
        let mut names = HashMap::new();

        for b in bookings {
            let key = person_key(b.contact_email.as_deref(), b.contact_phone.as_deref());
            if key.is_known() {
                names.entry(key).or_insert_with(|| {
                    resolve_display_name(
                        Some(&b.contact_name),
                        b.contact_email.as_deref(),
                        b.contact_phone.as_deref(),
                    )
                });
            }
        }

        for s in sessions {
            let key = person_key(s.email.as_deref(), s.phone.as_deref());
            if key.is_known() {
                names.entry(key).or_insert_with(|| {
                    resolve_display_name(
                        s.contact_name.as_deref(),
                        s.email.as_deref(),
                        s.phone.as_deref(),
                    )
                });
            }
        }

        Self { names }
    }

    fn display_name(&self, name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> String {
        let key = person_key(email, phone);
        self.names
            .get(&key)
            .cloned()
            .unwrap_or_else(|| resolve_display_name(name, email, phone))
    }
}

fn owner_booking(b: &WalkthroughBooking, names: &NameBook) -> OwnerBooking {
    let (rough_low, rough_high) = parse_estimate_range(Some(&b.estimate_rough_range));

    OwnerBooking {
        id: b.id.clone(),
        customer_name: names.display_name(
            Some(&b.contact_name),
            b.contact_email.as_deref(),
            b.contact_phone.as_deref(),
        ),
        customer_email: b.contact_email.clone(),
        customer_phone: b.contact_phone.clone(),
        booking_type: booking_kind(&b.appointment_type),
        scheduled_for_iso: canonical_date(&b.date_iso)
            .map(|_| slot_start_iso(&b.date_iso, Some(&b.time_slot))),
        status: owner_booking_status(b),
        rough_low: rough_low.or(b.estimate_total),
        rough_high,
    }
}

fn lead_events(
    bookings: &[WalkthroughBooking],
    sessions: &[MagicLinkSession],
    names: &NameBook,
) -> Vec<LeadEvent> {
    let mut timed: Vec<(i64, LeadEvent)> = Vec::new();

    let mut push = |ts: i64, event: LeadEvent| timed.push((ts, event));

    for s in sessions {
        let who = names.display_name(s.contact_name.as_deref(), s.email.as_deref(), s.phone.as_deref());

        if let Some(occurred_at) = timestamp_iso(s.created_at) {
            push(
                s.created_at,
                LeadEvent {
                    id: format!("ml_created_{}", s.id),
                    occurred_at,
                    event_type: LeadEventType::MagicLinkCreated,
                    customer_name: who.clone(),
                    customer_email: s.email.clone(),
                    booking_id: None,
                },
            );
        }

        if let Some(opened) = s.last_accessed_at {
            if let Some(occurred_at) = timestamp_iso(opened) {
                push(
                    opened,
                    LeadEvent {
                        id: format!("ml_opened_{}", s.id),
                        occurred_at,
                        event_type: LeadEventType::MagicLinkOpened,
                        customer_name: who.clone(),
                        customer_email: s.email.clone(),
                        booking_id: None,
                    },
                );
            }
        }
    }

    for b in bookings {
        let who = names.display_name(
            Some(&b.contact_name),
            b.contact_email.as_deref(),
            b.contact_phone.as_deref(),
        );

        if let Some(occurred_at) = timestamp_iso(b.created_at) {
            push(
                b.created_at,
                LeadEvent {
                    id: format!("bk_{}", b.id),
                    occurred_at,
                    event_type: LeadEventType::BookingCreated,
                    customer_name: who.clone(),
                    customer_email: b.contact_email.clone(),
                    booking_id: Some(b.id.clone()),
                },
            );
        }

        if let Some(scheduled) = b.followup_scheduled_at {
            if let Some(occurred_at) = timestamp_iso(scheduled) {
                push(
                    scheduled,
                    LeadEvent {
                        id: format!("fu_{}", b.id),
                        occurred_at,
                        event_type: LeadEventType::FollowupScheduled,
                        customer_name: who,
                        customer_email: b.contact_email.clone(),
                        booking_id: Some(b.id.clone()),
                    },
                );
            }
        }
    }

    timed.sort_by(|a, b| b.0.cmp(&a.0));
    timed.into_iter().map(|(_, event)| event).collect()
}

fn reminders(bookings: &[WalkthroughBooking], names: &NameBook, today: NaiveDate) -> Vec<ReminderItem> {
    let mut items = Vec::new();

    for b in bookings.iter().filter(|b| !b.status.is_closed()) {
        let who = names.display_name(
            Some(&b.contact_name),
            b.contact_email.as_deref(),
            b.contact_phone.as_deref(),
        );

        if let Some(day) = canonical_date(&b.date_iso) {
            if let Some(bucket) = classify_bucket(day, today) {
                items.push(ReminderItem {
                    id: format!("{}-walkthrough", b.id),
                    booking_id: b.id.clone(),
                    label: format!("Walkthrough – {}", who),
                    when: friendly_when(day, Some(&b.time_slot)),
                    bucket,
                    kind: ReminderKind::Walkthrough,
                });
            }
        }

        if let Some(day) = b.followup_date_iso.as_deref().and_then(canonical_date) {
            if let Some(bucket) = classify_bucket(day, today) {
                items.push(ReminderItem {
                    id: format!("{}-followup", b.id),
                    booking_id: b.id.clone(),
                    label: format!("Follow-up – {}", who),
                    when: friendly_when(day, b.followup_time_slot.as_deref()),
                    bucket,
                    kind: ReminderKind::Followup,
                });
            }
        }
    }

    items
}

/// Assemble the owner dashboard payload.
///
/// `bookings` and `sessions` are expected newest first. Repeated booking ids are
/// counted once.
pub fn build_dashboard(
    bookings: &[WalkthroughBooking],
    sessions: &[MagicLinkSession],
    today: NaiveDate,
) -> OwnerDashboardData {
    let mut seen = HashSet::new();
    let bookings: Vec<WalkthroughBooking> = bookings
        .iter()
        .filter(|b| seen.insert(b.id.clone()))
        .cloned()
        .collect();
    let bookings = bookings.as_slice();

    let names = NameBook::build(bookings, sessions);

    let owner_bookings: Vec<OwnerBooking> =
        bookings.iter().map(|b| owner_booking(b, &names)).collect();

    let reminders = reminders(bookings, &names, today);
    let lead_events = lead_events(bookings, sessions, &names);

    let active_leads: HashSet<PersonKey> = bookings
        .iter()
        .map(|b| person_key(b.contact_email.as_deref(), b.contact_phone.as_deref()))
        .chain(sessions.iter().map(|s| person_key(s.email.as_deref(), s.phone.as_deref())))
        .filter(PersonKey::is_known)
        .collect();

    let upcoming_walkthroughs = bookings
        .iter()
        .filter(|b| !b.status.is_closed())
        .filter(|b| canonical_date(&b.date_iso).is_some_and(|day| day >= today))
        .count();

    let open_followups = reminders
        .iter()
        .filter(|r| r.kind == ReminderKind::Followup)
        .count();

    let completed_jobs = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .count();

    OwnerDashboardData {
        bookings: owner_bookings,
        reminders,
        lead_events,
        kpis: DashboardKpis {
            active_leads: active_leads.len() as u32,
            upcoming_walkthroughs: upcoming_walkthroughs as u32,
            open_followups: open_followups as u32,
            completed_jobs: completed_jobs as u32,
        },
    }
}

/// Initial and follow-up walkthroughs as calendar events, earliest first
pub fn calendar_events(bookings: &[WalkthroughBooking]) -> Vec<OwnerCalendarEvent> {
    let mut events = Vec::new();

    for b in bookings {
        let base_title = if !b.contact_name.trim().is_empty() {
            b.contact_name.trim().to_string()
        } else {
            b.contact_email
                .clone()
                .unwrap_or_else(|| "Walkthrough".to_string())
        };

        if !b.date_iso.is_empty() {
            events.push(OwnerCalendarEvent {
                id: format!("{}-initial", b.id),
                booking_id: b.id.clone(),
                title: format!("{} — Initial", base_title),
                start_iso: slot_start_iso(&b.date_iso, Some(&b.time_slot)),
                kind: CalendarEventKind::Initial,
                status: b.status.as_str().to_string(),
            });
        }

        if let Some(date) = b.followup_date_iso.as_deref().filter(|d| !d.is_empty()) {
            events.push(OwnerCalendarEvent {
                id: format!("{}-followup", b.id),
                booking_id: b.id.clone(),
                title: format!("{} — Follow-Up", base_title),
                start_iso: slot_start_iso(date, b.followup_time_slot.as_deref()),
                kind: CalendarEventKind::Followup,
                status: b.status.as_str().to_string(),
            });
        }
    }

    // Dates are zero-padded local ISO strings, so lexical order is chronological
    events.sort_by(|a, b| a.start_iso.cmp(&b.start_iso));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::MagicLinkStatus;

    fn booking(id: &str, name: &str, email: Option<&str>, date: &str, created_at: i64) -> WalkthroughBooking {
        WalkthroughBooking {
            id: id.to_string(),
            idempotency_key: "k".repeat(64),
            status: BookingStatus::New,
            appointment_type: "On-site walkthrough".to_string(),
            date_iso: date.to_string(),
            time_slot: "9:00 AM".to_string(),
            contact_name: name.to_string(),
            contact_email: email.map(str::to_string),
            contact_phone: None,
            location_type: None,
            location_label: "Not specified".to_string(),
            location_note: None,
            needs_onsite_walkthrough: false,
            is_virtual_call: false,
            is_phone_call: false,
            estimate_summary: String::new(),
            estimate_rough_range: "$3,366 – $4,356".to_string(),
            estimate_total: Some(3861.0),
            estimate: None,
            lead_id: None,
            followup_date_iso: None,
            followup_time_slot: None,
            followup_scheduled_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn session(id: &str, email: Option<&str>, created_at: i64, opened: Option<i64>) -> MagicLinkSession {
        MagicLinkSession {
            id: id.to_string(),
            token: format!("token-{}", id),
            lead_id: None,
            contact_name: None,
            email: email.map(str::to_string),
            phone: None,
            job_location: None,
            status: MagicLinkStatus::Active,
            estimate_total: None,
            estimate_summary: String::new(),
            estimate: None,
            expires_at: created_at + 7 * 86_400,
            created_at,
            last_accessed_at: opened,
            restored: opened.is_some(),
            restored_at: opened,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_classify_bucket() {
        let today = day("2025-12-15");
        assert_eq!(classify_bucket(day("2025-12-15"), today), Some(ReminderBucket::Today));
        assert_eq!(classify_bucket(day("2025-12-22"), today), Some(ReminderBucket::Week));
        assert_eq!(classify_bucket(day("2025-12-23"), today), None);
        assert_eq!(classify_bucket(day("2025-12-01"), today), Some(ReminderBucket::Overdue));
    }

    #[test]
    fn test_friendly_when() {
        assert_eq!(friendly_when(day("2025-12-05"), Some("9:00 AM")), "Dec 5 • 9:00 AM");
        assert_eq!(friendly_when(day("2025-12-05"), Some("  ")), "Dec 5");
    }

    #[test]
    fn test_booking_kind_and_status() {
        assert_eq!(booking_kind("Follow-up walkthrough"), BookingKind::Followup);
        assert_eq!(booking_kind("Phone call"), BookingKind::Initial);
        assert_eq!(owner_status(BookingStatus::Confirmed), OwnerBookingStatus::Scheduled);
        assert_eq!(owner_status(BookingStatus::NoShow), OwnerBookingStatus::Unknown);
    }

    #[test]
    fn test_scheduled_followup_shows_as_followup() {
        let mut b = booking("b1", "Jane", Some("jane@x.com"), "2025-12-16", 200);
        assert_eq!(owner_booking_status(&b), OwnerBookingStatus::New);

        b.followup_date_iso = Some("2025-12-20".to_string());
        b.status = BookingStatus::Confirmed;
        assert_eq!(owner_booking_status(&b), OwnerBookingStatus::Followup);

        let data = build_dashboard(std::slice::from_ref(&b), &[], day("2025-12-15"));
        assert_eq!(data.bookings[0].status, OwnerBookingStatus::Followup);

        b.status = BookingStatus::Completed;
        assert_eq!(owner_booking_status(&b), OwnerBookingStatus::Completed);
    }

    #[test]
    fn test_dashboard_shapes_bookings_and_kpis() {
        let today = day("2025-12-15");
        let mut done = booking("b2", "Sam", Some("sam@x.com"), "2025-12-01", 100);
        done.status = BookingStatus::Completed;

        let bookings = vec![
            booking("b1", "Jane", Some("Jane@X.com"), "2025-12-16", 200),
            done,
            booking("b1", "Jane", Some("jane@x.com"), "2025-12-16", 200),
        ];
        let sessions = vec![
            session("s1", Some("jane@x.com"), 50, Some(300)),
            session("s2", Some("new@x.com"), 40, None),
        ];

        let data = build_dashboard(&bookings, &sessions, today);

        assert_eq!(data.bookings.len(), 2);
        let jane = &data.bookings[0];
        assert_eq!(jane.customer_name, "Jane");
        assert_eq!(jane.rough_low, Some(3366.0));
        assert_eq!(jane.rough_high, Some(4356.0));
        assert_eq!(jane.scheduled_for_iso.as_deref(), Some("2025-12-16T09:00:00"));

        assert_eq!(data.kpis.active_leads, 3);
        assert_eq!(data.kpis.completed_jobs, 1);
        assert_eq!(data.kpis.upcoming_walkthroughs, 1);
        assert_eq!(data.kpis.open_followups, 0);

        // Completed bookings get no reminders
        assert_eq!(data.reminders.len(), 1);
        assert_eq!(data.reminders[0].booking_id, "b1");
        assert_eq!(data.reminders[0].bucket, ReminderBucket::Week);
    }

    #[test]
    fn test_session_names_use_booking_name() {
        let bookings = vec![booking("b1", "Jane Doe", Some("jane@x.com"), "2025-12-16", 200)];
        let sessions = vec![session("s1", Some("JANE@x.com"), 50, None)];

        let data = build_dashboard(&bookings, &sessions, day("2025-12-15"));
        let created = data
            .lead_events
            .iter()
            .find(|e| e.event_type == LeadEventType::MagicLinkCreated)
            .unwrap();
        assert_eq!(created.customer_name, "Jane Doe");
    }

    #[test]
    fn test_lead_events_newest_first() {
        let mut b = booking("b1", "Jane", Some("jane@x.com"), "2025-12-16", 200);
        b.followup_date_iso = Some("2025-12-18".to_string());
        b.followup_scheduled_at = Some(400);

        let sessions = vec![session("s1", Some("jane@x.com"), 50, Some(300))];
        let data = build_dashboard(&[b], &sessions, day("2025-12-15"));

        let kinds: Vec<LeadEventType> = data.lead_events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![
                LeadEventType::FollowupScheduled,
                LeadEventType::MagicLinkOpened,
                LeadEventType::BookingCreated,
                LeadEventType::MagicLinkCreated,
            ]
        );
        assert_eq!(data.kpis.open_followups, 1);
    }

    #[test]
    fn test_calendar_events_sorted() {
        let mut early = booking("b1", "", Some("a@x.com"), "2025-12-10", 1);
        early.followup_date_iso = Some("2025-12-20".to_string());
        early.followup_time_slot = Some("1:00 PM".to_string());
        let late = booking("b2", "Bo", None, "2025-12-12", 2);

        let events = calendar_events(&[early, late]);
        let starts: Vec<&str> = events.iter().map(|e| e.start_iso.as_str()).collect();
        assert_eq!(
            starts,
            vec!["2025-12-10T09:00:00", "2025-12-12T09:00:00", "2025-12-20T13:00:00"]
        );
        assert_eq!(events[0].title, "a@x.com — Initial");
        assert_eq!(events[2].kind, CalendarEventKind::Followup);
    }
}
