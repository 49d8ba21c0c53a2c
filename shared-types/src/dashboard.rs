use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Coarse status shown on the owner dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OwnerBookingStatus {
    New,
    Scheduled,
    Followup,
    Completed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Initial,
    Followup,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBooking {
    pub id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub booking_type: BookingKind,
    #[serde(rename = "scheduledForISO")]
    pub scheduled_for_iso: Option<String>,
    pub status: OwnerBookingStatus,
    pub rough_low: Option<f64>,
    pub rough_high: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReminderBucket {
    Today,
    Week,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Walkthrough,
    Followup,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReminderItem {
    pub id: String,
    pub booking_id: String,
    pub label: String,
    pub when: String,
    pub bucket: ReminderBucket,
    pub kind: ReminderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadEventType {
    EstimateCreated,
    MagicLinkCreated,
    MagicLinkOpened,
    BookingCreated,
    FollowupScheduled,
    JobScheduled,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeadEvent {
    pub id: String,
    pub occurred_at: String,
    pub event_type: LeadEventType,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub booking_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub active_leads: u32,
    pub upcoming_walkthroughs: u32,
    pub open_followups: u32,
    pub completed_jobs: u32,
}

/// Response of `GET /api/owner/dashboard`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboardData {
    pub bookings: Vec<OwnerBooking>,
    pub reminders: Vec<ReminderItem>,
    pub lead_events: Vec<LeadEvent>,
    pub kpis: DashboardKpis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEventKind {
    Initial,
    Followup,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCalendarEvent {
    pub id: String,
    pub booking_id: String,
    pub title: String,
    #[serde(rename = "startISO")]
    pub start_iso: String,
    pub kind: CalendarEventKind,
    pub status: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CalendarResponse {
    pub events: Vec<OwnerCalendarEvent>,
}
