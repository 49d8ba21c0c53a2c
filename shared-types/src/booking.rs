use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::estimate::EstimateSnapshot;

/// Booking lifecycle status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    New,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Closed bookings no longer need reminders or a slot
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(BookingStatus::New),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "no_show" => Ok(BookingStatus::NoShow),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Where the job will take place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Home,
    Office,
    Retail,
    Industrial,
    Multi,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Home => "home",
            LocationType::Office => "office",
            LocationType::Retail => "retail",
            LocationType::Industrial => "industrial",
            LocationType::Multi => "multi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationType::Home => "Home / residence",
            LocationType::Office => "Office / suite",
            LocationType::Retail => "Retail / storefront",
            LocationType::Industrial => "Warehouse / industrial",
            LocationType::Multi => "Multi-location / campus",
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(LocationType::Home),
            "office" => Ok(LocationType::Office),
            "retail" => Ok(LocationType::Retail),
            "industrial" => Ok(LocationType::Industrial),
            "multi" => Ok(LocationType::Multi),
            _ => Err(format!("Invalid location type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingContact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobLocation {
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Body of `POST /api/booking`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(rename = "dateISO", default)]
    pub date_iso: String,
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub contact: BookingContact,
    #[serde(default)]
    pub job_location: Option<JobLocation>,
    #[serde(default)]
    pub estimate: Option<EstimateSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateBookingResponse {
    pub ok: bool,
    pub id: String,
    /// Present (true) only when the submission matched an existing booking
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deduped: bool,
}

/// Stored walkthrough booking
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WalkthroughBooking {
    pub id: String,
    pub idempotency_key: String,
    pub status: BookingStatus,
    pub appointment_type: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub time_slot: String,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub location_type: Option<LocationType>,
    pub location_label: String,
    pub location_note: Option<String>,
    pub needs_onsite_walkthrough: bool,
    pub is_virtual_call: bool,
    pub is_phone_call: bool,
    pub estimate_summary: String,
    pub estimate_rough_range: String,
    pub estimate_total: Option<f64>,
    pub estimate: Option<EstimateSnapshot>,
    pub lead_id: Option<String>,
    #[serde(rename = "followupWalkthroughDateISO")]
    pub followup_date_iso: Option<String>,
    #[serde(rename = "followupWalkthroughTimeSlot")]
    pub followup_time_slot: Option<String>,
    pub followup_scheduled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct BookingsResponse {
    pub bookings: Vec<WalkthroughBooking>,
}

/// Body of `POST /api/booking/followup`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowupRequest {
    pub booking_id: String,
    #[serde(rename = "followupDateISO")]
    pub followup_date_iso: String,
    pub followup_time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FollowupResponse {
    pub ok: bool,
    pub id: String,
    #[serde(rename = "followupWalkthroughDateISO")]
    pub followup_date_iso: String,
    #[serde(rename = "followupWalkthroughTimeSlot")]
    pub followup_time_slot: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// One offered time slot for a calendar day
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlotAvailability {
    pub slot: String,
    pub available: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<SlotAvailability>,
}
