use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod booking;
pub mod dashboard;
pub mod estimate;
pub mod lead;
pub mod magic_link;
pub mod owner;

pub use booking::{
    BookingContact, BookingStatus, BookingsResponse, CreateBookingRequest, CreateBookingResponse,
    FollowupRequest, FollowupResponse, JobLocation, LocationType, SlotAvailability, SlotsResponse,
    UpdateBookingStatusRequest, WalkthroughBooking,
};
pub use dashboard::{
    BookingKind, CalendarEventKind, CalendarResponse, DashboardKpis, LeadEvent, LeadEventType,
    OwnerBooking, OwnerBookingStatus, OwnerCalendarEvent, OwnerDashboardData, ReminderBucket,
    ReminderItem, ReminderKind,
};
pub use estimate::{
    AccessPointLayout, CameraDensity, DeviceSelection, DoorCoverage, EstimateInput,
    EstimateResult, EstimateSnapshot, ExtrasSelection, FocusSelection, ProjectType, RackLocation,
    StyleSelection, Urgency, WiringStyle,
};
pub use lead::{Lead, LeadSource, LeadStatus};
pub use magic_link::{
    CreateMagicLinkRequest, CreateMagicLinkResponse, MagicLinkContact, MagicLinkSession,
    MagicLinkStatus, RestoreMagicLinkResponse,
};
pub use owner::{ClearTestDataResponse, OwnerAccessRequest, OwnerAccessResponse};

/// Error body returned by every failing API call
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_wire_names() {
        let json = r#"{
            "dateISO": "2025-12-15",
            "timeSlot": "9:00 AM",
            "appointmentType": "On-site walkthrough",
            "contact": { "fullName": "Jane Doe", "email": "jane@example.com", "phone": "(555) 000-1111" },
            "jobLocation": { "type": "office", "note": "Suite 200" },
            "estimate": { "projectType": "office", "roughLow": 4000, "roughHigh": 5200 }
        }"#;

        let req: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.date_iso, "2025-12-15");
        assert_eq!(req.time_slot, "9:00 AM");
        assert_eq!(req.contact.full_name, "Jane Doe");

        let location = req.job_location.unwrap();
        assert_eq!(location.location_type, Some(LocationType::Office));
        assert_eq!(location.note.as_deref(), Some("Suite 200"));

        let estimate = req.estimate.unwrap();
        assert_eq!(estimate.rough_low, Some(4000.0));
        assert!(estimate.focus.is_empty());
    }

    #[test]
    fn test_booking_request_missing_fields_default_to_empty() {
        let req: CreateBookingRequest = serde_json::from_str("{}").unwrap();
        assert!(req.date_iso.is_empty());
        assert!(req.contact.email.is_empty());
        assert!(req.estimate.is_none());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!("no_show".parse::<BookingStatus>().unwrap(), BookingStatus::NoShow);
        assert!("bogus".parse::<BookingStatus>().is_err());

        let json = serde_json::to_string(&LeadSource::SmartnetFunnel).unwrap();
        assert_eq!(json, "\"smartnet_funnel\"");
    }

    #[test]
    fn test_estimate_input_defaults_fill_missing_fields() {
        let input: EstimateInput =
            serde_json::from_str(r#"{ "projectType": "retail", "devices": { "doors": "multi-door" } }"#)
                .unwrap();
        assert_eq!(input.project_type, ProjectType::Retail);
        assert_eq!(input.square_footage, 1800);
        assert_eq!(input.devices.doors, DoorCoverage::MultiDoor);
        assert_eq!(input.devices.cameras, CameraDensity::Standard);
        assert!(input.focus.cameras);
    }

    #[test]
    fn test_followup_request_wire_names() {
        let req: FollowupRequest = serde_json::from_str(
            r#"{ "bookingId": "walkthroughBooking.abc", "followupDateISO": "2025-12-20", "followupTimeSlot": "1:00 PM" }"#,
        )
        .unwrap();
        assert_eq!(req.booking_id, "walkthroughBooking.abc");
        assert_eq!(req.followup_date_iso, "2025-12-20");
    }
}
