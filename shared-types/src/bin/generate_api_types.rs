use shared_types::*;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Estimate types
    types.push(clean_type(ProjectType::export_to_string()?));
    types.push(clean_type(CameraDensity::export_to_string()?));
    types.push(clean_type(AccessPointLayout::export_to_string()?));
    types.push(clean_type(DoorCoverage::export_to_string()?));
    types.push(clean_type(WiringStyle::export_to_string()?));
    types.push(clean_type(RackLocation::export_to_string()?));
    types.push(clean_type(Urgency::export_to_string()?));
    types.push(clean_type(FocusSelection::export_to_string()?));
    types.push(clean_type(DeviceSelection::export_to_string()?));
    types.push(clean_type(ExtrasSelection::export_to_string()?));
    types.push(clean_type(StyleSelection::export_to_string()?));
    types.push(clean_type(EstimateInput::export_to_string()?));
    types.push(clean_type(EstimateResult::export_to_string()?));
    types.push(clean_type(EstimateSnapshot::export_to_string()?));

    // Booking types
    types.push(clean_type(BookingStatus::export_to_string()?));
    types.push(clean_type(LocationType::export_to_string()?));
    types.push(clean_type(BookingContact::export_to_string()?));
    types.push(clean_type(JobLocation::export_to_string()?));
    types.push(clean_type(CreateBookingRequest::export_to_string()?));
    types.push(clean_type(CreateBookingResponse::export_to_string()?));
    types.push(clean_type(WalkthroughBooking::export_to_string()?));
    types.push(clean_type(BookingsResponse::export_to_string()?));
    types.push(clean_type(FollowupRequest::export_to_string()?));
    types.push(clean_type(FollowupResponse::export_to_string()?));
    types.push(clean_type(UpdateBookingStatusRequest::export_to_string()?));
    types.push(clean_type(SlotAvailability::export_to_string()?));
    types.push(clean_type(SlotsResponse::export_to_string()?));

    // Lead types
    types.push(clean_type(LeadStatus::export_to_string()?));
    types.push(clean_type(LeadSource::export_to_string()?));
    types.push(clean_type(Lead::export_to_string()?));

    // Magic link types
    types.push(clean_type(MagicLinkStatus::export_to_string()?));
    types.push(clean_type(MagicLinkContact::export_to_string()?));
    types.push(clean_type(CreateMagicLinkRequest::export_to_string()?));
    types.push(clean_type(CreateMagicLinkResponse::export_to_string()?));
    types.push(clean_type(MagicLinkSession::export_to_string()?));
    types.push(clean_type(RestoreMagicLinkResponse::export_to_string()?));

    // Owner dashboard types
    types.push(clean_type(OwnerBookingStatus::export_to_string()?));
    types.push(clean_type(BookingKind::export_to_string()?));
    types.push(clean_type(OwnerBooking::export_to_string()?));
    types.push(clean_type(ReminderBucket::export_to_string()?));
    types.push(clean_type(ReminderKind::export_to_string()?));
    types.push(clean_type(ReminderItem::export_to_string()?));
    types.push(clean_type(LeadEventType::export_to_string()?));
    types.push(clean_type(LeadEvent::export_to_string()?));
    types.push(clean_type(DashboardKpis::export_to_string()?));
    types.push(clean_type(OwnerDashboardData::export_to_string()?));
    types.push(clean_type(CalendarEventKind::export_to_string()?));
    types.push(clean_type(OwnerCalendarEvent::export_to_string()?));
    types.push(clean_type(CalendarResponse::export_to_string()?));

    // Owner access types
    types.push(clean_type(OwnerAccessRequest::export_to_string()?));
    types.push(clean_type(OwnerAccessResponse::export_to_string()?));
    types.push(clean_type(ClearTestDataResponse::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("../web/src/api-types"));
    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so per-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
