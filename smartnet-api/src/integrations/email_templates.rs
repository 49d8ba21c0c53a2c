use chrono::{DateTime, NaiveDate, Utc};
use funnel_core::AppointmentFlags;
use shared_types::WalkthroughBooking;

const CORE_QUESTIONS: [&str; 6] = [
    "Confirm internet provider, modem/router location, and bandwidth.",
    "Confirm where the main network head-end / rack / NVR will live.",
    "Confirm any areas that absolutely MUST be covered by cameras (front door, gates, parking, loading, etc.).",
    "Confirm areas that should specifically NOT be recorded (privacy zones).",
    "Clarify budget comfort and any hard ceiling for this phase.",
    "Ask who is the day-to-day decision maker and who signs off on the final quote.",
];

const ONSITE_QUESTIONS: [&str; 4] = [
    "Walk the full perimeter and note mount heights and surface types (stucco, brick, metal, etc.).",
    "Check above ceilings / open ceilings for cable paths and possible obstacles.",
    "Confirm power availability near head-end and any remote locations (gates, poles, etc.).",
    "Confirm ladder / lift access and any safety constraints.",
];

const VIRTUAL_QUESTIONS: [&str; 3] = [
    "Have client walk the perimeter with their phone and show ceiling, walls, and key mounting spots.",
    "Have client show current networking gear and low-voltage closet (if any).",
    "Ask them to stand in weak Wi-Fi / blind camera spots while on video so you can see coverage problems.",
];

const PHONE_QUESTIONS: [&str; 2] = [
    "Ask for photos or a short video of the space (inside and outside) before the onsite.",
    "Confirm when someone can be onsite to walk with the tech during the walkthrough.",
];

const DIVIDER: &str = r#"<hr style="margin:12px 0; border:none; border-top:1px solid #e5e7eb;" />"#;

/// Escape user-supplied text for HTML bodies
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// "Monday, December 15, 2025", or the raw value when it is not a date
pub fn full_date(date_iso: &str) -> String {
    match NaiveDate::parse_from_str(date_iso, "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => date_iso.to_string(),
    }
}

pub fn booking_subject(booking: &WalkthroughBooking) -> String {
    format!(
        "New SmartNET Booking – {} on {} at {}",
        booking.appointment_type,
        full_date(&booking.date_iso),
        booking.time_slot
    )
}

fn html_list(items: &[&str]) -> String {
    let items: String = items
        .iter()
        .map(|q| format!(r#"<li style="margin-bottom:4px; line-height:1.4;">{}</li>"#, q))
        .collect();
    format!(
        r#"<ul style="margin: 8px 0 0 18px; padding:0; font-size:13px; color:#111827;">{}</ul>"#,
        items
    )
}

fn checklist_section(title: &str, items: &[&str]) -> String {
    format!(
        r#"<p style="margin:10px 0 2px 0; font-size:13px; font-weight:600;">{}</p>{}"#,
        title,
        html_list(items)
    )
}

/// Owner notification for a new booking: client details, quote snapshot and the crew checklist
pub fn booking_email_html(booking: &WalkthroughBooking, owner_booking_url: &str) -> String {
    let flags = AppointmentFlags::from_type(&booking.appointment_type);
    let call_type = escape_html(&booking.appointment_type);
    let created = DateTime::<Utc>::from_timestamp(booking.created_at, 0)
        .map(|dt| dt.format("%b %-d, %Y, %-I:%M %p UTC").to_string())
        .unwrap_or_default();

    let mut html = String::new();
    html.push_str(
        r#"<div style="font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; color:#0f172a; padding: 4px 0;">"#,
    );
    html.push_str(r#"<h2 style="color:#0f172a; margin:0 0 4px 0;">New SmartNET Booking</h2>"#);
    html.push_str(&format!(
        r#"<p style="margin:0; font-size:13px; color:#4b5563;">Created: {}<br/>Booking ID: <code style="font-size:12px; background:#f3f4f6; padding:2px 4px; border-radius:4px;">{}</code></p>"#,
        created,
        escape_html(&booking.id)
    ));
    html.push_str(&format!(
        r#"<p style="margin:8px 0 0 0; font-size:13px;"><a href="{}" target="_blank" rel="noopener noreferrer" style="display:inline-block; margin-top:6px; padding:8px 14px; border-radius:999px; background:#0f172a; color:#e5f0ff; font-size:13px; text-decoration:none;">Open booking dashboard view</a></p>"#,
        escape_html(owner_booking_url)
    ));
    html.push_str(DIVIDER);

    // Client & appointment
    html.push_str(r#"<h3 style="margin:0 0 6px 0; font-size:15px;">Client &amp; Appointment</h3>"#);
    html.push_str(&format!(
        r#"<div style="font-size:13px; color:#111827;"><strong>Client:</strong> {}<br/><strong>Email:</strong> {}<br/><strong>Phone:</strong> {}<br/><strong>Appointment Type:</strong> {}<br/><strong>Date &amp; Time:</strong> {} at {}<br/><strong>Location Type:</strong> {}"#,
        escape_html(&booking.contact_name),
        escape_html(booking.contact_email.as_deref().unwrap_or("")),
        escape_html(booking.contact_phone.as_deref().unwrap_or("")),
        call_type,
        full_date(&booking.date_iso),
        escape_html(&booking.time_slot),
        escape_html(&booking.location_label),
    ));
    if let Some(note) = booking.location_note.as_deref().filter(|n| !n.trim().is_empty()) {
        html.push_str(&format!(
            r#"<div style="margin-top:4px; font-size:13px; color:#4b5563;"><strong>Location Notes:</strong><br/><span style="white-space:pre-line;">{}</span></div>"#,
            escape_html(note)
        ));
    }
    html.push_str("</div>");
    html.push_str(DIVIDER);

    // Quote snapshot
    html.push_str(r#"<h3 style="margin:0 0 6px 0; font-size:15px;">Quote Snapshot</h3>"#);
    html.push_str(&format!(
        r#"<div style="font-size:13px; color:#111827; margin-top:10px;"><strong>AI Estimate Range:</strong> {}<br/><strong>Summary:</strong> {}"#,
        escape_html(&booking.estimate_rough_range),
        escape_html(&booking.estimate_summary),
    ));
    let client_notes = booking
        .estimate
        .as_ref()
        .and_then(|e| e.notes.as_deref())
        .filter(|n| !n.trim().is_empty());
    if let Some(notes) = client_notes {
        html.push_str(&format!(
            r#"<div style="margin-top:6px;"><strong>Client Notes:</strong><br/><span style="white-space:pre-line;">{}</span></div>"#,
            escape_html(notes)
        ));
    }
    html.push_str("</div>");
    html.push_str(DIVIDER);

    // Checklist
    html.push_str(&format!(
        r#"<h3 style="margin:0 0 6px 0; font-size:15px;">What to Cover on This {}</h3>"#,
        call_type
    ));
    html.push_str(r#"<p style="margin:0 0 4px 0; font-size:13px; color:#111827;">Use this as a quick script/checklist so every call or walkthrough moves the quote closer to a signed job.</p>"#);
    html.push_str(r#"<p style="margin:6px 0 2px 0; font-size:13px; font-weight:600;">Core items (every call):</p>"#);
    html.push_str(&html_list(&CORE_QUESTIONS));
    if flags.is_onsite {
        html.push_str(&checklist_section("On-site walkthrough checks:", &ONSITE_QUESTIONS));
    }
    if flags.is_virtual {
        html.push_str(&checklist_section("Extra for virtual calls:", &VIRTUAL_QUESTIONS));
    }
    if flags.is_phone {
        html.push_str(&checklist_section("Extra for phone-only calls:", &PHONE_QUESTIONS));
    }

    if flags.needs_onsite_walkthrough() {
        html.push_str(&format!(
            r#"<p style="margin: 8px 0 0 0; font-size:13px; color:#b91c1c;">⚠ This booking is <strong>{}</strong> only. Schedule a follow-up <strong>on-site walkthrough</strong> date before sending any final proposal.</p>"#,
            call_type
        ));
    } else {
        html.push_str(r#"<p style="margin: 8px 0 0 0; font-size:13px; color:#047857;">✓ On-site walkthrough scheduled as part of this booking.</p>"#);
    }

    html.push_str(DIVIDER);
    html.push_str(r#"<p style="margin:0; font-size:12px; color:#9ca3af;">SmartNET AI • Walkthrough bookings, quotes &amp; automation ready.</p>"#);
    html.push_str("</div>");

    html
}

pub const MAGIC_LINK_SUBJECT: &str = "Your SmartNET Estimate Link";

/// Customer email carrying the resume link for a saved estimate
pub fn magic_link_email_html(full_name: Option<&str>, quote_url: &str) -> String {
    let greeting = match full_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {},", escape_html(name)),
        None => "Hi,".to_string(),
    };
    let url = escape_html(quote_url);

    format!(
        r#"<div style="font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; color: #0f172a;">
<h2 style="color:#0f172a;">Your SmartNET Estimate is Saved</h2>
<p>{greeting}</p>
<p>Your SmartNET wiring &amp; camera estimate has been saved. You can resume your quote at any time using the link below:</p>
<p><a href="{url}" style="color:#059669; font-weight:600;">Continue your SmartNET estimate</a></p>
<p style="font-size: 13px; color:#6b7280; margin-top:16px;">If the button above doesn't work, copy and paste this URL into your browser:<br/><span style="word-break: break-all;">{url}</span></p>
<hr style="margin-top:24px; margin-bottom:16px; border:none; border-top:1px solid #e5e7eb;" />
<p style="font-size: 12px; color:#9ca3af;">SmartNET AI • Smart wiring &amp; camera estimates</p>
</div>"#
    )
}
