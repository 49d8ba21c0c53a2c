//! Human-readable estimate summaries and appointment flags.

use shared_types::EstimateSnapshot;

pub const BOOKING_SUMMARY_FALLBACK: &str = "SmartNET estimate attached to this booking.";
pub const MAGIC_LINK_SUMMARY_FALLBACK: &str = "SmartNET estimate saved for this lead.";
pub const RANGE_NOT_SET: &str = "Not set yet";

const RANGE_SEPARATOR: &str = " – ";
const SUMMARY_SEPARATOR: &str = " • ";

/// Single figure for an estimate: midpoint when both ends are known.
pub fn estimate_total(estimate: Option<&EstimateSnapshot>) -> Option<f64> {
    let estimate = estimate?;
    match (estimate.rough_low, estimate.rough_high) {
        (Some(low), Some(high)) => Some((low + high) / 2.0),
        (None, Some(high)) => Some(high),
        (Some(low), None) => Some(low),
        (None, None) => None,
    }
}

/// Format a number with thousands separators, dropping `.00` on whole values.
pub fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{:02}", sign, grouped, fraction)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One-line scope description, e.g. `Type: office • Sq Ft: 2,400 • Focus: cameras, wifi`
pub fn estimate_summary(estimate: Option<&EstimateSnapshot>, fallback: &str) -> String {
    let Some(estimate) = estimate else {
        return fallback.to_string();
    };

    let mut parts = Vec::new();
    if let Some(project_type) = non_empty(&estimate.project_type) {
        parts.push(format!("Type: {}", project_type));
    }
    if let Some(sqft) = estimate.square_footage.filter(|v| *v > 0.0) {
        parts.push(format!("Sq Ft: {}", format_thousands(sqft)));
    }
    if !estimate.focus.is_empty() {
        parts.push(format!("Focus: {}", estimate.focus.join(", ")));
    }
    if let Some(coverage) = non_empty(&estimate.coverage_profile) {
        parts.push(format!("Coverage: {}", coverage));
    }
    if let Some(wifi) = non_empty(&estimate.wifi_layout) {
        parts.push(format!("Wi-Fi: {}", wifi));
    }
    if let Some(doors) = non_empty(&estimate.doors_access) {
        parts.push(format!("Doors: {}", doors));
    }
    if let Some(wiring) = non_empty(&estimate.wiring_style) {
        parts.push(format!("Wiring: {}", wiring));
    }
    if let Some(timeline) = non_empty(&estimate.timeline) {
        parts.push(format!("Timeline: {}", timeline));
    }
    if !estimate.extras.is_empty() {
        parts.push(format!("Extras: {}", estimate.extras.join(", ")));
    }

    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join(SUMMARY_SEPARATOR)
    }
}

/// `$3,366 – $4,356`, with `?` for a missing end
pub fn rough_range_label(estimate: Option<&EstimateSnapshot>) -> String {
    let (low, high) = match estimate {
        Some(e) => (
            e.rough_low.filter(|v| *v != 0.0),
            e.rough_high.filter(|v| *v != 0.0),
        ),
        None => (None, None),
    };

    if low.is_none() && high.is_none() {
        return RANGE_NOT_SET.to_string();
    }

    let side = |v: Option<f64>| v.map(format_thousands).unwrap_or_else(|| "?".to_string());
    format!("${}{}${}", side(low), RANGE_SEPARATOR, side(high))
}

fn parse_money(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Inverse of [`rough_range_label`]. Anything that is not a two-sided range yields `(None, None)`.
pub fn parse_estimate_range(label: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some(label) = label else {
        return (None, None);
    };

    let parts: Vec<&str> = label.split('–').map(str::trim).collect();
    if parts.len() != 2 {
        return (None, None);
    }

    (parse_money(parts[0]), parse_money(parts[1]))
}

/// What kind of appointment a free-text type label describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentFlags {
    pub is_onsite: bool,
    pub is_virtual: bool,
    pub is_phone: bool,
}

impl AppointmentFlags {
    pub fn from_type(appointment_type: &str) -> Self {
        let lowered = appointment_type.to_lowercase();
        Self {
            is_onsite: lowered.contains("on-site") || lowered.contains("onsite"),
            is_virtual: lowered.contains("virtual") || lowered.contains("video"),
            is_phone: lowered.contains("phone") || lowered.contains("call"),
        }
    }

    /// Remote appointments still need a physical walkthrough before a final proposal
    pub fn needs_onsite_walkthrough(&self) -> bool {
        !self.is_onsite
    }
}
