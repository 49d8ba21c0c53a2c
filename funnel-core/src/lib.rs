//! Domain logic for the SmartNET installation funnel: estimate pricing,
//! booking deduplication keys, contact normalization and the owner views.
//!
//! Nothing in this crate touches the network or the database; the API server
//! feeds it stored records and serializes what comes back.

pub mod dashboard;
pub mod idempotency;
pub mod identity;
pub mod pricing;
pub mod quote_pdf;
pub mod schedule;
pub mod summary;

pub use dashboard::{build_dashboard, calendar_events};
pub use idempotency::{booking_record_id, derive_idempotency_key, BookingIdentity};
pub use identity::{normalize_email, normalize_phone, person_key, resolve_display_name, PersonKey};
pub use pricing::{compute_estimate, to_snapshot};
pub use quote_pdf::{QuoteBooking, QuoteDocument, QuotePdfError};
pub use schedule::{canonical_date, slot_start_iso, TIME_SLOTS};
pub use summary::{estimate_summary, estimate_total, rough_range_label, AppointmentFlags};
