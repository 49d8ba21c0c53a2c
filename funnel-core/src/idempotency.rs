//! Deterministic booking idempotency keys.
//!
//! Repeated submissions of the same booking (double clicks, retries, page
//! refreshes) normalize to the same key, and therefore to the same stored
//! record id. The key only collapses duplicates; it is not a secret and must
//! never be used for authentication.

use sha2::{Digest, Sha256};

use crate::identity::{normalize_email, normalize_phone};

/// Identity anchor used when neither email nor phone is present.
///
/// All contactless submissions for the same date, slot and type share one key.
pub const ANONYMOUS_IDENTITY: &str = "anonymous";

/// Entity-type prefix of booking record ids
pub const BOOKING_ID_PREFIX: &str = "walkthroughBooking";

/// Reserved separator between pre-hash fields (ASCII unit separator).
/// It is stripped from every free-text field before joining.
const FIELD_DELIMITER: char = '\u{1f}';

/// Identity-bearing fields of a booking attempt
#[derive(Debug, Clone, Copy)]
pub struct BookingIdentity<'a> {
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    /// Calendar date in canonical form, e.g. `2025-12-15`
    pub date: &'a str,
    pub time_slot: &'a str,
    pub appointment_type: &'a str,
}

fn strip_delimiter(value: &str) -> String {
    value.chars().filter(|c| *c != FIELD_DELIMITER).collect()
}

/// Phone part of the anchor. Unlike contact matching, a bare `+` still counts.
fn phone_anchor(phone: Option<&str>) -> Option<String> {
    normalize_phone(phone).or_else(|| {
        phone
            .filter(|p| p.trim_start().starts_with('+'))
            .map(|_| "+".to_string())
    })
}

fn identity_anchor(identity: &BookingIdentity<'_>) -> String {
    normalize_email(identity.email)
        .map(|email| strip_delimiter(&email))
        .filter(|email| !email.is_empty())
        .or_else(|| phone_anchor(identity.phone))
        .unwrap_or_else(|| ANONYMOUS_IDENTITY.to_string())
}

/// Pre-hash input: anchor, date, slot, type joined by the reserved delimiter.
fn canonical_input(identity: &BookingIdentity<'_>) -> String {
    let fields = [
        identity_anchor(identity),
        strip_delimiter(identity.date),
        strip_delimiter(identity.time_slot.trim()),
        strip_delimiter(&identity.appointment_type.trim().to_lowercase()),
    ];
    fields.join(&FIELD_DELIMITER.to_string())
}

/// SHA-256 of the normalized booking identity as 64 lowercase hex characters.
pub fn derive_idempotency_key(identity: &BookingIdentity<'_>) -> String {
    let digest = Sha256::digest(canonical_input(identity).as_bytes());
    hex::encode(digest)
}

/// Storage record id for a booking key
pub fn booking_record_id(idempotency_key: &str) -> String {
    format!("{}.{}", BOOKING_ID_PREFIX, idempotency_key)
}
