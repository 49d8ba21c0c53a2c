//! Contact normalization shared by deduplication, lead matching and the
//! owner dashboard.

use std::fmt;

/// Trim and lowercase an email. Blank input yields `None`.
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    let email = value.unwrap_or_default().trim().to_lowercase();
    if email.is_empty() {
        None
    } else {
        Some(email)
    }
}

/// Keep digits plus a single leading `+`. Input without digits yields `None`.
pub fn normalize_phone(value: Option<&str>) -> Option<String> {
    let trimmed = value.unwrap_or_default().trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    if trimmed.starts_with('+') {
        Some(format!("+{}", digits))
    } else {
        Some(digits)
    }
}

/// Stable per-person key used to merge bookings and quote sessions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PersonKey {
    Email(String),
    Phone(String),
    Unknown,
}

impl PersonKey {
    pub fn is_known(&self) -> bool {
        !matches!(self, PersonKey::Unknown)
    }
}

impl fmt::Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonKey::Email(email) => write!(f, "email:{}", email),
            PersonKey::Phone(phone) => write!(f, "phone:{}", phone),
            PersonKey::Unknown => write!(f, "unknown"),
        }
    }
}

pub fn person_key(email: Option<&str>, phone: Option<&str>) -> PersonKey {
    if let Some(email) = normalize_email(email) {
        return PersonKey::Email(email);
    }
    if let Some(phone) = normalize_phone(phone) {
        return PersonKey::Phone(phone);
    }
    PersonKey::Unknown
}

/// Name to show for a contact: the name, else email, else phone, else "Unknown".
pub fn resolve_display_name(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> String {
    let name = name.unwrap_or_default().trim();
    if !name.is_empty() {
        return name.to_string();
    }

    normalize_email(email)
        .or_else(|| normalize_phone(phone))
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(Some("  Jane@Example.COM ")), Some("jane@example.com".to_string()));
        assert_eq!(normalize_email(Some("   ")), None);
        assert_eq!(normalize_email(None), None);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone(Some("(555) 123-4567")), Some("5551234567".to_string()));
        assert_eq!(normalize_phone(Some(" +1 (555) 123-4567")), Some("+15551234567".to_string()));
        assert_eq!(normalize_phone(Some("555+123")), Some("555123".to_string()));
        assert_eq!(normalize_phone(Some("+")), None);
        assert_eq!(normalize_phone(Some("n/a")), None);
    }

    #[test]
    fn test_person_key_prefers_email() {
        assert_eq!(
            person_key(Some("A@B.com"), Some("555-0000")).to_string(),
            "email:a@b.com"
        );
        assert_eq!(person_key(None, Some("555-0000")).to_string(), "phone:5550000");
        assert_eq!(person_key(Some(""), Some("")), PersonKey::Unknown);
        assert!(!PersonKey::Unknown.is_known());
    }

    #[test]
    fn test_resolve_display_name() {
        assert_eq!(resolve_display_name(Some(" Jane "), Some("j@x.com"), None), "Jane");
        assert_eq!(resolve_display_name(Some(""), Some("J@X.com"), None), "j@x.com");
        assert_eq!(resolve_display_name(None, None, Some("(555) 111-2222")), "5551112222");
        assert_eq!(resolve_display_name(None, None, None), "Unknown");
    }
}
