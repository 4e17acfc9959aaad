//! Pure checks run before a booking touches the database.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::CreateBooking;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Request fields that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub event_id: Uuid,
    pub email: String,
}

/// Check a booking request.
///
/// Order: event id present, email present, email shape (after lowercasing
/// and trimming), event id well formed. The event's existence is checked
/// by the service afterwards.
pub fn validate_booking(input: &CreateBooking) -> BookingResult<ValidBooking> {
    let event_id = present(input.event_id.as_deref())
        .ok_or_else(|| BookingError::validation("Event ID is required"))?;
    let email = present(input.email.as_deref())
        .ok_or_else(|| BookingError::validation("Email is required"))?;

    let email = normalize_email(email)?;
    let event_id = parse_event_id(event_id)?;

    Ok(ValidBooking { event_id, email })
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercase, trim and check the `local@domain.tld` shape
pub fn normalize_email(raw: &str) -> BookingResult<String> {
    let email = raw.trim().to_lowercase();
    if !EMAIL_SHAPE.is_match(&email) {
        return Err(BookingError::validation("Please provide a valid email address"));
    }
    Ok(email)
}

pub fn parse_event_id(raw: &str) -> BookingResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| BookingError::validation("Invalid event ID"))
}
