//! # Appointment models
//!
//! - [`Appointment`] is a raw `appointments` row, used by the edit flow.
//! - [`AppointmentListing`] is a row of the "my appointments" join with the
//!   doctor's name and specialty.
//!
//! Dates are `YYYY-MM-DD` and times `HH:MM` text; [`display_time`] turns any
//! legacy `H:MM:SS` or interval-style value into the `HH:MM` form a time
//! picker expects.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AppointmentListing {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    pub doctor_name: String,
    pub specialty: String,
}

/// Normalise a stored time to `HH:MM`.
///
/// Hours are not wrapped, so an interval of `25:30:00` stays `25:30`. Values
/// that are not `hours:minutes[:seconds]` are returned unchanged.
pub fn display_time(raw: &str) -> String {
    let mut parts = raw.trim().split(':');
    let hours = parts.next().and_then(|h| h.parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.parse::<u32>().ok());
    match (hours, minutes) {
        (Some(hours), Some(minutes)) if minutes < 60 => format!("{hours:02}:{minutes:02}"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_time() {
        assert_eq!(display_time("09:30"), "09:30");
        assert_eq!(display_time("9:05:00"), "09:05");
        assert_eq!(display_time("14:00:59"), "14:00");
        assert_eq!(display_time("25:30:00"), "25:30");
    }

    #[test]
    fn test_display_time_passthrough() {
        assert_eq!(display_time("noon"), "noon");
        assert_eq!(display_time("12:75"), "12:75");
        assert_eq!(display_time(""), "");
    }
}
