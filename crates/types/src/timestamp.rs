//! Timestamp display helpers.
//!
//! The backend speaks ISO-8601 (`2024-03-01T12:34:56.789Z`). Tables show the
//! minute-resolution form (`2024-03-01 12:34`) while keeping the original
//! string around so it can be sent back untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static ISO_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    // Date and `HH:MM`, then optional seconds, fraction and zone designator.
    Regex::new(r"^(\d{4}-\d{2}-\d{2})T(\d{2}:\d{2})(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$").expect("timestamp pattern")
});

/// Placeholder shown for timestamps the server has not assigned yet.
pub const UNSAVED_TIMESTAMP: &str = "Now";

/// Truncates an ISO-8601 timestamp for display: `T` becomes a space and the
/// seconds, fraction and zone suffix are dropped. Anything that is not an
/// ISO-8601 timestamp is returned trimmed but otherwise unchanged.
pub fn display_timestamp(iso: &str) -> String {
    let trimmed = iso.trim();
    match ISO_TIMESTAMP.captures(trimmed) {
        Some(parts) => format!("{} {}", &parts[1], &parts[2]),
        None => trimmed.to_string(),
    }
}
