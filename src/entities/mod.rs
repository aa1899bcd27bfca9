//! Typed records for each dashboard domain
//!
//! Each record mirrors the API payload (camelCase keys, `_id` primary key)
//! and declares its list configuration through a `descriptor()` function.

pub mod contact;
pub mod donation;
pub mod event;
pub mod macros;
pub mod user;
pub mod volunteer;

pub use contact::Contact;
pub use donation::{Donation, PaymentDetails};
pub use event::{Event, EventTimeFilter, Pricing};
pub use user::User;
pub use volunteer::Volunteer;

use crate::core::field::{PLACEHOLDER, parse_timestamp};

/// Render a raw API timestamp as a calendar date, or the placeholder
pub(crate) fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// The value itself, or the placeholder when it is blank
pub(crate) fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
