//! Record trait defining the core abstraction for every dashboard list

use crate::core::error::FieldValidationError;
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base trait for all records shown in an admin list.
///
/// A record is a typed domain entity (user, donation, volunteer application,
/// contact message, event) as returned by the remote API. The list pipeline
/// never inspects concrete fields; it reads them by name through
/// [`Record::field_value`], using the names declared in a
/// [`ListDescriptor`](crate::core::descriptor::ListDescriptor).
///
/// Implementations are normally generated with
/// [`impl_record!`](crate::impl_record).
pub trait Record: Clone + Send + Sync + 'static {
    /// The singular record type name (e.g., "donation")
    fn record_type() -> &'static str;

    /// The collection name used for logging and export files (e.g., "donations")
    fn collection_name() -> &'static str;

    /// Primary key as sent by the API
    fn id(&self) -> &str;

    /// Replace the primary key (used by stores that assign identifiers)
    fn set_id(&mut self, id: String);

    /// The record's timestamp (creation, application or event date).
    ///
    /// `None` when the API sent nothing or something unparseable.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for unknown field names and `Some(FieldValue::Null)`
    /// for known fields with no value.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Apply a status transition in place.
    ///
    /// Returns `false` when this record type does not support the transition.
    fn apply_transition(&mut self, _transition: StatusTransition) -> bool {
        false
    }

    /// Validate the record before it is sent to the API
    fn validate(&self) -> Vec<FieldValidationError> {
        Vec::new()
    }
}

/// Domain-specific status changes exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTransition {
    /// Contact message has been read
    MarkAsRead,
    /// Application or account approved
    Approve,
    /// Application or account rejected
    Reject,
}

impl StatusTransition {
    /// The status value a record carries after the transition
    pub fn target_status(&self) -> &'static str {
        match self {
            StatusTransition::MarkAsRead => "read",
            StatusTransition::Approve => "approved",
            StatusTransition::Reject => "rejected",
        }
    }

    /// Past-tense label for notifications
    pub fn past_tense(&self) -> &'static str {
        match self {
            StatusTransition::MarkAsRead => "marked as read",
            StatusTransition::Approve => "approved",
            StatusTransition::Reject => "rejected",
        }
    }
}

impl fmt::Display for StatusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTransition::MarkAsRead => write!(f, "mark as read"),
            StatusTransition::Approve => write!(f, "approve"),
            StatusTransition::Reject => write!(f, "reject"),
        }
    }
}
