//! Volunteer applications

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::export::Exportable;
use crate::core::query::SortDirection;
use crate::entities::{display_date, or_placeholder};
use crate::impl_record;
use serde::{Deserialize, Serialize};

/// Status of an application nobody has reviewed yet
pub const PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volunteer {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Option<String>,
    pub availability: Option<String>,
    pub skills: Vec<String>,
    pub message: Option<String>,
    pub status: String,
    pub application_date: String,
}

impl Default for Volunteer {
    fn default() -> Self {
        Self {
            id: String::new(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: None,
            availability: None,
            skills: Vec::new(),
            message: None,
            status: PENDING.to_string(),
            application_date: String::new(),
        }
    }
}

impl Volunteer {
    /// Status label for display; blank statuses read as pending
    pub fn status_label(&self) -> String {
        if self.status.trim().is_empty() {
            PENDING.to_uppercase()
        } else {
            self.status.to_uppercase()
        }
    }

    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new()
            .searchable(["fullName", "email", "phone"])
            .categorical_ignore_case("status")
            .categorical("role")
            .categorical("availability")
            .date_field("applicationDate")
            .sortable("fullName", FieldKind::Text)
            .sortable("role", FieldKind::Text)
            .default_sort("applicationDate", SortDirection::Descending)
    }
}

impl_record!(
    Volunteer, "volunteer", "volunteers",
    id: id,
    timestamp: application_date => "applicationDate",
    fields {
        "fullName" => text(full_name),
        "email" => text(email),
        "phone" => text(phone),
        "role" => optional_text(role),
        "availability" => optional_text(availability),
        "skills" => list(skills),
        "status" => text(status),
    },
    transitions: status [Approve, Reject],
);

impl Exportable for Volunteer {
    fn export_headers() -> Vec<&'static str> {
        vec!["Full Name", "Email", "Phone", "Role", "Availability", "Status", "Application Date"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.email.clone(),
            or_placeholder(Some(&self.phone)),
            or_placeholder(self.role.as_deref()),
            or_placeholder(self.availability.as_deref()),
            or_placeholder(Some(&self.status)),
            display_date(&self.application_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{Record, StatusTransition};

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let v: Volunteer =
            serde_json::from_str(r#"{"_id": "v1", "fullName": "Arjun Rao", "applicationDate": "2024-04-02"}"#)
                .unwrap();
        assert_eq!(v.status, "pending");
        assert_eq!(v.status_label(), "PENDING");
        assert!(v.timestamp().is_some());
    }

    #[test]
    fn test_transitions() {
        let mut v = Volunteer::default();
        assert!(v.apply_transition(StatusTransition::Reject));
        assert_eq!(v.status, "rejected");
        assert!(!v.apply_transition(StatusTransition::MarkAsRead));
        assert_eq!(v.status, "rejected");
    }

    #[test]
    fn test_descriptor_status_is_case_insensitive() {
        let descriptor = Volunteer::descriptor();
        assert!(descriptor.categorical_field("status").unwrap().case_insensitive);
        assert!(!descriptor.categorical_field("role").unwrap().case_insensitive);
    }
}
