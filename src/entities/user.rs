//! Registered platform users

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::error::FieldValidationError;
use crate::core::export::Exportable;
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::query::SortDirection;
use crate::entities::{display_date, or_placeholder};
use crate::impl_record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub roles: Vec<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Field checks run before create and update
    pub fn check_fields(&self) -> Vec<FieldValidationError> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push(FieldValidationError::new("firstName", "First name is required"));
        }
        if !FieldFormat::Email.validate(&FieldValue::String(self.email.clone())) {
            errors.push(FieldValidationError::new("email", "Invalid email format"));
        }
        if !FieldFormat::Phone.validate(&FieldValue::String(self.mobile.clone())) {
            errors.push(FieldValidationError::new("mobile", "Invalid phone number format"));
        }

        errors
    }

    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new()
            .searchable(["firstName", "lastName", "email", "mobile"])
            .categorical("status")
            .date_field("createdAt")
            .sortable("firstName", FieldKind::Text)
            .sortable("email", FieldKind::Text)
            .default_sort("createdAt", SortDirection::Descending)
    }
}

impl_record!(
    User, "user", "users",
    id: id,
    timestamp: created_at => "createdAt",
    fields {
        "firstName" => text(first_name),
        "lastName" => text(last_name),
        "email" => text(email),
        "mobile" => text(mobile),
        "organization" => optional_text(organization),
        "roles" => list(roles),
        "status" => text(status),
        "updatedAt" => date(updated_at),
    },
    transitions: status [Approve, Reject],
    validate: User::check_fields,
);

impl Exportable for User {
    fn export_headers() -> Vec<&'static str> {
        vec!["Name", "Email", "Mobile", "Organization", "Roles", "Status", "Joined"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.email.clone(),
            self.mobile.clone(),
            or_placeholder(self.organization.as_deref()),
            self.roles.join(", "),
            or_placeholder(Some(&self.status)),
            display_date(&self.created_at),
        ]
    }
}
