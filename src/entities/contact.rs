//! Contact and service-request messages

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::export::Exportable;
use crate::core::query::SortDirection;
use crate::entities::{display_date, or_placeholder};
use crate::impl_record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[serde(rename = "phoneno")]
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

impl Contact {
    pub fn is_unread(&self) -> bool {
        self.status != "read"
    }

    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new()
            .searchable(["name", "email", "subject"])
            .categorical("status")
            .categorical("service")
            .date_field("createdAt")
            .sortable("name", FieldKind::Text)
            .sortable("email", FieldKind::Text)
            .sortable("subject", FieldKind::Text)
            .default_sort("createdAt", SortDirection::Descending)
    }
}

impl_record!(
    Contact, "contact", "contacts",
    id: id,
    timestamp: created_at => "createdAt",
    fields {
        "name" => text(name),
        "email" => text(email),
        "subject" => text(subject),
        "phone" => optional_text(phone),
        "service" => optional_text(service),
        "message" => text(message),
        "status" => text(status),
    },
    transitions: status [MarkAsRead],
);

impl Exportable for Contact {
    fn export_headers() -> Vec<&'static str> {
        vec!["Name", "Email", "Status", "Subject", "Phone", "Date", "Message"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            or_placeholder(Some(&self.status)),
            self.subject.clone(),
            or_placeholder(self.phone.as_deref()),
            display_date(&self.created_at),
            self.message.clone(),
        ]
    }
}
