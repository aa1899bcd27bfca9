//! Donations and their payment details

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::export::Exportable;
use crate::core::query::SortDirection;
use crate::entities::{display_date, or_placeholder};
use crate::impl_record;
use serde::{Deserialize, Serialize};

/// Rendered in place of the donor's name when they asked to stay anonymous
pub const ANONYMOUS_DONOR: &str = "Anonymous Donor";

/// Payment statuses counted as completed (compared lowercased)
pub const COMPLETED_STATUSES: [&str; 3] = ["completed", "paid", "success"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDetails {
    pub status: Option<String>,
    pub transaction_id: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Donation {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    pub program: Option<String>,
    pub donation_type: Option<String>,
    pub anonymous: bool,
    pub message: Option<String>,
    pub payment_details: PaymentDetails,
    pub created_at: String,
}

impl Donation {
    /// Donor name as shown in lists and exports
    pub fn donor_name(&self) -> String {
        if self.anonymous {
            ANONYMOUS_DONOR.to_string()
        } else {
            format!("{} {}", self.first_name, self.last_name).trim().to_string()
        }
    }

    pub fn payment_status(&self) -> Option<&str> {
        self.payment_details.status.as_deref()
    }

    /// Whether the payment went through
    pub fn is_completed(&self) -> bool {
        self.payment_status()
            .map(|s| s.to_lowercase())
            .is_some_and(|s| COMPLETED_STATUSES.contains(&s.as_str()))
    }

    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new()
            .searchable(["firstName", "lastName", "email", "program"])
            .categorical_ignore_case("paymentStatus")
            .categorical("donationType")
            .categorical("program")
            .date_field("createdAt")
            .sortable("amount", FieldKind::Numeric)
            .sortable("firstName", FieldKind::Text)
            .default_sort("createdAt", SortDirection::Descending)
    }
}

impl_record!(
    Donation, "donation", "donations",
    id: id,
    timestamp: created_at => "createdAt",
    fields {
        "firstName" => text(first_name),
        "lastName" => text(last_name),
        "email" => text(email),
        "amount" => number(amount),
        "currency" => text(currency),
        "program" => optional_text(program),
        "donationType" => optional_text(donation_type),
        "anonymous" => flag(anonymous),
        "message" => optional_text(message),
        "paymentStatus" => optional_text(payment_details.status),
        "transactionId" => optional_text(payment_details.transaction_id),
    },
);

impl Exportable for Donation {
    fn export_headers() -> Vec<&'static str> {
        vec!["Donor", "Email", "Amount", "Currency", "Program", "Type", "Status", "Date"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.donor_name(),
            self.email.clone(),
            self.amount.to_string(),
            or_placeholder(Some(&self.currency)),
            or_placeholder(self.program.as_deref()),
            or_placeholder(self.donation_type.as_deref()),
            or_placeholder(self.payment_status()),
            display_date(&self.created_at),
        ]
    }
}
