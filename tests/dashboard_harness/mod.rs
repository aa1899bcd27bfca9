//! Shared fixtures for dashboard integration tests
//!
//! Provides record builders for each collection and a helper that wires a
//! [`ListView`] to an [`InMemoryRecordStore`] and a [`CollectingNotifier`].
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod dashboard_harness;
//! use dashboard_harness::*;
//! ```

#![allow(dead_code)]

use admin::prelude::*;
use admin::entities::PaymentDetails;
use chrono::TimeZone;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Fixed "now" used by every scenario: 2024-06-20 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
}

/// RFC 3339 timestamp for a day and hour in 2024
pub fn at(month: u32, day: u32, hour: u32) -> String {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .unwrap()
        .to_rfc3339()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn donation(id: &str, amount: f64, status: &str, created_at: String) -> Donation {
    Donation {
        id: id.to_string(),
        first_name: format!("Donor{id}"),
        last_name: "Patel".to_string(),
        email: format!("{id}@example.org"),
        amount,
        currency: "INR".to_string(),
        program: Some("Education".to_string()),
        payment_details: PaymentDetails {
            status: Some(status.to_string()),
            transaction_id: Some(format!("pay_{id}")),
            method: None,
        },
        created_at,
        ..Default::default()
    }
}

/// 25 donations:
/// - d00..d09: completed, June 2..11, ₹500 each (₹5,000 this month)
/// - d10..d14: pending, June 12..16, ₹1,000 each
/// - d15..d24: completed, May 1..10, ₹300 each
pub fn donation_fixture() -> Vec<Donation> {
    let mut donations = Vec::new();
    for i in 0..10u32 {
        donations.push(donation(&format!("d{i:02}"), 500.0, "completed", at(6, 2 + i, 9)));
    }
    for i in 10..15u32 {
        donations.push(donation(&format!("d{i:02}"), 1000.0, "pending", at(6, 2 + i, 9)));
    }
    for i in 15..25u32 {
        donations.push(donation(&format!("d{i:02}"), 300.0, "completed", at(5, i - 14, 9)));
    }
    donations
}

pub fn user(id: &str, first_name: &str, last_name: &str, created_at: String) -> User {
    User {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.org", first_name.to_lowercase()),
        mobile: "9876543210".to_string(),
        roles: vec!["member".to_string()],
        status: "pending".to_string(),
        created_at,
        ..Default::default()
    }
}

pub fn volunteer(id: &str, full_name: &str, status: &str, application_date: String) -> Volunteer {
    Volunteer {
        id: id.to_string(),
        full_name: full_name.to_string(),
        email: format!("{id}@example.org"),
        phone: "9000000000".to_string(),
        role: Some("Teaching".to_string()),
        status: status.to_string(),
        application_date,
        ..Default::default()
    }
}

pub fn contact(id: &str, name: &str, status: &str, created_at: String) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@example.org"),
        subject: format!("Question from {name}"),
        message: "Hello".to_string(),
        status: status.to_string(),
        created_at,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

pub fn admin_session() -> Session {
    Session::admin(
        Admin {
            id: "a1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.org".to_string(),
            roles: vec!["admin".to_string()],
        },
        "token",
    )
}

/// A view over `store` with a signed-in admin, plus a handle on its notifications
pub fn view_over<R: Record>(
    store: &InMemoryRecordStore<R>,
    descriptor: ListDescriptor,
) -> (ListView<R>, CollectingNotifier) {
    let notifier = CollectingNotifier::new();
    let context = DashboardContext::new(admin_session(), Arc::new(notifier.clone()));
    let view = ListView::new(Arc::new(store.clone()), Arc::new(store.clone()), descriptor, context);
    (view, notifier)
}

pub fn ids<R: Record>(records: &[R]) -> Vec<String> {
    records.iter().map(|r| r.id().to_string()).collect()
}
