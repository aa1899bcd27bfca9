//! Presentation state for the dashboard pages
//!
//! A [`ListView`] owns one collection's fetched records together with its
//! query, selection and loading state. Summary cards and receipts are
//! computed from the same records.

pub mod context;
pub mod list_view;
pub mod receipt;
pub mod summary;

pub use context::DashboardContext;
pub use list_view::ListView;
pub use receipt::{ReceiptDocument, ReceiptIssuer, ReceiptRenderer, TextReceiptRenderer, download_receipt};
pub use summary::{DashboardOverview, DonationSummary, RECENT_USERS, format_inr, recent_users};
