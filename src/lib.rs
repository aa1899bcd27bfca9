//! # Community Admin
//!
//! The list-view query pipeline behind a community organization's admin
//! dashboard: users, donations, volunteers, contact messages and events.
//!
//! ## Features
//!
//! - **Query Pipeline**: search, categorical filters and date ranges, then sort, then paginate
//! - **Declarative Lists**: each record type describes its searchable, filterable and sortable fields
//! - **Selection & Bulk Actions**: approve, reject, mark as read or delete many rows at once
//! - **CSV Export**: exports the filtered and sorted rows, never just the current page
//! - **Summary Cards**: overview counts, donation totals and recent users computed over the full collection
//! - **Configuration-Based**: page sizes, bulk dispatch policy and export names from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use admin::prelude::*;
//! use std::sync::Arc;
//!
//! let store = InMemoryRecordStore::with_records(donations);
//! let mut view = ListView::new(
//!     Arc::new(store.clone()),
//!     Arc::new(store),
//!     Donation::descriptor(),
//!     DashboardContext::anonymous().with_access(AccessPolicy::Public),
//! );
//!
//! view.refresh().await?;
//! view.set_search("smith");
//! view.set_filter("paymentStatus", "completed");
//!
//! let page = view.visible();
//! println!("page {} of {}", page.pagination.page, page.pagination.total_pages);
//! ```

pub mod config;
pub mod core;
pub mod dashboard;
pub mod entities;
pub mod logging;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        export::{ExportSink, Exportable},
        notify::Notifier,
        record::Record,
        service::{MutationSink, RecordSource},
    };

    // === Query Pipeline ===
    pub use crate::core::{
        descriptor::{FieldKind, ListDescriptor},
        field::{FieldFormat, FieldValue},
        pipeline::ListPipeline,
        query::{DateRange, PageResult, PaginationMeta, QueryState, SortDirection, SortSpec},
        selection::SelectionSet,
    };

    // === Actions, Errors & Notifications ===
    pub use crate::core::{
        bulk::{BulkAction, BulkDispatcher, BulkOutcome, BulkPolicy, DispatchMode, FailurePolicy},
        error::{DashboardError, DashboardResult, FieldValidationError},
        export::{ExportArtifact, FileExportSink, MemoryExportSink},
        notify::{CollectingNotifier, Notification, NotificationLevel, TracingNotifier},
        record::StatusTransition,
        session::{AccessPolicy, Admin, Session},
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Records ===
    pub use crate::entities::{Contact, Donation, Event, EventTimeFilter, User, Volunteer};

    // === Dashboard ===
    pub use crate::dashboard::{
        DashboardContext, DashboardOverview, DonationSummary, ListView, ReceiptIssuer, TextReceiptRenderer,
        download_receipt, recent_users,
    };

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::{DashboardConfig, ListConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
