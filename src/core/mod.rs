//! Core module containing the list pipeline and the types it is built from

pub mod aggregate;
pub mod bulk;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod field;
pub mod notify;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod selection;
pub mod service;
pub mod session;

pub use aggregate::{Summary, TimeWindow, summarize};
pub use bulk::{BulkAction, BulkDispatcher, BulkOutcome, BulkPolicy, DispatchMode, FailurePolicy};
pub use descriptor::{FieldKind, ListDescriptor};
pub use error::{DashboardError, DashboardResult};
pub use export::{ExportArtifact, ExportSink, Exportable};
pub use field::{FieldFormat, FieldValue};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use pipeline::ListPipeline;
pub use query::{PageResult, QueryState, Selection, SortDirection, SortSpec};
pub use record::{Record, StatusTransition};
pub use selection::SelectionSet;
pub use service::{MutationSink, RecordSource};
pub use session::{AccessPolicy, Admin, Session};
