//! Service traits for fetching and mutating records
//!
//! These are the dashboard's only view of the remote API. Implementations
//! decide how a call reaches the backend; the list view only needs success or
//! a descriptive failure.

use crate::core::record::{Record, StatusTransition};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Loads the full collection for one record type
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// Fetch every record; the result replaces the view's collection wholesale
    async fn fetch_all(&self) -> Result<Vec<R>>;
}

/// Mutating calls for one record type
///
/// Status transitions default to [`MutationSink::transition`], so a sink only
/// implements the generic form unless the backend exposes distinct calls.
#[async_trait]
pub trait MutationSink<R: Record>: Send + Sync {
    /// Create a new record and return it as stored
    async fn create(&self, record: R) -> Result<R>;

    /// Replace an existing record
    async fn update(&self, id: &str, record: R) -> Result<R>;

    /// Delete a record
    async fn delete(&self, id: &str) -> Result<()>;

    /// Apply a status change
    async fn transition(&self, id: &str, transition: StatusTransition) -> Result<()>;

    async fn mark_as_read(&self, id: &str) -> Result<()> {
        self.transition(id, StatusTransition::MarkAsRead).await
    }

    async fn approve(&self, id: &str) -> Result<()> {
        self.transition(id, StatusTransition::Approve).await
    }

    async fn reject(&self, id: &str) -> Result<()> {
        self.transition(id, StatusTransition::Reject).await
    }
}

/// Single-record mutations, as reported in notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Transition(StatusTransition),
}

impl MutationKind {
    /// Past-tense verb, e.g. "deleted" or "marked as read"
    pub fn past_tense(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
            MutationKind::Transition(t) => t.past_tense(),
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => write!(f, "create"),
            MutationKind::Update => write!(f, "update"),
            MutationKind::Delete => write!(f, "delete"),
            MutationKind::Transition(t) => write!(f, "{}", t),
        }
    }
}
