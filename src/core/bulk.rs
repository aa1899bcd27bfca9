//! Bulk action dispatch over a selection
//!
//! The dispatcher issues one mutating call per selected identifier and
//! reports how many settled successfully. Clearing the selection, refetching
//! and notifying are the list view's job once the outcome is known.

use crate::core::record::{Record, StatusTransition};
use crate::core::service::MutationSink;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions offered on selected rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    MarkAsRead,
    Approve,
    Reject,
    Delete,
}

impl BulkAction {
    /// The status transition behind the action, if it is one
    pub fn transition(&self) -> Option<StatusTransition> {
        match self {
            BulkAction::MarkAsRead => Some(StatusTransition::MarkAsRead),
            BulkAction::Approve => Some(StatusTransition::Approve),
            BulkAction::Reject => Some(StatusTransition::Reject),
            BulkAction::Delete => None,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self.transition() {
            Some(t) => t.past_tense(),
            None => "deleted",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.transition() {
            Some(t) => write!(f, "{}", t),
            None => write!(f, "delete"),
        }
    }
}

/// What to do with the remaining identifiers after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    ContinueOnError,
    /// Skip the remaining identifiers; only meaningful for sequential dispatch
    AbortOnFirstError,
}

/// How calls are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One call at a time, in selection order
    #[default]
    Sequential,
    /// All calls in flight at once
    Concurrent,
}

/// Dispatch configuration for one list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkPolicy {
    pub mode: DispatchMode,
    pub on_failure: FailurePolicy,
}

impl BulkPolicy {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn concurrent() -> Self {
        Self {
            mode: DispatchMode::Concurrent,
            on_failure: FailurePolicy::ContinueOnError,
        }
    }

    pub fn abort_on_first_error(mut self) -> Self {
        self.on_failure = FailurePolicy::AbortOnFirstError;
        self
    }

    /// False for the unsatisfiable concurrent plus abort-on-first-error pairing
    pub fn can_abort(&self) -> bool {
        !(self.mode == DispatchMode::Concurrent && self.on_failure == FailurePolicy::AbortOnFirstError)
    }
}

/// One identifier whose call failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: String,
    pub message: String,
}

/// Settled result of a bulk action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
    /// Identifiers never attempted because an earlier call failed
    pub skipped: Vec<String>,
}

impl BulkOutcome {
    /// Outcome with nothing attempted
    pub fn empty(action: BulkAction) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// e.g. "2 succeeded, 1 failed"
    pub fn summary(&self) -> String {
        let mut summary = format!("{} succeeded, {} failed", self.succeeded.len(), self.failed.len());
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        summary
    }
}

/// Issues one call per identifier according to a [`BulkPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkDispatcher {
    policy: BulkPolicy,
}

impl BulkDispatcher {
    /// Concurrent dispatch cannot abort calls already in flight, so an
    /// abort-on-first-error policy falls back to continue-on-error there.
    pub fn new(policy: BulkPolicy) -> Self {
        if !policy.can_abort() {
            tracing::warn!(
                "concurrent bulk dispatch cannot abort on first error, continuing on error instead"
            );
            return Self {
                policy: BulkPolicy::concurrent(),
            };
        }
        Self { policy }
    }

    pub fn policy(&self) -> BulkPolicy {
        self.policy
    }

    /// Run `action` for every id and wait for all calls to settle
    pub async fn dispatch<R, S>(&self, sink: &S, ids: &[String], action: BulkAction) -> BulkOutcome
    where
        R: Record,
        S: MutationSink<R> + ?Sized,
    {
        let mut outcome = BulkOutcome::empty(action);

        match self.policy.mode {
            DispatchMode::Sequential => {
                let mut remaining = ids.iter();
                while let Some(id) = remaining.next() {
                    match call::<R, S>(sink, id, action).await {
                        Ok(()) => outcome.succeeded.push(id.clone()),
                        Err(message) => {
                            outcome.failed.push(BulkFailure {
                                id: id.clone(),
                                message,
                            });
                            if self.policy.on_failure == FailurePolicy::AbortOnFirstError {
                                outcome.skipped.extend(remaining.by_ref().cloned());
                            }
                        }
                    }
                }
            }
            DispatchMode::Concurrent => {
                let results = join_all(ids.iter().map(|id| call::<R, S>(sink, id, action))).await;
                for (id, result) in ids.iter().zip(results) {
                    match result {
                        Ok(()) => outcome.succeeded.push(id.clone()),
                        Err(message) => outcome.failed.push(BulkFailure {
                            id: id.clone(),
                            message,
                        }),
                    }
                }
            }
        }

        if outcome.failed.is_empty() {
            tracing::info!(
                collection = R::collection_name(),
                action = %action,
                succeeded = outcome.succeeded.len(),
                "bulk action completed"
            );
        } else {
            tracing::warn!(
                collection = R::collection_name(),
                action = %action,
                succeeded = outcome.succeeded.len(),
                failed = outcome.failed.len(),
                skipped = outcome.skipped.len(),
                "bulk action completed with failures"
            );
        }

        outcome
    }
}

async fn call<R, S>(sink: &S, id: &str, action: BulkAction) -> Result<(), String>
where
    R: Record,
    S: MutationSink<R> + ?Sized,
{
    let result = match action {
        BulkAction::MarkAsRead => sink.mark_as_read(id).await,
        BulkAction::Approve => sink.approve(id).await,
        BulkAction::Reject => sink.reject(id).await,
        BulkAction::Delete => sink.delete(id).await,
    };
    result.map_err(|e| e.to_string())
}
