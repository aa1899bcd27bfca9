//! Presentation state for one admin list page
//!
//! A [`ListView`] owns the fetched collection, the query state, the row
//! selection and the loading/error flags. Every user interaction maps to one
//! method; rendering reads [`ListView::visible`].

use crate::config::{DashboardConfig, ListConfig};
use crate::core::bulk::{BulkAction, BulkDispatcher, BulkOutcome};
use crate::core::descriptor::ListDescriptor;
use crate::core::error::{
    DashboardError, DashboardResult, ExportError, FetchError, MutationError, RequestError, ValidationError,
};
use crate::core::export::{ExportArtifact, ExportSink, Exportable};
use crate::core::field::FieldValue;
use crate::core::notify::Notification;
use crate::core::pipeline::ListPipeline;
use crate::core::query::{PageResult, QueryState, Selection, SortSpec, clamp_page};
use crate::core::record::{Record, StatusTransition};
use crate::core::selection::SelectionSet;
use crate::core::service::{MutationKind, MutationSink, RecordSource};
use crate::dashboard::context::DashboardContext;
use chrono::{FixedOffset, NaiveDate};
use indexmap::IndexSet;
use std::sync::Arc;

/// State and behavior of one list page
pub struct ListView<R: Record> {
    source: Arc<dyn RecordSource<R>>,
    sink: Arc<dyn MutationSink<R>>,
    context: DashboardContext,
    pipeline: ListPipeline,
    config: ListConfig,
    dispatcher: BulkDispatcher,
    records: Vec<R>,
    state: QueryState,
    selection: SelectionSet,
    loading: bool,
    last_error: Option<String>,
}

impl<R: Record> ListView<R> {
    /// Create a view with default list settings; nothing is fetched yet
    pub fn new(
        source: Arc<dyn RecordSource<R>>,
        sink: Arc<dyn MutationSink<R>>,
        descriptor: ListDescriptor,
        context: DashboardContext,
    ) -> Self {
        let config = ListConfig::default();
        let state = QueryState::for_descriptor(&descriptor).with_page_size(config.page_size);

        Self {
            source,
            sink,
            context,
            pipeline: ListPipeline::new(descriptor),
            dispatcher: BulkDispatcher::new(config.bulk),
            config,
            records: Vec::new(),
            state,
            selection: SelectionSet::new(),
            loading: false,
            last_error: None,
        }
    }

    /// Create a view using the settings configured for `R`'s collection
    pub fn from_config(
        source: Arc<dyn RecordSource<R>>,
        sink: Arc<dyn MutationSink<R>>,
        descriptor: ListDescriptor,
        context: DashboardContext,
        config: &DashboardConfig,
    ) -> Self {
        Self::new(source, sink, descriptor, context.with_access(config.access_policy()))
            .with_list_config(config.list(R::collection_name()))
            .with_utc_offset(config.utc_offset())
    }

    pub fn with_list_config(mut self, config: ListConfig) -> Self {
        self.dispatcher = BulkDispatcher::new(config.bulk);
        self.state.page_size = config.page_size;
        self.config = config;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.pipeline = self.pipeline.with_utc_offset(offset);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The full collection from the last successful fetch
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed fetch, cleared by the next successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DashboardContext {
        &mut self.context
    }

    pub fn pipeline(&self) -> &ListPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the whole collection and reset the query state
    ///
    /// On failure the previous collection is kept and one error notification
    /// is emitted.
    pub async fn refresh(&mut self) -> DashboardResult<()> {
        self.ensure_allowed()?;

        match self.reload().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.context.notify(Notification::error("Error", err.to_string()));
                Err(err)
            }
        }
    }

    /// Fetch without notifying; used after mutations
    async fn reload(&mut self) -> DashboardResult<()> {
        self.loading = true;
        let result = self.source.fetch_all().await;
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::info!(
                    collection = R::collection_name(),
                    count = records.len(),
                    "collection fetched"
                );
                self.records = records;
                self.last_error = None;
                self.reset_state();
                self.selection
                    .retain_known(self.records.iter().map(|r| r.id()));
                Ok(())
            }
            Err(e) => {
                let err = FetchError::Failed {
                    collection: R::collection_name().to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(collection = R::collection_name(), error = %e, "fetch failed");
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    fn reset_state(&mut self) {
        self.state = QueryState::for_descriptor(self.pipeline.descriptor()).with_page_size(self.state.page_size());
    }

    // =========================================================================
    // Query state
    // =========================================================================

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
        self.state.page = 1;
    }

    /// Restrict the search to one field, or search all with `None`
    pub fn set_search_field(&mut self, field: Option<String>) {
        self.state.search_field = field;
        self.state.page = 1;
    }

    pub fn set_filter(&mut self, field: impl Into<String>, selection: impl Into<Selection>) {
        self.state.filters.insert(field.into(), selection.into());
        self.state.page = 1;
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.state.date_range.start = start;
        self.state.date_range.end = end;
        self.state.page = 1;
    }

    /// Column-header click: the current column flips direction, another column sorts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        self.state.sort = Some(match self.state.sort.take() {
            Some(current) if current.field == field => SortSpec::new(field, current.direction.toggled()),
            _ => SortSpec::new(field, Default::default()),
        });
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.state.sort = sort;
    }

    /// Go to `page`, clamped into the available pages
    pub fn set_page(&mut self, page: usize) {
        let total = self.pipeline.count(&self.records, &self.state);
        self.state.page = clamp_page(page, total, self.state.page_size());
    }

    /// Change the page size and go back to page 1; sizes the list does not offer are ignored
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !self.config.allows_page_size(size) {
            tracing::debug!(size, "ignoring page size not offered by this list");
            return false;
        }
        self.state.page_size = size;
        self.state.page = 1;
        true
    }

    /// The current page, with the page number clamped into range
    pub fn visible(&self) -> PageResult<R> {
        let total = self.pipeline.count(&self.records, &self.state);
        let page = clamp_page(self.state.page, total, self.state.page_size());
        let state = self.state.clone().with_page(page);
        self.pipeline.apply(&self.records, &state)
    }

    /// Every record matching the current search and filters, sorted, unpaginated
    pub fn filtered(&self) -> Vec<R> {
        self.pipeline.filtered(&self.records, &self.state)
    }

    /// Distinct values of a field across the collection, in first-seen order
    pub fn filter_options(&self, field: &str) -> Vec<String> {
        let values: IndexSet<String> = self
            .records
            .iter()
            .filter_map(|r| match r.field_value(field) {
                Some(FieldValue::Null) | None => None,
                Some(value) => Some(value.to_display()),
            })
            .filter(|v| !v.is_empty())
            .collect();
        values.into_iter().collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle one row; identifiers not in the collection are ignored
    pub fn toggle_row(&mut self, id: &str) -> bool {
        if !self.records.iter().any(|r| r.id() == id) {
            return false;
        }
        self.selection.toggle(id)
    }

    /// Header checkbox over the current page
    pub fn toggle_all_visible(&mut self) {
        let ids = self.visible_ids();
        self.selection.toggle_all(&ids);
    }

    pub fn select_all_visible(&mut self) {
        let ids = self.visible_ids();
        self.selection.select_all(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn visible_ids(&self) -> Vec<String> {
        self.visible().data.iter().map(|r| r.id().to_string()).collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Apply `action` to every selected row, then clear the selection and refetch
    ///
    /// Emits exactly one notification summarizing the outcome.
    pub async fn run_bulk(&mut self, action: BulkAction) -> DashboardResult<BulkOutcome> {
        self.ensure_allowed()?;

        let ids = self.selection.ids();
        if ids.is_empty() {
            self.context
                .notify(Notification::info("Nothing selected", format!("Select rows to {action}")));
            return Ok(BulkOutcome::empty(action));
        }

        let outcome = self.dispatcher.dispatch::<R, _>(&*self.sink, &ids, action).await;

        self.selection.clear();
        if let Err(err) = self.reload().await {
            tracing::warn!(error = %err, "refetch after bulk action failed");
        }

        let title = format!("Bulk {action}");
        let notification = if outcome.is_complete_success() {
            let description = format!(
                "Selected {} {}: {}",
                R::collection_name(),
                action.past_tense(),
                outcome.summary()
            );
            Notification::success(title, description)
        } else {
            Notification::error(title, outcome.summary())
        };
        self.context.notify(notification);

        Ok(outcome)
    }

    /// Validate and create a record
    pub async fn create(&mut self, record: R) -> DashboardResult<R> {
        self.ensure_allowed()?;
        self.ensure_valid(&record)?;

        let result = self.sink.create(record).await;
        self.finish_mutation(MutationKind::Create, None, result).await
    }

    /// Validate and replace a record
    pub async fn update(&mut self, id: &str, record: R) -> DashboardResult<R> {
        self.ensure_allowed()?;
        self.ensure_valid(&record)?;

        let result = self.sink.update(id, record).await;
        self.finish_mutation(MutationKind::Update, Some(id), result).await
    }

    pub async fn delete(&mut self, id: &str) -> DashboardResult<()> {
        self.ensure_allowed()?;

        let result = self.sink.delete(id).await;
        self.finish_mutation(MutationKind::Delete, Some(id), result).await
    }

    /// Apply a status change (mark as read, approve, reject)
    pub async fn transition(&mut self, id: &str, transition: StatusTransition) -> DashboardResult<()> {
        self.ensure_allowed()?;

        // Ask the local copy first so unsupported changes never reach the API
        if let Some(record) = self.records.iter().find(|r| r.id() == id) {
            if !record.clone().apply_transition(transition) {
                let err = DashboardError::from(MutationError::UnsupportedTransition {
                    record_type: R::record_type().to_string(),
                    transition: transition.to_string(),
                });
                self.context.notify(Notification::error("Error", err.to_string()));
                return Err(err);
            }
        }

        let result = match transition {
            StatusTransition::MarkAsRead => self.sink.mark_as_read(id).await,
            StatusTransition::Approve => self.sink.approve(id).await,
            StatusTransition::Reject => self.sink.reject(id).await,
        };
        self.finish_mutation(MutationKind::Transition(transition), Some(id), result)
            .await
    }

    /// Notify, and refetch only after a confirmed success
    async fn finish_mutation<T>(
        &mut self,
        kind: MutationKind,
        id: Option<&str>,
        result: anyhow::Result<T>,
    ) -> DashboardResult<T> {
        match result {
            Ok(value) => {
                tracing::info!(
                    collection = R::collection_name(),
                    operation = %kind,
                    id = id.unwrap_or_default(),
                    "mutation succeeded"
                );
                if let Err(err) = self.reload().await {
                    tracing::warn!(error = %err, "refetch after mutation failed");
                }
                self.context.notify(Notification::success(
                    "Success",
                    format!("{} {}", capitalize(R::record_type()), kind.past_tense()),
                ));
                Ok(value)
            }
            Err(e) => {
                let err = DashboardError::from(MutationError::Failed {
                    record_type: R::record_type().to_string(),
                    id: id.map(str::to_string),
                    operation: kind.to_string(),
                    message: e.to_string(),
                });
                tracing::warn!(collection = R::collection_name(), error = %err, "mutation failed");
                self.context.notify(Notification::error("Error", err.to_string()));
                Err(err)
            }
        }
    }

    fn ensure_allowed(&self) -> DashboardResult<()> {
        if self.context.is_allowed() {
            return Ok(());
        }

        let (title, err) = if self.context.session().is_authenticated() {
            let message = format!("missing role for {}", R::collection_name());
            ("Forbidden", RequestError::Forbidden { message })
        } else {
            let message = "Please sign in as an administrator".to_string();
            ("Unauthorized", RequestError::Unauthorized { message })
        };
        self.context.notify(Notification::error(title, err.to_string()));
        Err(err.into())
    }

    fn ensure_valid(&self, record: &R) -> DashboardResult<()> {
        let errors = record.validate();
        if errors.is_empty() {
            return Ok(());
        }

        let err = DashboardError::from(ValidationError::FieldErrors(errors));
        self.context.notify(Notification::error("Validation failed", err.to_string()));
        Err(err)
    }
}

impl<R: Record + Exportable> ListView<R> {
    /// Export the filtered, sorted (unpaginated) records as CSV
    pub async fn export_csv(&self, sink: &dyn ExportSink) -> DashboardResult<ExportArtifact> {
        let rows = self.filtered();
        let artifact = ExportArtifact::csv(self.config.export_file_name(R::collection_name()), &rows);

        match sink.deliver(artifact.clone()).await {
            Ok(()) => {
                self.context.notify(Notification::success(
                    "Export ready",
                    format!("{} rows exported to {}", rows.len(), artifact.file_name),
                ));
                Ok(artifact)
            }
            Err(e) => {
                let err = DashboardError::from(ExportError::WriteFailed {
                    file_name: artifact.file_name.clone(),
                    message: e.to_string(),
                });
                self.context.notify(Notification::error("Error", err.to_string()));
                Err(err)
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
