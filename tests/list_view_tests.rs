//! Integration tests for ListView
//!
//! These tests verify that:
//! - The pipeline output, pagination and summaries agree on a realistic collection
//! - Query-state changes reset or clamp the page
//! - Fetch and mutation failures are reported once and leave state consistent
//! - Exports cover the filtered rows rather than the current page

mod dashboard_harness;

use admin::core::error::{FetchError, MutationError, RequestError, ValidationError};
use admin::prelude::*;
use chrono::{NaiveDate, Offset};
use dashboard_harness::*;
use std::sync::Arc;

// =============================================================================
// Pipeline through the view
// =============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_donation_first_page_and_month_summary() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, notifier) = view_over(&store, Donation::descriptor());

        view.refresh().await.unwrap();
        let page = view.visible();

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total_filtered(), 25);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(
            ids(&page.data),
            vec!["d14", "d13", "d12", "d11", "d10", "d09", "d08", "d07", "d06", "d05"]
        );

        // Summary cards read the full collection, whatever page is shown
        view.set_page(3);
        let summary = DonationSummary::compute(view.records(), now(), Utc.fix());
        assert_eq!(summary.this_month, 5000.0);
        assert_eq!(summary.total_amount, 8000.0);
        assert_eq!(summary.completed_count, 20);
        assert_eq!(summary.total_donors, 25);
        assert_eq!(summary.average, 400.0);

        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_public_view_with_status_filter() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let mut view = ListView::new(
            Arc::new(store.clone()),
            Arc::new(store),
            Donation::descriptor(),
            DashboardContext::anonymous().with_access(AccessPolicy::Public),
        );

        view.refresh().await.unwrap();
        view.set_filter("paymentStatus", "completed");

        let page = view.visible();
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.total, 20);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = InMemoryRecordStore::with_records(vec![
            user("u1", "Anna", "Smith", at(1, 1, 0)),
            user("u2", "Ben", "smith", at(1, 2, 0)),
            user("u3", "John", "Smithson", at(1, 3, 0)),
            user("u4", "Ravi", "Kumar", at(1, 4, 0)),
        ]);
        let (mut view, _) = view_over(&store, User::descriptor());
        view.refresh().await.unwrap();

        view.set_search("smith");
        let page = view.visible();

        assert_eq!(page.total_filtered(), 3);
        assert_eq!(ids(&page.data), vec!["u3", "u2", "u1"]);
    }

    #[tokio::test]
    async fn test_search_field_restricts_matching() {
        let store = InMemoryRecordStore::with_records(vec![
            user("u1", "Smitha", "Rao", at(1, 1, 0)),
            user("u2", "Ben", "Smith", at(1, 2, 0)),
        ]);
        let (mut view, _) = view_over(&store, User::descriptor());
        view.refresh().await.unwrap();

        view.set_search("smith");
        view.set_search_field(Some("lastName".to_string()));
        assert_eq!(ids(&view.visible().data), vec!["u2"]);
    }

    #[tokio::test]
    async fn test_filters_reset_page_and_ignore_case() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.set_page(2);
        assert_eq!(view.state().page, 2);

        view.set_filter("paymentStatus", "COMPLETED");
        assert_eq!(view.state().page, 1);
        assert_eq!(view.visible().total_filtered(), 20);

        view.set_filter("paymentStatus", "all");
        assert_eq!(view.visible().total_filtered(), 25);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.set_date_range(NaiveDate::from_ymd_opt(2024, 6, 12), NaiveDate::from_ymd_opt(2024, 6, 16));
        let filtered = view.filtered();

        assert_eq!(filtered.len(), 5);
        assert!(filtered.iter().all(|d| d.payment_status() == Some("pending")));
    }

    #[tokio::test]
    async fn test_toggle_sort_flips_direction() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.toggle_sort("amount");
        assert_eq!(view.visible().data[0].amount, 300.0);

        view.toggle_sort("amount");
        assert_eq!(view.visible().data[0].amount, 1000.0);
        assert_eq!(
            view.state().sort,
            Some(SortSpec::new("amount", SortDirection::Descending))
        );
    }

    #[tokio::test]
    async fn test_page_is_clamped() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.set_page(99);
        assert_eq!(view.state().page, 3);
        assert_eq!(view.visible().data.len(), 5);

        view.set_page(0);
        assert_eq!(view.state().page, 1);
    }

    #[tokio::test]
    async fn test_page_size_must_be_offered() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();
        view.set_page(2);

        assert!(view.set_page_size(25));
        assert_eq!(view.state().page, 1);
        assert_eq!(view.visible().total_pages(), 1);

        assert!(!view.set_page_size(7));
        assert_eq!(view.state().page_size, 25);
    }

    #[tokio::test]
    async fn test_filter_options_in_first_seen_order() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        assert_eq!(view.filter_options("paymentStatus"), vec!["completed", "pending"]);
        assert!(view.filter_options("unknownField").is_empty());
    }
}

// =============================================================================
// Fetch failures and access
// =============================================================================

mod fetch_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_records() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, notifier) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        store.fail_fetch(Some("network down"));
        let err = view.refresh().await.unwrap_err();

        assert!(matches!(err, DashboardError::Fetch(FetchError::Failed { .. })));
        assert_eq!(view.records().len(), 25);
        assert_eq!(view.last_error(), Some("Failed to fetch donations: network down"));
        assert!(!view.is_loading());

        let notifications = notifier.take();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].is_error());

        store.fail_fetch(None);
        view.refresh().await.unwrap();
        assert_eq!(view.last_error(), None);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_leaves_empty_collection() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        store.fail_fetch(Some("timeout"));
        let (mut view, _) = view_over(&store, Donation::descriptor());

        assert!(view.refresh().await.is_err());
        assert!(view.records().is_empty());
        assert_eq!(view.visible().total_pages(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_session_is_unauthorized() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let notifier = CollectingNotifier::new();
        let context = DashboardContext::new(Session::Anonymous, Arc::new(notifier.clone()));
        let mut view = ListView::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Donation::descriptor(),
            context,
        );

        let err = view.refresh().await.unwrap_err();

        assert!(matches!(err, DashboardError::Request(RequestError::Unauthorized { .. })));
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(store.fetch_count(), 0);
        assert_eq!(notifier.take()[0].title, "Unauthorized");
    }

    #[tokio::test]
    async fn test_missing_role_is_forbidden() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        let context = view
            .context()
            .clone()
            .with_access(AccessPolicy::HasRole(vec!["finance".to_string()]));
        *view.context_mut() = context;

        let err = view.refresh().await.unwrap_err();
        assert!(matches!(err, DashboardError::Request(RequestError::Forbidden { .. })));
    }
}

// =============================================================================
// Selection
// =============================================================================

mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_toggle_row_ignores_unknown_ids() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        assert!(view.toggle_row("d00"));
        assert!(!view.toggle_row("nope"));
        assert!(!view.toggle_row("d00"));
        assert!(view.selection().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_all_visible_covers_current_page() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.toggle_all_visible();
        assert_eq!(view.selection().len(), 10);
        assert!(view.selection().is_selected("d14"));
        assert!(!view.selection().is_selected("d00"));

        view.toggle_all_visible();
        assert!(view.selection().is_empty());
    }

    #[tokio::test]
    async fn test_select_all_visible_drops_rows_on_other_pages() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.toggle_row("d14");
        view.set_page(3);
        view.select_all_visible();

        let visible = ids(&view.visible().data);
        assert_eq!(visible, vec!["d19", "d18", "d17", "d16", "d15"]);
        assert!(!view.selection().is_selected("d14"));
        assert_eq!(view.selection().ids(), visible);
    }

    #[tokio::test]
    async fn test_toggle_all_visible_drops_rows_hidden_by_filter() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, _) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.toggle_row("d00");
        view.set_filter("paymentStatus", "pending");
        view.toggle_all_visible();

        let visible = ids(&view.visible().data);
        assert_eq!(visible.len(), 5);
        assert_eq!(view.selection().ids(), visible);
    }

    #[tokio::test]
    async fn test_refetch_prunes_vanished_ids() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, notifier) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        view.toggle_row("d00");
        view.toggle_row("d01");
        view.delete("d01").await.unwrap();

        assert_eq!(view.selection().ids(), vec!["d00"]);
        assert_eq!(view.records().len(), 24);

        let notifications = notifier.take();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].description, "Donation deleted");
    }
}

// =============================================================================
// Single-record mutations
// =============================================================================

mod mutation_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_user_is_never_sent() {
        let store = InMemoryRecordStore::with_records(vec![user("u1", "Anna", "Smith", at(1, 1, 0))]);
        let (mut view, notifier) = view_over(&store, User::descriptor());
        view.refresh().await.unwrap();

        let invalid = User {
            email: "not-an-email".to_string(),
            ..user("", "", "Nobody", at(1, 2, 0))
        };
        let err = view.create(invalid).await.unwrap_err();

        match err {
            DashboardError::Validation(ValidationError::FieldErrors(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"firstName"));
                assert!(fields.contains(&"email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(notifier.take()[0].title, "Validation failed");
    }

    #[tokio::test]
    async fn test_create_refetches_after_success() {
        let store = InMemoryRecordStore::<User>::new();
        let (mut view, notifier) = view_over(&store, User::descriptor());
        view.refresh().await.unwrap();

        let created = view.create(user("", "Meera", "Iyer", at(2, 1, 0))).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(view.records().len(), 1);
        assert_eq!(store.fetch_count(), 2);
        assert_eq!(notifier.take()[0].description, "User created");
    }

    #[tokio::test]
    async fn test_unsupported_transition_is_rejected_locally() {
        let store = InMemoryRecordStore::with_records(vec![contact("c1", "Ravi", "new", at(3, 1, 0))]);
        let (mut view, notifier) = view_over(&store, Contact::descriptor());
        view.refresh().await.unwrap();

        let err = view.transition("c1", StatusTransition::Approve).await.unwrap_err();

        assert!(matches!(
            err,
            DashboardError::Mutation(MutationError::UnsupportedTransition { .. })
        ));
        assert_eq!(store.get("c1").unwrap().status, "new");
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let store = InMemoryRecordStore::with_records(vec![contact("c1", "Ravi", "new", at(3, 1, 0))]);
        let (mut view, notifier) = view_over(&store, Contact::descriptor());
        view.refresh().await.unwrap();

        view.transition("c1", StatusTransition::MarkAsRead).await.unwrap();

        assert_eq!(view.records()[0].status, "read");
        assert_eq!(notifier.take()[0].description, "Contact marked as read");
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_refetch() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        store.fail_mutations_for("d03", "server error");
        let (mut view, notifier) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();

        let err = view.delete("d03").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to delete donation 'd03': server error");
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(view.records().len(), 25);
        assert!(notifier.take()[0].is_error());
    }
}

// =============================================================================
// Export
// =============================================================================

mod export_tests {
    use super::*;

    #[tokio::test]
    async fn test_export_covers_filtered_rows_not_the_page() {
        let store = InMemoryRecordStore::with_records(donation_fixture());
        let (mut view, notifier) = view_over(&store, Donation::descriptor());
        view.refresh().await.unwrap();
        view.set_filter("paymentStatus", "completed");

        let sink = MemoryExportSink::new();
        let artifact = view.export_csv(&sink).await.unwrap();
        let text = artifact.text().unwrap();

        assert_eq!(artifact.file_name, "donations.csv");
        assert_eq!(text.lines().count(), 21);
        assert_eq!(
            text.lines().next(),
            Some("Donor,Email,Amount,Currency,Program,Type,Status,Date")
        );
        assert_eq!(
            text.lines().nth(1),
            Some("Donord09 Patel,d09@example.org,500,INR,Education,-,completed,2024-06-11")
        );
        assert_eq!(sink.artifacts().len(), 1);
        assert_eq!(
            notifier.take()[0].description,
            "20 rows exported to donations.csv"
        );
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryRecordStore::with_records(vec![
            contact("c1", "Lee, Ann", "new", at(3, 1, 0)),
            contact("c2", "Ravi", "read", at(3, 2, 0)),
        ]);
        let (mut view, _) = view_over(&store, Contact::descriptor());
        view.refresh().await.unwrap();

        view.export_csv(&FileExportSink::new(dir.path())).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
        assert!(written.starts_with("Name,Email,Status,Subject,Phone,Date,Message\n"));
        assert!(written.contains("\"Lee, Ann\""));
    }
}
