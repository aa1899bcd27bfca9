//! Summary cards shown above the lists
//!
//! Figures are always computed over the full fetched collection, never over
//! the filtered or paginated view.

use crate::core::aggregate::{TimeWindow, count_where, summarize};
use crate::core::pipeline::ListPipeline;
use crate::core::query::QueryState;
use crate::entities::{Donation, Event, User, Volunteer};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Number of users on the dashboard's "recent users" card
pub const RECENT_USERS: usize = 10;

/// Donation page summary cards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DonationSummary {
    /// Sum of completed donations
    pub total_amount: f64,
    /// Every donation record, whatever its status
    pub total_donors: usize,
    /// Completed donations made since the first day of the current month
    pub this_month: f64,
    /// Completed total divided by the number of completed donations
    pub average: f64,
    pub completed_count: usize,
}

impl DonationSummary {
    /// Compute the cards; `offset` decides where the current month starts
    pub fn compute(donations: &[Donation], now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let completed = summarize(donations, Donation::is_completed, TimeWindow::All, "amount");
        let this_month = summarize(
            donations,
            Donation::is_completed,
            TimeWindow::current_month(now, offset),
            "amount",
        );

        Self {
            total_amount: completed.sum,
            total_donors: count_where(donations, |_| true, TimeWindow::All),
            this_month: this_month.sum,
            average: completed.average,
            completed_count: completed.count,
        }
    }
}

/// Overview cards on the dashboard landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub total_users: usize,
    pub total_volunteers: usize,
    pub total_events: usize,
    /// Newest first, at most [`RECENT_USERS`]
    pub recent_users: Vec<User>,
}

impl DashboardOverview {
    pub fn compute(users: &[User], volunteers: &[Volunteer], events: &[Event]) -> Self {
        Self {
            total_users: count_where(users, |_| true, TimeWindow::All),
            total_volunteers: count_where(volunteers, |_| true, TimeWindow::All),
            total_events: count_where(events, |_| true, TimeWindow::All),
            recent_users: recent_users(users, RECENT_USERS),
        }
    }
}

/// The `limit` most recently created users, newest first
pub fn recent_users(users: &[User], limit: usize) -> Vec<User> {
    if limit == 0 {
        return Vec::new();
    }
    let descriptor = User::descriptor();
    let state = QueryState::for_descriptor(&descriptor).with_page_size(limit);
    ListPipeline::new(descriptor).apply(users, &state).data
}

/// Rupee amount with Indian digit grouping, e.g. `₹1,23,456.5`
pub fn format_inr(amount: f64) -> String {
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let fraction = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && (whole > 0 || fraction > 0) { "-" } else { "" };
    match fraction {
        0 => format!("{sign}₹{grouped}"),
        f if f % 10 == 0 => format!("{sign}₹{grouped}.{}", f / 10),
        f => format!("{sign}₹{grouped}.{f:02}"),
    }
}
