//! Community events

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::export::Exportable;
use crate::core::field::parse_timestamp;
use crate::core::query::SortDirection;
use crate::core::record::Record;
use crate::entities::{display_date, or_placeholder};
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    /// "free" or "paid"
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Option<f64>,
}

impl Pricing {
    pub fn is_free(&self) -> bool {
        self.kind == "free" || self.amount.is_none_or(|a| a <= 0.0)
    }

    /// "Free" or a rounded rupee amount
    pub fn label(&self) -> String {
        match self.amount {
            Some(amount) if !self.is_free() => format!("₹{}", amount.round()),
            _ => "Free".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    pub capacity: Option<u32>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub pricing: Pricing,
    pub registration: Registration,
    pub organizer_name: Option<String>,
    pub featured: bool,
    pub additional_details: Vec<String>,
}

impl Event {
    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new()
            .searchable(["title", "description"])
            .categorical("category")
            .date_field("date")
            .sortable("title", FieldKind::Text)
            .sortable("price", FieldKind::Numeric)
            .default_sort("date", SortDirection::Ascending)
    }

    /// Whether the event is on or after `now`; `None` when the date is unreadable
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> Option<bool> {
        self.timestamp().map(|date| date >= now)
    }
}

impl_record!(
    Event, "event", "events",
    id: id,
    timestamp: date => "date",
    fields {
        "title" => text(title),
        "description" => text(description),
        "location" => optional_text(location),
        "category" => optional_text(category),
        "price" => optional_number(pricing.amount),
        "organizerName" => optional_text(organizer_name),
        "featured" => flag(featured),
    },
);

/// Time filter on the events page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTimeFilter {
    /// Upcoming events first, then past ones
    #[default]
    All,
    Upcoming,
    Past,
}

impl EventTimeFilter {
    /// Apply the time filter and its ordering to already-filtered events
    ///
    /// Upcoming and past groups are each ordered by date ascending. Events
    /// with unreadable dates match neither `Upcoming` nor `Past` and trail
    /// the `All` listing in their original order.
    pub fn arrange(&self, events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
        let mut upcoming = Vec::new();
        let mut past = Vec::new();
        let mut undated = Vec::new();

        for event in events {
            match event.is_upcoming(now) {
                Some(true) => upcoming.push(event),
                Some(false) => past.push(event),
                None => undated.push(event),
            }
        }

        let by_date = |a: &Event, b: &Event| a.timestamp().cmp(&b.timestamp());
        upcoming.sort_by(by_date);
        past.sort_by(by_date);

        match self {
            EventTimeFilter::Upcoming => upcoming,
            EventTimeFilter::Past => past,
            EventTimeFilter::All => {
                upcoming.extend(past);
                upcoming.extend(undated);
                upcoming
            }
        }
    }
}

impl Exportable for Event {
    fn export_headers() -> Vec<&'static str> {
        vec!["Title", "Date", "Location", "Category", "Price", "Capacity", "Organizer"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            display_date(&self.date),
            or_placeholder(self.location.as_deref()),
            or_placeholder(self.category.as_deref()),
            self.pricing.label(),
            self.registration
                .capacity
                .map(|c| c.to_string())
                .unwrap_or_else(|| or_placeholder(None)),
            or_placeholder(self.organizer_name.as_deref()),
        ]
    }
}

/// Parse the registration deadline, if any
pub fn registration_deadline(event: &Event) -> Option<DateTime<Utc>> {
    event.registration.deadline.as_deref().and_then(parse_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, date: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    fn sample() -> Vec<Event> {
        vec![
            event("past-late", "2024-05-20"),
            event("next-late", "2024-09-01"),
            event("undated", "soon"),
            event("past-early", "2024-01-10"),
            event("next-early", "2024-07-01"),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_all_orders_upcoming_then_past() {
        let arranged = EventTimeFilter::All.arrange(sample(), now());
        assert_eq!(
            ids(&arranged),
            vec!["next-early", "next-late", "past-early", "past-late", "undated"]
        );
    }

    #[test]
    fn test_upcoming_and_past_filters() {
        assert_eq!(
            ids(&EventTimeFilter::Upcoming.arrange(sample(), now())),
            vec!["next-early", "next-late"]
        );
        assert_eq!(
            ids(&EventTimeFilter::Past.arrange(sample(), now())),
            vec!["past-early", "past-late"]
        );
    }

    #[test]
    fn test_pricing_label() {
        let free = Pricing {
            kind: "free".to_string(),
            amount: None,
        };
        let paid = Pricing {
            kind: "paid".to_string(),
            amount: Some(249.6),
        };
        assert_eq!(free.label(), "Free");
        assert_eq!(paid.label(), "₹250");
    }

    #[test]
    fn test_registration_deadline() {
        let mut e = event("e1", "2024-07-01");
        assert!(registration_deadline(&e).is_none());
        e.registration.deadline = Some("2024-06-30".to_string());
        assert_eq!(
            registration_deadline(&e),
            Some(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap())
        );
    }
}
