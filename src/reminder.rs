//! Reminder evaluation.
//!
//! [`evaluate`] is stateless and total: it is invoked fresh on every cache
//! refresh and on every scheduler tick, over the entire current item set,
//! with no memory of prior evaluations. Given fixed inputs it always produces
//! the same request set.
//!
//! Because evaluation re-fires every tick, delivery would re-alert every 60
//! seconds for as long as an item sits inside a threshold window. The
//! [`AckSet`] closes that gap: it remembers the highest threshold already
//! notified per item, so each item alerts at most once per threshold
//! crossing. It lives in memory only and is cleared on logout.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::TodoItem;

/// Proximity window for the "due tomorrow" threshold.
const TOMORROW_WINDOW_HOURS: i64 = 24;

/// Notification thresholds, ordered by urgency: `DueToday` outranks
/// `DueTomorrow`, so an item already notified for tomorrow still alerts again
/// once its due day arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NotificationThreshold {
    /// Due instant lies strictly within the next 24 hours.
    DueTomorrow,
    /// Due instant falls on the same UTC calendar day as now.
    DueToday,
}

/// A request to deliver one human-readable alert for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Identifier of the item that crossed a threshold.
    pub item_id: String,

    /// Title of the item, used to render the alert message.
    pub title: String,

    /// Which threshold was crossed.
    pub threshold: NotificationThreshold,
}

impl NotificationRequest {
    /// Renders the human-readable alert message.
    #[must_use]
    pub fn message(&self) -> String {
        match self.threshold {
            NotificationThreshold::DueTomorrow => format!("\"{}\" is due tomorrow", self.title),
            NotificationThreshold::DueToday => format!("\"{}\" is due today", self.title),
        }
    }
}

/// Scans `items` and returns one notification request per item that currently
/// sits inside a threshold window.
///
/// Per item with a due date: the strict `0 < due - now < 24h` window wins
/// first as "due tomorrow"; otherwise a due instant on the same UTC calendar
/// day as `now` (including one already passed) is "due today". Items without
/// a due date never produce a request.
#[must_use]
pub fn evaluate(items: &[TodoItem], now: DateTime<Utc>) -> Vec<NotificationRequest> {
    items
        .iter()
        .filter_map(|item| {
            let due = item.due_date?;
            let threshold = classify(due, now)?;
            Some(NotificationRequest {
                item_id: item.id.clone(),
                title: item.title.clone(),
                threshold,
            })
        })
        .collect()
}

/// Classifies a due instant against the current time.
fn classify(due: DateTime<Utc>, now: DateTime<Utc>) -> Option<NotificationThreshold> {
    let until_due = due - now;
    if until_due > Duration::zero() && until_due < Duration::hours(TOMORROW_WINDOW_HOURS) {
        Some(NotificationThreshold::DueTomorrow)
    } else if due.date_naive() == now.date_naive() {
        Some(NotificationThreshold::DueToday)
    } else {
        None
    }
}

/// Per-item record of the highest threshold already notified.
///
/// Held in memory for the lifetime of an authenticated session and cleared on
/// logout, so a fresh login re-alerts for items still inside a window.
#[derive(Debug, Default)]
pub struct AckSet {
    notified: HashMap<String, NotificationThreshold>,
}

impl AckSet {
    /// Creates an empty acknowledgment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records the request if it crosses a threshold not
    /// yet notified for its item. A repeat at the same or a lower threshold
    /// is rejected; an upgrade (tomorrow → today) is accepted.
    pub fn accept(&mut self, request: &NotificationRequest) -> bool {
        match self.notified.get(&request.item_id) {
            Some(prior) if *prior >= request.threshold => false,
            _ => {
                self.notified
                    .insert(request.item_id.clone(), request.threshold);
                true
            }
        }
    }

    /// Forgets all acknowledgments. Called on logout.
    pub fn clear(&mut self) {
        self.notified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due_item(id: &str, title: &str, due: Option<DateTime<Utc>>) -> TodoItem {
        TodoItem {
            id: id.to_string(),
            title: title.to_string(),
            done: false,
            due_date: due,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn due_in_twelve_hours_is_due_tomorrow() {
        let now = noon();
        let items = vec![due_item("1", "Call mom", Some(now + Duration::hours(12)))];

        let requests = evaluate(&items, now);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].threshold, NotificationThreshold::DueTomorrow);
        assert_eq!(requests[0].message(), "\"Call mom\" is due tomorrow");
    }

    #[test]
    fn due_an_hour_ago_on_the_same_day_is_due_today() {
        let now = noon();
        let items = vec![due_item("1", "Pay rent", Some(now - Duration::hours(1)))];

        let requests = evaluate(&items, now);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].threshold, NotificationThreshold::DueToday);
        assert_eq!(requests[0].message(), "\"Pay rent\" is due today");
    }

    #[test]
    fn due_in_two_days_yields_no_request() {
        let now = noon();
        let items = vec![due_item("1", "Taxes", Some(now + Duration::hours(48)))];
        assert!(evaluate(&items, now).is_empty());
    }

    #[test]
    fn due_yesterday_yields_no_request() {
        let now = noon();
        let items = vec![due_item("1", "Missed", Some(now - Duration::hours(30)))];
        assert!(evaluate(&items, now).is_empty());
    }

    #[test]
    fn item_without_due_date_never_yields_a_request() {
        let items = vec![due_item("1", "Someday", None)];
        assert!(evaluate(&items, noon()).is_empty());
        assert!(evaluate(&items, noon() + Duration::days(400)).is_empty());
    }

    #[test]
    fn window_crossing_midnight_is_still_due_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 9, 5, 23, 0, 0).unwrap();
        let items = vec![due_item("1", "Red-eye", Some(now + Duration::hours(2)))];

        let requests = evaluate(&items, now);
        assert_eq!(requests[0].threshold, NotificationThreshold::DueTomorrow);
    }

    #[test]
    fn evaluation_is_pure_given_fixed_inputs() {
        let now = noon();
        let due = Some(now + Duration::hours(6));
        let items = vec![
            due_item("1", "First", due),
            due_item("2", "Second", due),
        ];

        let first = evaluate(&items, now);
        let second = evaluate(&items, now);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn ack_set_accepts_each_threshold_once() {
        let mut acks = AckSet::new();
        let request = NotificationRequest {
            item_id: "1".to_string(),
            title: "Call mom".to_string(),
            threshold: NotificationThreshold::DueTomorrow,
        };

        assert!(acks.accept(&request));
        assert!(!acks.accept(&request));
    }

    #[test]
    fn ack_set_allows_upgrade_from_tomorrow_to_today() {
        let mut acks = AckSet::new();
        let tomorrow = NotificationRequest {
            item_id: "1".to_string(),
            title: "Call mom".to_string(),
            threshold: NotificationThreshold::DueTomorrow,
        };
        let today = NotificationRequest {
            threshold: NotificationThreshold::DueToday,
            ..tomorrow.clone()
        };

        assert!(acks.accept(&tomorrow));
        assert!(acks.accept(&today));
        // No downgrade back to the weaker threshold.
        assert!(!acks.accept(&tomorrow));
        assert!(!acks.accept(&today));
    }

    #[test]
    fn ack_set_tracks_items_independently() {
        let mut acks = AckSet::new();
        let first = NotificationRequest {
            item_id: "1".to_string(),
            title: "a".to_string(),
            threshold: NotificationThreshold::DueToday,
        };
        let second = NotificationRequest {
            item_id: "2".to_string(),
            ..first.clone()
        };

        assert!(acks.accept(&first));
        assert!(acks.accept(&second));
    }

    #[test]
    fn clear_forgets_acknowledgments() {
        let mut acks = AckSet::new();
        let request = NotificationRequest {
            item_id: "1".to_string(),
            title: "Call mom".to_string(),
            threshold: NotificationThreshold::DueToday,
        };

        assert!(acks.accept(&request));
        acks.clear();
        assert!(acks.accept(&request));
    }
}
