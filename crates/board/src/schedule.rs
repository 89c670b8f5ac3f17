//! Per-card presentation flags: overdue and stalled. Derived on every
//! render, never persisted.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use store::{TaskDocument, TaskStatus};

/// Business days a card may sit in a column before it counts as stuck.
pub const STUCK_THRESHOLD_DAYS: u32 = 3;

/// Count of business days (Mon-Sat, Sundays excluded) walking the calendar
/// from `start` to `end`, both endpoints inclusive. Zero when the range is
/// inverted.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = start;
    while day <= end {
        if day.weekday() != Weekday::Sun {
            count += 1;
        }
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    count
}

/// Overdue means the due date has passed and the task is not done. Due
/// dates are stored at midnight, so strict comparison of the dates is
/// enough.
pub fn is_overdue(task: &TaskDocument, today: NaiveDate) -> bool {
    match task.due_date {
        Some(due) => task.status != TaskStatus::Done && today > due.date(),
        None => false,
    }
}

/// Business days since the card last moved columns. Done cards are never
/// stuck.
pub fn days_stuck(task: &TaskDocument, today: NaiveDate) -> u32 {
    if task.status == TaskStatus::Done {
        return 0;
    }
    let moved = task.moved_at.with_timezone(&Local).date_naive();
    business_days(moved, today)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFlags {
    pub overdue: bool,
    pub days_stuck: u32,
    pub stuck: bool,
}

impl CardFlags {
    pub fn compute(task: &TaskDocument, today: NaiveDate) -> Self {
        let days_stuck = days_stuck(task, today);
        Self {
            overdue: is_overdue(task, today),
            days_stuck,
            stuck: days_stuck > STUCK_THRESHOLD_DAYS,
        }
    }

    /// Today on the local calendar, matching the local-midnight convention
    /// of stored due dates.
    pub fn compute_now(task: &TaskDocument) -> Self {
        Self::compute(task, Local::now().date_naive())
    }
}
