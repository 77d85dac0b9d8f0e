//! Productivity aggregation: per-day completions, tag and priority
//! distributions, and schedule pressure.
//!
//! The daily series is windowed by the requested period; every other
//! breakdown deliberately spans the whole store.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::model::{Period, Priority, PriorityCount, ProductivityData, Task, TagCount, TaskStatus};
use crate::timeutil;

/// Upper bound on the daily series length, regardless of period.
pub const DAILY_SERIES_CAP: usize = 30;

/// Horizon for the upcoming-task count, in days from the start of today.
const UPCOMING_HORIZON_DAYS: i64 = 7;

/// Compute the productivity breakdowns over `tasks`, evaluated at `now`.
pub fn productivity(tasks: &[Task], period: Period, now: DateTime<Utc>) -> ProductivityData {
    ProductivityData {
        daily_completed: daily_completed(tasks, period, now),
        tags_distribution: tags_distribution(tasks),
        priority_breakdown: priority_breakdown(tasks),
        overdue_count: overdue_count(tasks, now),
        upcoming_count: upcoming_count(tasks, now),
    }
}

/// Completed tasks per calendar day, oldest day first and `now`'s day last.
///
/// A task counts toward the day of its last update, the same proxy the
/// completion-time average uses. Series length is the period's day count
/// capped at [`DAILY_SERIES_CAP`].
fn daily_completed(tasks: &[Task], period: Period, now: DateTime<Utc>) -> Vec<u32> {
    let len = period.sample_days().min(DAILY_SERIES_CAP);
    let mut series = vec![0u32; len];

    for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
        let days_ago = timeutil::days_between(task.updated_at, now);
        if days_ago >= 0 && (days_ago as usize) < len {
            series[len - 1 - days_ago as usize] += 1;
        }
    }

    series
}

/// Occurrences of each tag across all tasks, most frequent first.
/// Equal counts are ordered by tag name so repeated calls are stable.
fn tags_distribution(tasks: &[Task]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tasks.iter().filter_map(|t| t.tags.as_ref()).flatten() {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut distribution: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    distribution
}

/// Task counts per priority in fixed [high, medium, low] order.
/// Every level is present even at count 0.
fn priority_breakdown(tasks: &[Task]) -> Vec<PriorityCount> {
    Priority::DESCENDING
        .iter()
        .map(|&priority| PriorityCount {
            priority,
            count: tasks.iter().filter(|t| t.priority == priority).count(),
        })
        .collect()
}

/// Non-completed tasks whose due date fell before the start of today.
fn overdue_count(tasks: &[Task], now: DateTime<Utc>) -> usize {
    let today = timeutil::start_of_day(now);
    tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .filter(|t| t.due_date.map_or(false, |due| due < today))
        .count()
}

/// Non-completed tasks due between the start of today and seven days out,
/// both bounds inclusive.
fn upcoming_count(tasks: &[Task], now: DateTime<Utc>) -> usize {
    let today = timeutil::start_of_day(now);
    let horizon = today + Duration::days(UPCOMING_HORIZON_DAYS);
    tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .filter(|t| t.due_date.map_or(false, |due| due >= today && due <= horizon))
        .count()
}
