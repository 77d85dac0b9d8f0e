//! Statistics engine: aggregate counts over a lookback window.

use chrono::{DateTime, Utc};

use crate::model::{Period, Task, TaskStats, TaskStatus};
use crate::timeutil;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compute stats over tasks created on or after the start of `period`,
/// evaluated at `now`. There is no upper bound on the window.
///
/// `avg_completion_time` uses `updated_at` as a proxy for the completion
/// instant, which holds only while completed tasks are not edited again.
pub fn period_stats(tasks: &[Task], period: Period, now: DateTime<Utc>) -> TaskStats {
    let window_start = timeutil::window_start(period, now);
    let windowed: Vec<&Task> = tasks.iter().filter(|t| t.created_at >= window_start).collect();

    let total = windowed.len();
    let completed: Vec<&Task> = windowed
        .iter()
        .copied()
        .filter(|t| t.status == TaskStatus::Completed)
        .collect();
    let in_progress = windowed
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count();
    let pending = windowed
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .count();

    let completion_rate = if total == 0 {
        0
    } else {
        (completed.len() as f64 / total as f64 * 100.0).round() as u32
    };

    let avg_completion_time = if completed.is_empty() {
        0
    } else {
        let total_seconds: i64 = completed
            .iter()
            .map(|t| (t.updated_at - t.created_at).num_seconds())
            .sum();
        (total_seconds as f64 / completed.len() as f64 / SECONDS_PER_DAY).round() as i64
    };

    TaskStats {
        total,
        completed: completed.len(),
        in_progress,
        pending,
        completion_rate,
        avg_completion_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn task(id: &str, status: TaskStatus, created_days_ago: i64, updated_days_ago: i64) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            status,
            priority: Priority::Medium,
            due_date: None,
            tags: None,
            created_at: now() - Duration::days(created_days_ago),
            updated_at: now() - Duration::days(updated_days_ago),
        }
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let stats = period_stats(&[], Period::Week, now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.avg_completion_time, 0);
    }

    #[test]
    fn test_window_excludes_older_tasks() {
        let tasks = vec![
            task("inside", TaskStatus::Pending, 3, 3),
            task("outside", TaskStatus::Pending, 10, 10),
        ];
        let stats = period_stats(&tasks, Period::Week, now());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn test_today_counts_only_since_midnight() {
        let mut early = task("early", TaskStatus::Pending, 0, 0);
        early.created_at = now() - Duration::hours(3);
        let mut yesterday = task("yesterday", TaskStatus::Pending, 0, 0);
        yesterday.created_at = now() - Duration::hours(20);

        let stats = period_stats(&[early, yesterday], Period::Today, now());
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn test_completion_rate_rounds() {
        let tasks = vec![
            task("a", TaskStatus::Completed, 1, 0),
            task("b", TaskStatus::Completed, 2, 1),
            task("c", TaskStatus::Pending, 3, 3),
        ];
        // 2 of 3 completed: 66.67 rounds to 67.
        let stats = period_stats(&tasks, Period::Week, now());
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn test_avg_completion_time_in_whole_days() {
        let tasks = vec![
            // 2 days from creation to last update.
            task("fast", TaskStatus::Completed, 3, 1),
            // 5 days.
            task("slow", TaskStatus::Completed, 6, 1),
            // Never completed, must not contribute.
            task("open", TaskStatus::InProgress, 6, 0),
        ];
        // Mean of 2 and 5 is 3.5, rounds to 4.
        let stats = period_stats(&tasks, Period::Week, now());
        assert_eq!(stats.avg_completion_time, 4);
    }
}
