//! Query engine: filtered, sorted, size-limited views of the store.

use crate::model::{Task, TaskFilter};

/// Hard cap on any requested result size.
pub const MAX_LIMIT: usize = 100;

/// Result size the listing tool uses when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 20;

/// Apply `filter` to a snapshot of tasks.
///
/// Ordering is priority descending (high first) with ties broken by
/// creation time, newest first. An empty filter returns the full snapshot.
pub fn filter_tasks(mut tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    tasks.retain(|t| filter.status.matches(t.status) && filter.priority.matches(t.priority));

    tasks.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    if let Some(limit) = filter.limit {
        tasks.truncate(limit.min(MAX_LIMIT));
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, PriorityFilter, StatusFilter, TaskStatus};
    use chrono::{Duration, Utc};

    fn task(id: &str, status: TaskStatus, priority: Priority, created_days_ago: i64) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            status,
            priority,
            due_date: None,
            tags: None,
            created_at: now - Duration::days(created_days_ago),
            updated_at: now,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let tasks = vec![
            task("a", TaskStatus::Pending, Priority::Low, 1),
            task("b", TaskStatus::Completed, Priority::High, 2),
        ];
        assert_eq!(filter_tasks(tasks, &TaskFilter::default()).len(), 2);
    }

    #[test]
    fn test_status_and_priority_constraints() {
        let tasks = vec![
            task("a", TaskStatus::Pending, Priority::Low, 1),
            task("b", TaskStatus::Pending, Priority::High, 2),
            task("c", TaskStatus::Completed, Priority::High, 3),
        ];
        let filter = TaskFilter {
            status: StatusFilter::Pending,
            priority: PriorityFilter::High,
            limit: None,
        };
        let result = filter_tasks(tasks, &filter);
        assert_eq!(ids(&result), vec!["b"]);
    }

    #[test]
    fn test_ordering_priority_then_recency() {
        // The scenario from the original system: high@T-5d, low@T-1d,
        // high@T-1d must come back as [high@T-1d, high@T-5d, low@T-1d].
        let tasks = vec![
            task("old-high", TaskStatus::Pending, Priority::High, 5),
            task("new-low", TaskStatus::Pending, Priority::Low, 1),
            task("new-high", TaskStatus::Pending, Priority::High, 1),
        ];
        let result = filter_tasks(tasks, &TaskFilter::default());
        assert_eq!(ids(&result), vec!["new-high", "old-high", "new-low"]);
    }

    #[test]
    fn test_limit_truncates() {
        let tasks = (0..5)
            .map(|i| task(&format!("t{}", i), TaskStatus::Pending, Priority::Medium, i))
            .collect();
        let filter = TaskFilter {
            limit: Some(2),
            ..TaskFilter::default()
        };
        assert_eq!(filter_tasks(tasks, &filter).len(), 2);
    }

    #[test]
    fn test_limit_is_capped() {
        let tasks = (0..120)
            .map(|i| task(&format!("t{}", i), TaskStatus::Pending, Priority::Medium, i))
            .collect();
        let filter = TaskFilter {
            limit: Some(1000),
            ..TaskFilter::default()
        };
        assert_eq!(filter_tasks(tasks, &filter).len(), MAX_LIMIT);
    }
}
