//! Task storage.
//!
//! The store owns the authoritative mutable collection of tasks. It is
//! defined as a trait so a persistent backend can replace the in-memory
//! implementation without touching the query or aggregation code. Absent
//! ids are reported as `None` / `false`, never as errors.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::model::{Patch, Priority, Task, TaskPatch, TaskStatus};

/// Mutable task collection shared by every tool handler.
pub trait TaskStore: Send + Sync {
    /// Append a task. The caller guarantees a unique id.
    fn insert(&self, task: Task);

    /// Look up a task by id.
    fn find(&self, id: &str) -> Option<Task>;

    /// Merge `patch` onto the task with `id` and refresh `updated_at`.
    ///
    /// Returns the updated record, or `None` when the id is absent.
    fn update(&self, id: &str, patch: TaskPatch) -> Option<Task>;

    /// Remove by id. Returns whether a record was removed.
    fn remove(&self, id: &str) -> bool;

    /// Point-in-time copy of every task. Mutations after the call do not
    /// affect the returned snapshot.
    fn snapshot(&self) -> Vec<Task>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store backed by a `Vec` behind a read/write lock.
#[derive(Default)]
pub struct InMemoryStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the demo records used at process start.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            tasks: RwLock::new(seed_tasks(now)),
        }
    }
}

impl TaskStore for InMemoryStore {
    fn insert(&self, task: Task) {
        self.tasks.write().push(task);
    }

    fn find(&self, id: &str) -> Option<Task> {
        self.tasks.read().iter().find(|t| t.id == id).cloned()
    }

    fn update(&self, id: &str, patch: TaskPatch) -> Option<Task> {
        let mut tasks = self.tasks.write();
        let task = tasks.iter_mut().find(|t| t.id == id)?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        match patch.due_date {
            Patch::Keep => {}
            Patch::Clear => task.due_date = None,
            Patch::Set(due) => task.due_date = Some(due),
        }
        if let Some(tags) = patch.tags {
            task.tags = Some(tags);
        }
        task.updated_at = Utc::now();

        Some(task.clone())
    }

    fn remove(&self, id: &str) -> bool {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        tasks.len() < before
    }

    fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    fn len(&self) -> usize {
        self.tasks.read().len()
    }
}

/// The fixed demo records the process starts with, placed relative to `now`.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: "task-001".to_string(),
            title: "Review quarterly reports".to_string(),
            description: Some(
                "Analyze Q4 financial and performance reports for the board meeting".to_string(),
            ),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: Some(now + Duration::days(2)),
            tags: Some(vec!["finance".to_string(), "quarterly".to_string()]),
            created_at: now - Duration::days(5),
            updated_at: now,
        },
        Task {
            id: "task-002".to_string(),
            title: "Update documentation".to_string(),
            description: Some("Update API documentation with new endpoints".to_string()),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date: None,
            tags: Some(vec!["docs".to_string(), "api".to_string()]),
            created_at: now - Duration::days(3),
            updated_at: now - Duration::days(2),
        },
        Task {
            id: "task-003".to_string(),
            title: "Team standup preparation".to_string(),
            description: None,
            status: TaskStatus::Completed,
            priority: Priority::Low,
            due_date: None,
            tags: Some(vec!["meetings".to_string()]),
            created_at: now - Duration::days(1),
            updated_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryStore {
        InMemoryStore::seeded(Utc::now())
    }

    #[test]
    fn test_seed_shape() {
        let store = seeded();
        assert_eq!(store.len(), 3);
        assert!(store.find("task-001").is_some());
        assert!(store.find("task-404").is_none());
    }

    #[test]
    fn test_update_merges_and_refreshes_updated_at() {
        let store = seeded();
        let before = store.find("task-002").unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        };
        let after = store.update("task-002", patch).unwrap();

        assert_eq!(after.status, TaskStatus::InProgress);
        // Untouched fields survive the merge.
        assert_eq!(after.title, before.title);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_due_date_tristate() {
        let store = seeded();

        // Absent leaves the previous value alone.
        let kept = store.update("task-001", TaskPatch::default()).unwrap();
        assert!(kept.due_date.is_some());

        // Explicit clear removes it.
        let cleared = store
            .update(
                "task-001",
                TaskPatch {
                    due_date: Patch::Clear,
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        assert!(cleared.due_date.is_none());

        // Set writes a new value.
        let due = Utc::now() + Duration::days(10);
        let set = store
            .update(
                "task-001",
                TaskPatch {
                    due_date: Patch::Set(due),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        assert_eq!(set.due_date, Some(due));
    }

    #[test]
    fn test_update_unknown_id() {
        let store = seeded();
        assert!(store.update("task-404", TaskPatch::default()).is_none());
    }

    #[test]
    fn test_remove() {
        let store = seeded();
        assert!(!store.remove("task-404"));
        assert_eq!(store.len(), 3);

        assert!(store.remove("task-002"));
        assert_eq!(store.len(), 2);
        assert!(store.find("task-002").is_none());
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let store = seeded();
        let snapshot = store.snapshot();
        store.remove("task-001");
        assert_eq!(snapshot.len(), 3);
    }
}
