//! The task manager façade consumed by the tool handlers.
//!
//! Holds the store handle and delegates derivations to the query and
//! aggregation engines; nothing above this layer touches the store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::model::{
    Period, ProductivityData, Task, TaskDraft, TaskFilter, TaskPatch, TaskStats, TaskStatus,
};
use crate::store::TaskStore;
use crate::{productivity, query, stats};

/// Entry point for every tool operation.
#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Filtered, sorted view of the store.
    pub fn tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        query::filter_tasks(self.store.snapshot(), filter)
    }

    /// Look up a single task by id.
    pub fn find(&self, id: &str) -> Option<Task> {
        self.store.find(id)
    }

    /// Case-insensitive substring search over title, description, and tags.
    pub fn search(&self, query: &str) -> Vec<Task> {
        let needle = query.to_lowercase();
        self.tasks(&TaskFilter::default())
            .into_iter()
            .filter(|t| t.matches_text(&needle))
            .collect()
    }

    /// Create a task from `draft`.
    ///
    /// Status is forced to pending regardless of input, and the creation
    /// and update timestamps coincide.
    pub fn create(&self, draft: TaskDraft) -> Task {
        let now = Utc::now();
        let task = Task {
            id: fresh_id(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Pending,
            priority: draft.priority,
            due_date: draft.due_date,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(id = %task.id, "created task");
        self.store.insert(task.clone());
        task
    }

    /// Merge `patch` onto the task with `id`. `None` when the id is absent.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Option<Task> {
        self.store.update(id, patch)
    }

    /// Delete by id. `true` when a record was removed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.store.remove(id);
        if removed {
            tracing::debug!(id, "deleted task");
        }
        removed
    }

    /// Aggregate counts for `period`.
    pub fn stats(&self, period: Period) -> TaskStats {
        stats::period_stats(&self.store.snapshot(), period, Utc::now())
    }

    /// Productivity breakdowns for `period`.
    pub fn productivity(&self, period: Period) -> ProductivityData {
        productivity::productivity(&self.store.snapshot(), period, Utc::now())
    }
}

fn fresh_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("task-{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Patch, Priority};
    use crate::store::InMemoryStore;

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(InMemoryStore::seeded(Utc::now())))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: None,
            priority: Priority::High,
            due_date: None,
            tags: None,
        }
    }

    #[test]
    fn test_create_forces_pending_and_fresh_id() {
        let manager = manager();
        let a = manager.create(draft("First"));
        let b = manager.create(draft("Second"));

        assert_eq!(a.status, TaskStatus::Pending);
        assert_eq!(a.created_at, a.updated_at);
        assert!(a.id.starts_with("task-"));
        assert_ne!(a.id, b.id);
        assert!(manager.find(&a.id).is_some());
    }

    #[test]
    fn test_search_matches_tags_case_insensitively() {
        let manager = manager();
        let hits = manager.search("DOCS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "task-002");
    }

    #[test]
    fn test_search_misses_yield_empty() {
        assert!(manager().search("nonexistent-term").is_empty());
    }

    #[test]
    fn test_update_and_delete_sentinels() {
        let manager = manager();
        assert!(manager.update("task-404", TaskPatch::default()).is_none());
        assert!(!manager.delete("task-404"));

        let cleared = manager
            .update(
                "task-001",
                TaskPatch {
                    due_date: Patch::Clear,
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        assert!(cleared.due_date.is_none());

        assert!(manager.delete("task-001"));
        assert!(manager.find("task-001").is_none());
    }

    #[test]
    fn test_stats_and_productivity_cover_seed() {
        let manager = manager();
        let stats = manager.stats(Period::Week);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 33);

        let productivity = manager.productivity(Period::Week);
        assert_eq!(productivity.priority_breakdown.len(), 3);
        // task-001 is due two days from now and not completed.
        assert_eq!(productivity.upcoming_count, 1);
        assert_eq!(productivity.overdue_count, 0);
    }
}
