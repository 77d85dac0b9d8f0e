//! Task management tools: list, create, update, delete.
//!
//! Schema validation happens here, at the handler layer; the core below
//! only ever sees well-formed values.

use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolOutput};
use crate::manager::TaskManager;
use crate::model::{
    Patch, Priority, PriorityFilter, StatusFilter, TaskDraft, TaskFilter, TaskPatch, TaskStatus,
};
use crate::query;
use crate::widgets;

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;

fn validate_title(title: &str) -> anyhow::Result<()> {
    if title.is_empty() || title.chars().count() > TITLE_MAX {
        bail!("'title' must be between 1 and {} characters", TITLE_MAX);
    }
    Ok(())
}

fn validate_description(description: &str) -> anyhow::Result<()> {
    if description.chars().count() > DESCRIPTION_MAX {
        bail!("'description' must be at most {} characters", DESCRIPTION_MAX);
    }
    Ok(())
}

// ============================================================================
// list_tasks
// ============================================================================

/// Filtered task listing rendered by the task-list widget.
pub struct ListTasks {
    manager: Arc<TaskManager>,
}

impl ListTasks {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self { manager }
    }
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default)]
    status: StatusFilter,
    #[serde(default)]
    priority: PriorityFilter,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    query::DEFAULT_LIMIT as i64
}

#[async_trait]
impl Tool for ListTasks {
    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "Get a list of tasks with filtering options"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["all", "pending", "in_progress", "completed"],
                    "default": "all",
                    "description": "Filter by task status"
                },
                "priority": {
                    "type": "string",
                    "enum": ["all", "low", "medium", "high"],
                    "description": "Filter by priority level"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 100,
                    "default": 20,
                    "description": "Maximum number of tasks to return"
                }
            }
        })
    }

    fn widget(&self) -> Option<&'static str> {
        Some(widgets::TASK_LIST)
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let args: ListArgs = serde_json::from_value(args)?;
        if args.limit < 1 || args.limit > query::MAX_LIMIT as i64 {
            bail!("'limit' must be between 1 and {}", query::MAX_LIMIT);
        }

        let filter = TaskFilter {
            status: args.status,
            priority: args.priority,
            limit: Some(args.limit as usize),
        };
        let tasks = self.manager.tasks(&filter);

        if tasks.is_empty() {
            return Ok(ToolOutput::text("No tasks found with the specified filters."));
        }

        Ok(
            ToolOutput::text(format!("Found {} task(s)", tasks.len()))
                .with_structured(json!({ "tasks": tasks, "filter": filter }))
                .with_widget(widgets::TASK_LIST),
        )
    }
}

// ============================================================================
// create_task
// ============================================================================

/// Create a task; the result renders as the task-details widget.
pub struct CreateTask {
    manager: Arc<TaskManager>,
}

impl CreateTask {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for CreateTask {
    fn name(&self) -> &str {
        "create_task"
    }

    fn description(&self) -> &str {
        "Create a new task"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": TITLE_MAX,
                    "description": "Task title"
                },
                "description": {
                    "type": "string",
                    "maxLength": DESCRIPTION_MAX,
                    "description": "Task description"
                },
                "priority": {
                    "type": "string",
                    "enum": ["low", "medium", "high"],
                    "default": "medium",
                    "description": "Task priority"
                },
                "due_date": {
                    "type": "string",
                    "description": "Due date in ISO format"
                },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Task tags"
                }
            },
            "required": ["title"]
        })
    }

    fn widget(&self) -> Option<&'static str> {
        Some(widgets::TASK_DETAILS)
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let draft: TaskDraft = serde_json::from_value(args)?;
        validate_title(&draft.title)?;
        if let Some(description) = draft.description.as_deref() {
            validate_description(description)?;
        }

        let task = self.manager.create(draft);
        let summary = format!(
            "Created task: \"{}\" with {} priority",
            task.title,
            task.priority.as_str()
        );

        Ok(ToolOutput::text(summary)
            .with_structured(json!({ "task": task, "action": "created" }))
            .with_widget(widgets::TASK_DETAILS))
    }
}

// ============================================================================
// update_task
// ============================================================================

/// Partial update of a task; the result renders as the task-details widget.
pub struct UpdateTask {
    manager: Arc<TaskManager>,
}

impl UpdateTask {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for UpdateTask {
    fn name(&self) -> &str {
        "update_task"
    }

    fn description(&self) -> &str {
        "Update fields of an existing task"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Unique identifier for the task"
                },
                "title": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": TITLE_MAX,
                    "description": "New task title"
                },
                "description": {
                    "type": "string",
                    "maxLength": DESCRIPTION_MAX,
                    "description": "New task description"
                },
                "status": {
                    "type": "string",
                    "enum": ["pending", "in_progress", "completed"],
                    "description": "New task status"
                },
                "priority": {
                    "type": "string",
                    "enum": ["low", "medium", "high"],
                    "description": "New task priority"
                },
                "due_date": {
                    "type": ["string", "null"],
                    "description": "New due date in ISO format; null clears it"
                },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Replacement tag list"
                }
            },
            "required": ["id"]
        })
    }

    fn widget(&self) -> Option<&'static str> {
        Some(widgets::TASK_DETAILS)
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let id = args
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Missing 'id' argument"))?
            .to_string();
        let patch = parse_patch(&args)?;

        let task = self
            .manager
            .update(&id, patch)
            .ok_or_else(|| anyhow!("Task not found: {}", id))?;

        Ok(
            ToolOutput::text(format!("Updated task: \"{}\"", task.title))
                .with_structured(json!({ "task": task, "action": "updated" }))
                .with_widget(widgets::TASK_DETAILS),
        )
    }
}

/// Build the update patch, distinguishing absent `due_date` (keep) from an
/// explicit null (clear).
fn parse_patch(args: &Value) -> anyhow::Result<TaskPatch> {
    let mut patch = TaskPatch::default();

    if let Some(value) = args.get("title") {
        let title: String = serde_json::from_value(value.clone())?;
        validate_title(&title)?;
        patch.title = Some(title);
    }
    if let Some(value) = args.get("description") {
        let description: String = serde_json::from_value(value.clone())?;
        validate_description(&description)?;
        patch.description = Some(description);
    }
    if let Some(value) = args.get("status") {
        patch.status = Some(serde_json::from_value::<TaskStatus>(value.clone())?);
    }
    if let Some(value) = args.get("priority") {
        patch.priority = Some(serde_json::from_value::<Priority>(value.clone())?);
    }
    patch.due_date = match args.get("due_date") {
        None => Patch::Keep,
        Some(Value::Null) => Patch::Clear,
        Some(value) => Patch::Set(serde_json::from_value::<DateTime<Utc>>(value.clone())?),
    };
    if let Some(value) = args.get("tags") {
        patch.tags = Some(serde_json::from_value::<Vec<String>>(value.clone())?);
    }

    Ok(patch)
}

// ============================================================================
// delete_task
// ============================================================================

/// Delete a task. The confirm gate lives here, not in the core: without
/// `confirm: true` the handler only reports what would be deleted.
pub struct DeleteTask {
    manager: Arc<TaskManager>,
}

impl DeleteTask {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self { manager }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    id: String,
    #[serde(default)]
    confirm: bool,
}

#[async_trait]
impl Tool for DeleteTask {
    fn name(&self) -> &str {
        "delete_task"
    }

    fn description(&self) -> &str {
        "Delete a task permanently. Requires confirm: true to take effect."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Unique identifier for the task"
                },
                "confirm": {
                    "type": "boolean",
                    "default": false,
                    "description": "Must be true to actually delete the task"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let args: DeleteArgs = serde_json::from_value(args)?;

        if !args.confirm {
            let task = self
                .manager
                .find(&args.id)
                .ok_or_else(|| anyhow!("Task not found: {}", args.id))?;
            return Ok(ToolOutput::text(format!(
                "This will permanently delete \"{}\" ({}). Call again with confirm: true to proceed.",
                task.title, task.id
            )));
        }

        if !self.manager.delete(&args.id) {
            bail!("Task not found: {}", args.id);
        }

        Ok(ToolOutput::text(format!("Deleted task {}", args.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn manager() -> Arc<TaskManager> {
        Arc::new(TaskManager::new(Arc::new(InMemoryStore::seeded(Utc::now()))))
    }

    #[tokio::test]
    async fn test_list_returns_structured_content() {
        let output = ListTasks::new(manager())
            .execute(json!({ "status": "pending" }))
            .await
            .unwrap();

        assert_eq!(output.text, "Found 1 task(s)");
        assert_eq!(output.widget, Some(widgets::TASK_LIST));
        let content = output.structured_content.unwrap();
        assert_eq!(content["tasks"][0]["id"], "task-002");
        assert_eq!(content["filter"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_list_with_no_matches_has_no_widget() {
        let output = ListTasks::new(manager())
            .execute(json!({ "status": "completed", "priority": "high" }))
            .await
            .unwrap();

        assert_eq!(output.text, "No tasks found with the specified filters.");
        assert!(output.structured_content.is_none());
        assert!(output.widget.is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_out_of_range_limit() {
        assert!(ListTasks::new(manager())
            .execute(json!({ "limit": 0 }))
            .await
            .is_err());
        assert!(ListTasks::new(manager())
            .execute(json!({ "limit": 500 }))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let manager = manager();
        let output = CreateTask::new(manager.clone())
            .execute(json!({ "title": "Write launch notes" }))
            .await
            .unwrap();

        assert_eq!(
            output.text,
            "Created task: \"Write launch notes\" with medium priority"
        );
        let content = output.structured_content.unwrap();
        assert_eq!(content["action"], "created");
        assert_eq!(content["task"]["status"], "pending");
        assert_eq!(manager.tasks(&TaskFilter::default()).len(), 4);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_titles() {
        let tool = CreateTask::new(manager());
        assert!(tool.execute(json!({ "title": "" })).await.is_err());
        let long = "x".repeat(TITLE_MAX + 1);
        assert!(tool.execute(json!({ "title": long })).await.is_err());
    }

    #[tokio::test]
    async fn test_update_clears_due_date_on_null() {
        let manager = manager();
        let output = UpdateTask::new(manager.clone())
            .execute(json!({ "id": "task-001", "due_date": null, "status": "completed" }))
            .await
            .unwrap();

        let content = output.structured_content.unwrap();
        assert_eq!(content["action"], "updated");
        let task = manager.find("task-001").unwrap();
        assert!(task.due_date.is_none());
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_keeps_due_date_when_absent() {
        let manager = manager();
        UpdateTask::new(manager.clone())
            .execute(json!({ "id": "task-001", "title": "Renamed" }))
            .await
            .unwrap();

        let task = manager.find("task-001").unwrap();
        assert_eq!(task.title, "Renamed");
        assert!(task.due_date.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_an_error() {
        assert!(UpdateTask::new(manager())
            .execute(json!({ "id": "task-404", "title": "x" }))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let manager = manager();
        let tool = DeleteTask::new(manager.clone());

        let preview = tool.execute(json!({ "id": "task-003" })).await.unwrap();
        assert!(preview.text.contains("confirm: true"));
        assert!(manager.find("task-003").is_some());

        let done = tool
            .execute(json!({ "id": "task-003", "confirm": true }))
            .await
            .unwrap();
        assert_eq!(done.text, "Deleted task task-003");
        assert!(manager.find("task-003").is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_an_error() {
        assert!(DeleteTask::new(manager())
            .execute(json!({ "id": "task-404", "confirm": true }))
            .await
            .is_err());
    }
}
