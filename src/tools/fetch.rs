//! The `fetch` tool: full connector document for one task.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::search::task_url;
use super::{Tool, ToolOutput};
use crate::manager::TaskManager;
use crate::model::Task;

/// Fetch one task by id as a JSON-encoded document with a multi-line
/// human-readable rendering. Unknown ids yield a well-formed "not found"
/// document instead of an error.
pub struct FetchTask {
    manager: Arc<TaskManager>,
    widget_base_url: String,
}

impl FetchTask {
    pub fn new(manager: Arc<TaskManager>, widget_base_url: String) -> Self {
        Self {
            manager,
            widget_base_url,
        }
    }
}

#[async_trait]
impl Tool for FetchTask {
    fn name(&self) -> &str {
        "fetch"
    }

    fn description(&self) -> &str {
        "Fetch detailed information about a specific task"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Unique identifier for the task"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let id = args
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Missing 'id' argument"))?;

        let document = match self.manager.find(id) {
            Some(task) => json!({
                "id": task.id,
                "title": task.title,
                "text": render_task(&task),
                "url": task_url(&self.widget_base_url, &task.id),
                "metadata": {
                    "status": task.status,
                    "priority": task.priority,
                    "tags": task.tags,
                    "source": "task_management_system",
                },
            }),
            None => json!({
                "id": id,
                "title": "Task not found",
                "text": "The requested task could not be found.",
                "url": task_url(&self.widget_base_url, id),
                "metadata": { "error": "not_found" },
            }),
        };

        Ok(ToolOutput::text(document.to_string()))
    }
}

fn render_task(task: &Task) -> String {
    format!(
        "Task: {}\n\
         Description: {}\n\
         Status: {}\n\
         Priority: {}\n\
         Due Date: {}\n\
         Tags: {}\n\
         Created: {}\n\
         Last Updated: {}",
        task.title,
        task.description.as_deref().unwrap_or("No description"),
        task.status.as_str(),
        task.priority.as_str(),
        task.due_date
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "No due date".to_string()),
        task.tags
            .as_ref()
            .map(|tags| tags.join(", "))
            .unwrap_or_else(|| "No tags".to_string()),
        task.created_at.format("%Y-%m-%d"),
        task.updated_at.format("%Y-%m-%d"),
    )
}
