//! The `search` tool: connector-style discovery over the task collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolOutput};
use crate::manager::TaskManager;

/// Free-text search returning connector documents (id, title, url) as a
/// JSON-encoded text payload.
pub struct SearchTasks {
    manager: Arc<TaskManager>,
    widget_base_url: String,
}

impl SearchTasks {
    pub fn new(manager: Arc<TaskManager>, widget_base_url: String) -> Self {
        Self {
            manager,
            widget_base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[async_trait]
impl Tool for SearchTasks {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search through tasks and productivity data"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query for tasks"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        // A malformed query degrades to an empty result set with an error
        // marker rather than a protocol error.
        let args: SearchArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(_) => {
                return Ok(ToolOutput::text(
                    json!({ "results": [], "error": "Search failed" }).to_string(),
                ))
            }
        };

        let results: Vec<Value> = self
            .manager
            .search(&args.query)
            .into_iter()
            .map(|task| {
                json!({
                    "id": task.id,
                    "title": task.title,
                    "url": task_url(&self.widget_base_url, &task.id),
                })
            })
            .collect();

        Ok(ToolOutput::text(json!({ "results": results }).to_string()))
    }
}

/// Deep link into the task-details widget for a connector document.
pub(crate) fn task_url(base_url: &str, id: &str) -> String {
    format!("{}/widgets/task-details?id={}", base_url, id)
}
