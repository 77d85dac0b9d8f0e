//! Tool handlers registered with the protocol server.
//!
//! Each tool validates its arguments against the schema it advertises,
//! calls into the task manager, and formats the outcome as a human-readable
//! summary plus optional structured content for the widget layer.

mod fetch;
mod search;
mod stats;
mod tasks;

pub use fetch::FetchTask;
pub use search::SearchTasks;
pub use stats::ProductivityStats;
pub use tasks::{CreateTask, DeleteTask, ListTasks, UpdateTask};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::manager::TaskManager;
use crate::protocol::{ToolContent, ToolDefinition, ToolResult};
use crate::widgets;

/// What a tool hands back to the protocol layer on success.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub structured_content: Option<Value>,
    pub widget: Option<&'static str>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured_content: None,
            widget: None,
        }
    }

    pub fn with_structured(mut self, content: Value) -> Self {
        self.structured_content = Some(content);
        self
    }

    pub fn with_widget(mut self, template: &'static str) -> Self {
        self.widget = Some(template);
        self
    }
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Widget template bound to this tool's results, if any.
    fn widget(&self) -> Option<&'static str> {
        None
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput>;
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with every tool the server registers.
    pub fn new(manager: Arc<TaskManager>, config: &Config) -> Self {
        let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();

        // Connector discovery tools
        tools.insert(
            "search".to_string(),
            Arc::new(SearchTasks::new(
                manager.clone(),
                config.widget_base_url.clone(),
            )),
        );
        tools.insert(
            "fetch".to_string(),
            Arc::new(FetchTask::new(
                manager.clone(),
                config.widget_base_url.clone(),
            )),
        );

        // Task management
        tools.insert(
            "list_tasks".to_string(),
            Arc::new(ListTasks::new(manager.clone())),
        );
        tools.insert(
            "create_task".to_string(),
            Arc::new(CreateTask::new(manager.clone())),
        );
        tools.insert(
            "update_task".to_string(),
            Arc::new(UpdateTask::new(manager.clone())),
        );
        tools.insert(
            "delete_task".to_string(),
            Arc::new(DeleteTask::new(manager.clone())),
        );

        // Aggregation
        tools.insert(
            "get_productivity_stats".to_string(),
            Arc::new(ProductivityStats::new(manager)),
        );

        tracing::debug!("tool registry ready with {} tools", tools.len());
        Self { tools }
    }

    /// Tool definitions for `tools/list`, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters_schema(),
                meta: tool.widget().map(widgets::tool_meta),
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Check if a tool exists by name.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Execute a tool by name, converting handler errors into error results.
    pub async fn execute(&self, name: &str, args: Value) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            return error_result(format!("Unknown tool: {}", name));
        };

        match tool.execute(args).await {
            Ok(output) => ToolResult {
                content: vec![ToolContent::Text { text: output.text }],
                structured_content: output.structured_content,
                meta: output.widget.map(widgets::result_meta),
                is_error: false,
            },
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool execution failed");
                error_result(format!("Tool error: {}", e))
            }
        }
    }
}

fn error_result(text: String) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text { text }],
        structured_content: None,
        meta: None,
        is_error: true,
    }
}
