//! The `get_productivity_stats` tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolOutput};
use crate::manager::TaskManager;
use crate::model::Period;
use crate::widgets;

/// Period-windowed statistics plus productivity breakdowns, rendered by the
/// productivity-stats widget.
pub struct ProductivityStats {
    manager: Arc<TaskManager>,
}

impl ProductivityStats {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self { manager }
    }
}

#[derive(Debug, Deserialize)]
struct StatsArgs {
    #[serde(default)]
    period: Period,
}

#[async_trait]
impl Tool for ProductivityStats {
    fn name(&self) -> &str {
        "get_productivity_stats"
    }

    fn description(&self) -> &str {
        "Get productivity metrics and statistics"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "period": {
                    "type": "string",
                    "enum": ["today", "week", "month", "year"],
                    "default": "week",
                    "description": "Time period for statistics"
                }
            }
        })
    }

    fn widget(&self) -> Option<&'static str> {
        Some(widgets::PRODUCTIVITY_STATS)
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let args: StatsArgs = serde_json::from_value(args)?;

        let stats = self.manager.stats(args.period);
        let productivity = self.manager.productivity(args.period);

        let summary = format!(
            "Productivity stats for {}: {} completed, {} in progress, {} pending",
            args.period.as_str(),
            stats.completed,
            stats.in_progress,
            stats.pending
        );

        Ok(ToolOutput::text(summary)
            .with_structured(json!({
                "stats": stats,
                "productivity": productivity,
                "period": args.period,
            }))
            .with_widget(widgets::PRODUCTIVITY_STATS))
    }
}
