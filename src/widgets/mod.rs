//! Presentational widget catalog.
//!
//! Widgets are self-contained HTML documents served as protocol resources
//! and bound to tools through the `openai/outputTemplate` metadata key.
//! They render the structured content of their tool and hold no logic of
//! their own.

use serde_json::{json, Value};

use crate::protocol::{ResourceContents, ResourceDescriptor};

pub const TASK_LIST: &str = "task-list";
pub const TASK_DETAILS: &str = "task-details";
pub const PRODUCTIVITY_STATS: &str = "productivity-stats";

const MIME_TYPE: &str = "text/html";

/// One widget template.
pub struct Widget {
    pub template: &'static str,
    pub title: &'static str,
    pub html: &'static str,
}

pub const ALL: [Widget; 3] = [
    Widget {
        template: TASK_LIST,
        title: "Task List",
        html: include_str!("task-list.html"),
    },
    Widget {
        template: TASK_DETAILS,
        title: "Task Details",
        html: include_str!("task-details.html"),
    },
    Widget {
        template: PRODUCTIVITY_STATS,
        title: "Productivity Stats",
        html: include_str!("productivity-stats.html"),
    },
];

pub fn uri(template: &str) -> String {
    format!("ui://widget/{}.html", template)
}

/// `_meta` attached to a tool definition that can render as `template`.
pub fn tool_meta(template: &str) -> Value {
    json!({
        "openai/outputTemplate": template,
        "openai/resultCanProduceWidget": true,
    })
}

/// `_meta` attached to a tool result rendered as `template`.
pub fn result_meta(template: &str) -> Value {
    json!({ "openai/outputTemplate": template })
}

/// Descriptors for `resources/list`.
pub fn descriptors() -> Vec<ResourceDescriptor> {
    ALL.iter()
        .map(|widget| ResourceDescriptor {
            uri: uri(widget.template),
            name: widget.title.to_string(),
            description: None,
            mime_type: MIME_TYPE.to_string(),
        })
        .collect()
}

/// Resolve a `resources/read` uri to its contents.
pub fn read(uri_str: &str) -> Option<ResourceContents> {
    ALL.iter()
        .find(|widget| uri(widget.template) == uri_str)
        .map(|widget| ResourceContents {
            uri: uri_str.to_string(),
            mime_type: MIME_TYPE.to_string(),
            text: widget.html.to_string(),
        })
}
