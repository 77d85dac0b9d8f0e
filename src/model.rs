//! Core task types shared by the store, the derivation engines, and the
//! tool handlers.
//!
//! # Invariants
//! - `Task::id` is unique within a store
//! - `Task::updated_at >= Task::created_at`
//! - Status transitions are unconstrained: any status may follow any other

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Urgency of a task. Required at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Fixed presentation order for priority breakdowns.
    pub const DESCENDING: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort weight used by the query engine. High outranks low.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// One unit of trackable work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Case-insensitive substring match over title, description, and tags.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_ref()
                .map_or(false, |d| d.to_lowercase().contains(needle))
            || self
                .tags
                .as_ref()
                .map_or(false, |tags| tags.iter().any(|t| t.to_lowercase().contains(needle)))
    }
}

/// Status constraint of a filter specification. `All` disables the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::InProgress => status == TaskStatus::InProgress,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }
}

/// Priority constraint of a filter specification. `All` disables the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => priority == Priority::Low,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::High => priority == Priority::High,
        }
    }
}

/// A request for a subset of tasks. Empty filters yield the full set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub priority: PriorityFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Input for task creation. Status is not accepted: new tasks start pending.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Tri-state update for a clearable field.
///
/// Distinguishes "leave unchanged" (field absent on the wire) from
/// "clear" (explicit null) from "replace".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

/// Partial update merged onto an existing task.
///
/// All fields replace their current value when present; only `due_date`
/// supports clearing.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Patch<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date == Patch::Keep
            && self.tags.is_none()
    }
}

/// Named lookback window bounding aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    #[default]
    Week,
    Month,
    Year,
}

impl Period {
    /// Number of days the period spans when sampling per-day series.
    pub fn sample_days(&self) -> usize {
        match self {
            Period::Today => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

/// Aggregate counts for a time period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Percentage of windowed tasks that are completed, rounded.
    /// 0 for an empty window.
    pub completion_rate: u32,
    /// Mean days from creation to last update across completed tasks in the
    /// window, rounded. 0 when none are completed.
    pub avg_completion_time: i64,
}

/// Occurrence count for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Task count for one priority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

/// Supplementary productivity breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityData {
    pub daily_completed: Vec<u32>,
    pub tags_distribution: Vec<TagCount>,
    pub priority_breakdown: Vec<PriorityCount>,
    pub overdue_count: usize,
    pub upcoming_count: usize,
}
