//! Task entity.

use crate::model::entity::{
    deserialize_loose_ref, require_text, Entity, EntityId, EntityKind, Record, ValidationError,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type TaskRecord = Record<Task>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Entity kinds a task may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelatedKind {
    Contact,
    Company,
    Lead,
}

impl RelatedKind {
    /// Parses the wire label; blank or unknown text yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Contact" => Some(Self::Contact),
            "Company" => Some(Self::Company),
            "Lead" => Some(Self::Lead),
            _ => None,
        }
    }
}

/// Loose reference from a task to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelatedRef {
    #[serde(rename = "relatedTo")]
    pub kind: RelatedKind,
    #[serde(rename = "relatedId")]
    pub id: EntityId,
}

/// Due dates are written as naive date-times; reads also accept RFC 3339
/// (`2024-06-10T09:30:00.000Z`, converted to UTC) and bare dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TaskWire")]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub related: Option<RelatedRef>,
}

/// Inbound task shape. `relatedTo`/`relatedId` form a relation only when
/// both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskWire {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "deserialize_due_date")]
    due_date: NaiveDateTime,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    related_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_ref")]
    related_id: Option<EntityId>,
}

impl From<TaskWire> for Task {
    fn from(wire: TaskWire) -> Self {
        let kind = wire.related_to.as_deref().and_then(RelatedKind::from_label);
        let related = match (kind, wire.related_id) {
            (Some(kind), Some(id)) => Some(RelatedRef { kind, id }),
            _ => None,
        };
        Self {
            title: wire.title,
            description: wire.description,
            due_date: wire.due_date,
            priority: wire.priority,
            status: wire.status,
            related,
        }
    }
}

/// Parses a due date from RFC 3339, a naive date-time, or a bare date
/// (start of day).
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.naive_utc());
    }
    if let Ok(naive) = trimmed.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    trimmed
        .parse::<NaiveDate>()
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid due date `{raw}`")))
}

impl Task {
    /// Pending, medium-priority task with no relation.
    pub fn new(title: impl Into<String>, due_date: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            related: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Status after a completion toggle: completed tasks reopen as pending,
    /// everything else becomes completed.
    pub fn toggled_status(&self) -> TaskStatus {
        if self.is_completed() {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub related: Option<Option<RelatedRef>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    type Patch = TaskPatch;

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(related) = patch.related {
            self.related = related;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}
