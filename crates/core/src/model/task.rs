use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::TaskStatus;

/// Identifier of a task, unique within one snapshot.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One weekly assignment as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub reference_links: Vec<String>,
    pub learning_materials: Vec<String>,
    pub status: TaskStatus,
    pub week_id: u32,
}

impl Task {
    #[must_use]
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            reference_links: Vec::new(),
            learning_materials: Vec::new(),
            status,
            week_id: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_reference_links(mut self, links: Vec<String>) -> Self {
        self.reference_links = links;
        self
    }

    #[must_use]
    pub fn with_learning_materials(mut self, materials: Vec<String>) -> Self {
        self.learning_materials = materials;
        self
    }

    #[must_use]
    pub fn with_week(mut self, week_id: u32) -> Self {
        self.week_id = week_id;
        self
    }

    /// Full-record replace of the status; every other field is carried over.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Counts tasks whose status counts toward weekly completion.
#[must_use]
pub fn count_completed(tasks: &[Task]) -> u32 {
    let count = tasks
        .iter()
        .filter(|task| task.status.counts_as_completed())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
