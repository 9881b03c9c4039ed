use serde::{Deserialize, Serialize};

use crate::model::{CourseProgress, Task, TaskId, TaskStatus};

pub const UNKNOWN_STUDENT: &str = "Unknown Student";
pub const UNKNOWN_COHORT: &str = "Unknown Cohort";
pub const DEFAULT_TOPIC: &str = "General";

/// The signed-in student. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub cohort: String,
}

impl Student {
    #[must_use]
    pub fn new(name: impl Into<String>, cohort: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cohort: cohort.into(),
        }
    }
}

impl Default for Student {
    fn default() -> Self {
        Self::new(UNKNOWN_STUDENT, UNKNOWN_COHORT)
    }
}

/// Everything the dashboard shows at one point in time.
///
/// Snapshots are values: every state change builds a new one and the holder
/// swaps it in whole. Progress counters always agree with `tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    student: Student,
    tasks: Vec<Task>,
    progress: CourseProgress,
    current_topic: String,
}

impl DashboardSnapshot {
    /// Builds a snapshot, recounting `progress` from `tasks`.
    #[must_use]
    pub fn new(
        student: Student,
        tasks: Vec<Task>,
        progress: CourseProgress,
        current_topic: impl Into<String>,
    ) -> Self {
        let progress = progress.recount(&tasks);
        Self {
            student,
            tasks,
            progress,
            current_topic: current_topic.into(),
        }
    }

    #[must_use]
    pub fn student(&self) -> &Student {
        &self.student
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn progress(&self) -> &CourseProgress {
        &self.progress
    }

    #[must_use]
    pub fn current_topic(&self) -> &str {
        &self.current_topic
    }

    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Returns a new snapshot where only task `id` carries `status`.
    ///
    /// Order of the task list is preserved and progress is recounted.
    /// Returns `None` if no task with that id exists.
    #[must_use]
    pub fn with_task_status(&self, id: &TaskId, status: TaskStatus) -> Option<Self> {
        self.task(id)?;
        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .map(|task| {
                if &task.id == id {
                    task.with_status(status)
                } else {
                    task.clone()
                }
            })
            .collect();
        Some(Self::new(
            self.student.clone(),
            tasks,
            self.progress,
            self.current_topic.clone(),
        ))
    }
}
