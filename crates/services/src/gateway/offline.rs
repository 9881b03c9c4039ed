use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use redshift_core::model::{CourseProgress, DashboardSnapshot, Student, Task, TaskStatus};

use super::{RemoteGateway, TaskSubmission};
use crate::error::GatewayError;

/// The only passcode the offline gateway accepts.
pub const OFFLINE_PASSCODE: &str = "1234";

const DEMO_STUDENT: &str = "Alex V.";
const DEMO_COHORT: &str = "Batch 24";
const DEMO_TOPIC: &str = "Advanced React Patterns & Optimization";

/// Stand-in backend used when no script URL is configured.
///
/// Accepts [`OFFLINE_PASSCODE`] for any name and serves a fixed demo week;
/// every submission comes back `Submitted`.
#[derive(Debug, Clone, Default)]
pub struct OfflineGateway {
    latency: Duration,
}

impl OfflineGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` to mimic a network round trip.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl RemoteGateway for OfflineGateway {
    async fn login(
        &self,
        name: &str,
        passcode: &str,
    ) -> Result<Option<DashboardSnapshot>, GatewayError> {
        info!("no script URL configured, serving demo data");
        self.simulate_latency().await;
        if passcode != OFFLINE_PASSCODE {
            return Ok(None);
        }
        Ok(Some(demo_snapshot(name)))
    }

    async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskStatus, GatewayError> {
        info!(task = %submission.task_id, "demo submission accepted");
        self.simulate_latency().await;
        Ok(TaskStatus::Submitted)
    }
}

/// Fixed four-task week for `student_name` (a blank name gets the demo student).
#[must_use]
pub fn demo_snapshot(student_name: &str) -> DashboardSnapshot {
    let name = if student_name.trim().is_empty() {
        DEMO_STUDENT
    } else {
        student_name
    };

    let tasks = vec![
        Task::new("t1", "Project Setup & Environment", TaskStatus::Checked)
            .with_description("Initialize repository.")
            .with_reference_links(vec!["https://react.dev".into()])
            .with_learning_materials(vec!["Intro to React".into()])
            .with_week(3),
        Task::new("t2", "Component Architecture", TaskStatus::Live)
            .with_description("Draft component hierarchy.")
            .with_week(3),
        Task::new("t3", "Context API Implementation", TaskStatus::Redo)
            .with_description("Fix the re-render issues.")
            .with_week(3),
        Task::new("t4", "Performance Hooks", TaskStatus::Locked)
            .with_description("Use useMemo and useCallback effectively.")
            .with_week(3),
    ];
    let progress = CourseProgress::derive(3, 1, 12, 3, &tasks);

    DashboardSnapshot::new(Student::new(name, DEMO_COHORT), tasks, progress, DEMO_TOPIC)
}
