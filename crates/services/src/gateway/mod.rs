//! Access to the spreadsheet-backed remote store.

mod http;
mod normalize;
mod offline;
mod wire;

use async_trait::async_trait;

use redshift_core::model::{DashboardSnapshot, TaskId, TaskStatus};

use crate::error::GatewayError;

pub use http::SheetGateway;
pub use normalize::{normalize_login_payload, split_list};
pub use offline::{OFFLINE_PASSCODE, OfflineGateway, demo_snapshot};

/// Payload of one task submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSubmission {
    pub task_id: TaskId,
    pub content: String,
    pub student_name: String,
    pub task_title: String,
}

/// Login and submit against the remote backend.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Check credentials and fetch the student's dashboard.
    ///
    /// Returns `Ok(None)` when the backend rejects the name/passcode pair.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or an unreadable response.
    async fn login(
        &self,
        name: &str,
        passcode: &str,
    ) -> Result<Option<DashboardSnapshot>, GatewayError>;

    /// Send a submission and return the status the backend assigned.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, rejection, or an
    /// unreadable response.
    async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskStatus, GatewayError>;
}
