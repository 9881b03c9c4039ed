//! Shared error types for the services crate.

use thiserror::Error;

use redshift_core::model::{TaskId, TaskStatus};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failures talking to the remote sheet backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("gateway request timed out")]
    Timeout,
    #[error("gateway request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(reqwest::Error),
    #[error("malformed gateway response: {0}")]
    Malformed(String),
    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Errors emitted by `SessionStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    /// The persisted record could not be read back. Never surfaced by `load`.
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardController` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("invalid identity or passcode")]
    InvalidCredentials,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("another operation of this kind is already in flight")]
    Busy,
    #[error("submission text cannot be empty")]
    EmptySubmission,
    #[error("task {0} is not on the dashboard")]
    UnknownTask(TaskId),
    #[error("task in status {0} does not accept submissions")]
    NotSubmittable(TaskStatus),
}

impl DashboardError {
    /// Copy shown to the student for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::InvalidCredentials => "Access Denied: Invalid Identity or Passcode.",
            DashboardError::Gateway(_) => "Connection Error: Unable to verify credentials.",
            DashboardError::Busy => "Please wait for the current request to finish.",
            DashboardError::EmptySubmission => "Add your work before submitting.",
            DashboardError::UnknownTask(_) => "This task is no longer available.",
            DashboardError::NotSubmittable(TaskStatus::Checked) => {
                "This task has been verified by your educator."
            }
            DashboardError::NotSubmittable(_) => "This task is not open yet.",
        }
    }
}

/// Errors emitted while bootstrapping dashboard services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
