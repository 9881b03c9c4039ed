use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use redshift_core::model::{DashboardSnapshot, SubmissionDraft, Task, TaskId, TaskStatus};

use super::state::{CheckingGuard, DashboardPhase, DashboardState, FlightGuard, Operation, lock};
use crate::error::DashboardError;
use crate::gateway::{RemoteGateway, TaskSubmission};
use crate::session_store::SessionStore;

/// How startup session restoration ended.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// No valid saved session (none stored, unreadable, or expired).
    NoSession,
    /// The saved credentials logged in again.
    Restored,
    /// The backend no longer accepts the saved credentials.
    ReplayRejected,
    /// The replayed login could not reach the backend.
    ReplayFailed(DashboardError),
}

/// Result of a submission that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing targeted, not signed in, or the target left the dashboard.
    Skipped,
    /// The backend agreed with the optimistic status.
    Confirmed(TaskStatus),
    /// The backend returned a different status. `applied` is false when the
    /// snapshot changed underneath and the correction was dropped.
    Reconciled {
        optimistic: TaskStatus,
        confirmed: TaskStatus,
        applied: bool,
    },
}

/// Owns the dashboard's single snapshot and runs login, bootstrap and submit.
///
/// Operations take `&self`; state lives behind a mutex that is never held
/// across an await, so readers always see either the old or the new snapshot.
/// One login (or bootstrap) and one submission may be in flight at a time;
/// a second call of the same kind fails with `DashboardError::Busy`.
pub struct DashboardController {
    gateway: Arc<dyn RemoteGateway>,
    sessions: SessionStore,
    state: Mutex<DashboardState>,
}

impl DashboardController {
    /// A controller in the "checking session" phase, waiting for [`Self::bootstrap`].
    #[must_use]
    pub fn new(gateway: Arc<dyn RemoteGateway>, sessions: SessionStore) -> Self {
        Self {
            gateway,
            sessions,
            state: Mutex::new(DashboardState::starting()),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn phase(&self) -> DashboardPhase {
        lock(&self.state).phase()
    }

    #[must_use]
    pub fn is_checking_session(&self) -> bool {
        lock(&self.state).checking_session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).current.is_some()
    }

    /// The current snapshot, if signed in.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        lock(&self.state)
            .current
            .as_ref()
            .map(|(snapshot, _)| Arc::clone(snapshot))
    }

    /// The task currently targeted for submission, as it stands in the current snapshot.
    #[must_use]
    pub fn submission_target(&self) -> Option<Task> {
        let state = lock(&self.state);
        let target = state.target.as_ref()?;
        let (snapshot, _) = state.current.as_ref()?;
        snapshot.task(target).cloned()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        lock(&self.state).submit_in_flight
    }

    #[must_use]
    pub fn is_logging_in(&self) -> bool {
        lock(&self.state).login_in_flight
    }

    /// Restore a saved session on startup.
    ///
    /// A valid saved session is replayed through [`Self::login`], which also
    /// writes a fresh expiry. A failed replay is not retried and leaves the
    /// stored record alone. The "checking session" flag is cleared exactly
    /// once when this returns.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let _checking = CheckingGuard::new(&self.state);

        let Some(record) = self.sessions.load().await else {
            debug!("no saved session");
            return BootstrapOutcome::NoSession;
        };

        info!(student = %record.name(), "replaying saved session");
        match self.login(record.name(), record.passcode()).await {
            Ok(()) => BootstrapOutcome::Restored,
            Err(DashboardError::InvalidCredentials) => BootstrapOutcome::ReplayRejected,
            Err(err) => BootstrapOutcome::ReplayFailed(err),
        }
    }

    /// Sign in and replace the dashboard with the student's data.
    ///
    /// On success the session is persisted with a fresh expiry; a failure to
    /// persist is logged and does not fail the login.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::InvalidCredentials` when the backend rejects
    /// the pair, `DashboardError::Gateway` when it cannot be reached, and
    /// `DashboardError::Busy` if a login is already running. State is left
    /// untouched on every error.
    pub async fn login(&self, name: &str, passcode: &str) -> Result<(), DashboardError> {
        let _flight =
            FlightGuard::acquire(&self.state, Operation::Login).ok_or(DashboardError::Busy)?;

        let snapshot = match self.gateway.login(name, passcode).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!(student = %name, "login denied");
                return Err(DashboardError::InvalidCredentials);
            }
            Err(err) => {
                warn!(student = %name, error = %err, "login failed");
                return Err(err.into());
            }
        };

        let generation = lock(&self.state).install(snapshot);
        info!(student = %name, generation, "logged in");

        if let Err(err) = self.sessions.save(name, passcode).await {
            warn!(error = %err, "could not persist session");
        }
        Ok(())
    }

    /// Target `id` for the next submission, replacing any previous target.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::UnknownTask` if the task is not on the
    /// current dashboard and `DashboardError::NotSubmittable` for checked or
    /// locked tasks.
    pub fn open_submission(&self, id: &TaskId) -> Result<Task, DashboardError> {
        let mut state = lock(&self.state);
        let task = state
            .current
            .as_ref()
            .and_then(|(snapshot, _)| snapshot.task(id))
            .cloned()
            .ok_or_else(|| DashboardError::UnknownTask(id.clone()))?;

        if !task.status.accepts_submission() {
            return Err(DashboardError::NotSubmittable(task.status));
        }
        state.target = Some(task.id.clone());
        Ok(task)
    }

    pub fn close_submission(&self) {
        lock(&self.state).target = None;
    }

    /// Submit `text` for the targeted task.
    ///
    /// The optimistic status is swapped into the snapshot before the request
    /// goes out. If the backend answers with a different status, that status
    /// replaces the optimistic one in whatever snapshot is current then, as
    /// long as it is still the same login's snapshot and still holds the task.
    /// A failed request keeps the optimistic status; there is no rollback.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::EmptySubmission` for blank text (state
    /// untouched), `DashboardError::Gateway` if the request fails, and
    /// `DashboardError::Busy` if a submission is already running.
    pub async fn submit_task(&self, text: &str) -> Result<SubmitOutcome, DashboardError> {
        let _flight =
            FlightGuard::acquire(&self.state, Operation::Submit).ok_or(DashboardError::Busy)?;

        let (task, optimistic, generation, student_name) = {
            let mut state = lock(&self.state);
            let Some(target) = state.target.clone() else {
                debug!("submit without a target");
                return Ok(SubmitOutcome::Skipped);
            };
            let Some((snapshot, generation)) = state.current.clone() else {
                debug!("submit while signed out");
                return Ok(SubmitOutcome::Skipped);
            };
            let Some(task) = snapshot.task(&target).cloned() else {
                debug!(task = %target, "submit target no longer on dashboard");
                return Ok(SubmitOutcome::Skipped);
            };
            if SubmissionDraft::new(text).is_err() {
                return Err(DashboardError::EmptySubmission);
            }

            let optimistic = task.status.next_on_submit();
            state.replace_status(generation, &task.id, optimistic);
            debug!(task = %task.id, from = %task.status, to = %optimistic, "optimistic update");
            (task, optimistic, generation, snapshot.student().name.clone())
        };

        let submission = TaskSubmission {
            task_id: task.id.clone(),
            content: text.to_string(),
            student_name,
            task_title: task.title.clone(),
        };

        let confirmed = match self.gateway.submit_task(&submission).await {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    task = %task.id,
                    error = %err,
                    "submission failed, keeping optimistic status"
                );
                return Err(err.into());
            }
        };

        let mut state = lock(&self.state);
        state.release_target(generation, &task.id);
        if confirmed == optimistic {
            return Ok(SubmitOutcome::Confirmed(confirmed));
        }

        let applied = state.replace_status(generation, &task.id, confirmed);
        if applied {
            info!(task = %task.id, %optimistic, %confirmed, "reconciled with backend status");
        } else {
            info!(task = %task.id, %confirmed, "dashboard changed before reconciliation, dropping");
        }
        Ok(SubmitOutcome::Reconciled {
            optimistic,
            confirmed,
            applied,
        })
    }
}
