use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use redshift_core::model::{DashboardSnapshot, TaskId, TaskStatus};

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPhase {
    /// Startup session check still running.
    CheckingSession,
    Unauthenticated,
    /// Signed in; the snapshot always travels with the phase.
    Authenticated(Arc<DashboardSnapshot>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Login,
    Submit,
}

#[derive(Debug, Default)]
pub(crate) struct DashboardState {
    pub checking_session: bool,
    /// Current snapshot with the generation of the login that produced it.
    pub current: Option<(Arc<DashboardSnapshot>, u64)>,
    pub generation: u64,
    pub target: Option<TaskId>,
    pub login_in_flight: bool,
    pub submit_in_flight: bool,
}

impl DashboardState {
    pub fn starting() -> Self {
        Self {
            checking_session: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> DashboardPhase {
        match (&self.current, self.checking_session) {
            (Some((snapshot, _)), _) => DashboardPhase::Authenticated(Arc::clone(snapshot)),
            (None, true) => DashboardPhase::CheckingSession,
            (None, false) => DashboardPhase::Unauthenticated,
        }
    }

    fn in_flight(&mut self, op: Operation) -> &mut bool {
        match op {
            Operation::Login => &mut self.login_in_flight,
            Operation::Submit => &mut self.submit_in_flight,
        }
    }

    /// Installs a freshly logged-in snapshot, replacing whatever was there.
    pub fn install(&mut self, snapshot: DashboardSnapshot) -> u64 {
        self.generation += 1;
        self.current = Some((Arc::new(snapshot), self.generation));
        self.target = None;
        self.generation
    }

    /// Swaps in `status` for task `id` if `generation` is still current and
    /// still contains the task. Returns whether a swap happened.
    pub fn replace_status(&mut self, generation: u64, id: &TaskId, status: TaskStatus) -> bool {
        let Some((snapshot, current_gen)) = &self.current else {
            return false;
        };
        if *current_gen != generation {
            return false;
        }
        let Some(updated) = snapshot.with_task_status(id, status) else {
            return false;
        };
        self.current = Some((Arc::new(updated), generation));
        true
    }

    /// Clears the submission target if it still points at `id` in `generation`.
    pub fn release_target(&mut self, generation: u64, id: &TaskId) {
        let same_generation = matches!(&self.current, Some((_, g)) if *g == generation);
        if same_generation && self.target.as_ref() == Some(id) {
            self.target = None;
        }
    }
}

/// Locks the state, recovering the data if an earlier holder panicked.
pub(crate) fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds an operation class's in-flight flag and releases it on drop.
pub(crate) struct FlightGuard<'a> {
    state: &'a Mutex<DashboardState>,
    op: Operation,
}

impl<'a> FlightGuard<'a> {
    /// Marks `op` as in flight; `None` if it already was.
    pub fn acquire(state: &'a Mutex<DashboardState>, op: Operation) -> Option<Self> {
        let mut guard = lock(state);
        let flag = guard.in_flight(op);
        if *flag {
            return None;
        }
        *flag = true;
        Some(Self { state, op })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state).in_flight(self.op) = false;
    }
}

/// Clears the "checking session" flag when dropped, however bootstrap ends.
pub(crate) struct CheckingGuard<'a> {
    state: &'a Mutex<DashboardState>,
}

impl<'a> CheckingGuard<'a> {
    pub fn new(state: &'a Mutex<DashboardState>) -> Self {
        Self { state }
    }
}

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).checking_session = false;
    }
}
