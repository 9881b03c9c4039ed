mod controller;
mod state;

// Public API of the dashboard subsystem.
pub use crate::error::DashboardError;
pub use controller::{BootstrapOutcome, DashboardController, SubmitOutcome};
pub use state::DashboardPhase;
