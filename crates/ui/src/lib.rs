//! Presentation data for the learner dashboard.
//!
//! Renderers read these view models; nothing here draws anything.
#![forbid(unsafe_code)]

pub mod vm;

pub use vm::{DashboardVm, LoginVm, Screen, SubmissionModalVm, TaskCardVm, map_screen};
