#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod session_store;

pub use redshift_core::Clock;

pub use app_services::DashboardServices;
pub use config::{DashboardConfig, GatewayConfig, build_gateway};
pub use dashboard::{BootstrapOutcome, DashboardController, DashboardPhase, SubmitOutcome};
pub use error::{AppServicesError, DashboardError, GatewayError, SessionStoreError};
pub use gateway::{OfflineGateway, RemoteGateway, SheetGateway, TaskSubmission};
pub use session_store::{SESSION_KEY, SessionRecord, SessionStore};
