use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::config::{DashboardConfig, build_gateway};
use crate::dashboard::DashboardController;
use crate::error::AppServicesError;
use crate::gateway::RemoteGateway;
use crate::session_store::SessionStore;

/// Assembles the app-facing dashboard services.
#[derive(Clone)]
pub struct DashboardServices {
    controller: Arc<DashboardController>,
    offline: bool,
}

impl DashboardServices {
    /// Build services backed by `SQLite` storage and the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or gateway setup fails.
    pub async fn new_sqlite(
        config: &DashboardConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        let gateway = build_gateway(&config.gateway)?;
        Ok(Self::assemble(
            &storage,
            gateway,
            clock,
            config,
            config.gateway.is_offline(),
        ))
    }

    /// Build services over in-memory storage with an explicit gateway.
    #[must_use]
    pub fn in_memory(gateway: Arc<dyn RemoteGateway>, clock: Clock) -> Self {
        Self::assemble(
            &Storage::in_memory(),
            gateway,
            clock,
            &DashboardConfig::default(),
            false,
        )
    }

    fn assemble(
        storage: &Storage,
        gateway: Arc<dyn RemoteGateway>,
        clock: Clock,
        config: &DashboardConfig,
        offline: bool,
    ) -> Self {
        let sessions =
            SessionStore::new(Arc::clone(&storage.kv), clock).with_ttl(config.session_ttl);
        let controller = Arc::new(DashboardController::new(gateway, sessions));
        Self {
            controller,
            offline,
        }
    }

    #[must_use]
    pub fn controller(&self) -> Arc<DashboardController> {
        Arc::clone(&self.controller)
    }

    /// Whether the dashboard is running against built-in demo data.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.offline
    }
}
