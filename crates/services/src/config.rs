use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::error::GatewayError;
use crate::gateway::{OfflineGateway, RemoteGateway, SheetGateway};
use crate::session_store::default_session_ttl;

pub const ENV_SCRIPT_URL: &str = "REDSHIFT_SCRIPT_URL";
pub const ENV_TIMEOUT_SECS: &str = "REDSHIFT_TIMEOUT_SECS";
pub const ENV_DB_URL: &str = "REDSHIFT_DB_URL";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DB_URL: &str = "sqlite://redshift.sqlite3?mode=rwc";

/// Marker left in an unedited deployment URL.
const URL_PLACEHOLDER: &str = "INSERT_YOUR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Deployed script URL; `None` selects the offline gateway.
    pub script_url: Option<Url>,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            script_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            env::var(ENV_SCRIPT_URL).ok().as_deref(),
            env::var(ENV_TIMEOUT_SECS).ok().as_deref(),
        )
    }

    /// Build from raw setting values; anything blank or invalid falls back to defaults.
    #[must_use]
    pub fn from_values(script_url: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let script_url = script_url
            .map(str::trim)
            .filter(|raw| !raw.is_empty() && !raw.contains(URL_PLACEHOLDER))
            .and_then(|raw| match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    warn!(error = %err, "ignoring invalid script URL");
                    None
                }
            });
        let timeout = timeout_secs
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        Self {
            script_url,
            timeout,
        }
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.script_url.is_none()
    }
}

/// Settings for assembling the dashboard services.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub db_url: String,
    pub session_ttl: chrono::Duration,
    pub gateway: GatewayConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            session_ttl: default_session_ttl(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let db_url = env::var(ENV_DB_URL)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_URL.into());
        Self {
            db_url,
            session_ttl: default_session_ttl(),
            gateway: GatewayConfig::from_env(),
        }
    }
}

/// Picks the HTTP gateway when a script URL is configured, the offline one otherwise.
///
/// # Errors
///
/// Returns `GatewayError` if the HTTP client cannot be built.
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<dyn RemoteGateway>, GatewayError> {
    match &config.script_url {
        Some(url) => {
            info!(endpoint = %url, timeout_secs = config.timeout.as_secs(), "using sheet gateway");
            Ok(Arc::new(SheetGateway::new(url.clone(), config.timeout)?))
        }
        None => {
            info!("no script URL configured, using offline gateway");
            Ok(Arc::new(OfflineGateway::new()))
        }
    }
}
