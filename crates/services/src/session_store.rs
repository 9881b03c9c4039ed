use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use redshift_core::time::from_millis;
use storage::repository::KeyValueRepository;

use crate::Clock;
use crate::error::SessionStoreError;

/// Storage key holding the one persisted session.
pub const SESSION_KEY: &str = "redshift_session";

/// Lifetime of a saved session: 1.5 hours.
pub const SESSION_TTL_SECS: i64 = 90 * 60;

#[must_use]
pub fn default_session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

/// Cached credentials that allow a silent re-login until `expiry`.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionRecord {
    name: String,
    passcode: String,
    expiry: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn passcode(&self) -> &str {
        &self.passcode
    }

    #[must_use]
    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("name", &self.name)
            .field("passcode", &"****")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Persisted shape: `{name, passcode, expiry}` with expiry in epoch milliseconds.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    name: String,
    passcode: String,
    expiry: i64,
}

impl PersistedSession {
    fn from_record(record: &SessionRecord) -> Self {
        Self {
            name: record.name.clone(),
            passcode: record.passcode.clone(),
            expiry: record.expiry.timestamp_millis(),
        }
    }

    fn into_record(self) -> Result<SessionRecord, SessionStoreError> {
        let expiry = from_millis(self.expiry).ok_or_else(|| {
            SessionStoreError::Corrupt(format!("expiry out of range: {}", self.expiry))
        })?;
        Ok(SessionRecord {
            name: self.name,
            passcode: self.passcode,
            expiry,
        })
    }
}

fn decode(raw: &str) -> Result<SessionRecord, SessionStoreError> {
    serde_json::from_str::<PersistedSession>(raw)
        .map_err(|err| SessionStoreError::Corrupt(err.to_string()))?
        .into_record()
}

/// Time-bounded credential cache over local key-value storage.
///
/// There is no renew operation: every save writes a fresh expiry.
#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn KeyValueRepository>,
    clock: Clock,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(repo: Arc<dyn KeyValueRepository>, clock: Clock) -> Self {
        Self {
            repo,
            clock,
            ttl: default_session_ttl(),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Persist a session for `name` expiring one TTL from now, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the record cannot be encoded or stored.
    pub async fn save(
        &self,
        name: &str,
        passcode: &str,
    ) -> Result<SessionRecord, SessionStoreError> {
        self.save_with_ttl(name, passcode, self.ttl).await
    }

    /// Like [`SessionStore::save`] with an explicit lifetime.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the record cannot be encoded or stored.
    pub async fn save_with_ttl(
        &self,
        name: &str,
        passcode: &str,
        ttl: Duration,
    ) -> Result<SessionRecord, SessionStoreError> {
        let record = SessionRecord {
            name: name.to_string(),
            passcode: passcode.to_string(),
            expiry: self.clock.now() + ttl,
        };
        let raw = serde_json::to_string(&PersistedSession::from_record(&record))?;
        self.repo.set(SESSION_KEY, &raw).await?;
        debug!(student = %record.name, expiry = %record.expiry, "session saved");
        Ok(record)
    }

    /// Read the saved session if it is still valid.
    ///
    /// Returns `None` when nothing is stored, when the record cannot be
    /// parsed, or when it has expired. Unreadable and expired records are
    /// deleted as part of the read.
    pub async fn load(&self) -> Option<SessionRecord> {
        let raw = match self.repo.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "session storage unreadable");
                return None;
            }
        };

        let record = match decode(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "discarding unreadable session");
                self.discard().await;
                return None;
            }
        };

        if record.is_expired_at(self.clock.now()) {
            info!(student = %record.name, expiry = %record.expiry, "session expired");
            self.discard().await;
            return None;
        }

        Some(record)
    }

    /// Delete the saved session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Storage` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), SessionStoreError> {
        self.repo.remove(SESSION_KEY).await?;
        Ok(())
    }

    async fn discard(&self) {
        if let Err(err) = self.clear().await {
            warn!(error = %err, "failed to delete stale session");
        }
    }
}
