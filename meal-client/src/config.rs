//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClientResult;
use crate::session::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Default service URL (the service mounts its API under `/api`)
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default ceiling on attempts per logical call (first try included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Client configuration for connecting to the meal service
///
/// # Environment variables
///
/// | variable                | default                     |
/// |-------------------------|-----------------------------|
/// | MEAL_API_URL            | http://localhost:3001/api   |
/// | MEAL_REQUEST_TIMEOUT_MS | 10000                       |
/// | MEAL_MAX_ATTEMPTS       | 3                           |
/// | MEAL_SESSION_DIR        | unset (in-memory session)   |
/// | MEAL_AUTH_TOKEN         | unset                       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:3001/api")
    pub base_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Maximum attempts per logical call, first try included
    pub max_attempts: u32,

    /// Directory for the persistent session file; `None` keeps the token in memory
    pub session_dir: Option<PathBuf>,

    /// Token to seed the session with
    pub token: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            session_dir: None,
            token: None,
        }
    }

    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("MEAL_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout_ms: non_empty("MEAL_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            max_attempts: non_empty("MEAL_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            session_dir: non_empty("MEAL_SESSION_DIR").map(PathBuf::from),
            token: non_empty("MEAL_AUTH_TOKEN"),
        }
    }

    /// Set the request timeout (0 restores the default)
    pub fn with_timeout_ms(mut self, millis: u64) -> Self {
        self.timeout_ms = if millis == 0 { DEFAULT_TIMEOUT_MS } else { millis };
        self
    }

    /// Set the attempt ceiling (values below 1 are treated as 1)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Persist the session token under this directory
    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }

    /// Seed the session with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Open the token store this configuration describes
    pub fn token_store(&self) -> ClientResult<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match &self.session_dir {
            Some(dir) => Arc::new(FileTokenStore::new(dir)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        if let Some(token) = &self.token {
            store.set_token(token)?;
        }
        Ok(store)
    }

    /// Create a resilient channel from this configuration
    pub fn build_channel(&self) -> ClientResult<crate::ResilientChannel> {
        crate::ResilientChannel::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
