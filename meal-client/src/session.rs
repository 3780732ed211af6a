// meal-client/src/session.rs
// Session token storage - in memory or as a JSON file

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::ClientResult;

/// Key the bearer token is stored under
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Session file name inside the session directory
pub const SESSION_FILE: &str = "session.json";

/// Holds the bearer token for the current session
///
/// Stores are shared between the channel and the API wrapper, so every
/// method takes `&self`.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, if any
    fn token(&self) -> Option<String>;

    /// Replace the stored token
    fn set_token(&self, token: &str) -> ClientResult<()>;

    /// Forget the stored token; clearing an empty store is not an error
    fn clear_token(&self) -> ClientResult<()>;
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> ClientResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> ClientResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Token store persisted as a JSON map in `<dir>/session.json`
///
/// The file is read on every access, so a token written by another process
/// sharing the directory is picked up on the next request. An unreadable or
/// corrupt file reads as "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.load().remove(AUTH_TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> ClientResult<()> {
        let mut entries = self.load();
        entries.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        self.save(&entries)
    }

    fn clear_token(&self) -> ClientResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.load();
        if entries.remove(AUTH_TOKEN_KEY).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
