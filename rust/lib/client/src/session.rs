//! Session store: the bearer token held in memory and mirrored to
//! durable storage.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;

/// Durable home for the bearer token.
///
/// `load` returns `Ok(None)` when nothing is stored. Implementations keep a
/// single key; an absent key means logged out.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local storage. Nothing survives a restart unless the same
/// instance is handed to the next [`Session`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    token: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// On-disk layout of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    token: String,
}

/// TOML file holding `token = "..."`. Removing the file logs out.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("read {}: {}", self.path.display(), e)))?;
        let file: SessionFile = toml::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("parse {}: {}", self.path.display(), e)))?;
        if file.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(file.token))
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let content = toml::to_string_pretty(&SessionFile { token: token.to_string() })
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| ClientError::Storage(format!("write {}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!("remove {}: {}", self.path.display(), e))),
        }
    }
}

/// The current bearer token.
///
/// Built once at startup and shared (`Arc<Session>`) by the API client,
/// the auth flow and the view controller. There is no expiry tracking: the
/// server's 401 is the only signal that a token went stale.
pub struct Session {
    token: RwLock<Option<String>>,
    storage: Arc<dyn TokenStorage>,
}

impl Session {
    /// Empty in memory; call [`Session::restore`] to pick up a stored token.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { token: RwLock::new(None), storage }
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_active(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Persist `token`, then hold it in memory.
    pub fn set(&self, token: &str) -> Result<(), ClientError> {
        self.storage.save(token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        debug!("session token stored");
        Ok(())
    }

    /// Drop the token from memory and from durable storage.
    ///
    /// Memory is cleared even when the storage call fails.
    pub fn clear(&self) -> Result<(), ClientError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        debug!("session token cleared");
        self.storage.clear()
    }

    /// Load the stored token into memory and return it.
    pub fn restore(&self) -> Result<Option<String>, ClientError> {
        let stored = self.storage.load()?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = stored.clone();
        debug!(found = stored.is_some(), "session restored");
        Ok(stored)
    }
}
