//! Credential storage for the Shortly SDK
//!
//! The browser front-end keeps the session in two cookies with independent
//! lifetimes; here the same pair lives behind the [`CredentialStore`] trait
//! so the client can be wired to a file on disk, process memory, or whatever
//! the embedding host uses. A side that outlives its max-age reads as absent,
//! which is exactly how an expired cookie behaves.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{Result, ShortlyError};

/// Lifetime of the access token in seconds (15 minutes, matching the backend)
pub const ACCESS_TOKEN_MAX_AGE: i64 = 900;

/// Lifetime of the refresh token in seconds (7 days)
pub const REFRESH_TOKEN_MAX_AGE: i64 = 604_800;

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Stored credential pair with per-side expiries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredCredentials {
    /// Stamp a new pair with the standard max-ages
    pub fn issue(pair: CredentialPair) -> Self {
        let now = Utc::now();
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_expires_at: now + Duration::seconds(ACCESS_TOKEN_MAX_AGE),
            refresh_expires_at: now + Duration::seconds(REFRESH_TOKEN_MAX_AGE),
            created_at: now,
            updated_at: now,
        }
    }

    /// The access token, unless its max-age has passed
    pub fn access_token(&self) -> Option<&str> {
        if self.access_expires_at > Utc::now() {
            Some(self.access_token.as_str())
        } else {
            None
        }
    }

    /// The refresh token, unless its max-age has passed
    pub fn refresh_token(&self) -> Option<&str> {
        if self.refresh_expires_at > Utc::now() {
            Some(self.refresh_token.as_str())
        } else {
            None
        }
    }
}

/// Storage contract for the session credential pair
///
/// `read` never fails: a missing or unreadable store is the same as being
/// signed out. Absence of the access token is the sole "unauthenticated"
/// signal; absence of the refresh token means renewal is off the table.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    fn read(&self) -> Option<StoredCredentials>;
    fn write(&self, pair: CredentialPair) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and short-lived embedders
#[derive(Debug, Default)]
pub struct MemoryStore {
    credentials: Mutex<Option<StoredCredentials>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a login just happened
    pub fn with_pair(pair: CredentialPair) -> Self {
        let store = Self::new();
        store
            .credentials
            .lock()
            .unwrap()
            .replace(StoredCredentials::issue(pair));
        store
    }

    /// Replace the stored credentials verbatim, expiries included. Meant for
    /// tests that need a pair in a specific lifecycle state.
    pub fn seed(&self, credentials: StoredCredentials) {
        *self.credentials.lock().unwrap() = Some(credentials);
    }

    /// Number of `write` calls since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CredentialStore for MemoryStore {
    fn read(&self) -> Option<StoredCredentials> {
        self.credentials.lock().unwrap().clone()
    }

    fn write(&self, pair: CredentialPair) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.credentials.lock().unwrap() = Some(StoredCredentials::issue(pair));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credentials.lock().unwrap() = None;
        Ok(())
    }
}

/// File-backed store persisting the pair as JSON under the data directory
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cached: Mutex<Option<StoredCredentials>>,
}

impl FileStore {
    /// Open a store at `path`, loading whatever a previous process left there
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            cached: Mutex::new(None),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ShortlyError::io_from_error("Failed to read credential file", e))?;

        if content.trim().is_empty() {
            return Ok(());
        }

        let credentials = serde_json::from_str(&content)
            .map_err(|e| ShortlyError::internal(format!("Failed to parse credential file: {}", e)))?;

        *self.cached.lock().unwrap() = Some(credentials);
        Ok(())
    }

    fn persist(&self, credentials: &Option<StoredCredentials>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ShortlyError::io_from_error("Failed to create credential dir", e))?;
        }

        match credentials {
            Some(credentials) => {
                let content = serde_json::to_string_pretty(credentials)?;
                fs::write(&self.path, content)
                    .map_err(|e| ShortlyError::io_from_error("Failed to write credential file", e))?;
            }
            None => {
                if self.path.exists() {
                    fs::remove_file(&self.path)
                        .map_err(|e| ShortlyError::io_from_error("Failed to remove credential file", e))?;
                }
            }
        }
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn read(&self) -> Option<StoredCredentials> {
        self.cached.lock().unwrap().clone()
    }

    fn write(&self, pair: CredentialPair) -> Result<()> {
        let mut cached = self.cached.lock().unwrap();
        *cached = Some(StoredCredentials::issue(pair));
        self.persist(&cached)
    }

    fn clear(&self) -> Result<()> {
        let mut cached = self.cached.lock().unwrap();
        *cached = None;
        self.persist(&cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_pair_is_readable_until_max_age() {
        let credentials = StoredCredentials::issue(CredentialPair::new("at", "rt"));
        assert_eq!(credentials.access_token(), Some("at"));
        assert_eq!(credentials.refresh_token(), Some("rt"));
    }

    #[test]
    fn expired_sides_read_as_absent() {
        let mut credentials = StoredCredentials::issue(CredentialPair::new("at", "rt"));
        credentials.access_expires_at = Utc::now() - Duration::seconds(1);
        assert_eq!(credentials.access_token(), None);
        // Refresh side has its own clock and is still alive.
        assert_eq!(credentials.refresh_token(), Some("rt"));

        credentials.refresh_expires_at = Utc::now() - Duration::seconds(1);
        assert_eq!(credentials.refresh_token(), None);
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryStore::new();
        assert!(store.read().is_none());

        store.write(CredentialPair::new("a", "r")).unwrap();
        store.write(CredentialPair::new("a2", "r2")).unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read().unwrap().access_token(), Some("a2"));

        store.clear().unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn file_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileStore::open(&path).unwrap();
        store.write(CredentialPair::new("at", "rt")).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        let credentials = reopened.read().unwrap();
        assert_eq!(credentials.access_token(), Some("at"));
        assert_eq!(credentials.refresh_token(), Some("rt"));

        reopened.clear().unwrap();
        assert!(!path.exists());
        let cleared = FileStore::open(&path).unwrap();
        assert!(cleared.read().is_none());
    }

    #[test]
    fn file_store_tolerates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.read().is_none());
    }
}
