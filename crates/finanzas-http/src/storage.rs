//! Session storage
//!
//! The whole persisted client state is one cookie ([`AUTH_COOKIE`]) and two
//! local items ([`TOKEN_EXPIRES_AT`], [`USER_DATA`]). [`MemoryStorage`] keeps
//! them in process; [`FileStorage`] mirrors them to a JSON document so the CLI
//! keeps its session between runs.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Cookie carrying the JWT
pub const AUTH_COOKIE: &str = "auth_token";
/// Item holding the token expiry (RFC 3339)
pub const TOKEN_EXPIRES_AT: &str = "token_expires_at";
/// Item holding the serialized [`finanzas_core::Usuario`]
pub const USER_DATA: &str = "user_data";

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    /// Only same-site requests
    #[default]
    Strict,
    /// Top-level navigations too
    Lax,
    /// Every request (requires `Secure`)
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A stored cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Name
    pub name: String,
    /// Value
    pub value: String,
    /// Expiry; session cookie when absent
    pub expires: Option<DateTime<Utc>>,
    /// Path attribute
    pub path: String,
    /// SameSite attribute
    pub same_site: SameSite,
    /// Secure attribute
    pub secure: bool,
}

impl Cookie {
    /// Strict, secure, root-path cookie
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            path: "/".to_string(),
            same_site: SameSite::Strict,
            secure: true,
        }
    }

    /// With expiry
    #[inline]
    #[must_use]
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Whether the cookie has expired at `now`
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|e| e <= now)
    }

    /// `name=value`, as sent in a `Cookie` request header
    #[must_use]
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// `Set-Cookie` rendering with all attributes
    #[must_use]
    pub fn to_set_cookie(&self) -> String {
        let mut out = format!("{}; Path={}", self.header_pair(), self.path);
        if let Some(expires) = self.expires {
            out.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        out.push_str("; SameSite=");
        out.push_str(self.same_site.as_str());
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Cookie jar plus key/value items
pub trait SessionStorage: Send + Sync {
    /// Full cookie record, including expired ones
    fn cookie_record(&self, name: &str) -> Option<Cookie>;

    /// Store or replace a cookie
    ///
    /// # Errors
    /// Backing store could not be written.
    fn set_cookie(&self, cookie: Cookie) -> Result<(), StorageError>;

    /// Delete a cookie
    ///
    /// # Errors
    /// Backing store could not be written.
    fn remove_cookie(&self, name: &str) -> Result<(), StorageError>;

    /// Item value
    fn item(&self, key: &str) -> Option<String>;

    /// Store an item
    ///
    /// # Errors
    /// Backing store could not be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete an item
    ///
    /// # Errors
    /// Backing store could not be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Cookie value; expired cookies read as absent
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookie_record(name)
            .filter(|c| !c.is_expired_at(Utc::now()))
            .map(|c| c.value)
    }

    /// Remove the auth cookie and both session items
    ///
    /// # Errors
    /// Backing store could not be written.
    fn clear_session(&self) -> Result<(), StorageError> {
        self.remove_cookie(AUTH_COOKIE)?;
        self.remove_item(TOKEN_EXPIRES_AT)?;
        self.remove_item(USER_DATA)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StorageState {
    cookies: BTreeMap<String, Cookie>,
    items: BTreeMap<String, String>,
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<StorageState>,
}

impl MemoryStorage {
    /// Empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn from_state(state: StorageState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn snapshot(&self) -> StorageState {
        self.state.read().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn cookie_record(&self, name: &str) -> Option<Cookie> {
        self.state.read().cookies.get(name).cloned()
    }

    fn set_cookie(&self, cookie: Cookie) -> Result<(), StorageError> {
        self.state.write().cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove_cookie(&self, name: &str) -> Result<(), StorageError> {
        self.state.write().cookies.remove(name);
        Ok(())
    }

    fn item(&self, key: &str) -> Option<String> {
        self.state.read().items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.state
            .write()
            .items
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.state.write().items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON document, rewritten after every mutation
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    memory: MemoryStorage,
}

impl FileStorage {
    /// Open `path`, starting empty when it does not exist yet
    ///
    /// # Errors
    /// File exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| StorageError::io_error(&path, e))?;
            if raw.trim().is_empty() {
                StorageState::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            StorageState::default()
        };
        tracing::debug!("Opened session storage at {}", path.display());
        Ok(Self {
            path,
            memory: MemoryStorage::from_state(state),
        })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io_error(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(&self.memory.snapshot())?;
        std::fs::write(&self.path, json).map_err(|e| StorageError::io_error(&self.path, e))
    }
}

impl SessionStorage for FileStorage {
    fn cookie_record(&self, name: &str) -> Option<Cookie> {
        self.memory.cookie_record(name)
    }

    fn set_cookie(&self, cookie: Cookie) -> Result<(), StorageError> {
        self.memory.set_cookie(cookie)?;
        self.persist()
    }

    fn remove_cookie(&self, name: &str) -> Result<(), StorageError> {
        self.memory.remove_cookie(name)?;
        self.persist()
    }

    fn item(&self, key: &str) -> Option<String> {
        self.memory.item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.memory.set_item(key, value)?;
        self.persist()
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.memory.remove_item(key)?;
        self.persist()
    }
}
