//! Durable storage for the access and refresh tokens.
//!
//! # Design
//! The executor never reaches for global state: it receives an
//! `Arc<dyn TokenStore>` at construction and only ever reads from it. Login
//! writes both tokens, logout removes both.
//!
//! Read failures are not fatal. The request goes out without an
//! `Authorization` header and the backend decides what an anonymous caller
//! may see.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::TokenStoreError;
use crate::types::TokenPair;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Async key-value store holding authentication tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError>;
    async fn remove(&self, key: &str) -> Result<(), TokenStoreError>;
}

/// Read the current access token, treating failures and empty values as
/// absent.
pub async fn read_access_token(store: &dyn TokenStore) -> Option<String> {
    match store.get(ACCESS_TOKEN_KEY).await {
        Ok(token) => token.filter(|value| !value.is_empty()),
        Err(error) => {
            tracing::warn!(%error, "could not read access token, sending request without it");
            None
        }
    }
}

/// Persist the tokens returned by a login. A missing refresh token clears any
/// stale one.
pub async fn save_tokens(
    store: &dyn TokenStore,
    tokens: &TokenPair,
) -> Result<(), TokenStoreError> {
    store.set(ACCESS_TOKEN_KEY, &tokens.access_token).await?;
    match tokens.refresh_token.as_deref() {
        Some(refresh) => store.set(REFRESH_TOKEN_KEY, refresh).await,
        None => store.remove(REFRESH_TOKEN_KEY).await,
    }
}

/// Remove both tokens.
pub async fn clear_tokens(store: &dyn TokenStore) -> Result<(), TokenStoreError> {
    store.remove(ACCESS_TOKEN_KEY).await?;
    store.remove(REFRESH_TOKEN_KEY).await
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an access token.
    pub fn with_access_token(token: &str) -> Self {
        let values = HashMap::from([(ACCESS_TOKEN_KEY.to_string(), token.to_string())]);
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole file is rewritten on every change; a missing file reads as an
/// empty store.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, TokenStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    async fn store(&self, values: &HashMap<String, String>) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(values)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.store(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await?;
        if values.remove(key).is_some() {
            self.store(&values).await?;
        }
        Ok(())
    }
}
