//! Durable storage for per-browser client state.
//!
//! Every browser gets a [`ClientScope`] (a UUID kept in its session). Under
//! that scope, each client store writes one JSON snapshot into its own
//! [`Namespace`]. Adapters only move opaque JSON strings; typing lives in
//! [`PersistedStore`].
//!
//! # Adapters
//!
//! - [`MemoryKeyValueStore`] - process memory, lost on restart
//! - [`FileKeyValueStore`] - one JSON file per scope and namespace
//! - [`PostgresKeyValueStore`] - `storefront.client_state` table

mod file;
mod memory;
mod postgres;

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::PersistenceConfig;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use postgres::PostgresKeyValueStore;

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Identifies one browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ClientScope(Uuid);

impl ClientScope {
    /// Generate a new random scope.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ClientScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four client stores, each persisted under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Cart,
    Auth,
    OwnerSession,
    StoreSelection,
}

impl Namespace {
    /// Every namespace, for bulk operations.
    pub const ALL: [Self; 4] = [
        Self::Cart,
        Self::Auth,
        Self::OwnerSession,
        Self::StoreSelection,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cart => "cart-storage",
            Self::Auth => "auth-storage",
            Self::OwnerSession => "owner-storage",
            Self::StoreSelection => "store-storage",
        }
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|namespace| namespace.key() == s)
            .ok_or_else(|| format!("unknown namespace: {s}"))
    }
}

/// A key-value backend for client snapshots.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a snapshot, `None` if nothing was stored.
    async fn get(
        &self,
        scope: ClientScope,
        namespace: Namespace,
    ) -> Result<Option<String>, PersistError>;

    /// Write a snapshot, replacing any previous one.
    async fn put(
        &self,
        scope: ClientScope,
        namespace: Namespace,
        snapshot: String,
    ) -> Result<(), PersistError>;

    /// Remove a snapshot. Removing a missing snapshot is not an error.
    async fn delete(&self, scope: ClientScope, namespace: Namespace) -> Result<(), PersistError>;

    /// Check the backend is reachable, for readiness probes.
    async fn ping(&self) -> Result<(), PersistError> {
        Ok(())
    }
}

/// Shared handle to whichever adapter the server was configured with.
pub type SharedKeyValueStore = Arc<dyn KeyValueStore>;

/// An opened adapter, plus the pool when it is `PostgreSQL`.
///
/// The pool is handed back so sessions can share it.
pub struct Persistence {
    pub store: SharedKeyValueStore,
    pub pool: Option<PgPool>,
}

/// Open the adapter named by the configuration.
///
/// # Errors
///
/// Returns `PersistError` if the data directory or database is unavailable.
pub async fn connect(config: &PersistenceConfig) -> Result<Persistence, PersistError> {
    match config {
        PersistenceConfig::Memory => Ok(Persistence {
            store: Arc::new(MemoryKeyValueStore::new()),
            pool: None,
        }),
        PersistenceConfig::File { data_dir } => Ok(Persistence {
            store: Arc::new(FileKeyValueStore::open(data_dir).await?),
            pool: None,
        }),
        PersistenceConfig::Postgres { database_url } => {
            let pool = crate::db::create_pool(database_url).await?;
            Ok(Persistence {
                store: Arc::new(PostgresKeyValueStore::new(pool.clone())),
                pool: Some(pool),
            })
        }
    }
}

/// A typed view of one namespace under one scope.
///
/// Missing snapshots read as `T::default()`. So do unreadable ones, with a
/// warning, matching how a browser app treats corrupted local storage.
pub struct PersistedStore<T> {
    backend: SharedKeyValueStore,
    scope: ClientScope,
    namespace: Namespace,
    _state: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            scope: self.scope,
            namespace: self.namespace,
            _state: PhantomData,
        }
    }
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Bind a namespace under a scope to a backend.
    #[must_use]
    pub fn new(backend: SharedKeyValueStore, scope: ClientScope, namespace: Namespace) -> Self {
        Self {
            backend,
            scope,
            namespace,
            _state: PhantomData,
        }
    }

    /// Read the current state.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the backend read fails.
    pub async fn get(&self) -> Result<T, PersistError> {
        let Some(snapshot) = self.backend.get(self.scope, self.namespace).await? else {
            return Ok(T::default());
        };

        match serde_json::from_str(&snapshot) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    scope = %self.scope,
                    namespace = self.namespace.key(),
                    error = %e,
                    "Discarding unreadable client snapshot"
                );
                Ok(T::default())
            }
        }
    }

    /// Replace the state.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if encoding or the backend write fails.
    pub async fn set(&self, state: &T) -> Result<(), PersistError> {
        let snapshot = serde_json::to_string(state)?;
        self.backend.put(self.scope, self.namespace, snapshot).await
    }

    /// Remove the state.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the backend delete fails.
    pub async fn clear(&self) -> Result<(), PersistError> {
        self.backend.delete(self.scope, self.namespace).await
    }

    /// Read, mutate, and write back. Nothing is written if `f` fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a `PersistError` converted into `E`.
    pub async fn try_update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<PersistError>,
    {
        let mut state = self.get().await?;
        let result = f(&mut state)?;
        self.set(&state).await?;
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    fn store(backend: &SharedKeyValueStore, scope: ClientScope) -> PersistedStore<Counter> {
        PersistedStore::new(Arc::clone(backend), scope, Namespace::Cart)
    }

    #[test]
    fn test_namespace_keys_are_distinct() {
        let keys: std::collections::HashSet<_> = Namespace::ALL.iter().map(|n| n.key()).collect();
        assert_eq!(keys.len(), 4);
        assert_eq!("owner-storage".parse::<Namespace>().unwrap(), Namespace::OwnerSession);
    }

    #[tokio::test]
    async fn test_missing_snapshot_reads_default() {
        let backend: SharedKeyValueStore = Arc::new(MemoryKeyValueStore::new());
        let counter = store(&backend, ClientScope::generate());
        assert_eq!(counter.get().await.unwrap(), Counter::default());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_reads_default() {
        let backend: SharedKeyValueStore = Arc::new(MemoryKeyValueStore::new());
        let scope = ClientScope::generate();
        backend
            .put(scope, Namespace::Cart, "{not json".to_owned())
            .await
            .unwrap();
        assert_eq!(store(&backend, scope).get().await.unwrap(), Counter::default());
    }

    #[tokio::test]
    async fn test_try_update_skips_write_on_error() {
        let backend: SharedKeyValueStore = Arc::new(MemoryKeyValueStore::new());
        let counter = store(&backend, ClientScope::generate());
        counter.set(&Counter { hits: 1 }).await.unwrap();

        let result: Result<(), PersistError> = counter
            .try_update(|state| {
                state.hits = 99;
                Err(PersistError::Io(std::io::Error::other("refused")))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(counter.get().await.unwrap().hits, 1);

        let hits: Result<u32, PersistError> = counter
            .try_update(|state| {
                state.hits += 1;
                Ok(state.hits)
            })
            .await;
        assert_eq!(hits.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_connect_file_adapter() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistenceConfig::File {
            data_dir: dir.path().join("state"),
        };
        let persistence = connect(&config).await.unwrap();
        assert!(persistence.pool.is_none());
        persistence.store.ping().await.unwrap();
        assert!(dir.path().join("state").is_dir());
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let backend: SharedKeyValueStore = Arc::new(MemoryKeyValueStore::new());
        let first = store(&backend, ClientScope::generate());
        let second = store(&backend, ClientScope::generate());
        first.set(&Counter { hits: 5 }).await.unwrap();
        assert_eq!(second.get().await.unwrap().hits, 0);
    }
}
