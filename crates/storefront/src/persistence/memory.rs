//! In-process adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ClientScope, KeyValueStore, Namespace, PersistError};

/// Keeps snapshots in a map. Used by default and in tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<(ClientScope, Namespace), String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots across all scopes.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(
        &self,
        scope: ClientScope,
        namespace: Namespace,
    ) -> Result<Option<String>, PersistError> {
        Ok(self.entries.read().await.get(&(scope, namespace)).cloned())
    }

    async fn put(
        &self,
        scope: ClientScope,
        namespace: Namespace,
        snapshot: String,
    ) -> Result<(), PersistError> {
        self.entries
            .write()
            .await
            .insert((scope, namespace), snapshot);
        Ok(())
    }

    async fn delete(&self, scope: ClientScope, namespace: Namespace) -> Result<(), PersistError> {
        self.entries.write().await.remove(&(scope, namespace));
        Ok(())
    }
}
