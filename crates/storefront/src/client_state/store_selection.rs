//! Selected store (`store-storage`).

use serde::{Deserialize, Serialize};

use brewline_core::StoreId;

use super::ClientStateError;
use crate::persistence::{ClientScope, Namespace, PersistedStore, SharedKeyValueStore};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StoreSelection {
    store_id: Option<StoreId>,
}

#[derive(Clone)]
pub struct StoreSelectionStore {
    inner: PersistedStore<StoreSelection>,
}

impl StoreSelectionStore {
    #[must_use]
    pub fn new(backend: SharedKeyValueStore, scope: ClientScope) -> Self {
        Self {
            inner: PersistedStore::new(backend, scope, Namespace::StoreSelection),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub async fn selected(&self) -> Result<Option<StoreId>, ClientStateError> {
        Ok(self.inner.get().await?.store_id)
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn select(&self, store_id: StoreId) -> Result<(), ClientStateError> {
        self.inner
            .set(&StoreSelection {
                store_id: Some(store_id),
            })
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    pub async fn clear(&self) -> Result<(), ClientStateError> {
        self.inner.clear().await?;
        Ok(())
    }
}
