//! Signed-in customer or admin (`auth-storage`).

use serde::{Deserialize, Serialize};

use brewline_core::catalog::User;

use super::ClientStateError;
use crate::persistence::{ClientScope, Namespace, PersistedStore, SharedKeyValueStore};

/// Snapshot of the signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Clone)]
pub struct AuthStore {
    inner: PersistedStore<AuthState>,
}

impl AuthStore {
    #[must_use]
    pub fn new(backend: SharedKeyValueStore, scope: ClientScope) -> Self {
        Self {
            inner: PersistedStore::new(backend, scope, Namespace::Auth),
        }
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub async fn current_user(&self) -> Result<Option<User>, ClientStateError> {
        Ok(self.inner.get().await?.user)
    }

    /// Replace the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn sign_in(&self, user: User) -> Result<(), ClientStateError> {
        self.inner.set(&AuthState { user: Some(user) }).await?;
        Ok(())
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    pub async fn sign_out(&self) -> Result<(), ClientStateError> {
        self.inner.clear().await?;
        Ok(())
    }

    /// Rename the signed-in user in the local snapshot.
    ///
    /// Returns `false` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn update_name(&self, name: &str) -> Result<bool, ClientStateError> {
        self.inner
            .try_update(|state| {
                Ok(state.user.as_mut().is_some_and(|user| {
                    name.clone_into(&mut user.name);
                    true
                }))
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use brewline_core::UserId;

    use super::*;
    use crate::catalog::Catalog;
    use crate::persistence::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let catalog = Catalog::seeded();
        let user = catalog.user(UserId::new(1)).unwrap().clone();
        let auth = AuthStore::new(Arc::new(MemoryKeyValueStore::new()), ClientScope::generate());

        assert!(auth.current_user().await.unwrap().is_none());
        auth.sign_in(user.clone()).await.unwrap();
        assert_eq!(auth.current_user().await.unwrap(), Some(user));

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_name_requires_user() {
        let catalog = Catalog::seeded();
        let auth = AuthStore::new(Arc::new(MemoryKeyValueStore::new()), ClientScope::generate());
        assert!(!auth.update_name("새 이름").await.unwrap());

        auth.sign_in(catalog.user(UserId::new(2)).unwrap().clone())
            .await
            .unwrap();
        assert!(auth.update_name("새 이름").await.unwrap());
        assert_eq!(auth.current_user().await.unwrap().unwrap().name, "새 이름");
    }
}
