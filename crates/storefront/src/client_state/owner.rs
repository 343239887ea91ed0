//! Store owner session (`owner-storage`).

use std::fmt;

use serde::{Deserialize, Serialize};

use brewline_core::{OwnerId, StoreId};

use super::ClientStateError;
use crate::backend::OwnerLoginResponse;
use crate::persistence::{ClientScope, Namespace, PersistedStore, SharedKeyValueStore};

/// What the backend told us about a signed-in owner.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSession {
    pub owner_id: OwnerId,
    pub name: String,
    pub email: String,
    pub store_id: Option<StoreId>,
    pub access_token: String,
    pub first_login: bool,
}

impl OwnerSession {
    /// Whether the owner still has to register a store.
    #[must_use]
    pub const fn needs_store(&self) -> bool {
        self.store_id.is_none()
    }
}

impl From<OwnerLoginResponse> for OwnerSession {
    fn from(response: OwnerLoginResponse) -> Self {
        Self {
            owner_id: response.owner_id,
            name: response.name,
            email: response.email,
            store_id: response.store_id,
            access_token: response.access_token,
            first_login: response.first_login,
        }
    }
}

impl fmt::Debug for OwnerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerSession")
            .field("owner_id", &self.owner_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("store_id", &self.store_id)
            .field("access_token", &"[REDACTED]")
            .field("first_login", &self.first_login)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OwnerState {
    session: Option<OwnerSession>,
}

#[derive(Clone)]
pub struct OwnerSessionStore {
    inner: PersistedStore<OwnerState>,
}

impl OwnerSessionStore {
    #[must_use]
    pub fn new(backend: SharedKeyValueStore, scope: ClientScope) -> Self {
        Self {
            inner: PersistedStore::new(backend, scope, Namespace::OwnerSession),
        }
    }

    /// The signed-in owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub async fn current(&self) -> Result<Option<OwnerSession>, ClientStateError> {
        Ok(self.inner.get().await?.session)
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn sign_in(&self, session: OwnerSession) -> Result<(), ClientStateError> {
        self.inner
            .set(&OwnerState {
                session: Some(session),
            })
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    pub async fn sign_out(&self) -> Result<(), ClientStateError> {
        self.inner.clear().await?;
        Ok(())
    }

    /// Record a newly registered store. Also ends the first-login state.
    ///
    /// Returns `false` when no owner is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn set_store(&self, store_id: StoreId) -> Result<bool, ClientStateError> {
        self.inner
            .try_update(|state| {
                Ok(state.session.as_mut().is_some_and(|session| {
                    session.store_id = Some(store_id);
                    session.first_login = false;
                    true
                }))
            })
            .await
    }
}
