//! Per-browser client stores.
//!
//! Four independent stores, each persisted under its own namespace:
//!
//! | Store | Namespace |
//! |-------|-----------|
//! | [`CartStore`] | `cart-storage` |
//! | [`AuthStore`] | `auth-storage` |
//! | [`OwnerSessionStore`] | `owner-storage` |
//! | [`StoreSelectionStore`] | `store-storage` |
//!
//! There are no transactions across stores. Selecting a store writes the
//! selection first and the cart pointer second; a failure in between leaves
//! the two out of step until the next selection.
//!
//! Handlers receive all four through the [`ClientStores`] extractor, which
//! binds them to the browser's [`ClientScope`] (kept in the session) and to
//! whichever persistence adapter the server runs with.

mod auth;
mod cart;
mod owner;
mod store_selection;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brewline_core::cart::CartError;
use thiserror::Error;
use tower_sessions::Session;

pub use auth::{AuthState, AuthStore};
pub use cart::CartStore;
pub use owner::{OwnerSession, OwnerSessionStore};
pub use store_selection::StoreSelectionStore;

use crate::error::AppError;
use crate::models::session_keys;
use crate::persistence::{ClientScope, PersistError, SharedKeyValueStore};
use crate::state::AppState;

/// Errors raised by client store operations.
#[derive(Debug, Error)]
pub enum ClientStateError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// All four stores for one browser.
#[derive(Clone)]
pub struct ClientStores {
    scope: ClientScope,
    pub cart: CartStore,
    pub auth: AuthStore,
    pub owner: OwnerSessionStore,
    pub store_selection: StoreSelectionStore,
}

impl ClientStores {
    /// Bind the stores for `scope` to a persistence adapter.
    #[must_use]
    pub fn bind(backend: &SharedKeyValueStore, scope: ClientScope) -> Self {
        Self {
            scope,
            cart: CartStore::new(Arc::clone(backend), scope),
            auth: AuthStore::new(Arc::clone(backend), scope),
            owner: OwnerSessionStore::new(Arc::clone(backend), scope),
            store_selection: StoreSelectionStore::new(Arc::clone(backend), scope),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> ClientScope {
        self.scope
    }
}

/// Read the browser's scope from the session, creating one on first visit.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn client_scope(session: &Session) -> Result<ClientScope, tower_sessions::session::Error> {
    if let Some(scope) = session.get::<ClientScope>(session_keys::CLIENT_SCOPE).await? {
        return Ok(scope);
    }
    let scope = ClientScope::generate();
    session.insert(session_keys::CLIENT_SCOPE, scope).await?;
    tracing::debug!(%scope, "Assigned client scope");
    Ok(scope)
}

impl FromRequestParts<AppState> for ClientStores {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_owned()))?;

        let scope = client_scope(&session).await?;
        Ok(Self::bind(state.persistence(), scope))
    }
}
