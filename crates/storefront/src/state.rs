//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{ApiError, BackendClient};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::persistence::SharedKeyValueStore;
use crate::services::SimulatedLatency;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the persistence adapter and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    persistence: SharedKeyValueStore,
    backend: BackendClient,
    latency: SimulatedLatency,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `persistence` - Adapter the client stores write through
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        persistence: SharedKeyValueStore,
    ) -> Result<Self, ApiError> {
        let backend = BackendClient::new(&config.backend)?;
        let latency = SimulatedLatency::new(config.mock_latency);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::seeded(),
                persistence,
                backend,
                latency,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the mock catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the persistence adapter for client stores.
    #[must_use]
    pub fn persistence(&self) -> &SharedKeyValueStore {
        &self.inner.persistence
    }

    /// Get a reference to the backend REST client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Simulated delay for mock operations.
    #[must_use]
    pub fn latency(&self) -> SimulatedLatency {
        self.inner.latency
    }
}
