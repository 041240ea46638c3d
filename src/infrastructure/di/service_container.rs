//! Service container for dependency injection
//!
//! Wires the store handle into the services. The handle is acquired here at
//! process start and dropped with the container.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::NetworkService;
use crate::config::{Settings, StoreBackend};
use crate::infrastructure::store::{JsonFileStore, MemoryStore};
use crate::infrastructure::traits::UnitStore;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Shared unit store
    pub store: Arc<dyn UnitStore>,

    /// Party network operations
    pub network: NetworkService,
}

impl ServiceContainer {
    /// Create a new service container with the store named in `settings`.
    pub fn new(settings: Settings) -> Self {
        let store: Arc<dyn UnitStore> = match settings.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Json => Arc::new(JsonFileStore::new(settings.store.path.clone())),
        };
        debug!(
            "store backend: {:?} ({})",
            settings.store.backend,
            settings.store.path.display()
        );
        Self::with_store(settings, store)
    }

    /// Create a service container with a custom store (for testing).
    pub fn with_store(settings: Settings, store: Arc<dyn UnitStore>) -> Self {
        let settings = Arc::new(settings);
        let network = NetworkService::new(Arc::clone(&store));

        Self {
            settings,
            store,
            network,
        }
    }
}
