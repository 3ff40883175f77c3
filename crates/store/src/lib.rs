//! Data-access collaborators for the cinedex core.
//!
//! Provides a retrying HTTP client for the hosted BaaS store, an in-memory
//! store for local development and tests, and a read-through master-data
//! cache with explicit invalidation.

pub mod cache;
pub mod client;
pub mod config;
pub mod memory;
pub mod retry;

use std::sync::Arc;

use cinedex_core::store::MetadataStore;

pub use cache::CachedMasterData;
pub use client::BaasClient;
pub use config::{StoreBackend, StoreConfig};
pub use memory::MemoryStore;

/// Build the configured backing store.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn MetadataStore>, client::BaasError> {
    match &config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory metadata store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Baas { base_url, api_key } => {
            tracing::info!(%base_url, "Using BaaS metadata store");
            let client = BaasClient::new(base_url.clone(), api_key.clone(), config.retry.clone())?;
            Ok(Arc::new(client))
        }
    }
}
