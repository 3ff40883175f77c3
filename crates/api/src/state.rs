use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use cinedex_core::store::{MetadataStore, SnapshotProvider};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Movie, master-data and template store.
    pub store: Arc<dyn MetadataStore>,
    /// Cached master-data lists, invalidated on create or on request.
    pub master_data: Arc<dyn SnapshotProvider>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cancelled when the server starts shutting down. Running bulk
    /// assignments stop before their next write.
    pub shutdown: CancellationToken,
}
