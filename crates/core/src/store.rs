//! Data-access collaborator traits.
//!
//! The core never talks to the hosted store directly. Callers inject
//! implementations of these traits (an HTTP client, an in-memory store,
//! a test double) and the core only reads snapshots and issues individual
//! field updates through them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::assignment::FieldPatch;
use crate::selector::FieldSelector;
use crate::target::Target;
use crate::template::TemplateGroup;
use crate::types::TargetId;

/// Errors raised by data-access collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),
}

/// Failure of a single target update. The message is opaque to the core and
/// is copied verbatim into the bulk result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct WriteError {
    pub message: String,
}

impl WriteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<StoreError> for WriteError {
    fn from(err: StoreError) -> Self {
        Self::new(err.to_string())
    }
}

/// An entry in a master-data list (a studio, tag, actress, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterDataItem {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait TargetSource: Send + Sync {
    /// Fetch snapshots for the given ids. Unknown ids are omitted from the
    /// result rather than reported as errors.
    async fn get_targets_by_ids(&self, ids: &[TargetId]) -> Result<Vec<Target>, StoreError>;

    /// Single, unretried reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait TargetWriter: Send + Sync {
    /// Write one field of one target.
    async fn update_target_field(
        &self,
        target_id: &TargetId,
        patch: &FieldPatch,
    ) -> Result<(), WriteError>;
}

#[async_trait]
pub trait MasterDataSource: Send + Sync {
    async fn list_values(&self, selector: FieldSelector) -> Result<Vec<MasterDataItem>, StoreError>;

    async fn create_value(
        &self,
        selector: FieldSelector,
        name: &str,
    ) -> Result<MasterDataItem, StoreError>;
}

#[async_trait]
pub trait TemplateRegistry: Send + Sync {
    async fn fetch_template_groups(&self) -> Result<Vec<TemplateGroup>, StoreError>;
}

/// Read-through cache over master data with explicit invalidation.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn available_values(
        &self,
        selector: FieldSelector,
    ) -> Result<Vec<MasterDataItem>, StoreError>;

    /// Create a new value and drop the cached list for its selector.
    async fn create_value(
        &self,
        selector: FieldSelector,
        name: &str,
    ) -> Result<MasterDataItem, StoreError>;

    /// Drop cached lists: one selector, or everything when `None`.
    async fn invalidate(&self, selector: Option<FieldSelector>);
}

/// Everything the application layer needs from a backing store.
pub trait MetadataStore: TargetSource + TargetWriter + MasterDataSource + TemplateRegistry {}

impl<T> MetadataStore for T where
    T: TargetSource + TargetWriter + MasterDataSource + TemplateRegistry
{
}
