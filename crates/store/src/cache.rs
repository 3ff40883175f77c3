//! Read-through master-data cache.
//!
//! [`CachedMasterData`] keeps one list per selector and only goes back to
//! the source after the entry is invalidated, either explicitly or by
//! creating a new value for that selector.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cinedex_core::selector::FieldSelector;
use cinedex_core::store::{MasterDataItem, MasterDataSource, SnapshotProvider, StoreError};

/// [`SnapshotProvider`] over any [`MasterDataSource`].
pub struct CachedMasterData<S: ?Sized> {
    source: Arc<S>,
    entries: RwLock<HashMap<FieldSelector, Vec<MasterDataItem>>>,
}

impl<S: MasterDataSource + ?Sized> CachedMasterData<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<S: MasterDataSource + ?Sized> SnapshotProvider for CachedMasterData<S> {
    async fn available_values(
        &self,
        selector: FieldSelector,
    ) -> Result<Vec<MasterDataItem>, StoreError> {
        if let Some(values) = self.entries.read().await.get(&selector) {
            return Ok(values.clone());
        }

        let values = self.source.list_values(selector).await?;
        tracing::debug!(
            selector = selector.as_str(),
            count = values.len(),
            "Master-data cache filled"
        );
        self.entries.write().await.insert(selector, values.clone());
        Ok(values)
    }

    async fn create_value(
        &self,
        selector: FieldSelector,
        name: &str,
    ) -> Result<MasterDataItem, StoreError> {
        let item = self.source.create_value(selector, name).await?;
        self.invalidate(Some(selector)).await;
        Ok(item)
    }

    async fn invalidate(&self, selector: Option<FieldSelector>) {
        let mut entries = self.entries.write().await;
        match selector {
            Some(selector) => {
                entries.remove(&selector);
            }
            None => entries.clear(),
        }
        tracing::debug!(selector = selector.map(|s| s.as_str()), "Master-data cache invalidated");
    }
}
