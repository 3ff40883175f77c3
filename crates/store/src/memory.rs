//! In-process metadata store.
//!
//! Backs local development (`STORE_BACKEND=memory`) and the API
//! integration tests. Writes can be forced to fail per target to exercise
//! partial-failure reporting.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use cinedex_core::assignment::FieldPatch;
use cinedex_core::selector::FieldSelector;
use cinedex_core::store::{
    MasterDataItem, MasterDataSource, StoreError, TargetSource, TargetWriter, TemplateRegistry,
    WriteError,
};
use cinedex_core::target::Target;
use cinedex_core::template::TemplateGroup;
use cinedex_core::types::TargetId;

#[derive(Default)]
struct Inner {
    movies: HashMap<TargetId, Target>,
    master_data: HashMap<FieldSelector, Vec<MasterDataItem>>,
    templates: Vec<TemplateGroup>,
    failing_writes: HashSet<TargetId>,
    offline: bool,
    write_count: usize,
    list_count: usize,
}

/// Metadata store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_target(&self, target: Target) {
        self.inner
            .write()
            .await
            .movies
            .insert(target.id.clone(), target);
    }

    pub async fn target(&self, id: &TargetId) -> Option<Target> {
        self.inner.read().await.movies.get(id).cloned()
    }

    pub async fn insert_value(&self, selector: FieldSelector, item: MasterDataItem) {
        self.inner
            .write()
            .await
            .master_data
            .entry(selector)
            .or_default()
            .push(item);
    }

    pub async fn insert_template_group(&self, group: TemplateGroup) {
        self.inner.write().await.templates.push(group);
    }

    /// Make every subsequent write to `id` fail.
    pub async fn fail_writes_for(&self, id: impl Into<TargetId>) {
        self.inner.write().await.failing_writes.insert(id.into());
    }

    /// Make [`TargetSource::ping`] fail until set back to `false`.
    pub async fn set_offline(&self, offline: bool) {
        self.inner.write().await.offline = offline;
    }

    /// Number of successful and failed write calls so far.
    pub async fn write_count(&self) -> usize {
        self.inner.read().await.write_count
    }

    /// Number of master-data list reads so far.
    pub async fn list_count(&self) -> usize {
        self.inner.read().await.list_count
    }
}

#[async_trait]
impl TargetSource for MemoryStore {
    async fn get_targets_by_ids(&self, ids: &[TargetId]) -> Result<Vec<Target>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.movies.get(id).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.inner.read().await.offline {
            return Err(StoreError::Transport("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TargetWriter for MemoryStore {
    async fn update_target_field(
        &self,
        target_id: &TargetId,
        patch: &FieldPatch,
    ) -> Result<(), WriteError> {
        let mut inner = self.inner.write().await;
        inner.write_count += 1;
        if inner.failing_writes.contains(target_id) {
            return Err(WriteError::new(format!(
                "Write rejected for movie '{target_id}'"
            )));
        }
        let movie = inner.movies.get_mut(target_id).ok_or_else(|| {
            WriteError::from(StoreError::NotFound {
                entity: "Movie",
                id: target_id.to_string(),
            })
        })?;
        movie.set_field(patch.selector, Some(patch.value.clone()));
        Ok(())
    }
}

#[async_trait]
impl MasterDataSource for MemoryStore {
    async fn list_values(
        &self,
        selector: FieldSelector,
    ) -> Result<Vec<MasterDataItem>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.list_count += 1;
        Ok(inner.master_data.get(&selector).cloned().unwrap_or_default())
    }

    async fn create_value(
        &self,
        selector: FieldSelector,
        name: &str,
    ) -> Result<MasterDataItem, StoreError> {
        let name = name.trim();
        let mut inner = self.inner.write().await;
        let values = inner.master_data.entry(selector).or_default();
        if let Some(existing) = values.iter().find(|item| item.name == name) {
            return Ok(existing.clone());
        }
        let item = MasterDataItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        values.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl TemplateRegistry for MemoryStore {
    async fn fetch_template_groups(&self) -> Result<Vec<TemplateGroup>, StoreError> {
        Ok(self.inner.read().await.templates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_ids_omitted() {
        let store = MemoryStore::new();
        store.insert_target(Target::new("m1")).await;

        let found = store
            .get_targets_by_ids(&[TargetId::from("m1"), TargetId::from("nope")])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "m1");
    }

    #[tokio::test]
    async fn update_writes_field() {
        let store = MemoryStore::new();
        store.insert_target(Target::new("m1")).await;
        let patch = FieldPatch {
            selector: FieldSelector::Tag,
            value: "A, B".into(),
        };

        store
            .update_target_field(&TargetId::from("m1"), &patch)
            .await
            .unwrap();

        let movie = store.target(&TargetId::from("m1")).await.unwrap();
        assert_eq!(movie.tags.as_deref(), Some("A, B"));
    }

    #[tokio::test]
    async fn injected_failure_reported() {
        let store = MemoryStore::new();
        store.insert_target(Target::new("m1")).await;
        store.fail_writes_for("m1").await;
        let patch = FieldPatch {
            selector: FieldSelector::Studio,
            value: "Acme".into(),
        };

        let err = store
            .update_target_field(&TargetId::from("m1"), &patch)
            .await
            .unwrap_err();

        assert!(err.message.contains("m1"));
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn ping_follows_offline_flag() {
        let store = MemoryStore::new();
        assert!(store.ping().await.is_ok());

        store.set_offline(true).await;

        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn create_value_is_idempotent_by_name() {
        let store = MemoryStore::new();
        let first = store.create_value(FieldSelector::Tag, "Drama").await.unwrap();
        let second = store.create_value(FieldSelector::Tag, " Drama ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_values(FieldSelector::Tag).await.unwrap().len(), 1);
    }
}
