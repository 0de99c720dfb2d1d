use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{Item, ItemKind, ItemStatus};

/// Storage port for one item kind.
///
/// Lists are returned in id order, which for v7 ids is creation order.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemRepository<K: ItemKind>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item<K>>>;

    /// Insert or overwrite by `item.id`.
    ///
    /// An existing record keeps its stored status, and a swapped record also
    /// keeps its owner. Returns the record as stored.
    async fn save(&self, item: Item<K>) -> ItemResult<Item<K>>;

    async fn list_by_status(&self, status: ItemStatus) -> ItemResult<Vec<Item<K>>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<K>>>;

    /// Atomically hands an `Available` item to `new_owner` and marks it `Swapped`.
    /// Returns `None` if the item does not exist or is no longer available.
    async fn transfer_if_available(
        &self,
        id: Uuid,
        new_owner: Uuid,
    ) -> ItemResult<Option<Item<K>>>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug)]
pub struct InMemoryItemRepository<K: ItemKind> {
    items: Arc<RwLock<HashMap<Uuid, Item<K>>>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ItemKind> InMemoryItemRepository<K> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            _kind: PhantomData,
        }
    }

    async fn collect_sorted(&self, predicate: impl Fn(&Item<K>) -> bool) -> Vec<Item<K>> {
        let items = self.items.read().await;
        let mut result: Vec<Item<K>> = items.values().filter(|i| predicate(i)).cloned().collect();
        result.sort_by_key(|i| i.id);
        result
    }
}

impl<K: ItemKind> Default for InMemoryItemRepository<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ItemKind> Clone for InMemoryItemRepository<K> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: ItemKind> ItemRepository<K> for InMemoryItemRepository<K> {
    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item<K>>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn save(&self, item: Item<K>) -> ItemResult<Item<K>> {
        let mut items = self.items.write().await;

        let stored = match items.entry(item.id) {
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                if stored.is_available() {
                    stored.owner_id = item.owner_id;
                }
                stored.name = item.name;
                stored.attributes = item.attributes;
                stored.clone()
            }
            Entry::Vacant(entry) => entry.insert(item).clone(),
        };
        Ok(stored)
    }

    async fn list_by_status(&self, status: ItemStatus) -> ItemResult<Vec<Item<K>>> {
        Ok(self.collect_sorted(|i| i.status == status).await)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<K>>> {
        Ok(self.collect_sorted(|i| i.owner_id == Some(owner_id)).await)
    }

    async fn transfer_if_available(
        &self,
        id: Uuid,
        new_owner: Uuid,
    ) -> ItemResult<Option<Item<K>>> {
        // Check and write under one lock
        let mut items = self.items.write().await;

        match items.get_mut(&id) {
            Some(item) if item.is_available() => {
                item.owner_id = Some(new_owner);
                item.status = ItemStatus::Swapped;
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }
}
