//! In-memory item store for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Item, ItemStore, NewItem};
use crate::error::StoreError;

/// Items kept in a map; lost on restart.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    items: HashMap<i64, Item>,
    next_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get_item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.items.get(&id).cloned())
    }

    async fn set_cached_image_ref(&self, id: i64, url: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let item = inner
            .items
            .get_mut(&id)
            .ok_or(StoreError::MissingItem { id })?;
        if item.cached_image_ref().is_some() {
            return Ok(false);
        }
        item.og_image = Some(url.to_string());
        Ok(true)
    }

    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let id = inner.next_id;
        inner.next_id += 1;

        let item = Item {
            id,
            list_id: new.list_id,
            name: new.name,
            url: new.url,
            price: new.price,
            wanted_quantity: new.wanted_quantity,
            purchased_quantity: 0,
            og_image: None,
        };
        inner.items.insert(id, item.clone());
        Ok(item)
    }
}
