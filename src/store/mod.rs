//! Gift-list item storage.
//!
//! The resolver only needs to read an item and write its cached image;
//! everything else about lists and items is owned by the CRUD side.
//! - `MemoryStore`: in-process, for tests and development
//! - `SqliteStore`: file-backed (feature `sqlite`)

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A wanted item on a gift list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    /// Product page the item links to
    pub url: String,
    pub price: Option<String>,
    pub wanted_quantity: i64,
    pub purchased_quantity: i64,
    /// Image resolved for `url`, once one has been found
    pub og_image: Option<String>,
}

impl Item {
    /// Cached image, if a non-empty one is stored.
    pub fn cached_image_ref(&self) -> Option<&str> {
        self.og_image.as_deref().filter(|s| !s.is_empty())
    }
}

/// Fields supplied when adding an item to a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub list_id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default = "default_wanted_quantity")]
    pub wanted_quantity: i64,
}

fn default_wanted_quantity() -> i64 {
    1
}

impl NewItem {
    pub fn new(list_id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            list_id,
            name: name.into(),
            url: url.into(),
            price: None,
            wanted_quantity: default_wanted_quantity(),
        }
    }
}

/// Item storage used by the resolver.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Look up an item by id.
    async fn get_item(&self, id: i64) -> Result<Option<Item>, StoreError>;

    /// Record the resolved image for an item that has none yet.
    ///
    /// Returns `false`, leaving the item as it is, when it already carries
    /// a non-empty image.
    async fn set_cached_image_ref(&self, id: i64, url: &str) -> Result<bool, StoreError>;

    /// Add an item to a list. New items never carry a cached image.
    async fn insert_item(&self, item: NewItem) -> Result<Item, StoreError>;
}
