//! SQLite item store.
//!
//! Holds the `items` table of the gift-list database. The table is created
//! on open if it does not exist.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use super::{Item, ItemStore, NewItem};
use crate::error::StoreError;

/// SQLite-backed item store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    list_id: i64,
    name: String,
    url: String,
    price: Option<String>,
    wanted_quantity: i64,
    purchased_quantity: i64,
    og_image: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            list_id: row.list_id,
            name: row.name,
            url: row.url,
            price: row.price,
            wanted_quantity: row.wanted_quantity,
            purchased_quantity: row.purchased_quantity,
            og_image: row.og_image,
        }
    }
}

impl SqliteStore {
    /// Open the database at `database_url`.
    ///
    /// # Example URLs
    /// - `sqlite://giftlist.db?mode=rwc` - file, created if missing
    /// - `sqlite::memory:` - ephemeral
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::with_max_connections(database_url, 5).await
    }

    /// Ephemeral database on a single connection.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool
    /// must not grow past one.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        Self::open(options, "sqlite::memory:").await
    }

    async fn with_max_connections(database_url: &str, max: u32) -> Result<Self, StoreError> {
        Self::open(SqlitePoolOptions::new().max_connections(max), database_url).await
    }

    async fn open(options: SqlitePoolOptions, database_url: &str) -> Result<Self, StoreError> {
        let pool = options.connect(database_url).await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                url TEXT NOT NULL,
                price TEXT,
                wanted_quantity INTEGER NOT NULL DEFAULT 1,
                purchased_quantity INTEGER NOT NULL DEFAULT 0,
                og_image TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_items_list_id ON items(list_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn get_item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, list_id, name, url, price, wanted_quantity, purchased_quantity, og_image
            FROM items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn set_cached_image_ref(&self, id: i64, url: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE items SET og_image = ?
            WHERE id = ? AND (og_image IS NULL OR og_image = '')
            "#,
        )
        .bind(url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing updated: either the item is gone or it already has an image
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Ok(false),
            None => Err(StoreError::MissingItem { id }),
        }
    }

    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (list_id, name, url, price, wanted_quantity, purchased_quantity)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(new.list_id)
        .bind(&new.name)
        .bind(&new.url)
        .bind(&new.price)
        .bind(new.wanted_quantity)
        .execute(&self.pool)
        .await?;

        Ok(Item {
            id: result.last_insert_rowid(),
            list_id: new.list_id,
            name: new.name,
            url: new.url,
            price: new.price,
            wanted_quantity: new.wanted_quantity,
            purchased_quantity: 0,
            og_image: None,
        })
    }
}
