//! Item image resolution: cache lookup, fetch, extract, persist.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::extractors::{extract_image, ExtractionResult, PageDocument};
use crate::fetcher::PageFetcher;
use crate::store::ItemStore;

/// Resolves and caches the product image of gift-list items.
///
/// Holds no state of its own; concurrent calls for different items are
/// independent. Two concurrent calls for the same uncached item may both
/// fetch; only the first write lands and an image already on the item is
/// never replaced.
#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ItemStore>,
}

impl ImageResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, store: Arc<dyn ItemStore>) -> Self {
        Self { fetcher, store }
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Image URL for item `item_id`, or `None` when none could be found.
    ///
    /// A stored image is returned without any fetch. Otherwise the item's
    /// page is fetched and scanned, and a found image is written back to the
    /// store. Nothing is written when no image is found, so a later call
    /// tries again.
    pub async fn resolve(&self, item_id: i64) -> Result<Option<String>, ResolveError> {
        let item = self
            .store
            .get_item(item_id)
            .await?
            .ok_or(ResolveError::ItemNotFound { id: item_id })?;

        if let Some(cached) = item.cached_image_ref() {
            debug!(item_id, "using cached image");
            return Ok(Some(cached.to_string()));
        }

        let Some(html) = self.fetcher.fetch_page(&item.url).await else {
            return Ok(None);
        };

        let page = PageDocument::new(item.url, html);
        let page_url = page.url.clone();
        let result = match tokio::task::spawn_blocking(move || extract_image(&page)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(item_id, error = %e, "image extraction task failed");
                return Ok(None);
            }
        };

        match result {
            ExtractionResult::Found { url, strategy } => {
                match self.store.set_cached_image_ref(item_id, &url).await {
                    Ok(true) => {
                        info!(item_id, %url, strategy, "resolved item image");
                        Ok(Some(url))
                    }
                    Ok(false) => Ok(Some(self.image_set_meanwhile(item_id, url).await)),
                    Err(e) => {
                        warn!(item_id, error = %e, "failed to persist resolved image");
                        Ok(Some(url))
                    }
                }
            }
            ExtractionResult::NotFound => {
                debug!(item_id, page = %page_url, "no image on page");
                Ok(None)
            }
        }
    }

    /// The image written while our fetch was in flight, falling back to
    /// `resolved` if it cannot be read back.
    async fn image_set_meanwhile(&self, item_id: i64, resolved: String) -> String {
        match self.store.get_item(item_id).await {
            Ok(Some(item)) => match item.cached_image_ref() {
                Some(stored) => {
                    debug!(item_id, "item image set during resolution, keeping it");
                    stored.to_string()
                }
                None => resolved,
            },
            Ok(None) => resolved,
            Err(e) => {
                warn!(item_id, error = %e, "failed to reload item image");
                resolved
            }
        }
    }
}
