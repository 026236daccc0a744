//! Product image resolver for gift-list items
//!
//! Given an item's product page, finds a representative image:
//! - OpenGraph / Twitter Card / `_fbImage` meta tags
//! - `<link rel="image_src">`
//! - JSON-LD (with @graph support)
//! - `itemprop="image"` microdata
//! - main product `<img>` heuristics
//! - Amazon's embedded image data
//!
//! Resolved images are cached on the item so each page is scanned once.

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod normalize;
pub mod resolver;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{FetchError, ResolveError, StoreError};
pub use extractors::{extract_image, ExtractionResult, ImageCandidate, PageDocument};
pub use fetcher::{FetchConfig, HttpFetcher, PageFetcher};
pub use normalize::normalize_image_url;
pub use resolver::ImageResolver;
pub use server::{create_app, AppState};
pub use store::{Item, ItemStore, MemoryStore, NewItem};
