//! Product image extraction
//!
//! Each module scans raw page text for one family of image declarations.
//! Nothing here parses HTML into a tree: real product pages are too often
//! malformed, and a miss is an acceptable answer.
//!
//! [`extract_image`] runs [`STRATEGIES`] in order and stops at the first hit.

mod amazon_extractor;
mod img_extractor;
mod jsonld_extractor;
mod meta_extractor;

pub use amazon_extractor::*;
pub use img_extractor::*;
pub use jsonld_extractor::*;
pub use meta_extractor::*;

use crate::normalize::normalize_image_url;

/// A fetched page and the URL it was fetched from.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub url: String,
    pub html: String,
}

impl PageDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Image reference produced by a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCandidate {
    /// Taken from page markup; may be relative or protocol-relative
    Reference(String),
    /// Pulled from vendor data that only ever holds absolute CDN URLs
    Absolute(String),
}

impl ImageCandidate {
    pub fn as_str(&self) -> &str {
        match self {
            ImageCandidate::Reference(s) | ImageCandidate::Absolute(s) => s,
        }
    }

    /// Resolve into the URL handed back to callers.
    pub fn into_url(self, page_url: &str) -> String {
        match self {
            ImageCandidate::Reference(s) => normalize_image_url(&s, page_url),
            ImageCandidate::Absolute(s) => s,
        }
    }
}

/// Outcome of running the cascade over a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Found {
        url: String,
        /// Name of the strategy that matched
        strategy: &'static str,
    },
    NotFound,
}

impl ExtractionResult {
    pub fn url(&self) -> Option<&str> {
        match self {
            ExtractionResult::Found { url, .. } => Some(url),
            ExtractionResult::NotFound => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            ExtractionResult::Found { url, .. } => Some(url),
            ExtractionResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractionResult::Found { .. })
    }
}

/// One step of the cascade.
///
/// `find` must be pure: it only reads the page text.
pub struct Strategy {
    pub name: &'static str,
    pub find: fn(&str) -> Option<ImageCandidate>,
}

/// Extraction strategies, most reliable first.
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "og:image",
        find: find_og_image,
    },
    Strategy {
        name: "twitter:image",
        find: find_twitter_image,
    },
    Strategy {
        name: "_fbImage",
        find: find_fb_image,
    },
    Strategy {
        name: "link:image_src",
        find: find_link_image_src,
    },
    Strategy {
        name: "json-ld",
        find: find_jsonld_image,
    },
    Strategy {
        name: "itemprop:image",
        find: find_itemprop_image,
    },
    Strategy {
        name: "main-img",
        find: find_main_img,
    },
    Strategy {
        name: "amazon:colorImages",
        find: find_amazon_color_images,
    },
    Strategy {
        name: "amazon:imageGalleryData",
        find: find_amazon_gallery_image,
    },
    Strategy {
        name: "amazon:dynamic-image",
        find: find_amazon_dynamic_image,
    },
    Strategy {
        name: "amazon:media",
        find: find_amazon_media_image,
    },
];

/// Run the cascade over `page` and return the first image found.
pub fn extract_image(page: &PageDocument) -> ExtractionResult {
    for strategy in STRATEGIES {
        if let Some(candidate) = (strategy.find)(&page.html) {
            let url = candidate.into_url(&page.url);
            tracing::debug!(strategy = strategy.name, %url, page = %page.url, "image found");
            return ExtractionResult::Found {
                url,
                strategy: strategy.name,
            };
        }
    }

    tracing::debug!(page = %page.url, "no image found");
    ExtractionResult::NotFound
}
