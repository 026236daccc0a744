//! Main product `<img>` heuristic
//!
//! Looks for an `<img>` whose `id` or `class` suggests it is the primary
//! product picture.

use std::sync::LazyLock;

use regex::Regex;

use super::ImageCandidate;

/// `id` prefixes used by storefronts for the hero image
pub const MAIN_IMG_ID_TOKENS: &[&str] = &["main", "product", "hero", "landingImage", "imgBlkFront"];

/// `class` substrings used by storefronts for the hero image
pub const MAIN_IMG_CLASS_TOKENS: &[&str] = &["main", "product", "hero", "primary"];

static MAIN_IMG: LazyLock<Regex> = LazyLock::new(|| {
    let ids = MAIN_IMG_ID_TOKENS.join("|");
    let classes = MAIN_IMG_CLASS_TOKENS.join("|");
    let pattern = format!(
        r#"(?i)<img[^>]*(?:id=["'](?:{ids})[^"']*["']|class=["'][^"']*(?:{classes})[^"']*["'])[^>]*src=["']([^"']+)["']"#
    );
    Regex::new(&pattern).unwrap()
});

/// `src` of the first `<img>` tagged as the main product image
pub fn find_main_img(html: &str) -> Option<ImageCandidate> {
    MAIN_IMG
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| ImageCandidate::Reference(m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(html: &str) -> Option<String> {
        find_main_img(html).map(|c| c.as_str().to_string())
    }

    #[test]
    fn test_by_id() {
        let html = r#"<img id="landingImage" alt="Kettle" src="https://x/kettle.jpg">"#;
        assert_eq!(src(html).as_deref(), Some("https://x/kettle.jpg"));

        let html = r#"<img id="product-photo-1" src="/img/1.jpg">"#;
        assert_eq!(src(html).as_deref(), Some("/img/1.jpg"));
    }

    #[test]
    fn test_by_class() {
        let html = r#"
        <img class="logo" src="/logo.png">
        <img class="gallery primary-image" width="600" src="/media/big.jpg">
        "#;
        assert_eq!(src(html).as_deref(), Some("/media/big.jpg"));
    }

    #[test]
    fn test_src_must_follow_marker() {
        let html = r#"<img src="/media/x.jpg" class="hero">"#;
        assert_eq!(src(html), None);
    }

    #[test]
    fn test_unmarked_images_ignored() {
        let html = r#"<img id="logo" class="brand" src="/logo.png"><img src="/banner.jpg">"#;
        assert_eq!(src(html), None);
    }
}
