//! Social meta tag extraction
//!
//! Finds image declarations in `<meta>` and `<link>` tags: OpenGraph,
//! Twitter Card, Facebook's `_fbImage`, `rel="image_src"` and microdata
//! `itemprop="image"`.
//!
//! Pages disagree on attribute order, so every meta lookup is tried with
//! the key attribute before `content` first, then with `content` first.

use std::sync::LazyLock;

use regex::Regex;

use super::ImageCandidate;

static OG_IMAGE: LazyLock<Regex> = LazyLock::new(|| meta_regex("property", "og:image"));
static OG_IMAGE_REV: LazyLock<Regex> = LazyLock::new(|| meta_regex_rev("property", "og:image"));

static TWITTER_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| meta_regex("(?:name|property)", "twitter:image"));
static TWITTER_IMAGE_REV: LazyLock<Regex> =
    LazyLock::new(|| meta_regex_rev("(?:name|property)", "twitter:image"));

static FB_IMAGE: LazyLock<Regex> = LazyLock::new(|| meta_regex("(?:name|property)", "_fbImage"));
static FB_IMAGE_REV: LazyLock<Regex> =
    LazyLock::new(|| meta_regex_rev("(?:name|property)", "_fbImage"));

static ITEMPROP_IMAGE: LazyLock<Regex> = LazyLock::new(|| meta_regex("itemprop", "image"));

static LINK_IMAGE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*rel=["']image_src["'][^>]*href=["']([^"']+)["']"#).unwrap()
});

/// `<meta ... {attr}="{key}" ... content="...">`
fn meta_regex(attr: &str, key: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]*{attr}=["']{key}["'][^>]*content=["']([^"']+)["']"#,
        key = regex::escape(key)
    );
    Regex::new(&pattern).unwrap()
}

/// `<meta ... content="..." ... {attr}="{key}">`
fn meta_regex_rev(attr: &str, key: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]*content=["']([^"']+)["'][^>]*{attr}=["']{key}["']"#,
        key = regex::escape(key)
    );
    Regex::new(&pattern).unwrap()
}

/// First non-blank capture; a blank tag does not hide a later one.
fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures_iter(html).find_map(|c| {
        let value = c.get(1)?.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn either_order(forward: &Regex, reverse: &Regex, html: &str) -> Option<ImageCandidate> {
    first_capture(forward, html)
        .or_else(|| first_capture(reverse, html))
        .map(ImageCandidate::Reference)
}

/// `og:image` meta tag
pub fn find_og_image(html: &str) -> Option<ImageCandidate> {
    either_order(&OG_IMAGE, &OG_IMAGE_REV, html)
}

/// `twitter:image` meta tag, declared with `name` or `property`
pub fn find_twitter_image(html: &str) -> Option<ImageCandidate> {
    either_order(&TWITTER_IMAGE, &TWITTER_IMAGE_REV, html)
}

/// Facebook's `_fbImage` meta tag
pub fn find_fb_image(html: &str) -> Option<ImageCandidate> {
    either_order(&FB_IMAGE, &FB_IMAGE_REV, html)
}

/// `<link rel="image_src" href="...">`
pub fn find_link_image_src(html: &str) -> Option<ImageCandidate> {
    first_capture(&LINK_IMAGE_SRC, html).map(ImageCandidate::Reference)
}

/// `<meta itemprop="image" content="...">`
pub fn find_itemprop_image(html: &str) -> Option<ImageCandidate> {
    first_capture(&ITEMPROP_IMAGE, html).map(ImageCandidate::Reference)
}
