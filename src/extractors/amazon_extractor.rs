//! Amazon product page fallbacks
//!
//! Amazon often ships no usable meta tags; the product images live in
//! inline JavaScript and data attributes instead. These scans are brittle
//! by nature and run last. Every URL found here is an absolute CDN URL and
//! is returned as-is.

use std::sync::LazyLock;

use regex::Regex;

use super::ImageCandidate;

/// Size token requested when upgrading a CDN thumbnail
pub const AMAZON_LARGE_SIZE: &str = "._SL1500_.";

static COLOR_IMAGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)'colorImages':\s*\{\s*'initial':\s*\[(.*?)\]").unwrap()
});
static HI_RES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""hiRes":"([^"]+)""#).unwrap());
static LARGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""large":"([^"]+)""#).unwrap());

static GALLERY_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)imageGalleryData\s*['"]?\s*:\s*\[(.*?)\]"#).unwrap()
});
static MAIN_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""mainUrl":"([^"]+)""#).unwrap());

static DYNAMIC_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-a-dynamic-image=["']\{([^}]+)\}"#).unwrap()
});
static JPG_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https://[^"'&\s]+?\.jpg)"#).unwrap());

static MEDIA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"https://m\.media-amazon\.com/images/I/[A-Za-z0-9_+-]+\._[^"'\s]*?(?:SX|SY|UX|UY)[0-9]{3,4}[^"'\s]*?\.jpg"#,
    )
    .unwrap()
});
static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\._[^.]+_\.").unwrap());

fn capture_in(outer: &Regex, inner: &Regex, html: &str) -> Option<String> {
    let block = outer.captures(html)?.get(1)?.as_str();
    inner
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// `'colorImages': { 'initial': [...] }`: first `hiRes`, else first `large`
pub fn find_amazon_color_images(html: &str) -> Option<ImageCandidate> {
    let block = COLOR_IMAGES.captures(html)?.get(1)?.as_str();
    HI_RES
        .captures(block)
        .or_else(|| LARGE.captures(block))
        .and_then(|c| c.get(1))
        .map(|m| ImageCandidate::Absolute(m.as_str().to_string()))
}

/// `imageGalleryData: [...]`: first `mainUrl`
pub fn find_amazon_gallery_image(html: &str) -> Option<ImageCandidate> {
    capture_in(&GALLERY_DATA, &MAIN_URL, html).map(ImageCandidate::Absolute)
}

/// `data-a-dynamic-image="{...}"`: first `.jpg` URL in the map
pub fn find_amazon_dynamic_image(html: &str) -> Option<ImageCandidate> {
    capture_in(&DYNAMIC_IMAGE, &JPG_URL, html).map(ImageCandidate::Absolute)
}

/// Any sized image on Amazon's media CDN, upgraded to the large size
pub fn find_amazon_media_image(html: &str) -> Option<ImageCandidate> {
    let found = MEDIA_URL.find(html)?.as_str();
    Some(ImageCandidate::Absolute(upsize_amazon_image(found)))
}

/// Swap the first `._<size>_.` token in a CDN URL for [`AMAZON_LARGE_SIZE`].
///
/// URLs without a size token come back unchanged.
pub fn upsize_amazon_image(url: &str) -> String {
    SIZE_TOKEN.replace(url, AMAZON_LARGE_SIZE).into_owned()
}
