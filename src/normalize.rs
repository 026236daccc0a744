//! Image reference normalization
//!
//! Turns whatever a page declared (absolute, protocol-relative or relative)
//! into an absolute URL.

use url::Url;

/// Make `candidate` absolute with respect to the page it was found on.
///
/// - `http://` / `https://` references are returned unchanged
/// - `//host/path` gets an `https:` scheme
/// - anything else is resolved against the root of the page's site
///
/// If resolution fails the candidate is returned as-is; a malformed
/// reference never fails the extraction.
pub fn normalize_image_url(candidate: &str, page_url: &str) -> String {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return candidate.to_string();
    }
    if candidate.starts_with("//") {
        return format!("https:{candidate}");
    }

    // Site root, not the page's directory: `img.jpg` on `/p/1` is `/img.jpg`.
    match site_root(page_url).and_then(|root| root.join(candidate).ok()) {
        Some(resolved) => resolved.to_string(),
        None => candidate.to_string(),
    }
}

fn site_root(page_url: &str) -> Option<Url> {
    let mut root = Url::parse(page_url).ok()?;
    if root.cannot_be_a_base() {
        return None;
    }
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    Some(root)
}
