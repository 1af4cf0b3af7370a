//! Article link resolution.

use reqwest::Url;

/// Resolve a listing link to an absolute URL.
///
/// Host-relative links (`/path`) are prefixed with `base_url`. Absolute links
/// are returned unchanged. Anything else (protocol-relative or path-relative)
/// is joined against `base_url`. Returns `None` for empty, fragment-only or
/// non-HTTP links.
#[must_use]
pub fn resolve_article_url(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{}{href}", base_url.trim_end_matches('/')));
    }

    if let Ok(absolute) = Url::parse(href) {
        return is_http(&absolute).then(|| href.to_string());
    }

    let base = Url::parse(base_url).ok()?;
    let joined = base.join(href).ok()?;
    is_http(&joined).then(|| joined.to_string())
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
