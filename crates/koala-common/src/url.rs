//! URL resolution utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)

use url::Url;

/// [URL Standard § 4.4 URL parsing](https://url.spec.whatwg.org/#concept-basic-url-parser)
///
/// Resolve a potentially relative URL against an optional base URL.
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// Returns `None` when `href` is relative and there is no base, or when the
/// result is not a valid URL.
#[must_use]
pub fn resolve_url(href: &str, base: Option<&Url>) -> Option<Url> {
    // STEP 1: Absolute references parse on their own.
    if let Ok(url) = Url::parse(href) {
        return Some(url);
    }

    // STEP 2: Relative references need a base.
    base.and_then(|base| base.join(href).ok())
}

/// Parse `href` as an absolute URL, if it is one.
#[must_use]
pub fn parse_absolute(href: &str) -> Option<Url> {
    Url::parse(href).ok()
}
