//! Conversions between bare storage keys and the URLs handed to clients.
//!
//! The database only ever holds the bare key. Presentation prepends the
//! configured public prefix; normalization removes it again, so
//! `normalize(prefix, &present(prefix, key)) == key` for every key.

/// Suffix the upload server appends to a file's key for its thumbnail.
pub const THUMBNAIL_SUFFIX: &str = "-thumb.png";

/// Build the client-facing URL for a storage key.
pub fn present(public_url: &str, key: &str) -> String {
    format!("{public_url}{key}")
}

/// Build the client-facing thumbnail URL for a storage key.
pub fn thumbnail(public_url: &str, key: &str) -> String {
    format!("{public_url}{key}{THUMBNAIL_SUFFIX}")
}

/// Strip one leading public prefix from a stored filename, yielding the bare key.
///
/// Values without the prefix are returned unchanged. An empty prefix is the identity.
pub fn normalize<'a>(public_url: &str, stored: &'a str) -> &'a str {
    if public_url.is_empty() {
        return stored;
    }
    stored.strip_prefix(public_url).unwrap_or(stored)
}
