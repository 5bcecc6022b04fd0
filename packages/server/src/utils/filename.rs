/// Result of validating a storage key.
#[derive(Debug)]
pub enum StorageKeyError {
    /// Key is empty or whitespace-only.
    Empty,
    /// Key contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Key is `..`.
    PathTraversal,
    /// Key contains control characters (CR, LF, NUL, etc.).
    ControlCharacter,
    /// Key starts with a dot (hidden file).
    Hidden,
}

impl StorageKeyError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
        }
    }
}

/// Validates a bare storage key as stored in `recipe_item.filename`.
///
/// The upload server addresses files by a single flat name, so anything that
/// looks like a path, or a presentation URL, is rejected.
pub fn validate_storage_key(key: &str) -> Result<&str, StorageKeyError> {
    let trimmed = key.trim();

    if trimmed.is_empty() {
        return Err(StorageKeyError::Empty);
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(StorageKeyError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(StorageKeyError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(StorageKeyError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(StorageKeyError::Hidden);
    }

    Ok(trimmed)
}
