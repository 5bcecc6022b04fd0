use thiserror::Error;

/// Errors that prevent the upload server from giving any answer at all.
///
/// A well-formed refusal is not an error here; it comes back as an
/// unconfirmed [`FileDeletion`](super::FileDeletion).
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The storage key cannot be turned into a request URL.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// `upload.server_url` is not an absolute http(s) base URL.
    #[error("invalid upload server URL: {0}")]
    InvalidServerUrl(String),

    /// Connection, TLS or timeout failure.
    #[error("upload server request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not the expected `{"message": ...}` shape.
    #[error("unexpected upload server response ({status}): {body}")]
    Decode { status: u16, body: String },
}
