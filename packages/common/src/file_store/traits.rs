use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::FileStoreError;

/// Message the upload server returns when a file was actually removed.
pub const FILE_DELETED: &str = "File deleted";

/// Answer from the upload server for one deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeletion {
    /// HTTP status of the response.
    pub status: u16,
    /// `message` field of the response body.
    pub message: String,
}

impl FileDeletion {
    /// Whether the upload server explicitly confirmed the deletion.
    ///
    /// Only a 2xx status carrying the exact [`FILE_DELETED`] message counts.
    pub fn is_confirmed(&self) -> bool {
        (200..300).contains(&self.status) && self.message == FILE_DELETED
    }
}

/// Remote storage holding the files behind recipe records.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Ask the store to remove the file at `storage_key`, acting as the holder of `auth_token`.
    async fn delete_file(
        &self,
        storage_key: &str,
        auth_token: &str,
    ) -> Result<FileDeletion, FileStoreError>;
}
