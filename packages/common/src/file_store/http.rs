use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::error::FileStoreError;
use super::traits::{FileDeletion, FileStore};

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// [`FileStore`] backed by the upload server's `DELETE /delete/{key}` endpoint.
///
/// Every request is bounded by the configured timeout; a timed-out request
/// surfaces as [`FileStoreError::Http`].
#[derive(Clone)]
pub struct HttpFileStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpFileStore {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, FileStoreError> {
        let base_url = Url::parse(server_url)
            .map_err(|e| FileStoreError::InvalidServerUrl(format!("{server_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FileStoreError::InvalidServerUrl(format!(
                "{server_url}: cannot be a base"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &crate::config::UploadConfig) -> Result<Self, FileStoreError> {
        Self::new(&config.server_url, config.timeout())
    }

    fn delete_url(&self, storage_key: &str) -> Result<Url, FileStoreError> {
        if storage_key.trim().is_empty() {
            return Err(FileStoreError::InvalidKey("empty storage key".into()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FileStoreError::InvalidServerUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("delete")
            .push(storage_key);
        Ok(url)
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn delete_file(
        &self,
        storage_key: &str,
        auth_token: &str,
    ) -> Result<FileDeletion, FileStoreError> {
        let url = self.delete_url(storage_key)?;
        let response = self.http.delete(url).bearer_auth(auth_token).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match serde_json::from_str::<MessageBody>(&body) {
            Ok(parsed) => {
                tracing::debug!(storage_key, status, message = %parsed.message, "upload server answered");
                Ok(FileDeletion {
                    status,
                    message: parsed.message,
                })
            }
            Err(_) => Err(FileStoreError::Decode { status, body }),
        }
    }
}
