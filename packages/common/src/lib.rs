pub mod config;
pub mod file_store;
pub mod storage_key;

pub use config::UploadConfig;
pub use file_store::{FILE_DELETED, FileDeletion, FileStore, FileStoreError};
