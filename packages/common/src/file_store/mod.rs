mod error;
mod traits;

pub mod http;

pub use error::FileStoreError;
pub use traits::{FILE_DELETED, FileDeletion, FileStore};
