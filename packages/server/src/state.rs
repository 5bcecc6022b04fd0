use std::sync::Arc;

use common::FileStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Upload server holding the files behind recipes.
    pub file_store: Arc<dyn FileStore>,
}
