use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{FILE_DELETED, FileDeletion, FileStore, FileStoreError, UploadConfig};
use reqwest::Client;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde_json::Value;
use tempfile::TempDir;

use recipe_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use recipe_server::database::init_db;
use recipe_server::entity::{recipe, recipe_comment, recipe_like, recipe_rating};
use recipe_server::state::AppState;
use recipe_server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const PUBLIC_URL: &str = "https://uploads.example.com/uploads/";

pub mod routes {
    pub const RECIPES: &str = "/api/v1/recipes";
    pub const MOST_LIKED: &str = "/api/v1/recipes/most-liked";
    pub const MOST_COMMENTED: &str = "/api/v1/recipes/most-commented";
    pub const HIGHEST_RATED: &str = "/api/v1/recipes/highest-rated";

    pub fn recipe(id: i32) -> String {
        format!("/api/v1/recipes/{id}")
    }

    pub fn recipes_by_app(app_id: &str) -> String {
        format!("/api/v1/recipes/app/{app_id}")
    }
}

pub fn upload_config() -> UploadConfig {
    UploadConfig {
        public_url: PUBLIC_URL.to_string(),
        server_url: "http://127.0.0.1:9/api/v1".to_string(),
        timeout_secs: 2,
    }
}

/// A fresh SQLite database in a temp dir, served by a one-connection pool.
///
/// With a single connection, any path that fails to release it makes the
/// next query time out.
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("recipes.db");

        let mut config = DatabaseConfig::new(format!("sqlite://{}?mode=rwc", path.display()));
        config.max_connections = 1;
        config.min_connections = 1;
        config.acquire_timeout_secs = 2;

        let db = init_db(&config)
            .await
            .expect("Failed to initialize test database");
        Self { db, _dir: dir }
    }

    /// Insert a recipe owned by `user_id` and return its id.
    pub async fn insert_recipe(&self, id: Option<i32>, user_id: i32, filename: &str) -> i32 {
        let mut model = recipe::ActiveModel {
            user_id: Set(user_id),
            app_id: Set(Some("cookbook".into())),
            filename: Set(filename.into()),
            filesize: Set(2048),
            media_type: Set("image/jpeg".into()),
            title: Set("Pancakes".into()),
            description: Set("Fluffy".into()),
            serving: Set("4".into()),
            cook_time: Set("20 min".into()),
            ingredients: Set("flour, milk, eggs".into()),
            instruction: Set("Mix and fry".into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(id) = id {
            model.id = Set(id);
        }
        model.insert(&self.db).await.expect("insert recipe").id
    }

    pub async fn add_like(&self, recipe_id: i32, user_id: i32) {
        recipe_like::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert like");
    }

    pub async fn add_comment(&self, recipe_id: i32, user_id: i32, text: &str) {
        recipe_comment::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            comment_text: Set(text.into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert comment");
    }

    pub async fn add_rating(&self, recipe_id: i32, user_id: i32, value: i32) {
        recipe_rating::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            rating_value: Set(value),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert rating");
    }

    pub async fn recipe_exists(&self, recipe_id: i32) -> bool {
        recipe::Entity::find_by_id(recipe_id)
            .one(&self.db)
            .await
            .expect("query recipe")
            .is_some()
    }

    /// Like, comment and rating counts for one recipe.
    pub async fn dependent_counts(&self, recipe_id: i32) -> (u64, u64, u64) {
        let likes = recipe_like::Entity::find()
            .filter(recipe_like::Column::RecipeId.eq(recipe_id))
            .count(&self.db)
            .await
            .expect("count likes");
        let comments = recipe_comment::Entity::find()
            .filter(recipe_comment::Column::RecipeId.eq(recipe_id))
            .count(&self.db)
            .await
            .expect("count comments");
        let ratings = recipe_rating::Entity::find()
            .filter(recipe_rating::Column::RecipeId.eq(recipe_id))
            .count(&self.db)
            .await
            .expect("count ratings");
        (likes, comments, ratings)
    }

    /// Fails if the pool's only connection was not returned.
    pub async fn assert_connection_released(&self) {
        recipe::Entity::find()
            .count(&self.db)
            .await
            .expect("pooled connection should have been released");
    }
}

#[derive(Clone)]
pub enum StubReply {
    Reply { status: u16, message: String },
    Error,
    Hang,
}

/// In-memory upload server that records every delete call.
pub struct StubFileStore {
    reply: StubReply,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubFileStore {
    pub fn with_reply(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn confirming() -> Arc<Self> {
        Self::replying(200, FILE_DELETED)
    }

    pub fn replying(status: u16, message: &str) -> Arc<Self> {
        Self::with_reply(StubReply::Reply {
            status,
            message: message.into(),
        })
    }

    /// `(storage_key, auth_token)` of every call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStore for StubFileStore {
    async fn delete_file(
        &self,
        storage_key: &str,
        auth_token: &str,
    ) -> Result<FileDeletion, FileStoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((storage_key.to_string(), auth_token.to_string()));

        match &self.reply {
            StubReply::Reply { status, message } => Ok(FileDeletion {
                status: *status,
                message: message.clone(),
            }),
            StubReply::Error => Err(FileStoreError::Decode {
                status: 502,
                body: "<html>Bad Gateway</html>".into(),
            }),
            StubReply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(FileDeletion {
                    status: 200,
                    message: FILE_DELETED.into(),
                })
            }
        }
    }
}

pub fn token_for(user_id: i32, level_name: &str) -> String {
    jwt::sign(user_id, &format!("user{user_id}"), level_name, JWT_SECRET).expect("sign token")
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// A running test server backed by [`TestDb`] and a [`StubFileStore`].
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: TestDb,
    pub files: Arc<StubFileStore>,
}

impl TestApp {
    pub async fn spawn(files: Arc<StubFileStore>) -> Self {
        let store = TestDb::new().await;

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig::new("sqlite::memory:"),
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
            upload: upload_config(),
        };

        let state = AppState {
            db: store.db.clone(),
            config: Arc::new(app_config),
            file_store: files.clone(),
        };

        let app = recipe_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            files,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");
        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }
}
