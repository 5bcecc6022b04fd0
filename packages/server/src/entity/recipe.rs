use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owner of the recipe.
    pub user_id: i32,
    /// Client application the recipe was posted from.
    pub app_id: Option<String>,

    /// Bare storage key of the uploaded file, never a presentation URL.
    pub filename: String,
    pub filesize: i64,
    pub media_type: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub serving: String,
    pub cook_time: String,
    #[sea_orm(column_type = "Text")]
    pub ingredients: String,
    #[sea_orm(column_type = "Text")]
    pub instruction: String,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::recipe_like::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::recipe_comment::Entity>,

    #[sea_orm(has_many)]
    pub ratings: HasMany<super::recipe_rating::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
