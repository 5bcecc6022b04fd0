use chrono::{DateTime, Utc};
use common::storage_key;
use serde::{Deserialize, Serialize};

use crate::entity::recipe;
use crate::error::AppError;
use crate::utils::filename::validate_storage_key;

use super::shared::{validate_not_blank, validate_title};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRecipeRequest {
    pub app_id: Option<String>,
    /// Storage key returned by the upload server.
    #[schema(example = "c1f3b2a7e8.jpg")]
    pub filename: String,
    pub filesize: i64,
    #[schema(example = "image/jpeg")]
    pub media_type: String,
    pub title: String,
    pub description: String,
    pub serving: String,
    pub cook_time: String,
    pub ingredients: String,
    pub instruction: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub serving: Option<String>,
    pub cook_time: Option<String>,
    pub ingredients: Option<String>,
    pub instruction: Option<String>,
}

/// Response DTO for a single recipe, with file URLs resolved for clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub user_id: i32,
    pub app_id: Option<String>,
    /// Public URL of the uploaded file.
    #[schema(example = "https://uploads.example.com/uploads/c1f3b2a7e8.jpg")]
    pub filename: String,
    /// Public URL of the generated thumbnail.
    #[schema(example = "https://uploads.example.com/uploads/c1f3b2a7e8.jpg-thumb.png")]
    pub thumbnail: String,
    pub filesize: i64,
    pub media_type: String,
    pub title: String,
    pub description: String,
    pub serving: String,
    pub cook_time: String,
    pub ingredients: String,
    pub instruction: String,
    pub created_at: DateTime<Utc>,
}

impl RecipeResponse {
    pub fn present(model: recipe::Model, public_url: &str) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            app_id: model.app_id,
            filename: storage_key::present(public_url, &model.filename),
            thumbnail: storage_key::thumbnail(public_url, &model.filename),
            filesize: model.filesize,
            media_type: model.media_type,
            title: model.title,
            description: model.description,
            serving: model.serving,
            cook_time: model.cook_time,
            ingredients: model.ingredients,
            instruction: model.instruction,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeCreatedResponse {
    #[schema(example = "Recipe created")]
    pub message: String,
    pub recipe: RecipeResponse,
}

/// A recipe together with the figure it was ranked by.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RankedRecipeResponse {
    pub recipe: RecipeResponse,
    /// Like count, comment count, or average rating, depending on the ranking.
    #[schema(example = 12.0)]
    pub score: f64,
}

pub fn validate_create_recipe(req: &CreateRecipeRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_not_blank(&req.description, "description")?;
    validate_not_blank(&req.serving, "serving")?;
    validate_not_blank(&req.cook_time, "cook_time")?;
    validate_not_blank(&req.ingredients, "ingredients")?;
    validate_not_blank(&req.instruction, "instruction")?;
    validate_not_blank(&req.media_type, "media_type")?;
    validate_storage_key(&req.filename).map_err(|e| AppError::Validation(e.message().into()))?;
    if req.filesize < 0 {
        return Err(AppError::Validation("filesize must be >= 0".into()));
    }
    Ok(())
}

pub fn validate_update_recipe(req: &UpdateRecipeRequest) -> Result<(), AppError> {
    if *req == UpdateRecipeRequest::default() {
        return Err(AppError::Validation("No fields to update".into()));
    }
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    let text_fields = [
        (&req.description, "description"),
        (&req.serving, "serving"),
        (&req.cook_time, "cook_time"),
        (&req.ingredients, "ingredients"),
        (&req.instruction, "instruction"),
    ];
    for (value, name) in text_fields {
        if let Some(value) = value {
            validate_not_blank(value, name)?;
        }
    }
    Ok(())
}
