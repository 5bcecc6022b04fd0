use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use crate::deletion::{RecipeDeleter, resolve_owner};
use crate::entity::{recipe, recipe_comment, recipe_like, recipe_rating};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::recipe::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List all recipes",
    description = "Returns every recipe with file and thumbnail URLs resolved. Responds 404 when there are none.",
    responses(
        (status = 200, description = "All recipes", body = Vec<RecipeResponse>),
        (status = 404, description = "No recipes (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = recipe::Entity::find()
        .order_by_asc(recipe::Column::Id)
        .all(&state.db)
        .await?;
    present_list(recipes, &state)
}

#[utoipa::path(
    get,
    path = "/app/{app_id}",
    tag = "Recipes",
    operation_id = "listRecipesByApp",
    summary = "List recipes posted from one application",
    params(("app_id" = String, Path, description = "Client application ID")),
    responses(
        (status = 200, description = "Recipes for the application", body = Vec<RecipeResponse>),
        (status = 404, description = "No recipes (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_recipes_by_app(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = recipe::Entity::find()
        .filter(recipe::Column::AppId.eq(app_id))
        .order_by_asc(recipe::Column::Id)
        .all(&state.db)
        .await?;
    present_list(recipes, &state)
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "getRecipe",
    summary = "Get a recipe by ID",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let model = find_recipe(&state.db, id).await?;
    Ok(Json(RecipeResponse::present(
        model,
        &state.config.upload.public_url,
    )))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Recipes",
    operation_id = "createRecipe",
    summary = "Create a recipe",
    description = "Creates a recipe owned by the caller. `filename` is the storage key returned by the upload server.",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title, user = %auth_user.username))]
pub async fn create_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_recipe(&payload)?;

    let new_recipe = recipe::ActiveModel {
        user_id: Set(auth_user.user_id),
        app_id: Set(payload.app_id),
        filename: Set(payload.filename.trim().to_string()),
        filesize: Set(payload.filesize),
        media_type: Set(payload.media_type),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        serving: Set(payload.serving),
        cook_time: Set(payload.cook_time),
        ingredients: Set(payload.ingredients),
        instruction: Set(payload.instruction),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = new_recipe.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeCreatedResponse {
            message: "Recipe created".into(),
            recipe: RecipeResponse::present(model, &state.config.upload.public_url),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "updateRecipe",
    summary = "Update a recipe",
    description = "Partially updates the text fields of a recipe. Only the owner or an admin may update.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user = %auth_user.username))]
pub async fn update_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    validate_update_recipe(&payload)?;

    let existing = find_recipe(&state.db, id).await?;
    let owner_id =
        resolve_owner(existing.user_id, &auth_user.principal()).ok_or(AppError::PermissionDenied)?;

    let mut changes = <recipe::ActiveModel as Default>::default();
    if let Some(title) = payload.title {
        changes.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        changes.description = Set(description);
    }
    if let Some(serving) = payload.serving {
        changes.serving = Set(serving);
    }
    if let Some(cook_time) = payload.cook_time {
        changes.cook_time = Set(cook_time);
    }
    if let Some(ingredients) = payload.ingredients {
        changes.ingredients = Set(ingredients);
    }
    if let Some(instruction) = payload.instruction {
        changes.instruction = Set(instruction);
    }

    let result = recipe::Entity::update_many()
        .set(changes)
        .filter(recipe::Column::Id.eq(id))
        .filter(recipe::Column::UserId.eq(owner_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Recipe not found".into()));
    }

    let updated = find_recipe(&state.db, id).await?;
    Ok(Json(RecipeResponse::present(
        updated,
        &state.config.upload.public_url,
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe",
    description = "Deletes the recipe, its likes, comments and ratings, and its uploaded file. \
        Either everything is removed or nothing is. Only the owner or an admin may delete.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Nothing was deleted (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user = %auth_user.username))]
pub async fn delete_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleter = RecipeDeleter::new(
        &state.db,
        state.file_store.as_ref(),
        &state.config.upload,
    );

    let outcome = deleter
        .delete(id, &auth_user.principal(), &auth_user.token)
        .await;
    match AppError::from_delete_outcome(id, outcome) {
        Some(err) => Err(err),
        None => Ok(Json(MessageResponse::new(outcome.message()))),
    }
}

#[utoipa::path(
    get,
    path = "/most-liked",
    tag = "Recipe Rankings",
    operation_id = "mostLikedRecipe",
    summary = "Recipe with the most likes",
    responses(
        (status = 200, description = "Top recipe and its like count", body = RankedRecipeResponse),
        (status = 404, description = "No likes yet (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn most_liked_recipe(
    State(state): State<AppState>,
) -> Result<Json<RankedRecipeResponse>, AppError> {
    let counts: Vec<(i32, i64)> = recipe_like::Entity::find()
        .select_only()
        .column(recipe_like::Column::RecipeId)
        .column_as(recipe_like::Column::Id.count(), "total")
        .group_by(recipe_like::Column::RecipeId)
        .into_tuple()
        .all(&state.db)
        .await?;

    let scores = counts.into_iter().map(|(id, n)| (id, n as f64));
    ranked_response(&state, pick_top(scores), "No liked recipes found").await
}

#[utoipa::path(
    get,
    path = "/most-commented",
    tag = "Recipe Rankings",
    operation_id = "mostCommentedRecipe",
    summary = "Recipe with the most comments",
    responses(
        (status = 200, description = "Top recipe and its comment count", body = RankedRecipeResponse),
        (status = 404, description = "No comments yet (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn most_commented_recipe(
    State(state): State<AppState>,
) -> Result<Json<RankedRecipeResponse>, AppError> {
    let counts: Vec<(i32, i64)> = recipe_comment::Entity::find()
        .select_only()
        .column(recipe_comment::Column::RecipeId)
        .column_as(recipe_comment::Column::Id.count(), "total")
        .group_by(recipe_comment::Column::RecipeId)
        .into_tuple()
        .all(&state.db)
        .await?;

    let scores = counts.into_iter().map(|(id, n)| (id, n as f64));
    ranked_response(&state, pick_top(scores), "No commented recipes found").await
}

#[utoipa::path(
    get,
    path = "/highest-rated",
    tag = "Recipe Rankings",
    operation_id = "highestRatedRecipe",
    summary = "Recipe with the highest average rating",
    responses(
        (status = 200, description = "Top recipe and its average rating", body = RankedRecipeResponse),
        (status = 404, description = "No ratings yet (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn highest_rated_recipe(
    State(state): State<AppState>,
) -> Result<Json<RankedRecipeResponse>, AppError> {
    let totals: Vec<(i32, i64, i64)> = recipe_rating::Entity::find()
        .select_only()
        .column(recipe_rating::Column::RecipeId)
        .column_as(recipe_rating::Column::RatingValue.sum(), "rating_sum")
        .column_as(recipe_rating::Column::Id.count(), "rating_count")
        .group_by(recipe_rating::Column::RecipeId)
        .into_tuple()
        .all(&state.db)
        .await?;

    let scores = totals
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(id, sum, count)| (id, sum as f64 / count as f64));
    ranked_response(&state, pick_top(scores), "No rated recipes found").await
}

/// Highest score wins; ties go to the lower recipe ID.
fn pick_top(scores: impl IntoIterator<Item = (i32, f64)>) -> Option<(i32, f64)> {
    scores.into_iter().fold(None, |best, (id, score)| match best {
        Some((best_id, best_score))
            if best_score > score || (best_score == score && best_id < id) =>
        {
            Some((best_id, best_score))
        }
        _ => Some((id, score)),
    })
}

async fn ranked_response(
    state: &AppState,
    top: Option<(i32, f64)>,
    empty_message: &str,
) -> Result<Json<RankedRecipeResponse>, AppError> {
    let (id, score) = top.ok_or_else(|| AppError::NotFound(empty_message.into()))?;
    let model = find_recipe(&state.db, id).await?;
    Ok(Json(RankedRecipeResponse {
        recipe: RecipeResponse::present(model, &state.config.upload.public_url),
        score,
    }))
}

fn present_list(
    recipes: Vec<recipe::Model>,
    state: &AppState,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    if recipes.is_empty() {
        return Err(AppError::NotFound("No recipes found".into()));
    }
    let public_url = &state.config.upload.public_url;
    Ok(Json(
        recipes
            .into_iter()
            .map(|model| RecipeResponse::present(model, public_url))
            .collect(),
    ))
}

async fn find_recipe<C: ConnectionTrait>(db: &C, id: i32) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}
