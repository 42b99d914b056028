//! Recipe item catalog endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::rest::dto::{CreateRecipeItemRequest, RecipeItemResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::routes::parse_id;
use crate::rest::state::ApiState;

/// Create a recipe item
#[utoipa::path(
    post,
    path = "/recipe-item",
    tag = "Recipe Items",
    request_body = CreateRecipeItemRequest,
    responses(
        (status = 200, description = "Recipe item created", body = RecipeItemResponse),
        (status = 400, description = "Missing name", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<CreateRecipeItemRequest>, JsonRejection>,
) -> Result<Json<RecipeItemResponse>, ApiError> {
    let Json(request) = payload?;
    let item = state.service.create_recipe_item(request).await?;
    Ok(Json(RecipeItemResponse::from(&item)))
}

/// Get a recipe item
#[utoipa::path(
    get,
    path = "/recipe-item/{recipe_id}",
    tag = "Recipe Items",
    params(
        ("recipe_id" = String, Path, description = "Recipe item identifier")
    ),
    responses(
        (status = 200, description = "Recipe item", body = RecipeItemResponse),
        (status = 404, description = "Recipe item not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(recipe_id): Path<String>,
) -> Result<Json<RecipeItemResponse>, ApiError> {
    let recipe_id = parse_id(&recipe_id, "recipe item")?;
    let item = state.service.get_recipe_item(recipe_id).await?;
    Ok(Json(RecipeItemResponse::from(&item)))
}
