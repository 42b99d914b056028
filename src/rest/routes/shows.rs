//! Show endpoints: creation, lookup, recipe items and lifecycle flags.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::rest::dto::{CreateShowRequest, ShowResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::routes::parse_id;
use crate::rest::state::ApiState;

/// Create a show
#[utoipa::path(
    post,
    path = "/show",
    tag = "Shows",
    request_body = CreateShowRequest,
    responses(
        (status = 200, description = "Show created", body = ShowResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<CreateShowRequest>, JsonRejection>,
) -> Result<Json<ShowResponse>, ApiError> {
    let Json(request) = payload?;
    let details = state.service.create_show(request).await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Get a show with its steps and recipe items
#[utoipa::path(
    get,
    path = "/show/{show_id}",
    tag = "Shows",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    responses(
        (status = 200, description = "Show details", body = ShowResponse),
        (status = 404, description = "Show not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
) -> Result<Json<ShowResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let details = state.service.get_show(show_id).await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Get the next show: the earliest unfinished show that is live or upcoming
#[utoipa::path(
    get,
    path = "/show/next",
    tag = "Shows",
    responses(
        (status = 200, description = "Next show", body = ShowResponse),
        (status = 404, description = "No upcoming show", body = ErrorResponse)
    )
)]
pub async fn next(State(state): State<ApiState>) -> Result<Json<ShowResponse>, ApiError> {
    let details = state.service.get_next_show().await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Attach a recipe item to a show
#[utoipa::path(
    post,
    path = "/show/{show_id}/item/{recipe_id}",
    tag = "Shows",
    params(
        ("show_id" = String, Path, description = "Show identifier"),
        ("recipe_id" = String, Path, description = "Recipe item identifier")
    ),
    responses(
        (status = 200, description = "Show with the item attached", body = ShowResponse),
        (status = 400, description = "Unable to add recipe item", body = ErrorResponse),
        (status = 404, description = "Show not found", body = ErrorResponse)
    )
)]
pub async fn attach_item(
    State(state): State<ApiState>,
    Path((show_id, recipe_id)): Path<(String, String)>,
) -> Result<Json<ShowResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    // an unparseable item id is just another item that does not exist
    let Ok(recipe_id) = Uuid::parse_str(&recipe_id) else {
        state.service.get_show(show_id).await?;
        return Err(ApiError::ValidationError(
            "Unable to add recipe item.".to_string(),
            None,
        ));
    };

    let details = state.service.attach_recipe_item(show_id, recipe_id).await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Mark a show as started
#[utoipa::path(
    post,
    path = "/show/{show_id}/start",
    tag = "Shows",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    responses(
        (status = 200, description = "Show marked started", body = ShowResponse),
        (status = 404, description = "Show not found", body = ErrorResponse)
    )
)]
pub async fn start(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
) -> Result<Json<ShowResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let details = state.service.set_started(show_id).await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Mark a show as finished
#[utoipa::path(
    post,
    path = "/show/{show_id}/finished",
    tag = "Shows",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    responses(
        (status = 200, description = "Show marked finished", body = ShowResponse),
        (status = 404, description = "Show not found", body = ErrorResponse)
    )
)]
pub async fn finish(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
) -> Result<Json<ShowResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let details = state.service.set_finished(show_id).await?;
    Ok(Json(ShowResponse::from(&details)))
}
