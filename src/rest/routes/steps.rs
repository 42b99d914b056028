//! Step endpoints: creation and current-step progression.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::rest::dto::{CreateStepRequest, ShowResponse, StepResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::routes::parse_id;
use crate::rest::state::ApiState;

/// Add a step to a show
#[utoipa::path(
    post,
    path = "/show/{show_id}/step",
    tag = "Steps",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    request_body = CreateStepRequest,
    responses(
        (status = 200, description = "Show including the new step", body = ShowResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 404, description = "Show not found", body = ErrorResponse),
        (status = 409, description = "Step number already used in this show", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
    payload: Result<Json<CreateStepRequest>, JsonRejection>,
) -> Result<Json<ShowResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let Json(request) = payload?;
    let details = state.service.create_step(show_id, request).await?;
    Ok(Json(ShowResponse::from(&details)))
}

/// Get the current step, pointing the show at its first step if unset
#[utoipa::path(
    get,
    path = "/show/{show_id}/step/current",
    tag = "Steps",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    responses(
        (status = 200, description = "Current step", body = StepResponse),
        (status = 404, description = "Show not found or show has no steps", body = ErrorResponse)
    )
)]
pub async fn current(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
) -> Result<Json<StepResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let step = state.service.get_current_step(show_id).await?;
    Ok(Json(StepResponse::from(&step)))
}

/// Advance to the step numbered one past the current step
///
/// Stays on the current step when no such step exists.
#[utoipa::path(
    put,
    path = "/show/{show_id}/step/next",
    tag = "Steps",
    params(
        ("show_id" = String, Path, description = "Show identifier")
    ),
    responses(
        (status = 200, description = "New (or unchanged) current step", body = StepResponse),
        (status = 404, description = "Show not found or show has no steps", body = ErrorResponse),
        (status = 409, description = "Current step changed concurrently", body = ErrorResponse)
    )
)]
pub async fn advance(
    State(state): State<ApiState>,
    Path(show_id): Path<String>,
) -> Result<Json<StepResponse>, ApiError> {
    let show_id = parse_id(&show_id, "show")?;
    let step = state.service.advance_step(show_id).await?;
    Ok(Json(StepResponse::from(&step)))
}
