//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::rest::dto::{
    CreateRecipeItemRequest, CreateShowRequest, CreateStepRequest, HealthResponse,
    RecipeItemResponse, ShowResponse, StepResponse,
};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the showrunner REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Showrunner API",
        version = "0.1.0",
        description = "REST API for running cooking shows: shows, their ordered steps and recipe items.",
        license(name = "MIT")
    ),
    paths(
        crate::rest::routes::health::health,
        // Show endpoints
        crate::rest::routes::shows::create,
        crate::rest::routes::shows::next,
        crate::rest::routes::shows::get_one,
        crate::rest::routes::shows::attach_item,
        crate::rest::routes::shows::start,
        crate::rest::routes::shows::finish,
        // Step endpoints
        crate::rest::routes::steps::create,
        crate::rest::routes::steps::current,
        crate::rest::routes::steps::advance,
        // Recipe item endpoints
        crate::rest::routes::recipe_items::create,
        crate::rest::routes::recipe_items::get_one,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            ShowResponse,
            StepResponse,
            RecipeItemResponse,
            ErrorResponse,
            // Request types
            CreateShowRequest,
            CreateStepRequest,
            CreateRecipeItemRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Shows", description = "Show creation, lookup and lifecycle flags"),
        (name = "Steps", description = "Step creation and current-step progression"),
        (name = "Recipe Items", description = "Recipe item catalog"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}
