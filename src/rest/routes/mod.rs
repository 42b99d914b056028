//! Route handlers for the REST API.

use uuid::Uuid;

use crate::rest::error::ApiError;

pub mod health;
pub mod recipe_items;
pub mod shows;
pub mod steps;

/// Parse a path identifier; anything that is not a UUID cannot resolve
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} '{}' not found", entity, raw)))
}
