use thiserror::Error;
use uuid::Uuid;

use crate::shows::validation::ValidationErrors;
use crate::store::StoreError;

/// Errors produced by show operations
#[derive(Error, Debug)]
pub enum ShowError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("show '{0}' has no steps")]
    NoStepsAvailable(Uuid),

    #[error("{0}")]
    Conflict(String),

    #[error("show '{show_id}' points at missing step '{step_id}'")]
    DanglingCurrentStep { show_id: Uuid, step_id: Uuid },

    #[error(transparent)]
    Store(StoreError),
}

impl ShowError {
    pub fn show_not_found(id: Uuid) -> Self {
        ShowError::NotFound {
            entity: "show",
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ShowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ShowError::NotFound {
                entity,
                id: id.to_string(),
            },
            StoreError::Conflict(msg) => ShowError::Conflict(msg),
            err @ StoreError::CurrentStepChanged { .. } => ShowError::Conflict(err.to_string()),
            other => ShowError::Store(other),
        }
    }
}

impl From<ValidationErrors> for ShowError {
    fn from(errors: ValidationErrors) -> Self {
        ShowError::Validation(errors)
    }
}
