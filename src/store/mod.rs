//! Repository seams between the show service and storage.
//!
//! Write operations return the entity as stored after the write, so callers
//! never need a second fetch to observe their own change.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::shows::{RecipeItem, Show, Step};

pub mod memory;

pub use memory::MemoryStore;

/// Errors raised by repository implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    /// Compare-and-set on the current step lost to another writer
    #[error("current step of show '{show_id}' was changed concurrently")]
    CurrentStepChanged {
        show_id: Uuid,
        actual: Option<Uuid>,
    },

    #[error("snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Show table: lookup, creation and the single-row updates the service needs
#[async_trait]
pub trait ShowRepository: Send + Sync {
    async fn insert_show(&self, show: Show) -> Result<Show, StoreError>;

    async fn get_show(&self, id: Uuid) -> Result<Show, StoreError>;

    /// Earliest unfinished show that is live or starts at/after `now`
    async fn next_show(&self, now: DateTime<Utc>) -> Result<Option<Show>, StoreError>;

    async fn set_started(&self, id: Uuid) -> Result<Show, StoreError>;

    async fn set_finished(&self, id: Uuid) -> Result<Show, StoreError>;

    /// Move the current-step pointer from `expected` to `next`.
    ///
    /// Fails with [`StoreError::CurrentStepChanged`] when the stored pointer
    /// is no longer `expected`.
    async fn set_current_step(
        &self,
        id: Uuid,
        expected: Option<Uuid>,
        next: Uuid,
    ) -> Result<Show, StoreError>;

    async fn attach_recipe_item(&self, show_id: Uuid, item_id: Uuid)
        -> Result<Show, StoreError>;
}

/// Step table, keyed by id and by (show, step_number)
#[async_trait]
pub trait StepRepository: Send + Sync {
    /// Insert a step; a taken (show, step_number) pair is a conflict
    async fn insert_step(&self, step: Step) -> Result<Step, StoreError>;

    async fn get_step(&self, id: Uuid) -> Result<Step, StoreError>;

    async fn find_step_by_number(
        &self,
        show_id: Uuid,
        step_number: u32,
    ) -> Result<Option<Step>, StoreError>;

    /// All steps of a show ordered by `step_number`
    async fn list_steps(&self, show_id: Uuid) -> Result<Vec<Step>, StoreError>;
}

/// Recipe item catalog
#[async_trait]
pub trait RecipeItemRepository: Send + Sync {
    async fn insert_recipe_item(&self, item: RecipeItem) -> Result<RecipeItem, StoreError>;

    async fn get_recipe_item(&self, id: Uuid) -> Result<RecipeItem, StoreError>;

    /// Items for `ids` in the given order; unknown ids are skipped
    async fn get_recipe_items(&self, ids: &[Uuid]) -> Result<Vec<RecipeItem>, StoreError>;
}
