//! Show progression: lifecycle flags and the current-step pointer.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::shows::validation::{CreateRecipeItemRequest, CreateShowRequest, CreateStepRequest};
use crate::shows::{RecipeItem, Show, ShowDetails, ShowError, Step};
use crate::store::{
    MemoryStore, RecipeItemRepository, ShowRepository, StepRepository, StoreError,
};

/// Operations on shows, backed by the three repositories
#[derive(Clone)]
pub struct ShowService {
    shows: Arc<dyn ShowRepository>,
    steps: Arc<dyn StepRepository>,
    recipe_items: Arc<dyn RecipeItemRepository>,
}

impl ShowService {
    pub fn new(
        shows: Arc<dyn ShowRepository>,
        steps: Arc<dyn StepRepository>,
        recipe_items: Arc<dyn RecipeItemRepository>,
    ) -> Self {
        Self {
            shows,
            steps,
            recipe_items,
        }
    }

    /// Service where one store backs every repository
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }

    pub async fn create_show(&self, request: CreateShowRequest) -> Result<ShowDetails, ShowError> {
        let input = request.validate()?;
        let show = self.shows.insert_show(Show::new(input)).await?;

        tracing::info!(show_id = %show.id, title = %show.title, "Show created");
        self.details(show).await
    }

    pub async fn get_show(&self, show_id: Uuid) -> Result<ShowDetails, ShowError> {
        let show = self.shows.get_show(show_id).await?;
        self.details(show).await
    }

    pub async fn get_next_show(&self) -> Result<ShowDetails, ShowError> {
        let show = self
            .shows
            .next_show(Utc::now())
            .await?
            .ok_or_else(|| ShowError::NotFound {
                entity: "show",
                id: "next".to_string(),
            })?;
        self.details(show).await
    }

    pub async fn attach_recipe_item(
        &self,
        show_id: Uuid,
        recipe_item_id: Uuid,
    ) -> Result<ShowDetails, ShowError> {
        self.shows.get_show(show_id).await?;

        let show = match self.shows.attach_recipe_item(show_id, recipe_item_id).await {
            Ok(show) => show,
            Err(StoreError::NotFound {
                entity: "recipe item",
                ..
            }) => {
                tracing::debug!(%show_id, %recipe_item_id, "Recipe item not found for attach");
                return Err(ShowError::InvalidInput(
                    "Unable to add recipe item.".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(%show_id, %recipe_item_id, "Recipe item attached");
        self.details(show).await
    }

    pub async fn set_started(&self, show_id: Uuid) -> Result<ShowDetails, ShowError> {
        let show = self.shows.set_started(show_id).await?;
        tracing::info!(%show_id, status = %show.status(), "Show started");
        self.details(show).await
    }

    pub async fn set_finished(&self, show_id: Uuid) -> Result<ShowDetails, ShowError> {
        let show = self.shows.set_finished(show_id).await?;
        tracing::info!(%show_id, status = %show.status(), "Show finished");
        self.details(show).await
    }

    pub async fn create_step(
        &self,
        show_id: Uuid,
        request: CreateStepRequest,
    ) -> Result<ShowDetails, ShowError> {
        let input = request.validate(show_id)?;
        let show = self.shows.get_show(show_id).await?;

        let step = self.steps.insert_step(Step::new(input)).await?;
        tracing::info!(
            %show_id,
            step_id = %step.id,
            step_number = step.step_number,
            "Step created"
        );

        self.details(show).await
    }

    /// Current step of the show, pointing it at the first step if unset.
    ///
    /// Only the very first call on a show writes; a show without steps
    /// yields [`ShowError::NoStepsAvailable`].
    pub async fn get_current_step(&self, show_id: Uuid) -> Result<Step, ShowError> {
        let show = self.shows.get_show(show_id).await?;
        self.current_or_init(&show).await
    }

    /// Move the show to the step numbered exactly one past the current one.
    ///
    /// Without such a step (end of sequence or a gap in numbering) the
    /// current step is returned unchanged.
    pub async fn advance_step(&self, show_id: Uuid) -> Result<Step, ShowError> {
        let show = self.shows.get_show(show_id).await?;
        let current = self.current_or_init(&show).await?;

        let Some(next_number) = current.step_number.checked_add(1) else {
            return Ok(current);
        };

        let Some(next) = self.steps.find_step_by_number(show_id, next_number).await? else {
            tracing::debug!(
                %show_id,
                step_number = current.step_number,
                "No successor step, staying put"
            );
            return Ok(current);
        };

        match self
            .shows
            .set_current_step(show_id, Some(current.id), next.id)
            .await
        {
            Ok(_) => {
                tracing::info!(
                    %show_id,
                    from = current.step_number,
                    to = next.step_number,
                    "Advanced step"
                );
                Ok(next)
            }
            Err(e @ StoreError::CurrentStepChanged { .. }) => {
                tracing::warn!(%show_id, "Concurrent step advance: {}", e);
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create_recipe_item(
        &self,
        request: CreateRecipeItemRequest,
    ) -> Result<RecipeItem, ShowError> {
        let input = request.validate()?;
        let item = self
            .recipe_items
            .insert_recipe_item(RecipeItem::new(input))
            .await?;

        tracing::info!(recipe_item_id = %item.id, name = %item.name, "Recipe item created");
        Ok(item)
    }

    pub async fn get_recipe_item(&self, recipe_item_id: Uuid) -> Result<RecipeItem, ShowError> {
        Ok(self.recipe_items.get_recipe_item(recipe_item_id).await?)
    }

    async fn current_or_init(&self, show: &Show) -> Result<Step, ShowError> {
        if let Some(step_id) = show.current_step_id {
            return self.load_current(show.id, step_id).await;
        }

        let first = self
            .steps
            .list_steps(show.id)
            .await?
            .into_iter()
            .next()
            .ok_or(ShowError::NoStepsAvailable(show.id))?;

        match self.shows.set_current_step(show.id, None, first.id).await {
            Ok(_) => {
                tracing::info!(
                    show_id = %show.id,
                    step_number = first.step_number,
                    "Current step initialized"
                );
                Ok(first)
            }
            // someone else initialized it first; theirs stands
            Err(StoreError::CurrentStepChanged {
                actual: Some(step_id),
                ..
            }) => self.load_current(show.id, step_id).await,
            Err(e) => Err(e.into()),
        }
    }

    async fn load_current(&self, show_id: Uuid, step_id: Uuid) -> Result<Step, ShowError> {
        match self.steps.get_step(step_id).await {
            Ok(step) if step.show_id == show_id => Ok(step),
            Ok(_) | Err(StoreError::NotFound { .. }) => {
                tracing::error!(%show_id, %step_id, "Current step does not resolve");
                Err(ShowError::DanglingCurrentStep { show_id, step_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn details(&self, show: Show) -> Result<ShowDetails, ShowError> {
        let steps = self.steps.list_steps(show.id).await?;
        let recipe_items = self
            .recipe_items
            .get_recipe_items(&show.recipe_item_ids)
            .await?;

        Ok(ShowDetails {
            show,
            steps,
            recipe_items,
        })
    }
}
