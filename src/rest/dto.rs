//! Data Transfer Objects for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Request bodies live next to their validation
pub use crate::shows::validation::{
    CreateRecipeItemRequest, CreateShowRequest, CreateStepRequest,
};
use crate::shows::{RecipeItem, ShowDetails, Step};

// =============================================================================
// Show DTOs
// =============================================================================

/// A show with its ordered steps and attached recipe items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShowResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub runtime: String,
    pub show_image_header: String,
    pub calories: String,
    pub started: bool,
    pub finished: bool,
    /// Derived from the flags: scheduled, live or finished
    pub status: String,
    pub current_step_id: Option<Uuid>,
    /// The step the audience is on, once initialized
    pub current_step: Option<StepResponse>,
    pub steps: Vec<StepResponse>,
    pub recipe_items: Vec<RecipeItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ShowDetails> for ShowResponse {
    fn from(details: &ShowDetails) -> Self {
        let show = &details.show;
        Self {
            id: show.id,
            title: show.title.clone(),
            description: show.description.clone(),
            start_time: show.start_time,
            runtime: show.runtime.clone(),
            show_image_header: show.show_image_header.clone(),
            calories: show.calories.clone(),
            started: show.started,
            finished: show.finished,
            status: show.status().to_string(),
            current_step_id: show.current_step_id,
            current_step: details.current_step().map(StepResponse::from),
            steps: details.steps.iter().map(StepResponse::from).collect(),
            recipe_items: details
                .recipe_items
                .iter()
                .map(RecipeItemResponse::from)
                .collect(),
            created_at: show.created_at,
            updated_at: show.updated_at,
        }
    }
}

// =============================================================================
// Step DTOs
// =============================================================================

/// A single step of a show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StepResponse {
    pub id: Uuid,
    pub show_id: Uuid,
    pub title: String,
    pub description: String,
    pub step_number: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Step> for StepResponse {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id,
            show_id: step.show_id,
            title: step.title.clone(),
            description: step.description.clone(),
            step_number: step.step_number,
            created_at: step.created_at,
        }
    }
}

// =============================================================================
// Recipe Item DTOs
// =============================================================================

/// A recipe catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeItemResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = Object)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<&RecipeItem> for RecipeItemResponse {
    fn from(item: &RecipeItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            attributes: item.attributes.clone(),
            created_at: item.created_at,
        }
    }
}

// =============================================================================
// Health DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shows::{NewShow, NewStep, Show};

    #[test]
    fn test_show_response_from_details() {
        let mut show = Show::new(NewShow {
            title: "Dumplings".to_string(),
            description: "Pleating practice".to_string(),
            start_time: Utc::now(),
            runtime: "40m".to_string(),
            show_image_header: "dumplings.png".to_string(),
            calories: "520".to_string(),
        });
        show.started = true;

        let step = Step::new(NewStep {
            show_id: show.id,
            title: "Dough".to_string(),
            description: "Hot water dough".to_string(),
            step_number: 1,
        });

        let details = ShowDetails {
            show,
            steps: vec![step],
            recipe_items: Vec::new(),
        };

        let response = ShowResponse::from(&details);
        assert_eq!(response.status, "live");
        assert_eq!(response.steps.len(), 1);
        assert_eq!(response.steps[0].step_number, 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["show_image_header"], "dumplings.png");
        assert!(json["current_step_id"].is_null());
        assert!(json["current_step"].is_null());
    }

    #[test]
    fn test_show_response_carries_current_step() {
        let mut show = Show::new(NewShow {
            title: "Dumplings".to_string(),
            description: "Pleating practice".to_string(),
            start_time: Utc::now(),
            runtime: "40m".to_string(),
            show_image_header: "dumplings.png".to_string(),
            calories: "520".to_string(),
        });
        let steps: Vec<Step> = (1..=2)
            .map(|n| {
                Step::new(NewStep {
                    show_id: show.id,
                    title: format!("Fold {}", n),
                    description: "Pleat".to_string(),
                    step_number: n,
                })
            })
            .collect();
        show.current_step_id = Some(steps[1].id);

        let response = ShowResponse::from(&ShowDetails {
            show,
            steps,
            recipe_items: Vec::new(),
        });
        let current = response.current_step.unwrap();
        assert_eq!(current.step_number, 2);
        assert_eq!(current.title, "Fold 2");
    }
}
