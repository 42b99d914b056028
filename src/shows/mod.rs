//! Cooking shows, their ordered steps and attached recipe items.
//!
//! A show carries two independent lifecycle flags (`started`, `finished`)
//! and a pointer to the step its audience is currently on. The pointer only
//! ever moves forward, one `step_number` at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;
pub mod service;
pub mod validation;

pub use error::ShowError;
pub use service::ShowService;
pub use validation::{NewRecipeItem, NewShow, NewStep, ValidationErrors};

/// A scheduled cooking broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub runtime: String,
    pub show_image_header: String,
    pub calories: String,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub finished: bool,
    /// Step the audience is currently on; unset until first requested
    #[serde(default)]
    pub current_step_id: Option<Uuid>,
    /// Attached recipe items in attach order (duplicates kept)
    #[serde(default)]
    pub recipe_item_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Show {
    /// Build a fresh, unstarted show from validated input
    pub fn new(input: NewShow) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            runtime: input.runtime,
            show_image_header: input.show_image_header,
            calories: input.calories,
            started: false,
            finished: false,
            current_step_id: None,
            recipe_item_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> ShowStatus {
        ShowStatus::from_flags(self.started, self.finished)
    }

    /// Whether the next-show policy may pick this show at `now`
    pub fn is_upcoming_or_live(&self, now: DateTime<Utc>) -> bool {
        !self.finished && (self.started || self.start_time >= now)
    }
}

/// Display status derived from the lifecycle flags.
///
/// The flags themselves stay independent: a show can be marked finished
/// without ever being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    Scheduled,
    Live,
    Finished,
}

impl ShowStatus {
    pub fn from_flags(started: bool, finished: bool) -> Self {
        match (started, finished) {
            (_, true) => ShowStatus::Finished,
            (true, false) => ShowStatus::Live,
            (false, false) => ShowStatus::Scheduled,
        }
    }
}

impl std::fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShowStatus::Scheduled => write!(f, "scheduled"),
            ShowStatus::Live => write!(f, "live"),
            ShowStatus::Finished => write!(f, "finished"),
        }
    }
}

/// One instruction within a show, ordered by `step_number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: Uuid,
    pub show_id: Uuid,
    pub title: String,
    pub description: String,
    pub step_number: u32,
    pub created_at: DateTime<Utc>,
}

impl Step {
    pub fn new(input: NewStep) -> Self {
        Self {
            id: Uuid::new_v4(),
            show_id: input.show_id,
            title: input.title,
            description: input.description,
            step_number: input.step_number,
            created_at: Utc::now(),
        }
    }
}

/// Catalog entry (ingredient or dish) that can be attached to shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl RecipeItem {
    pub fn new(input: NewRecipeItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            attributes: input.attributes,
            created_at: Utc::now(),
        }
    }
}

/// A show together with its ordered steps and attached recipe items
#[derive(Debug, Clone, PartialEq)]
pub struct ShowDetails {
    pub show: Show,
    pub steps: Vec<Step>,
    pub recipe_items: Vec<RecipeItem>,
}

impl ShowDetails {
    pub fn current_step(&self) -> Option<&Step> {
        let current = self.show.current_step_id?;
        self.steps.iter().find(|s| s.id == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_show() -> Show {
        Show::new(NewShow {
            title: "Knife Skills".to_string(),
            description: "Julienne, brunoise, chiffonade".to_string(),
            start_time: Utc::now() + Duration::hours(1),
            runtime: "45m".to_string(),
            show_image_header: "knives.png".to_string(),
            calories: "0".to_string(),
        })
    }

    #[test]
    fn test_new_show_defaults() {
        let show = sample_show();
        assert!(!show.started);
        assert!(!show.finished);
        assert!(show.current_step_id.is_none());
        assert!(show.recipe_item_ids.is_empty());
        assert_eq!(show.status(), ShowStatus::Scheduled);
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(ShowStatus::from_flags(false, false), ShowStatus::Scheduled);
        assert_eq!(ShowStatus::from_flags(true, false), ShowStatus::Live);
        assert_eq!(ShowStatus::from_flags(true, true), ShowStatus::Finished);
        // finished without started is allowed
        assert_eq!(ShowStatus::from_flags(false, true), ShowStatus::Finished);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ShowStatus::Live.to_string(), "live");
    }

    #[test]
    fn test_is_upcoming_or_live() {
        let now = Utc::now();
        let mut show = sample_show();
        assert!(show.is_upcoming_or_live(now));

        show.start_time = now - Duration::hours(2);
        assert!(!show.is_upcoming_or_live(now));

        show.started = true;
        assert!(show.is_upcoming_or_live(now));

        show.finished = true;
        assert!(!show.is_upcoming_or_live(now));
    }

    #[test]
    fn test_details_current_step() {
        let mut show = sample_show();
        let step = Step::new(NewStep {
            show_id: show.id,
            title: "Prep".to_string(),
            description: "Mise en place".to_string(),
            step_number: 1,
        });

        let mut details = ShowDetails {
            show: show.clone(),
            steps: vec![step.clone()],
            recipe_items: Vec::new(),
        };
        assert!(details.current_step().is_none());

        show.current_step_id = Some(step.id);
        details.show = show;
        assert_eq!(details.current_step(), Some(&step));
    }
}
