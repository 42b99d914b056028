//! Request payloads and their field-level validation.
//!
//! Payload fields are loose JSON values at the serde level so that a missing
//! or mistyped field is reported per field instead of failing the whole body.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", msgs.join(" "))
    }
}

/// Validated input for a new show
#[derive(Debug, Clone, PartialEq)]
pub struct NewShow {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub runtime: String,
    pub show_image_header: String,
    pub calories: String,
}

/// Validated input for a new step
#[derive(Debug, Clone, PartialEq)]
pub struct NewStep {
    pub show_id: Uuid,
    pub title: String,
    pub description: String,
    pub step_number: u32,
}

/// Validated input for a new recipe item
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipeItem {
    pub name: String,
    pub attributes: serde_json::Map<String, Value>,
}

/// Request body for `POST /show`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateShowRequest {
    /// RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub runtime: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub show_image_header: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub calories: Option<Value>,
}

impl CreateShowRequest {
    pub fn validate(self) -> Result<NewShow, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start_time = match string_field(&mut errors, "start_time", self.start_time) {
            Some(raw) => {
                let parsed = parse_start_time(&raw);
                if parsed.is_none() {
                    errors.add("start_time", "The start_time is not a valid date.");
                }
                parsed
            }
            None => None,
        };
        let title = string_field(&mut errors, "title", self.title);
        let description = string_field(&mut errors, "description", self.description);
        let runtime = string_field(&mut errors, "runtime", self.runtime);
        let show_image_header =
            string_field(&mut errors, "show_image_header", self.show_image_header);
        let calories = string_field(&mut errors, "calories", self.calories);

        match (
            start_time,
            title,
            description,
            runtime,
            show_image_header,
            calories,
        ) {
            (
                Some(start_time),
                Some(title),
                Some(description),
                Some(runtime),
                Some(show_image_header),
                Some(calories),
            ) if errors.is_empty() => Ok(NewShow {
                title,
                description,
                start_time,
                runtime,
                show_image_header,
                calories,
            }),
            _ => Err(errors),
        }
    }
}

/// Request body for `POST /show/{show_id}/step`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateStepRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    /// Positive integer, as a JSON number or numeric string
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub step_number: Option<Value>,
    /// Must match the show in the request path
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub show_id: Option<Value>,
}

impl CreateStepRequest {
    /// Validate the payload for the show addressed by `path_show_id`
    pub fn validate(self, path_show_id: Uuid) -> Result<NewStep, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = string_field(&mut errors, "title", self.title);
        let description = string_field(&mut errors, "description", self.description);

        let step_number = match self.step_number {
            None | Some(Value::Null) => {
                errors.add("step_number", "The step_number field is required.");
                None
            }
            Some(value) => {
                let parsed = parse_step_number(&value);
                if parsed.is_none() {
                    errors.add("step_number", "The step_number must be a positive integer.");
                }
                parsed
            }
        };

        let show_id = match string_field(&mut errors, "show_id", self.show_id) {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) if id == path_show_id => Some(id),
                Ok(_) => {
                    errors.add("show_id", "The show_id does not match the show in the path.");
                    None
                }
                Err(_) => {
                    errors.add("show_id", "The show_id is not a valid identifier.");
                    None
                }
            },
            None => None,
        };

        match (title, description, step_number, show_id) {
            (Some(title), Some(description), Some(step_number), Some(show_id))
                if errors.is_empty() =>
            {
                Ok(NewStep {
                    show_id,
                    title,
                    description,
                    step_number,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Request body for `POST /recipe-item`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateRecipeItemRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    /// Free-form catalog attributes
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Map<String, Value>>,
}

impl CreateRecipeItemRequest {
    pub fn validate(self) -> Result<NewRecipeItem, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match string_field(&mut errors, "name", self.name) {
            Some(name) => Ok(NewRecipeItem {
                name,
                attributes: self.attributes.unwrap_or_default(),
            }),
            None => Err(errors),
        }
    }
}

/// A present, non-blank string; anything else is recorded against `field`
fn string_field(errors: &mut ValidationErrors, field: &str, value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(v)) if !v.trim().is_empty() => Some(v),
        None | Some(Value::Null | Value::String(_)) => {
            errors.add(field, format!("The {} field is required.", field));
            None
        }
        Some(_) => {
            errors.add(field, format!("The {} must be a string.", field));
            None
        }
    }
}

/// Parse the accepted date shapes; naive values are taken as UTC
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_step_number(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n >= 1)
}
