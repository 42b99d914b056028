//! In-process store with optional JSON snapshot persistence.
//!
//! All tables sit behind one `RwLock`; each write runs under the write lock
//! and, when a snapshot file is configured, is flushed to disk before the
//! lock is released.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shows::{RecipeItem, Show, Step};
use crate::store::{RecipeItemRepository, ShowRepository, StepRepository, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    shows: HashMap<Uuid, Show>,
    #[serde(default)]
    steps: HashMap<Uuid, Step>,
    #[serde(default)]
    recipe_items: HashMap<Uuid, RecipeItem>,
}

impl Tables {
    fn show_mut(&mut self, id: Uuid) -> Result<&mut Show, StoreError> {
        self.shows
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "show", id })
    }
}

/// Show, step and recipe item tables held in memory
pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Empty store that never touches disk
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot_path: None,
        }
    }

    /// Load the snapshot at `path` (if any) and persist every write back to it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tables = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Tables::default()
        };

        tracing::debug!(
            path = %path.display(),
            shows = tables.shows.len(),
            steps = tables.steps.len(),
            "Opened snapshot store"
        );

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Run `apply` under the write lock and persist on success.
    ///
    /// With a snapshot file, `apply` runs against a copy that only replaces
    /// the live tables once the snapshot is on disk. Without one, `apply`
    /// must not mutate anything before it is certain to succeed.
    async fn write<T>(
        &self,
        apply: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(path) = &self.snapshot_path else {
            return apply(&mut *tables);
        };

        let mut next = tables.clone();
        let out = apply(&mut next)?;
        persist(path, &next).await?;
        *tables = next;
        Ok(out)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn persist(path: &Path, tables: &Tables) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(tables)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ShowRepository for MemoryStore {
    async fn insert_show(&self, show: Show) -> Result<Show, StoreError> {
        self.write(|tables| {
            if tables.shows.contains_key(&show.id) {
                return Err(StoreError::Conflict(format!(
                    "show '{}' already exists",
                    show.id
                )));
            }
            tables.shows.insert(show.id, show.clone());
            Ok(show)
        })
        .await
    }

    async fn get_show(&self, id: Uuid) -> Result<Show, StoreError> {
        let tables = self.tables.read().await;
        tables
            .shows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "show", id })
    }

    async fn next_show(&self, now: DateTime<Utc>) -> Result<Option<Show>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .shows
            .values()
            .filter(|s| s.is_upcoming_or_live(now))
            .min_by(|a, b| {
                a.start_time
                    .cmp(&b.start_time)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            })
            .cloned())
    }

    async fn set_started(&self, id: Uuid) -> Result<Show, StoreError> {
        self.write(|tables| {
            let show = tables.show_mut(id)?;
            if !show.started {
                show.started = true;
                show.updated_at = Utc::now();
            }
            Ok(show.clone())
        })
        .await
    }

    async fn set_finished(&self, id: Uuid) -> Result<Show, StoreError> {
        self.write(|tables| {
            let show = tables.show_mut(id)?;
            if !show.finished {
                show.finished = true;
                show.updated_at = Utc::now();
            }
            Ok(show.clone())
        })
        .await
    }

    async fn set_current_step(
        &self,
        id: Uuid,
        expected: Option<Uuid>,
        next: Uuid,
    ) -> Result<Show, StoreError> {
        self.write(|tables| {
            match tables.steps.get(&next) {
                Some(step) if step.show_id == id => {}
                Some(_) => {
                    return Err(StoreError::Conflict(format!(
                        "step '{}' does not belong to show '{}'",
                        next, id
                    )))
                }
                None => {
                    return Err(StoreError::NotFound {
                        entity: "step",
                        id: next,
                    })
                }
            }

            let show = tables.show_mut(id)?;
            if show.current_step_id != expected {
                return Err(StoreError::CurrentStepChanged {
                    show_id: id,
                    actual: show.current_step_id,
                });
            }
            show.current_step_id = Some(next);
            show.updated_at = Utc::now();
            Ok(show.clone())
        })
        .await
    }

    async fn attach_recipe_item(
        &self,
        show_id: Uuid,
        item_id: Uuid,
    ) -> Result<Show, StoreError> {
        self.write(|tables| {
            if !tables.recipe_items.contains_key(&item_id) {
                return Err(StoreError::NotFound {
                    entity: "recipe item",
                    id: item_id,
                });
            }
            let show = tables.show_mut(show_id)?;
            show.recipe_item_ids.push(item_id);
            show.updated_at = Utc::now();
            Ok(show.clone())
        })
        .await
    }
}

#[async_trait]
impl StepRepository for MemoryStore {
    async fn insert_step(&self, step: Step) -> Result<Step, StoreError> {
        self.write(|tables| {
            if !tables.shows.contains_key(&step.show_id) {
                return Err(StoreError::NotFound {
                    entity: "show",
                    id: step.show_id,
                });
            }
            let taken = tables
                .steps
                .values()
                .any(|s| s.show_id == step.show_id && s.step_number == step.step_number);
            if taken {
                return Err(StoreError::Conflict(format!(
                    "step_number {} already exists for show '{}'",
                    step.step_number, step.show_id
                )));
            }
            tables.steps.insert(step.id, step.clone());
            Ok(step)
        })
        .await
    }

    async fn get_step(&self, id: Uuid) -> Result<Step, StoreError> {
        let tables = self.tables.read().await;
        tables
            .steps
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "step", id })
    }

    async fn find_step_by_number(
        &self,
        show_id: Uuid,
        step_number: u32,
    ) -> Result<Option<Step>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .steps
            .values()
            .find(|s| s.show_id == show_id && s.step_number == step_number)
            .cloned())
    }

    async fn list_steps(&self, show_id: Uuid) -> Result<Vec<Step>, StoreError> {
        let tables = self.tables.read().await;
        let mut steps: Vec<Step> = tables
            .steps
            .values()
            .filter(|s| s.show_id == show_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.step_number);
        Ok(steps)
    }
}

#[async_trait]
impl RecipeItemRepository for MemoryStore {
    async fn insert_recipe_item(&self, item: RecipeItem) -> Result<RecipeItem, StoreError> {
        self.write(|tables| {
            tables.recipe_items.insert(item.id, item.clone());
            Ok(item)
        })
        .await
    }

    async fn get_recipe_item(&self, id: Uuid) -> Result<RecipeItem, StoreError> {
        let tables = self.tables.read().await;
        tables
            .recipe_items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "recipe item",
                id,
            })
    }

    async fn get_recipe_items(&self, ids: &[Uuid]) -> Result<Vec<RecipeItem>, StoreError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.recipe_items.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shows::{NewRecipeItem, NewShow, NewStep};
    use chrono::Duration;
    use tempfile::TempDir;

    fn new_show(title: &str, start_time: DateTime<Utc>) -> Show {
        Show::new(NewShow {
            title: title.to_string(),
            description: "desc".to_string(),
            start_time,
            runtime: "30m".to_string(),
            show_image_header: "header.png".to_string(),
            calories: "400".to_string(),
        })
    }

    fn new_step(show_id: Uuid, step_number: u32) -> Step {
        Step::new(NewStep {
            show_id,
            title: format!("Step {}", step_number),
            description: "do the thing".to_string(),
            step_number,
        })
    }

    #[tokio::test]
    async fn test_get_missing_show() {
        let store = MemoryStore::new();
        let result = store.get_show(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound { entity: "show", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_steps_ordered_by_number() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();

        for n in [4, 1, 2] {
            store.insert_step(new_step(show.id, n)).await.unwrap();
        }

        let numbers: Vec<u32> = store
            .list_steps(show.id)
            .await
            .unwrap()
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_duplicate_step_number_conflicts() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();

        store.insert_step(new_step(show.id, 1)).await.unwrap();
        let result = store.insert_step(new_step(show.id, 1)).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_step_for_missing_show() {
        let store = MemoryStore::new();
        let result = store.insert_step(new_step(Uuid::new_v4(), 1)).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_current_step_compare_and_set() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();
        let first = store.insert_step(new_step(show.id, 1)).await.unwrap();
        let second = store.insert_step(new_step(show.id, 2)).await.unwrap();

        let updated = store
            .set_current_step(show.id, None, first.id)
            .await
            .unwrap();
        assert_eq!(updated.current_step_id, Some(first.id));

        // stale expectation loses
        let result = store.set_current_step(show.id, None, second.id).await;
        match result {
            Err(StoreError::CurrentStepChanged { actual, .. }) => {
                assert_eq!(actual, Some(first.id));
            }
            other => panic!("expected CurrentStepChanged, got {:?}", other),
        }

        let updated = store
            .set_current_step(show.id, Some(first.id), second.id)
            .await
            .unwrap();
        assert_eq!(updated.current_step_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_set_current_step_rejects_foreign_step() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();
        let other = store
            .insert_show(new_show("Salad", Utc::now()))
            .await
            .unwrap();
        let foreign = store.insert_step(new_step(other.id, 1)).await.unwrap();

        let result = store.set_current_step(show.id, None, foreign.id).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store
            .get_show(show.id)
            .await
            .unwrap()
            .current_step_id
            .is_none());
    }

    #[tokio::test]
    async fn test_flags_are_idempotent() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();

        let once = store.set_started(show.id).await.unwrap();
        let twice = store.set_started(show.id).await.unwrap();
        assert!(twice.started);
        assert_eq!(once.updated_at, twice.updated_at);
    }

    #[tokio::test]
    async fn test_attach_unknown_item_leaves_show_untouched() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();

        let result = store.attach_recipe_item(show.id, Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound {
                entity: "recipe item",
                ..
            })
        ));
        assert!(store
            .get_show(show.id)
            .await
            .unwrap()
            .recipe_item_ids
            .is_empty());
    }

    #[tokio::test]
    async fn test_attach_keeps_duplicates_in_order() {
        let store = MemoryStore::new();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();
        let leek = store
            .insert_recipe_item(RecipeItem::new(NewRecipeItem {
                name: "Leek".to_string(),
                attributes: serde_json::Map::new(),
            }))
            .await
            .unwrap();
        let potato = store
            .insert_recipe_item(RecipeItem::new(NewRecipeItem {
                name: "Potato".to_string(),
                attributes: serde_json::Map::new(),
            }))
            .await
            .unwrap();

        store.attach_recipe_item(show.id, leek.id).await.unwrap();
        store.attach_recipe_item(show.id, potato.id).await.unwrap();
        let show = store.attach_recipe_item(show.id, leek.id).await.unwrap();

        assert_eq!(show.recipe_item_ids, vec![leek.id, potato.id, leek.id]);
        let items = store.get_recipe_items(&show.recipe_item_ids).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Leek", "Potato", "Leek"]);
    }

    #[tokio::test]
    async fn test_next_show_policy() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let past = store
            .insert_show(new_show("Yesterday", now - Duration::days(1)))
            .await
            .unwrap();
        let soon = store
            .insert_show(new_show("Soon", now + Duration::hours(1)))
            .await
            .unwrap();
        store
            .insert_show(new_show("Later", now + Duration::days(2)))
            .await
            .unwrap();

        let next = store.next_show(now).await.unwrap().unwrap();
        assert_eq!(next.id, soon.id);

        // a live show that started earlier takes priority
        store.set_started(past.id).await.unwrap();
        let next = store.next_show(now).await.unwrap().unwrap();
        assert_eq!(next.id, past.id);

        store.set_finished(past.id).await.unwrap();
        store.set_finished(soon.id).await.unwrap();
        let next = store.next_show(now).await.unwrap().unwrap();
        assert_eq!(next.title, "Later");
    }

    #[tokio::test]
    async fn test_next_show_none() {
        let store = MemoryStore::new();
        assert!(store.next_show(Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("shows.json");

        let show_id = {
            let store = MemoryStore::open(&path).unwrap();
            let show = store
                .insert_show(new_show("Soup", Utc::now()))
                .await
                .unwrap();
            store.insert_step(new_step(show.id, 1)).await.unwrap();
            store.set_started(show.id).await.unwrap();
            show.id
        };
        assert!(path.exists());

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot_path(), Some(path.as_path()));
        let show = reopened.get_show(show_id).await.unwrap();
        assert!(show.started);
        assert_eq!(reopened.list_steps(show_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shows.json");
        let store = MemoryStore::open(&path).unwrap();

        let result = store.set_started(Uuid::new_v4()).await;
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unsaved_write_leaves_memory_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shows.json");
        let store = MemoryStore::open(&path).unwrap();
        let show = store
            .insert_show(new_show("Soup", Utc::now()))
            .await
            .unwrap();

        // a non-empty directory where the snapshot goes makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = store.set_started(show.id).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!store.get_show(show.id).await.unwrap().started);
    }
}
