//! In-memory todo collection mirrored to a key-value store.
//!
//! Every successful mutation rewrites the whole collection under one key.
//! Saving is best effort: if the write fails the in-memory change stays and
//! the error is kept in `last_save_error()`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use daybook_core::{group_by, StorageConfig, StorageError, TodoFlavor};

use crate::storage::KeyValueStore;
use crate::todo::{decode_todos, encode_todos, Todo, TodoStatus};

/// The collection split by status. Both groups are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoGroups {
    pub pending: Vec<Todo>,
    pub completed: Vec<Todo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

pub struct TodoStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    flavor: TodoFlavor,
    todos: Vec<Todo>,
    last_issued_id: i64,
    last_save_error: Option<StorageError>,
}

impl TodoStore {
    /// Create a store over `storage` and load whatever is persisted under `key`.
    pub fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>, flavor: TodoFlavor) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            flavor,
            todos: Vec::new(),
            last_issued_id: 0,
            last_save_error: None,
        };
        store.load();
        store
    }

    pub fn from_config(storage: Arc<dyn KeyValueStore>, config: &StorageConfig) -> Self {
        Self::open(storage, config.todo_key.clone(), config.flavor)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Missing, unreadable or malformed data all yield an empty collection.
    pub fn load(&mut self) {
        let todos = match self.storage.get(&self.key) {
            Ok(Some(blob)) => match decode_todos(&blob) {
                Ok(todos) => todos,
                Err(e) => {
                    tracing::warn!("Discarding malformed todos under '{}': {}", self.key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read todos under '{}': {}", self.key, e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let before = todos.len();
        self.todos = todos
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        if self.todos.len() != before {
            tracing::warn!(
                "Dropped {} todo(s) with duplicate ids",
                before - self.todos.len()
            );
        }

        self.last_issued_id = self
            .todos
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        tracing::info!("Loaded {} todo(s)", self.todos.len());
    }

    /// Write the whole collection to storage.
    ///
    /// # Errors
    /// Returns `StorageError::Serialization` if encoding fails and
    /// `StorageError::Backend` if the write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        let blob = encode_todos(&self.todos, self.flavor)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &blob)
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                tracing::warn!("Failed to persist todos: {}", e);
                self.last_save_error = Some(e);
            }
        }
    }

    /// Millisecond timestamp, bumped past the last issued id when needed.
    ///
    /// Once ids reach `i64::MAX` the first unused id from now upward is taken.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = match self.last_issued_id.checked_add(1) {
            Some(next) => now.max(next),
            None => self.first_free_id(now),
        };
        self.last_issued_id = self.last_issued_id.max(id);
        id.to_string()
    }

    fn first_free_id(&self, from: i64) -> i64 {
        let taken: HashSet<&str> = self.todos.iter().map(|t| t.id.as_str()).collect();
        (from..=i64::MAX)
            .find(|id| !taken.contains(id.to_string().as_str()))
            .unwrap_or(from)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    /// Add a pending todo. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<&Todo> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank todo");
            return None;
        }

        let text = match self.flavor {
            TodoFlavor::Web => text.trim().to_string(),
            TodoFlavor::Mobile => text.to_string(),
        };
        let todo = Todo::new(self.next_id(), text);
        tracing::debug!("Adding todo {}", todo.id);

        let idx = match self.flavor {
            TodoFlavor::Web => {
                self.todos.push(todo);
                self.todos.len() - 1
            }
            TodoFlavor::Mobile => {
                self.todos.insert(0, todo);
                0
            }
        };

        self.persist();
        self.todos.get(idx)
    }

    /// Flip the status of the todo with `id`. Returns false if there is none.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let todo = &mut self.todos[idx];
        todo.status = todo.status.toggled();

        self.persist();
        true
    }

    /// Replace the text of the todo with `id`, keeping its status.
    ///
    /// Blank text or an unknown id leaves the collection untouched.
    pub fn edit(&mut self, id: &str, new_text: &str) -> bool {
        if new_text.trim().is_empty() {
            return false;
        }
        let Some(idx) = self.position(id) else {
            return false;
        };

        self.todos[idx].text = match self.flavor {
            TodoFlavor::Web => new_text.trim().to_string(),
            TodoFlavor::Mobile => new_text.to_string(),
        };

        self.persist();
        true
    }

    /// Remove the todo with `id`. Returns false if there is none.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.todos.remove(idx);

        self.persist();
        true
    }

    pub fn grouped_view(&self) -> TodoGroups {
        let mut groups = group_by(self.todos.iter().cloned(), |t| t.status);
        TodoGroups {
            pending: groups.take(&TodoStatus::Pending),
            completed: groups.take(&TodoStatus::Completed),
        }
    }

    pub fn counts(&self) -> TodoCounts {
        let completed = self.todos.iter().filter(|t| t.is_completed()).count();
        TodoCounts {
            total: self.todos.len(),
            pending: self.todos.len() - completed,
            completed,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn flavor(&self) -> TodoFlavor {
        self.flavor
    }

    /// Error from the most recent save, cleared by the next successful one.
    pub fn last_save_error(&self) -> Option<&StorageError> {
        self.last_save_error.as_ref()
    }
}
