//! Todo record and its persisted JSON shape.
//!
//! Two conventions exist on disk: the web flavor writes
//! `{"id","text","status":"pending"|"completed"}`, the mobile flavor writes
//! `{"id","text","completed":bool}`. Either shape is accepted on load.

use daybook_core::TodoFlavor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
}

impl TodoStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl From<bool> for TodoStatus {
    fn from(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub status: TodoStatus,
}

impl Todo {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            status: TodoStatus::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

#[derive(Deserialize)]
struct StoredTodo {
    id: String,
    text: String,
    #[serde(default)]
    status: Option<TodoStatus>,
    #[serde(default)]
    completed: Option<bool>,
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        let status = stored
            .status
            .or(stored.completed.map(TodoStatus::from))
            .unwrap_or_default();
        Self {
            id: stored.id,
            text: stored.text,
            status,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireTodo<'a> {
    Web {
        id: &'a str,
        text: &'a str,
        status: TodoStatus,
    },
    Mobile {
        id: &'a str,
        text: &'a str,
        completed: bool,
    },
}

impl<'a> WireTodo<'a> {
    fn new(todo: &'a Todo, flavor: TodoFlavor) -> Self {
        match flavor {
            TodoFlavor::Web => Self::Web {
                id: &todo.id,
                text: &todo.text,
                status: todo.status,
            },
            TodoFlavor::Mobile => Self::Mobile {
                id: &todo.id,
                text: &todo.text,
                completed: todo.is_completed(),
            },
        }
    }
}

/// Serialize the collection as a JSON array in the flavor's shape.
pub fn encode_todos(todos: &[Todo], flavor: TodoFlavor) -> serde_json::Result<String> {
    let wire: Vec<WireTodo<'_>> = todos.iter().map(|t| WireTodo::new(t, flavor)).collect();
    serde_json::to_string(&wire)
}

/// Parse a persisted JSON array in either shape.
pub fn decode_todos(json: &str) -> serde_json::Result<Vec<Todo>> {
    let stored: Vec<StoredTodo> = serde_json::from_str(json)?;
    Ok(stored.into_iter().map(Todo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_shape() {
        let todo = Todo::new("1700000000000", "Buy milk");
        let json = encode_todos(&[todo], TodoFlavor::Web).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1700000000000","text":"Buy milk","status":"pending"}]"#
        );
    }

    #[test]
    fn test_mobile_shape() {
        let mut todo = Todo::new("1", "Walk dog");
        todo.status = TodoStatus::Completed;
        let json = encode_todos(&[todo], TodoFlavor::Mobile).unwrap();
        assert_eq!(json, r#"[{"id":"1","text":"Walk dog","completed":true}]"#);
    }

    #[test]
    fn test_decode_accepts_both_shapes() {
        let todos = decode_todos(
            r#"[
                {"id":"1","text":"a","status":"completed"},
                {"id":"2","text":"b","completed":true},
                {"id":"3","text":"c","completed":false},
                {"id":"4","text":"d"}
            ]"#,
        )
        .unwrap();

        let statuses: Vec<_> = todos.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TodoStatus::Completed,
                TodoStatus::Completed,
                TodoStatus::Pending,
                TodoStatus::Pending
            ]
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_todos("not json").is_err());
        assert!(decode_todos(r#"{"id":"1"}"#).is_err());
        assert!(decode_todos(r#"[{"id":1,"text":"numeric id"}]"#).is_err());
    }

    #[test]
    fn test_toggle_status() {
        assert_eq!(TodoStatus::Pending.toggled(), TodoStatus::Completed);
        assert_eq!(TodoStatus::Completed.toggled().toggled(), TodoStatus::Completed);
    }
}
