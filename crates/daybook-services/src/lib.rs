pub mod storage;
pub mod todo;
pub mod todo_store;

pub use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use todo::{decode_todos, encode_todos, Todo, TodoStatus};
pub use todo_store::{TodoCounts, TodoGroups, TodoStore};
