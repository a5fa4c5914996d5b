//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the live tests catch any schema drift between the two crates. The server
//! wraps every payload in an [`Envelope`] whose field names are PascalCase,
//! while the todo fields themselves are snake_case.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a todo. Opaque to the client beyond being
/// printable into a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single todo item returned by the API.
///
/// Extra server fields such as `created_at` are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub todo_id: TodoId,
    pub title: String,
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for setting a todo's completion explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub completed: bool,
}

/// Response wrapper used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: u16,
    pub data: T,
}

/// The list endpoint's `Data` field. `null` decodes as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TodoList(#[serde(deserialize_with = "null_as_empty")] pub Vec<Todo>);

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Todo>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Todo>>::deserialize(deserializer)?.unwrap_or_default())
}
