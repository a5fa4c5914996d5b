use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub todo_id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// PUT payload. An absent `completed` (or an empty body) flips the item.
#[derive(Deserialize, Default)]
pub struct UpdateTodo {
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Wrapper around every response body. Mutations carry no `Data`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub message: String,
    pub success: bool,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn ok(message: &str, data: Option<T>) -> Json<Self> {
        Json(Envelope {
            message: message.to_string(),
            success: true,
            status_code: 201,
            data,
        })
    }
}

pub type Ack = Envelope<()>;

/// Todos keyed by id; ids only grow, so iteration is insertion order.
#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{todo_id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Envelope<Vec<Todo>>> {
    let store = db.read().await;
    Envelope::ok(
        "Todos fetched successfully",
        Some(store.todos.values().cloned().collect()),
    )
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> Json<Ack> {
    let mut store = db.write().await;
    store.next_id += 1;
    let todo = Todo {
        todo_id: store.next_id,
        title: input.title,
        completed: input.completed,
    };
    tracing::info!(todo_id = todo.todo_id, title = %todo.title, "todo created");
    store.todos.insert(todo.todo_id, todo);
    Envelope::ok("Todo created successfully", None)
}

async fn get_todo(
    State(db): State<Db>,
    Path(todo_id): Path<u64>,
) -> Result<Json<Envelope<Todo>>, StatusCode> {
    let store = db.read().await;
    let todo = store.todos.get(&todo_id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Envelope::ok("Todo fetched successfully", Some(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(todo_id): Path<u64>,
    body: Bytes,
) -> Result<Json<Ack>, StatusCode> {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateTodo::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?
    };
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&todo_id).ok_or(StatusCode::NOT_FOUND)?;
    todo.completed = input.completed.unwrap_or(!todo.completed);
    tracing::info!(todo_id, completed = todo.completed, "todo updated");
    Ok(Envelope::ok("Todo updated successfully", None))
}

async fn delete_todo(State(db): State<Db>, Path(todo_id): Path<u64>) -> Result<Json<Ack>, StatusCode> {
    let mut store = db.write().await;
    store.todos.remove(&todo_id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(todo_id, "todo deleted");
    Ok(Envelope::ok("Todo deleted successfully", None))
}
