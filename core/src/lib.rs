//! Client core for the todo service: request shaping plus the view's
//! synchronization loop.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). A [`Gateway`]
//! executes the round-trip. [`TodoView`] sits on top of both: it owns the
//! rendered state and exposes the four operations that change it (load,
//! create, toggle, delete), each followed by a full reload.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable with plain data.
//! - DTOs are defined independently from the mock-server crate; the live
//!   tests catch schema drift.
//! - Errors never escape a `TodoView` operation. They are reported to a
//!   [`Diagnostics`] sink as [`RequestFailed`].

pub mod client;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifetime;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{ApiError, Operation, RequestFailed};
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use lifetime::Lifetime;
pub use types::{CreateTodo, Envelope, Todo, TodoId, TodoList, UpdateTodo};
pub use view::{ClientState, TodoView, ToggleMode};
