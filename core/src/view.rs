//! The client-side synchronization loop.
//!
//! # Design
//! `TodoView` owns the view state (draft title, list snapshot, busy flag)
//! and is the only thing that mutates it. Every mutation goes through the
//! gateway and is followed by a full reload; the snapshot is never patched
//! locally. Failures are swallowed at the operation boundary and handed to
//! the [`Diagnostics`] sink, so callers only ever see the busy flag clear.
//!
//! State is published on a `tokio::sync::watch` channel. Renderers hold a
//! receiver from [`TodoView::subscribe`] and see every transition, busy
//! included, while the operation that caused it is still suspended on I/O.
//!
//! Operations take `&mut self`, so a single view never has two of its own
//! requests in flight and responses cannot overwrite each other's snapshots.

use futures_util::future::Abortable;
use tokio::sync::watch;

use crate::client::TodoClient;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{ApiError, Operation, RequestFailed};
use crate::gateway::Gateway;
use crate::http::{HttpRequest, HttpResponse};
use crate::lifetime::{Lifetime, UnmountOnDrop};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Everything the view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub draft_title: String,
    /// Server order, as of the last successful load.
    pub todos: Vec<Todo>,
    pub busy: bool,
}

/// What a toggle puts on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleMode {
    /// `PUT /{id}` with no body. The intended completion state is dropped and
    /// the server decides what to do.
    #[default]
    Bare,
    /// `PUT /{id}` with `{"completed": <intended>}`.
    Explicit,
}

pub struct TodoView<G, D = TracingDiagnostics> {
    client: TodoClient,
    gateway: G,
    diagnostics: D,
    toggle_mode: ToggleMode,
    state: watch::Sender<ClientState>,
    lifetime: Lifetime,
    _unmount: UnmountOnDrop,
}

impl<G: Gateway> TodoView<G> {
    /// Creates a view with empty state. No request is sent.
    pub fn new(client: TodoClient, gateway: G) -> Self {
        let (state, _) = watch::channel(ClientState::default());
        let lifetime = Lifetime::new();
        Self {
            client,
            gateway,
            diagnostics: TracingDiagnostics,
            toggle_mode: ToggleMode::default(),
            state,
            _unmount: UnmountOnDrop(lifetime.clone()),
            lifetime,
        }
    }

    /// Creates the view and performs the initial load.
    pub async fn mount(client: TodoClient, gateway: G) -> Self {
        Self::new(client, gateway).mounted().await
    }
}

impl<G: Gateway, D: Diagnostics> TodoView<G, D> {
    pub fn with_diagnostics<E: Diagnostics>(self, diagnostics: E) -> TodoView<G, E> {
        TodoView {
            client: self.client,
            gateway: self.gateway,
            diagnostics,
            toggle_mode: self.toggle_mode,
            state: self.state,
            lifetime: self.lifetime,
            _unmount: self._unmount,
        }
    }

    pub fn with_toggle_mode(mut self, toggle_mode: ToggleMode) -> Self {
        self.toggle_mode = toggle_mode;
        self
    }

    /// Performs the initial load and returns the view.
    pub async fn mounted(mut self) -> Self {
        self.load().await;
        self
    }

    pub fn state(&self) -> ClientState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime.clone()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Input binding for the draft field.
    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|state| state.draft_title = title);
    }

    /// Replaces the snapshot with the server's list.
    pub async fn load(&mut self) {
        if !self.begin() {
            return;
        }
        let request = self.client.build_list_todos();
        if let Some(todos) = self.send(Operation::Load, request, TodoClient::parse_list_todos).await {
            tracing::debug!(count = todos.len(), "snapshot replaced");
            self.state.send_modify(|state| {
                state.todos = todos;
                state.busy = false;
            });
        }
    }

    /// Submits the draft title as a new, uncompleted todo. An empty draft is
    /// sent as-is.
    pub async fn create(&mut self) {
        if !self.begin() {
            return;
        }
        let input = CreateTodo {
            title: self.state.borrow().draft_title.clone(),
            completed: false,
        };
        let request = match self.client.build_create_todo(&input) {
            Ok(request) => request,
            Err(source) => return self.fail(Operation::Create, source),
        };
        if self
            .send(Operation::Create, request, TodoClient::parse_create_todo)
            .await
            .is_some()
        {
            self.state.send_modify(|state| state.draft_title.clear());
            self.load().await;
        }
    }

    /// Asks the server to toggle `id`. `completed` is the state the user
    /// asked for; it only reaches the wire in [`ToggleMode::Explicit`].
    pub async fn toggle(&mut self, id: TodoId, completed: bool) {
        if !self.begin() {
            return;
        }
        tracing::debug!(%id, intended = completed, mode = ?self.toggle_mode, "toggling");
        let request = match self.toggle_mode {
            ToggleMode::Bare => Ok(self.client.build_toggle_todo(id)),
            ToggleMode::Explicit => self.client.build_update_todo(id, &UpdateTodo { completed }),
        };
        let request = match request {
            Ok(request) => request,
            Err(source) => return self.fail(Operation::Toggle, source),
        };
        if self
            .send(Operation::Toggle, request, TodoClient::parse_toggle_todo)
            .await
            .is_some()
        {
            self.load().await;
        }
    }

    pub async fn delete(&mut self, id: TodoId) {
        if !self.begin() {
            return;
        }
        let request = self.client.build_delete_todo(id);
        if self
            .send(Operation::Delete, request, TodoClient::parse_delete_todo)
            .await
            .is_some()
        {
            self.load().await;
        }
    }

    /// Aborts anything in flight and disables the view.
    pub fn unmount(self) {
        self.lifetime.unmount();
    }

    /// Sets busy. Returns false, touching nothing, once unmounted.
    fn begin(&self) -> bool {
        if self.lifetime.is_unmounted() {
            tracing::debug!("view unmounted, operation skipped");
            return false;
        }
        self.state.send_modify(|state| state.busy = true);
        true
    }

    /// Runs one round-trip. `None` means the operation is over: it either
    /// failed (busy cleared, diagnostics notified) or was aborted by unmount
    /// (busy cleared, snapshot and diagnostics untouched).
    async fn send<T>(
        &self,
        operation: Operation,
        request: HttpRequest,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Option<T> {
        let Some(registration) = self.lifetime.register() else {
            self.idle();
            return None;
        };
        tracing::debug!(%operation, method = %request.method, path = %request.path, "sending request");
        let outcome = Abortable::new(self.gateway.execute(request), registration).await;
        self.lifetime.settle();

        let Ok(result) = outcome else {
            tracing::debug!(%operation, "request aborted by unmount");
            self.idle();
            return None;
        };
        match result.and_then(|response| parse(&self.client, response)) {
            Ok(value) => Some(value),
            Err(source) => {
                self.fail(operation, source);
                None
            }
        }
    }

    fn idle(&self) {
        self.state.send_modify(|state| state.busy = false);
    }

    fn fail(&self, operation: Operation, source: ApiError) {
        self.idle();
        self.diagnostics.request_failed(&RequestFailed { operation, source });
    }
}
