//! Scenario tests for the sync loop against an in-process fake of the API.
//!
//! `FakeApi` implements `Gateway` by interpreting requests the way the real
//! server does: an ordered collection at `/`, items at `/{todo_id}`, an
//! envelope around every body, and a body-less PUT that flips completion.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::json;
use todo_sync::{
    ApiError, CreateTodo, Gateway, HttpMethod, HttpRequest, HttpResponse, Operation, RequestFailed, TodoClient,
    TodoId, TodoView,
};

const BASE_URL: &str = "http://todo.test";

#[derive(Default)]
struct FakeApi {
    todos: RefCell<BTreeMap<u64, (String, bool)>>,
    next_id: RefCell<u64>,
    log: RefCell<Vec<HttpRequest>>,
    fail_next: RefCell<Option<ApiError>>,
}

impl FakeApi {
    fn seeded(items: &[(u64, &str, bool)]) -> Self {
        let api = FakeApi::default();
        for &(id, title, completed) in items {
            api.todos.borrow_mut().insert(id, (title.to_string(), completed));
            *api.next_id.borrow_mut() = id;
        }
        api
    }

    fn requests(&self) -> Vec<(HttpMethod, String, Option<String>)> {
        self.log
            .borrow()
            .iter()
            .map(|r| (r.method, r.path.trim_start_matches(BASE_URL).to_string(), r.body.clone()))
            .collect()
    }

    fn respond(status: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.trim_start_matches(BASE_URL);
        let mut todos = self.todos.borrow_mut();
        match (request.method, path) {
            (HttpMethod::Get, "/") => {
                let data: Vec<_> = todos
                    .iter()
                    .map(|(id, (title, completed))| json!({"todo_id": id, "title": title, "completed": completed}))
                    .collect();
                Self::respond(200, json!({"Message": "Todos fetched successfully", "Success": true, "StatusCode": 201, "Data": data}))
            }
            (HttpMethod::Post, "/") => {
                let input: CreateTodo = serde_json::from_str(request.body.as_deref().unwrap_or("")).unwrap();
                let mut next_id = self.next_id.borrow_mut();
                *next_id += 1;
                todos.insert(*next_id, (input.title, input.completed));
                Self::respond(200, json!({"Message": "Todo created successfully", "Success": true, "StatusCode": 201}))
            }
            (method, item) => {
                let id: u64 = item.trim_start_matches('/').parse().unwrap();
                if !todos.contains_key(&id) {
                    return Self::respond(404, json!({}));
                }
                match method {
                    HttpMethod::Put => {
                        if let Some(entry) = todos.get_mut(&id) {
                            entry.1 = !entry.1;
                        }
                    }
                    HttpMethod::Delete => {
                        todos.remove(&id);
                    }
                    _ => return Self::respond(405, json!({})),
                }
                Self::respond(200, json!({"Success": true, "StatusCode": 201}))
            }
        }
    }
}

impl Gateway for FakeApi {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.log.borrow_mut().push(request.clone());
        if let Some(err) = self.fail_next.borrow_mut().take() {
            return Err(err);
        }
        Ok(self.handle(&request))
    }
}

type Recorded = Rc<RefCell<Vec<RequestFailed>>>;

async fn mount(api: &FakeApi) -> (TodoView<&FakeApi, impl Fn(&RequestFailed)>, Recorded) {
    let seen: Recorded = Rc::default();
    let sink = {
        let seen = Rc::clone(&seen);
        move |error: &RequestFailed| seen.borrow_mut().push(error.clone())
    };
    let view = TodoView::new(TodoClient::new(BASE_URL), api)
        .with_diagnostics(sink)
        .mounted()
        .await;
    (view, seen)
}

#[tokio::test]
async fn scenario_a_mount_on_empty_collection() {
    let api = FakeApi::default();
    let (view, seen) = mount(&api).await;

    let state = view.state();
    assert!(state.todos.is_empty());
    assert!(!state.busy);
    assert_eq!(api.requests(), vec![(HttpMethod::Get, "/".to_string(), None)]);
    assert!(seen.borrow().is_empty());
}

#[tokio::test]
async fn scenario_b_create_then_reload() {
    let api = FakeApi::default();
    let (mut view, _) = mount(&api).await;

    view.set_draft_title("Buy milk");
    view.create().await;

    let requests = api.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].0, HttpMethod::Post);
    assert_eq!(requests[1].1, "/");
    let body: serde_json::Value = serde_json::from_str(requests[1].2.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"title": "Buy milk", "completed": false}));
    assert_eq!(requests[2], (HttpMethod::Get, "/".to_string(), None));

    let state = view.state();
    assert_eq!(state.todos.len(), 1);
    assert_eq!(state.todos[0].title, "Buy milk");
    assert!(!state.todos[0].completed);
    assert!(state.draft_title.is_empty());
    assert!(!state.busy);
}

#[tokio::test]
async fn scenario_c_toggle_reflects_server_state() {
    let api = FakeApi::seeded(&[(5, "Buy milk", false)]);
    let (mut view, _) = mount(&api).await;

    view.toggle(TodoId(5), true).await;

    let requests = api.requests();
    assert_eq!(requests[1], (HttpMethod::Put, "/5".to_string(), None));
    assert_eq!(requests[2].0, HttpMethod::Get);
    assert!(view.state().todos[0].completed);
}

#[tokio::test]
async fn toggle_sends_nothing_about_intent() {
    let api = FakeApi::seeded(&[(5, "Buy milk", true)]);
    let (mut view, _) = mount(&api).await;

    // The user asks for `true` on an already-completed item; the server flips it anyway.
    view.toggle(TodoId(5), true).await;

    assert!(!view.state().todos[0].completed);
}

#[tokio::test]
async fn scenario_d_delete_network_failure() {
    let api = FakeApi::seeded(&[(5, "Buy milk", false)]);
    let (mut view, seen) = mount(&api).await;
    let before = view.state();

    *api.fail_next.borrow_mut() = Some(ApiError::Transport("connection reset".to_string()));
    view.delete(TodoId(5)).await;

    let state = view.state();
    assert!(!state.busy);
    assert_eq!(state.todos, before.todos);
    assert_eq!(api.requests().len(), 2, "no reload after a failed delete");
    assert_eq!(
        *seen.borrow(),
        vec![RequestFailed {
            operation: Operation::Delete,
            source: ApiError::Transport("connection reset".to_string()),
        }]
    );
}

#[tokio::test]
async fn delete_removes_item_from_next_snapshot() {
    let api = FakeApi::seeded(&[(1, "a", false), (5, "b", false), (7, "c", true)]);
    let (mut view, _) = mount(&api).await;

    view.delete(TodoId(5)).await;

    let ids: Vec<_> = view.state().todos.iter().map(|t| t.todo_id).collect();
    assert_eq!(ids, vec![TodoId(1), TodoId(7)]);
}

#[tokio::test]
async fn delete_of_missing_item_is_reported() {
    let api = FakeApi::seeded(&[(1, "a", false)]);
    let (mut view, seen) = mount(&api).await;

    view.delete(TodoId(99)).await;

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].source, ApiError::NotFound);
    assert_eq!(view.state().todos.len(), 1);
}

#[tokio::test]
async fn consecutive_loads_are_identical() {
    let api = FakeApi::seeded(&[(1, "a", false), (2, "b", true)]);
    let (mut view, _) = mount(&api).await;

    let first = view.state();
    view.load().await;
    assert_eq!(view.state(), first);
}

#[tokio::test]
async fn empty_draft_is_still_posted() {
    let api = FakeApi::default();
    let (mut view, seen) = mount(&api).await;

    view.create().await;

    let requests = api.requests();
    let body: serde_json::Value = serde_json::from_str(requests[1].2.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"title": "", "completed": false}));
    assert_eq!(view.state().todos.len(), 1);
    assert_eq!(view.state().todos[0].title, "");
    assert!(seen.borrow().is_empty());
}

#[tokio::test]
async fn subscribers_see_busy_cycle() {
    let api = FakeApi::default();
    let (mut view, _) = mount(&api).await;
    let mut rx = view.subscribe();
    let _ = rx.borrow_and_update();

    view.set_draft_title("x");
    view.create().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(!state.busy);
    assert_eq!(state.todos.len(), 1);
}
