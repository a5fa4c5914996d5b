//! Plain-text rendering of the view state.

use todo_sync::ClientState;

pub fn render(state: &ClientState) -> String {
    if state.todos.is_empty() {
        return "(no todos)\n".to_string();
    }
    state
        .todos
        .iter()
        .map(|todo| {
            let mark = if todo.completed { 'x' } else { ' ' };
            format!("[{mark}] {}  {}\n", todo.todo_id, todo.title)
        })
        .collect()
}
