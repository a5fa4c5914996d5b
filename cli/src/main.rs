//! `todo`: command-line front end for the todo service.
//!
//! Each invocation mounts a view (initial load), applies one action through
//! the sync loop, prints the resulting snapshot and unmounts. Request
//! failures are diagnostics only: they go to the log on stderr and the
//! process still exits 0 with whatever snapshot the view holds.

mod render;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_gateway::{GatewayConfig, ReqwestGateway, DEFAULT_BASE_URL};
use todo_sync::{Diagnostics, Gateway, Todo, TodoId, TodoView, ToggleMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Good ol' todo list", version)]
struct Cli {
    /// Root of the todo collection.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "TODO_API_TIMEOUT_MS", default_value_t = 100_000)]
    timeout_ms: u64,

    /// Send the intended completion state with toggles instead of a bare PUT.
    #[arg(long)]
    explicit_toggle: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the list.
    List,
    /// Create a todo. An empty title is sent as-is.
    Add { title: String },
    /// Flip a todo's completion.
    Toggle { id: u64 },
    /// Delete a todo.
    Delete { id: u64 },
}

impl Cli {
    fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.base_url.clone()).with_timeout(Duration::from_millis(self.timeout_ms))
    }

    fn toggle_mode(&self) -> ToggleMode {
        if self.explicit_toggle {
            ToggleMode::Explicit
        } else {
            ToggleMode::Bare
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.gateway_config();
    let gateway = ReqwestGateway::new(&config).context("building HTTP gateway")?;
    let mut view = TodoView::new(config.todo_client(), gateway)
        .with_toggle_mode(cli.toggle_mode())
        .mounted()
        .await;

    apply(&mut view, cli.command).await;
    print!("{}", render::render(&view.state()));
    view.unmount();
    Ok(())
}

async fn apply<G: Gateway, D: Diagnostics>(view: &mut TodoView<G, D>, command: Command) {
    tracing::debug!(?command, "applying command");
    match command {
        Command::List => {}
        Command::Add { title } => {
            view.set_draft_title(title);
            view.create().await;
        }
        Command::Toggle { id } => {
            let id = TodoId(id);
            let intended = intended_completion(&view.state().todos, id);
            view.toggle(id, intended).await;
        }
        Command::Delete { id } => view.delete(TodoId(id)).await,
    }
}

/// The state a checkbox click asks for: the opposite of what is shown.
fn intended_completion(todos: &[Todo], id: TodoId) -> bool {
    todos
        .iter()
        .find(|todo| todo.todo_id == id)
        .map_or(true, |todo| !todo.completed)
}
