//! Command-line front end for the todo client
//!
//! Reads `.env` and `TODO_*` variables, loads the user's todos and runs one
//! command against them.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use composable_todo::item::{TodoItemController, TodoItemEnvironment, TodoItemState};
use composable_todo::prompt::{Choice, ConfirmPrompt, ConfirmRequest, StaticPrompt, CANCEL_LABEL, CONFIRM_LABEL};
use composable_todo::screen::{TodoListEnvironment, TodoListScreen};
use composable_todo::{AppConfig, AuthContext, Filter, TodoList, User};
use composable_todo_api::{HttpTodoService, Todo, TodoId, TodoService, UserId};
use composable_todo_runtime::EffectHandle;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "composable-todo")]
#[command(about = "Manage todos on the remote mock API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// User whose todos to manage (defaults to TODO_USER_ID)
    #[arg(short, long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List todos
    List {
        /// Only show all, active or completed todos
        #[arg(short, long)]
        filter: Option<Filter>,
    },

    /// Create a todo
    Add {
        /// Text of the new todo
        text: String,
    },

    /// Flip a todo between active and completed
    Toggle {
        /// Todo id
        id: String,
    },

    /// Change the text of a todo
    Edit {
        /// Todo id
        id: String,

        /// New text
        text: String,
    },

    /// Delete a todo after confirmation
    Delete {
        /// Todo id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Asks on the terminal
struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn ask(&self, request: ConfirmRequest) -> Choice {
        let answer = tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", request.title)?;
            write!(stdout, "{} [{CONFIRM_LABEL}/{CANCEL_LABEL}]: ", request.message)?;
            stdout.flush()?;

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok::<_, std::io::Error>(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "confirm" => Choice::Confirm,
                _ => Choice::Cancel,
            },
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "Could not read answer");
                Choice::Cancel
            },
            Err(error) => {
                tracing::warn!(error = %error, "Prompt task failed");
                Choice::Cancel
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,composable_todo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    let user = cli
        .user
        .map(UserId::new)
        .or_else(|| config.user_id.clone())
        .context("no user given: pass --user or set TODO_USER_ID")?;

    let service: Arc<dyn TodoService> =
        Arc::new(HttpTodoService::new(&config.api).context("cannot build HTTP client")?);
    let auth = AuthContext::signed_in(User::new(user.clone(), user.as_str()));
    let list = TodoList::with_filter(Vec::new(), config.default_filter);
    let settle_timeout = config.api.timeout() + Duration::from_secs(1);

    let screen = TodoListScreen::new(TodoListEnvironment::new(
        Arc::clone(&service),
        list.clone(),
        auth.clone(),
    ));
    settle(screen.load().await?, settle_timeout).await?;
    if let Some(error) = screen.snapshot().await.error {
        bail!("loading todos failed: {error}");
    }

    let item_environment = |yes: bool| {
        let prompt: Arc<dyn ConfirmPrompt> = if yes {
            Arc::new(StaticPrompt::confirming())
        } else {
            Arc::new(StdinPrompt)
        };
        TodoItemEnvironment::new(Arc::clone(&service), list.clone(), auth.clone(), prompt)
            .with_failure_policy(config.failure_policy)
    };

    match cli.command {
        Commands::List { filter } => {
            if let Some(filter) = filter {
                screen.set_filter(filter).await?;
            }
            for todo in list.visible() {
                print_todo(&todo);
            }
            println!("{} items left", list.count());
        },
        Commands::Add { text } => {
            settle(screen.add(text).await?, settle_timeout).await?;
            if let Some(error) = screen.snapshot().await.error {
                bail!("adding todo failed: {error}");
            }
            if let Some(todo) = list.todos().last() {
                print_todo(todo);
            }
        },
        Commands::Toggle { id } => {
            let item = TodoItemController::new(&find(&list, &id)?, item_environment(false));
            settle(item.toggle_complete().await?, settle_timeout).await?;
            let state = report(&item).await?;
            println!("{} is now {}", state.id, if state.complete { "completed" } else { "active" });
        },
        Commands::Edit { id, text } => {
            let item = TodoItemController::new(&find(&list, &id)?, item_environment(false));
            item.toggle_editing().await?;
            settle(item.submit_edit(text).await?, settle_timeout).await?;
            let state = report(&item).await?;
            if let Some(error) = state.field_error {
                bail!("editing {} failed: {error}", state.id);
            }
            println!("{} is now \"{}\"", state.id, state.text);
        },
        Commands::Delete { id, yes } => {
            let item = TodoItemController::new(&find(&list, &id)?, item_environment(yes));
            // The confirmation waits on the terminal, so no timeout here
            item.delete_todo().await?.wait().await;
            let state = report(&item).await?;
            if state.deleted {
                println!("Deleted {}", state.id);
            } else {
                println!("Cancelled");
            }
        },
    }

    Ok(())
}

/// Wait for a store round trip, bounded by the request timeout
async fn settle(mut handle: EffectHandle, timeout: Duration) -> anyhow::Result<()> {
    handle
        .wait_with_timeout(timeout)
        .await
        .context("request did not finish in time")
}

fn find(list: &TodoList, id: &str) -> anyhow::Result<Todo> {
    list.get(&TodoId::new(id))
        .ok_or_else(|| anyhow!("no todo with id {id}"))
}

/// Item state after an operation, or its error
async fn report(item: &TodoItemController) -> anyhow::Result<TodoItemState> {
    let state = item.snapshot().await;
    if let Some(error) = &state.error {
        bail!("{}: {error}", state.id);
    }
    Ok(state)
}

fn print_todo(todo: &Todo) {
    let mark = if todo.complete { "x" } else { " " };
    println!("[{mark}] {:>4}  {}", todo.id, todo.text);
}
