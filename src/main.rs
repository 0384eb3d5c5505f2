//! Nudge - client-side todo reminder engine.
//!
//! This binary runs an interactive session against a remote todo store:
//! todos are listed, added, toggled, and deleted from a prompt while the
//! reminder engine polls in the background and alerts for items due soon.
//!
//! # Environment Variables
//!
//! See the [`config`] module for available configuration options.
//!
//! [`config`]: nudge::config

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nudge::client::{BearerToken, ClientError, TodoClient};
use nudge::config::Config;
use nudge::notify::{NotificationSink, TerminalAlert};
use nudge::session::TodoSession;

/// Nudge - client-side todo reminder engine.
///
/// Connects to a remote todo store and reminds about items due soon.
#[derive(Parser, Debug)]
#[command(name = "nudge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    NUDGE_SERVER_URL            Todo store base URL (required)
    NUDGE_TOKEN                 Bearer token for the store (required)
    NUDGE_POLL_INTERVAL_SECS    Seconds between reminder checks (default: 60)
    NUDGE_REQUEST_TIMEOUT_SECS  HTTP request timeout (default: 30)

COMMANDS (at the prompt):
    list            Show all todos
    add <text>      Create a todo; append '@<date>' for a due date
    done <id>       Toggle a todo's completion flag
    rm <id>         Delete a todo
    refresh         Re-fetch the list from the store
    quit            Log out and exit
")]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let token = config
        .token
        .clone()
        .context("NUDGE_TOKEN must be set to start a session")?;

    info!(server_url = %config.server_url, "Starting Nudge");

    let client = TodoClient::new(&config.server_url, config.request_timeout);
    // Terminal hosts have no native notification capability; alerts degrade
    // to the terminal bell.
    let sink = NotificationSink::without_channel(Box::new(TerminalAlert));
    let mut session = TodoSession::new(client, config.poll_interval, sink);

    match session.login(BearerToken::new(token)).await {
        Ok(()) => {}
        Err(ClientError::Unauthorized) => {
            anyhow::bail!("Store rejected the token; check NUDGE_TOKEN and log in again");
        }
        Err(err) => {
            // Non-fatal: the session stays up with an empty cache and the
            // next command can retry.
            eprintln!("warning: initial fetch failed: {err}");
        }
    }

    print_items(&session).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        tokio::select! {
            _ = signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if !handle_command(&mut session, line.trim()).await {
                    break;
                }
            }
        }
    }

    session.logout().await;
    info!("Session closed");
    Ok(())
}

/// Dispatches one prompt command. Returns `false` when the loop should end.
async fn handle_command(session: &mut TodoSession, line: &str) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let result = match command {
        "" => Ok(()),
        "quit" | "exit" => return false,
        "list" => {
            print_items(session).await;
            Ok(())
        }
        "refresh" => session.refresh().await,
        "add" => session.add(rest).await.map(|created| {
            match created {
                Some(item) => println!("created {} - {}", item.id, item.title),
                None => println!("nothing to add"),
            }
        }),
        "done" => session.toggle(rest).await,
        "rm" => session.remove(rest).await,
        other => {
            println!("unknown command: {other} (try list, add, done, rm, refresh, quit)");
            Ok(())
        }
    };

    match result {
        Ok(()) => true,
        Err(ClientError::Unauthorized) => {
            eprintln!("session expired; log in again");
            false
        }
        Err(err) => {
            eprintln!("error: {err}");
            true
        }
    }
}

/// Prints the cached item sequence.
async fn print_items(session: &TodoSession) {
    let items = session.items().await;
    if items.is_empty() {
        println!("(no todos)");
        return;
    }
    for item in items {
        let mark = if item.done { "x" } else { " " };
        match item.due_date {
            Some(due) => println!("[{mark}] {} - {} (due {})", item.id, item.title, due),
            None => println!("[{mark}] {} - {}", item.id, item.title),
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}
