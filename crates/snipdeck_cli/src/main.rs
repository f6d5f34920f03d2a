//! Command-line client for a snipdeck snippet store.
//!
//! Every command goes through the sync controller: the catalog is refreshed
//! into the controller cache first, and reads are served from that cache.

mod clipboard;
mod confirm;
mod highlight;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use clipboard::SystemClipboard;
use confirm::TerminalConfirm;
use highlight::TerminalHighlighter;
use snipdeck_client::{spawn_sync, HttpStore, SyncEvent, SyncHandle, SyncOp, SyncView};
use snipdeck_core::collaborators::{Clipboard, ConfirmDelete, Highlighter, PreConfirmed};
use snipdeck_core::{Config, Draft, Snippet};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "snip", about = "snipdeck snippet catalog CLI", version)]
struct Cli {
    /// Store API base URL (can also be set via SNIPDECK_SERVER)
    #[arg(short, long, global = true, env = "SNIPDECK_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List every snippet in the catalog
    List,
    /// Case-insensitive search over titles and languages
    Search { query: String },
    /// Create a snippet; code is read from --file or stdin
    New {
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        language: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print a snippet's code, highlighted when stdout is a terminal
    Show {
        id: String,
        /// Never emit color escapes
        #[arg(long)]
        plain: bool,
    },
    /// Copy a snippet's code to the system clipboard
    Copy { id: String },
    /// Delete a snippet after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Commands {
    fn action(&self) -> &'static str {
        match self {
            Commands::Completions { .. } => "Completions",
            Commands::List => "List",
            Commands::Search { .. } => "Search",
            Commands::New { .. } => "New",
            Commands::Show { .. } => "Show",
            Commands::Copy { .. } => "Copy",
            Commands::Delete { .. } => "Delete",
        }
    }
}

fn init_tracing(config: &Config) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    if config.sync_perf_log {
        if let Ok(directive) = "snipdeck_client::sync_perf=info".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Point a plain-http `localhost` base at `127.0.0.1`.
///
/// The default base is `http://localhost:5000/api`; `localhost` may resolve
/// to `::1` first while local snippet stores commonly listen on IPv4 only.
/// `https` bases keep their host so certificate names still match.
///
/// # Returns
/// The rewritten base, or `base` unchanged when it is not a plain-http
/// `localhost` URL.
fn prefer_ipv4_loopback(base: &str) -> String {
    match reqwest::Url::parse(base) {
        Ok(mut url) if url.scheme() == "http" && url.host_str() == Some("localhost") => {
            match url.set_host(Some("127.0.0.1")) {
                Ok(()) => url.into(),
                Err(_) => base.to_string(),
            }
        }
        _ => base.to_string(),
    }
}

fn explicit_server_override(server: Option<String>) -> Option<String> {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Environment config with command-line overrides applied on top.
fn resolve_config(server: Option<String>, timeout: Option<u64>) -> Config {
    let config = Config::from_env();
    let server = explicit_server_override(server)
        .unwrap_or_else(|| config.api_base_url.clone());
    let mut config = config.with_base_url(Some(&prefer_ipv4_loopback(&server)));
    if let Some(secs) = timeout.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }
    config
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_list_output(snippets: &[Snippet], json: bool) -> Result<String, String> {
    if json {
        return encode_json(snippets);
    }
    let rows: Vec<String> = snippets
        .iter()
        .map(|s| format!("{:<24} {:<12} {}", s.id, s.language, s.title))
        .collect();
    Ok(rows.join("\n"))
}

fn format_created_output(snippet: &Snippet, json: bool) -> Result<String, String> {
    if json {
        return encode_json(snippet);
    }
    Ok(format!("Created: {} ({})", snippet.title, snippet.id))
}

fn format_deleted_output(id: &str, json: bool) -> Result<String, String> {
    if json {
        return encode_json(&serde_json::json!({ "deleted": id }));
    }
    Ok(format!("Deleted snippet: {}", id))
}

fn find_cached<'a>(view: &'a SyncView, id: &str) -> anyhow::Result<&'a Snippet> {
    view.cached(id)
        .with_context(|| format!("no snippet with id '{}'", id))
}

/// Wait for the outcome of `op`, turning its failure event into an error.
async fn await_outcome<T>(
    sync: &mut SyncHandle,
    op: SyncOp,
    mut pick: impl FnMut(SyncEvent) -> Option<T>,
) -> anyhow::Result<T> {
    while let Some(event) = sync.next_event().await {
        match event {
            SyncEvent::Failed { op: failed, error } if failed == op => return Err(error.into()),
            other => {
                if let Some(value) = pick(other) {
                    return Ok(value);
                }
            }
        }
    }
    bail!("sync controller stopped before {} completed", op.as_str())
}

async fn refresh(sync: &mut SyncHandle) -> anyhow::Result<SyncView> {
    sync.trigger_refresh();
    await_outcome(sync, SyncOp::Refresh, |event| {
        matches!(event, SyncEvent::Refreshed { .. }).then_some(())
    })
    .await?;
    Ok(sync.settled().await)
}

fn read_code(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read code from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_output(output: Result<String, String>) -> anyhow::Result<()> {
    let output = output.map_err(anyhow::Error::msg)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

async fn run(sync: &mut SyncHandle, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Completions { .. } => Ok(()),
        Commands::List => {
            let view = refresh(sync).await?;
            print_output(format_list_output(&view.visible, json))
        }
        Commands::Search { query } => {
            refresh(sync).await?;
            sync.set_search_query(query);
            let view = sync.settled().await;
            print_output(format_list_output(&view.visible, json))
        }
        Commands::New {
            title,
            language,
            file,
        } => {
            let code = read_code(file)?;
            sync.trigger_create(Draft::new(title, language, code));
            let created = await_outcome(sync, SyncOp::Create, |event| match event {
                SyncEvent::Created { snippet } => Some(snippet),
                _ => None,
            })
            .await?;
            print_output(format_created_output(&created, json))
        }
        Commands::Show { id, plain } => {
            let view = refresh(sync).await?;
            let snippet = find_cached(&view, &id)?;
            if json {
                return print_output(encode_json(snippet));
            }
            if plain || !io::stdout().is_terminal() {
                println!("{}", snippet.code);
            } else {
                let highlighter = TerminalHighlighter::new();
                tracing::debug!(
                    syntax = highlighter.syntax_name(&snippet.language),
                    "highlighting snippet"
                );
                println!("{}", highlighter.highlight(&snippet.code, &snippet.language));
            }
            Ok(())
        }
        Commands::Copy { id } => {
            let view = refresh(sync).await?;
            let snippet = find_cached(&view, &id)?;
            SystemClipboard.copy(&snippet.code);
            if !json {
                println!("Sent \"{}\" to the clipboard", snippet.title);
            }
            Ok(())
        }
        Commands::Delete { id, yes } => {
            refresh(sync).await?;
            let gate: &dyn ConfirmDelete = if yes { &PreConfirmed } else { &TerminalConfirm };
            if !sync.trigger_delete(&id, gate) {
                eprintln!("Delete cancelled");
                return Ok(());
            }
            let deleted = await_outcome(sync, SyncOp::Delete, |event| match event {
                SyncEvent::Deleted { id } => Some(id),
                _ => None,
            })
            .await?;
            print_output(format_deleted_output(&deleted, json))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = resolve_config(server, timeout);
    init_tracing(&config);

    let action = command.action();
    let store = match HttpStore::new(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{} failed: {}", action, err);
            std::process::exit(1);
        }
    };
    let mut sync = spawn_sync(Arc::new(store), &config);
    let result = run(&mut sync, command, json).await;
    sync.shutdown().await;

    if let Err(err) = result {
        eprintln!("{} failed: {:#}", action, err);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
