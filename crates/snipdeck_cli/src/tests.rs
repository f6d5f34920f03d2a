//! Unit tests for the `snip` CLI entrypoint module.

use super::confirm::{answer_confirms, delete_prompt};
use super::highlight::{resolve_syntax, TerminalHighlighter};
use super::{
    explicit_server_override, format_created_output, format_deleted_output, format_list_output,
    prefer_ipv4_loopback, resolve_config, run,
};
use super::{Cli, Commands};
use clap::Parser;
use snipdeck_client::test_support::MockStoreServer;
use snipdeck_client::{spawn_sync, HttpStore, Lifecycle};
use snipdeck_core::collaborators::Highlighter;
use snipdeck_core::constants::{API_BASE_URL_ENV, TIMEOUT_SECS_ENV};
use snipdeck_core::env::ScopedEnv;
use snipdeck_core::{Config, Snippet};
use std::sync::Arc;
use std::time::Duration;
use syntect::parsing::SyntaxSet;

fn snippet(id: &str, title: &str, language: &str) -> Snippet {
    Snippet {
        id: id.to_string(),
        title: title.to_string(),
        language: language.to_string(),
        code: "print(1)".to_string(),
    }
}

#[test]
fn only_plain_http_localhost_is_pinned_to_ipv4_loopback() {
    let cases = [
        ("http://localhost:5000/api", "http://127.0.0.1:5000/api"),
        ("HTTP://LOCALHOST:5000/api/", "http://127.0.0.1:5000/api/"),
        ("http://localhost:5000", "http://127.0.0.1:5000/"),
        ("https://localhost:5000/api", "https://localhost:5000/api"),
        ("http://127.0.0.1:5000/api/", "http://127.0.0.1:5000/api/"),
        ("http://snippets.internal/api", "http://snippets.internal/api"),
        ("not a url", "not a url"),
    ];
    for (input, expected) in cases {
        assert_eq!(prefer_ipv4_loopback(input), expected, "base {:?}", input);
    }
}

#[test]
fn blank_server_override_is_treated_as_absent() {
    assert_eq!(explicit_server_override(Some("   ".to_string())), None);
    assert_eq!(
        explicit_server_override(Some(" http://example.test/api ".to_string())),
        Some("http://example.test/api".to_string())
    );
}

#[test]
fn resolve_config_layers_cli_over_environment() {
    let _env = ScopedEnv::new()
        .set(API_BASE_URL_ENV, "http://localhost:7000/api/")
        .set(TIMEOUT_SECS_ENV, "12");

    let from_env = resolve_config(None, None);
    assert_eq!(from_env.api_base_url, "http://127.0.0.1:7000/api");
    assert_eq!(from_env.timeout, Duration::from_secs(12));

    let overridden = resolve_config(Some("http://10.0.0.5:9000/v1".to_string()), Some(3));
    assert_eq!(overridden.api_base_url, "http://10.0.0.5:9000/v1");
    assert_eq!(overridden.timeout, Duration::from_secs(3));

    let zero_timeout = resolve_config(None, Some(0));
    assert_eq!(zero_timeout.timeout, Duration::from_secs(12));
}

#[test]
fn cli_parses_delete_with_confirmation_skip() {
    let _env = ScopedEnv::new().unset("SNIPDECK_SERVER");
    let cli = Cli::try_parse_from(["snip", "delete", "abc123", "--yes", "--json"])
        .expect("cli should parse delete");
    assert!(cli.json);
    assert!(cli.server.is_none());
    match cli.command {
        Commands::Delete { id, yes } => {
            assert_eq!(id, "abc123");
            assert!(yes);
        }
        _ => panic!("expected delete command"),
    }
}

#[test]
fn snipdeck_server_env_feeds_the_server_flag() {
    let _env = ScopedEnv::new().set("SNIPDECK_SERVER", "http://127.0.0.1:47777/api");
    let cli = Cli::parse_from(["snip", "list"]);
    assert_eq!(cli.server.as_deref(), Some("http://127.0.0.1:47777/api"));
}

#[test]
fn list_output_renders_rows_or_json() {
    let snippets = vec![
        snippet("1", "Quick Sort", "Python"),
        snippet("2", "Binary Search", "Go"),
    ];

    let text = format_list_output(&snippets, false).expect("text output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('1'));
    assert!(lines[0].ends_with("Quick Sort"));
    assert!(lines[1].contains("Go"));

    let rendered = format_list_output(&snippets, true).expect("json output");
    let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed[1]["title"], "Binary Search");
    assert_eq!(parsed[1]["id"], "2");

    assert_eq!(format_list_output(&[], false).expect("empty"), "");
}

#[test]
fn create_and_delete_output_helpers() {
    let created = snippet("srv-1", "Hello", "JS");
    assert_eq!(
        format_created_output(&created, false).expect("text"),
        "Created: Hello (srv-1)"
    );
    let parsed: serde_json::Value =
        serde_json::from_str(&format_deleted_output("srv-1", true).expect("json"))
            .expect("valid json");
    assert_eq!(parsed["deleted"], "srv-1");
    assert_eq!(
        format_deleted_output("srv-1", false).expect("text"),
        "Deleted snippet: srv-1"
    );
}

#[test]
fn confirmation_needs_an_explicit_yes() {
    for answer in ["y\n", "YES", "  yes  "] {
        assert!(answer_confirms(answer), "{:?}", answer);
    }
    for answer in ["", "\n", "n", "nope", "yess"] {
        assert!(!answer_confirms(answer), "{:?}", answer);
    }
}

#[test]
fn delete_prompt_names_the_cached_entry_when_known() {
    let cached = snippet("7", "Quick Sort", "Python");
    assert_eq!(
        delete_prompt("7", Some(&cached)),
        "Delete snippet \"Quick Sort\" (Python, 7)? [y/N] "
    );
    assert_eq!(delete_prompt("7", None), "Delete snippet 7? [y/N] ");
}

#[test]
fn free_form_language_tags_resolve_to_grammars() {
    let ps = SyntaxSet::load_defaults_newlines();
    let cases = [
        ("Python", "Python"),
        ("python", "Python"),
        ("Go", "Go"),
        ("golang", "Go"),
        ("JS", "JavaScript"),
        ("", "Plain Text"),
        ("plaintext", "Plain Text"),
        ("definitely-not-a-language", "Plain Text"),
    ];
    for (tag, expected) in cases {
        assert_eq!(resolve_syntax(&ps, tag).name, expected, "tag {:?}", tag);
    }
}

#[test]
fn terminal_highlighter_keeps_code_text() {
    let highlighter = TerminalHighlighter::new();
    let out = highlighter.highlight("x = 1\n", "Python");
    assert!(out.contains("\x1b["));
    assert!(out.contains('x'));
    assert!(out.ends_with("\x1b[0m"));
    assert_eq!(highlighter.syntax_name("py"), "Python");
}

fn mock_config(server: &MockStoreServer) -> Config {
    Config {
        api_base_url: server.base_url(),
        timeout: Duration::from_secs(5),
        sync_perf_log: false,
    }
}

#[tokio::test]
async fn run_deletes_through_the_sync_controller() {
    let server = MockStoreServer::start().await;
    let keep = server.store().insert("Quick Sort", "Python", "def qs(): pass");
    let gone = server.store().insert("Binary Search", "Go", "func search() {}");

    let config = mock_config(&server);
    let store = HttpStore::new(&config).expect("http store");
    let mut sync = spawn_sync(Arc::new(store), &config);

    run(&mut sync, Commands::List, false).await.expect("list");
    run(
        &mut sync,
        Commands::Delete {
            id: gone.id.clone(),
            yes: true,
        },
        true,
    )
    .await
    .expect("delete");

    let view = sync.settled().await;
    assert_eq!(view.lifecycle, Lifecycle::Ready);
    assert_eq!(view.cache.as_slice(), &[keep.clone()]);
    assert_eq!(server.store().snippets(), vec![keep]);
    sync.shutdown().await;
}

#[tokio::test]
async fn run_reports_unknown_ids_and_store_failures() {
    let server = MockStoreServer::start().await;
    server.store().insert("Hello", "JS", "console.log(1)");

    let config = mock_config(&server);
    let store = HttpStore::new(&config).expect("http store");
    let mut sync = spawn_sync(Arc::new(store), &config);

    let err = run(
        &mut sync,
        Commands::Show {
            id: "nope".to_string(),
            plain: true,
        },
        false,
    )
    .await
    .expect_err("unknown id");
    assert_eq!(err.to_string(), "no snippet with id 'nope'");

    server.store().fail_next_list(500);
    let err = run(&mut sync, Commands::List, false)
        .await
        .expect_err("injected failure");
    assert_eq!(
        err.to_string(),
        "Server error (500): injected list failure"
    );
    sync.shutdown().await;
}
