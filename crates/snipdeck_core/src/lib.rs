//! Core domain library for snipdeck (models, config, errors, search filter).

/// Presentation collaborator interfaces (highlighting, clipboard, delete confirmation).
pub mod collaborators;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across crates.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// Store error taxonomy.
pub mod error;
/// Pure search filter over a snippet collection.
pub mod filter;
/// Snippet and draft data models.
pub mod models;

pub use config::Config;
pub use constants::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, SNIPPETS_COLLECTION};
pub use error::StoreError;
pub use filter::filter_snippets;
pub use models::{Draft, DraftField, Snippet};
