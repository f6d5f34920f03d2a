//! Interfaces the presentation layer plugs into the sync core.
//!
//! None of these can mutate controller state: highlighting and clipboard
//! receive plain text, and the delete gate only answers yes or no.

use crate::models::Snippet;

/// Produces a display representation of code for a free-form language tag.
pub trait Highlighter {
    type Output;

    fn highlight(&self, code: &str, language: &str) -> Self::Output;
}

/// Fire-and-forget text copy. Outcomes are never reported back to the caller.
pub trait Clipboard {
    fn copy(&self, text: &str);
}

/// Explicit user confirmation required before a destructive delete.
pub trait ConfirmDelete {
    /// `snippet` is the cached entry for `id`, when the cache has one.
    fn confirm_delete(&self, id: &str, snippet: Option<&Snippet>) -> bool;
}

/// Gate that approves every delete, for callers that confirmed up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreConfirmed;

impl ConfirmDelete for PreConfirmed {
    fn confirm_delete(&self, _id: &str, _snippet: Option<&Snippet>) -> bool {
        true
    }
}

/// Plain-text passthrough used when no highlighting is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Highlighter for PlainText {
    type Output = String;

    fn highlight(&self, code: &str, _language: &str) -> String {
        code.to_string()
    }
}
