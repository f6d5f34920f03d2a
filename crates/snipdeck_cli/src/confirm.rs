//! Interactive delete confirmation on the terminal.

use snipdeck_core::collaborators::ConfirmDelete;
use snipdeck_core::Snippet;
use std::io::{self, BufRead, Write};

pub(crate) fn delete_prompt(id: &str, snippet: Option<&Snippet>) -> String {
    match snippet {
        Some(snippet) => format!(
            "Delete snippet \"{}\" ({}, {})? [y/N] ",
            snippet.title, snippet.language, id
        ),
        None => format!("Delete snippet {}? [y/N] ", id),
    }
}

/// Only an explicit yes confirms; anything else, including EOF, declines.
pub(crate) fn answer_confirms(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl ConfirmDelete for TerminalConfirm {
    fn confirm_delete(&self, id: &str, snippet: Option<&Snippet>) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{}", delete_prompt(id, snippet)).is_err() || stderr.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer_confirms(&answer),
            Err(_) => false,
        }
    }
}
