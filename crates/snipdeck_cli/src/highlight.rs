//! Terminal syntax highlighting for free-form snippet language tags.

use snipdeck_core::collaborators::Highlighter;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use tracing::debug;

const THEME_NAME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn try_resolve_syntax_candidate<'a>(
    ps: &'a SyntaxSet,
    candidate: &str,
) -> Option<&'a SyntaxReference> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(syntax) = ps.find_syntax_by_name(trimmed) {
        return Some(syntax);
    }
    if let Some(syntax) = ps.find_syntax_by_extension(trimmed) {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    if normalized.is_empty() {
        return None;
    }
    ps.syntaxes().iter().find(|syntax| {
        normalized_syntax_key(syntax.name.as_str()) == normalized
            || syntax
                .file_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(trimmed))
    })
}

/// Aliases people type in the language field that syntect does not know.
fn language_aliases(tag_lower: &str) -> &'static [&'static str] {
    match tag_lower {
        "c#" | "csharp" => &["C#", "cs"],
        "c++" | "cpp" => &["C++", "cpp"],
        "shell" | "bash" | "zsh" => &["Bourne Again Shell (bash)", "sh"],
        "golang" => &["Go"],
        "node" | "nodejs" | "typescript" | "ts" => &["JavaScript", "js"],
        "py" | "python3" => &["Python"],
        "objc" | "objective-c" => &["Objective-C", "m"],
        _ => &[],
    }
}

/// Resolve a syntax for a snippet language tag, falling back to plain text.
pub(crate) fn resolve_syntax<'a>(ps: &'a SyntaxSet, language: &str) -> &'a SyntaxReference {
    let tag = language.trim();
    let tag_lower = tag.to_ascii_lowercase();
    if tag.is_empty() || matches!(tag_lower.as_str(), "text" | "txt" | "plain" | "plaintext") {
        return ps.find_syntax_plain_text();
    }

    if let Some(syntax) = try_resolve_syntax_candidate(ps, tag) {
        return syntax;
    }
    for candidate in language_aliases(tag_lower.as_str()) {
        if let Some(syntax) = try_resolve_syntax_candidate(ps, candidate) {
            return syntax;
        }
    }
    ps.find_syntax_plain_text()
}

/// Highlights code into 24-bit ANSI escapes for terminal output.
pub struct TerminalHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl TerminalHighlighter {
    /// Load the default syntaxes and the bundled dark theme.
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(THEME_NAME).unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Name of the grammar used for `language`.
    pub fn syntax_name(&self, language: &str) -> &str {
        resolve_syntax(&self.syntaxes, language).name.as_str()
    }
}

impl Default for TerminalHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for TerminalHighlighter {
    type Output = String;

    fn highlight(&self, code: &str, language: &str) -> String {
        let syntax = resolve_syntax(&self.syntaxes, language);
        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            match lines.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => out.push_str(&as_24_bit_terminal_escaped(&ranges, false)),
                Err(err) => {
                    debug!(language, "highlighting failed, printing plain code: {}", err);
                    return code.to_string();
                }
            }
        }
        out.push_str(RESET);
        out
    }
}
