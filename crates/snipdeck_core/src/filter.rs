//! Case-insensitive substring search over a snippet collection.

use crate::models::Snippet;

/// Lowercased query, prepared once per filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Prepare `query` for matching.
    ///
    /// # Arguments
    /// - `query`: Text as typed; it is lowercased but not trimmed.
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// An empty query matches every snippet.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// True when the query occurs in the title or language, ignoring case.
    pub fn matches(&self, snippet: &Snippet) -> bool {
        self.is_empty()
            || snippet.title.to_lowercase().contains(&self.needle)
            || snippet.language.to_lowercase().contains(&self.needle)
    }
}

/// Return the subsequence of `collection` matching `query`, order preserved.
///
/// The query is not trimmed: surrounding whitespace is part of the needle.
pub fn filter_snippets(collection: &[Snippet], query: &str) -> Vec<Snippet> {
    let query = SearchQuery::new(query);
    if query.is_empty() {
        return collection.to_vec();
    }
    collection
        .iter()
        .filter(|snippet| query.matches(snippet))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_snippets, SearchQuery};
    use crate::models::Snippet;

    fn snippet(id: &str, title: &str, language: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            title: title.to_string(),
            language: language.to_string(),
            code: format!("// {}", title),
        }
    }

    fn sample() -> Vec<Snippet> {
        vec![
            snippet("1", "Quick Sort", "Python"),
            snippet("2", "Binary Search", "Go"),
        ]
    }

    fn ids(items: &[Snippet]) -> Vec<&str> {
        items.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_collection_unchanged() {
        let collection = sample();
        assert_eq!(filter_snippets(&collection, ""), collection);
        assert!(filter_snippets(&[], "").is_empty());
    }

    #[test]
    fn language_and_title_matches_are_case_insensitive() {
        let collection = sample();
        assert_eq!(ids(&filter_snippets(&collection, "go")), vec!["2"]);
        assert_eq!(ids(&filter_snippets(&collection, "sort")), vec!["1"]);
        assert_eq!(ids(&filter_snippets(&collection, "PYTH")), vec!["1"]);
        assert!(filter_snippets(&collection, "rust").is_empty());
    }

    #[test]
    fn code_text_is_not_a_search_target() {
        let collection = vec![Snippet {
            id: "9".to_string(),
            title: "Hello".to_string(),
            language: "JS".to_string(),
            code: "needle".to_string(),
        }];
        assert!(filter_snippets(&collection, "needle").is_empty());
    }

    #[test]
    fn matches_keep_input_order() {
        let collection = vec![
            snippet("c", "Merge Sort", "Rust"),
            snippet("a", "Heap", "Sorting DSL"),
            snippet("b", "Trie", "Go"),
            snippet("d", "Bubble sort", "C"),
        ];
        assert_eq!(ids(&filter_snippets(&collection, "sort")), vec!["c", "a", "d"]);
    }

    #[test]
    fn whitespace_is_part_of_the_needle() {
        let collection = sample();
        assert_eq!(ids(&filter_snippets(&collection, "k s")), vec!["1"]);
        assert!(filter_snippets(&collection, " go ").is_empty());
        assert!(!SearchQuery::new(" ").is_empty());
    }
}
