//! Controller-owned state: collection cache, draft, query and lifecycle.

use super::protocol::{Lifecycle, SyncView};
use snipdeck_core::{filter_snippets, Draft, DraftField, Snippet};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Mutable state of the sync actor. The actor is its only writer.
#[derive(Debug, Default)]
pub(crate) struct SyncState {
    cache: Arc<Vec<Snippet>>,
    draft: Draft,
    query: String,
    lifecycle: Lifecycle,
    in_flight: usize,
}

impl SyncState {
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn draft(&self) -> &Draft {
        &self.draft
    }

    /// A store request started; the lifecycle enters `Loading`.
    pub(crate) fn begin_request(&mut self) {
        self.in_flight += 1;
        self.lifecycle = Lifecycle::Loading;
    }

    /// A store request concluded.
    ///
    /// While other requests are outstanding the lifecycle stays `Loading`;
    /// the last request to conclude decides between `Ready` and `Error`.
    pub(crate) fn finish_request(&mut self, succeeded: bool) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.lifecycle = if succeeded {
                Lifecycle::Ready
            } else {
                Lifecycle::Error
            };
        }
    }

    /// Replace the cache wholesale with a list response, verbatim.
    pub(crate) fn replace_cache(&mut self, items: Vec<Snippet>) {
        {
            let mut seen = HashSet::with_capacity(items.len());
            if let Some(dup) = items.iter().find(|s| !seen.insert(s.id.as_str())) {
                warn!(id = %dup.id, "store returned duplicate snippet ids; keeping response as-is");
            }
        }
        self.cache = Arc::new(items);
    }

    pub(crate) fn stage_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    pub(crate) fn edit_draft(&mut self, field: DraftField, value: String) {
        self.draft.set(field, value);
    }

    pub(crate) fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub(crate) fn set_query(&mut self, text: String) {
        self.query = text;
    }

    pub(crate) fn view(&self) -> SyncView {
        SyncView {
            lifecycle: self.lifecycle,
            query: self.query.clone(),
            visible: filter_snippets(&self.cache, &self.query),
            cache: Arc::clone(&self.cache),
            draft: self.draft.clone(),
            in_flight: self.in_flight,
            commands_seen: 0,
        }
    }
}
