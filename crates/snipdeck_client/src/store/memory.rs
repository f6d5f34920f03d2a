//! In-process store with store-assigned uuid ids.

use super::SnippetStore;
use async_trait::async_trait;
use snipdeck_core::{Draft, Snippet, StoreError};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Snippet collection held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snippets: Mutex<Vec<Snippet>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries, keeping their ids.
    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets: Mutex::new(snippets),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<Snippet> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Snippet>> {
        self.snippets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SnippetStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Snippet>, StoreError> {
        Ok(self.snapshot())
    }

    async fn create(&self, draft: &Draft) -> Result<Snippet, StoreError> {
        draft.validate()?;
        let snippet = Snippet {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            language: draft.language.clone(),
            code: draft.code.clone(),
        };
        self.lock().push(snippet.clone());
        Ok(snippet)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut snippets = self.lock();
        match snippets.iter().position(|snippet| snippet.id == id) {
            Some(index) => {
                snippets.remove(index);
                Ok(())
            }
            None => Err(StoreError::Server {
                status: 404,
                message: "Not found".to_string(),
            }),
        }
    }
}
