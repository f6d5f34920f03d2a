//! Snippet entity as reported by the store, and the draft used to create one.

use crate::error::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A stored code entry. Every field comes verbatim from a store response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Store-assigned identifier; `_id` and numeric ids are accepted on input.
    #[serde(alias = "_id", deserialize_with = "deserialize_store_id")]
    pub id: String,
    pub title: String,
    pub language: String,
    pub code: String,
}

fn deserialize_store_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoreId {
        Text(String),
        Number(serde_json::Number),
    }

    match StoreId::deserialize(deserializer)? {
        StoreId::Text(text) => Ok(text),
        StoreId::Number(number) => Ok(number.to_string()),
    }
}

/// One of the three user-editable snippet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Language,
    Code,
}

impl DraftField {
    /// Every field, in display order.
    pub const ALL: [DraftField; 3] = [DraftField::Title, DraftField::Language, DraftField::Code];

    /// Wire name of the field, as used in create payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Language => "language",
            DraftField::Code => "code",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unsaved snippet staged for a create request. Never carries an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub language: String,
    pub code: String,
}

impl Draft {
    /// Build a draft from its three fields.
    ///
    /// # Arguments
    /// - `title`: Display title.
    /// - `language`: Free-form language tag.
    /// - `code`: Snippet body.
    ///
    /// # Returns
    /// The draft, unvalidated; see [`Draft::validate`].
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            code: code.into(),
        }
    }

    /// Read a single field.
    ///
    /// # Arguments
    /// - `field`: Which field to read.
    ///
    /// # Returns
    /// The field's current text, untrimmed.
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Language => &self.language,
            DraftField::Code => &self.code,
        }
    }

    /// Replace a single field, leaving the others untouched.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Title => &mut self.title,
            DraftField::Language => &mut self.language,
            DraftField::Code => &mut self.code,
        };
        *slot = value.into();
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been typed into any field.
    pub fn is_empty(&self) -> bool {
        DraftField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Fields that are empty or whitespace-only, in display order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Check the create precondition: all three fields non-empty.
    ///
    /// # Errors
    /// [`StoreError::Validation`] naming every missing field.
    pub fn validate(&self) -> Result<(), StoreError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|field| field.as_str()).collect();
        Err(StoreError::Validation(format!(
            "required fields are empty: {}",
            names.join(", ")
        )))
    }
}
