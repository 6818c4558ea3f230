//! # Prompt Library
//!
//! The save/browse/autocomplete workflow on top of a store that implements both
//! [`PromptStorage`] and [`WordIndex`]. Saving a prompt expands it and feeds the
//! resulting words into the index.

use crate::expander::Expansion;
use crate::prompt::Prompt;
use crate::registry::{PromptStorage, WordIndex};
use thiserror::Error;

/// Maximum number of autocomplete suggestions.
pub const AUTOCOMPLETE_LIMIT: usize = 30;

#[derive(Debug, Error)]
pub enum LibraryError<E: std::error::Error + 'static> {
    #[error("Prompt already exists: {0}")]
    AlreadyExists(String),
    #[error("Prompt not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] E),
}

pub struct PromptLibrary<S> {
    storage: S,
}

impl<S, E> PromptLibrary<S>
where
    S: PromptStorage<Error = E> + WordIndex<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores `prompt` and indexes its expanded words.
    ///
    /// Without `overwrite`, an existing record with the same name is left
    /// untouched and `AlreadyExists` is returned. With it, the existing record's
    /// creation time is kept.
    pub fn save(&self, mut prompt: Prompt, overwrite: bool) -> Result<Expansion, LibraryError<E>> {
        if let Some(existing) = self.storage.get_prompt(prompt.name())? {
            if !overwrite {
                return Err(LibraryError::AlreadyExists(prompt.name().to_string()));
            }
            prompt.metadata.created_at = existing.metadata.created_at;
        }

        self.storage.save_prompt(&prompt)?;

        let expansion = prompt.expand();
        self.storage.insert_words(&expansion.words())?;
        log::info!(
            "Saved prompt '{}' with {} indexed word(s)",
            prompt.name(),
            expansion.len()
        );
        Ok(expansion)
    }

    pub fn get(&self, name: &str) -> Result<Prompt, LibraryError<E>> {
        self.storage
            .get_prompt(name)?
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    pub fn list(&self, search: Option<&str>) -> Result<Vec<Prompt>, LibraryError<E>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.storage.get_prompts(search)?)
    }

    pub fn delete(&self, name: &str) -> Result<(), LibraryError<E>> {
        if self.storage.get_prompt(name)?.is_none() {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        Ok(self.storage.delete_prompt(name)?)
    }

    pub fn set_favorite(&self, name: &str, favorite: bool) -> Result<(), LibraryError<E>> {
        let mut prompt = self.get(name)?;
        prompt.metadata.favorite = favorite;
        Ok(self.storage.save_prompt(&prompt)?)
    }

    /// Index words starting with `query`. A blank query yields nothing.
    pub fn autocomplete(&self, query: &str) -> Result<Vec<String>, LibraryError<E>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.storage.search_words(query, AUTOCOMPLETE_LIMIT)?)
    }
}
