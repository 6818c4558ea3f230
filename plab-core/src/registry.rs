//! # Prompt Registry
//!
//! Storage traits for prompt records and the autocomplete word index.
//!
//! - [`PromptStorage`] - stores and retrieves prompt records by name
//! - [`WordIndex`] - keeps the distinct expanded words for autocomplete

use crate::prompt::Prompt;

pub trait PromptStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates or overwrites the record named `prompt.name()`.
    fn save_prompt(&self, prompt: &Prompt) -> Result<(), Self::Error>;
    fn get_prompt(&self, name: &str) -> Result<Option<Prompt>, Self::Error>;
    /// Newest first; filtered with [`Prompt::matches`] when `search` is given.
    fn get_prompts(&self, search: Option<&str>) -> Result<Vec<Prompt>, Self::Error>;
    fn delete_prompt(&self, name: &str) -> Result<(), Self::Error>;
}

pub trait WordIndex {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts each word that is not already indexed.
    fn insert_words(&self, words: &[String]) -> Result<(), Self::Error>;
    /// Indexed words starting with `prefix`, ascending, at most `limit`.
    fn search_words(&self, prefix: &str, limit: usize) -> Result<Vec<String>, Self::Error>;
}

/// Orders prompts newest first, then by name.
pub(crate) fn sort_newest_first(prompts: &mut [Prompt]) {
    prompts.sort_by(|a, b| {
        b.metadata
            .created_at
            .cmp(&a.metadata.created_at)
            .then_with(|| a.metadata.name.cmp(&b.metadata.name))
    });
}

/// ASCII case-insensitive prefix test used by word searches.
pub(crate) fn has_prefix_ignore_case(word: &str, prefix: &str) -> bool {
    word.len() >= prefix.len()
        && word.is_char_boundary(prefix.len())
        && word[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptMetadata;
    use chrono::{TimeZone, Utc};

    fn prompt_at(name: &str, secs: i64) -> Prompt {
        let mut metadata = PromptMetadata::new(name.to_string(), None, None);
        metadata.created_at = Utc.timestamp_opt(secs, 0).unwrap();
        Prompt::new(metadata, String::new())
    }

    #[test]
    fn test_sort_newest_first() {
        let mut prompts = vec![prompt_at("old", 10), prompt_at("b", 20), prompt_at("a", 20)];
        sort_newest_first(&mut prompts);

        let names: Vec<&str> = prompts.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "b", "old"]);
    }

    #[test]
    fn test_has_prefix_ignore_case() {
        assert!(has_prefix_ignore_case("Blue eyes", "blue"));
        assert!(has_prefix_ignore_case("anything", ""));
        assert!(!has_prefix_ignore_case("red", "redder"));
        assert!(!has_prefix_ignore_case("éa", "e"));
    }
}
