use crate::expander::{expand, Expansion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stored alongside a prompt, serialized as YAML frontmatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl PromptMetadata {
    pub fn new(name: String, description: Option<String>, image_path: Option<String>) -> Self {
        Self {
            name,
            description,
            image_path,
            favorite: false,
            created_at: Utc::now(),
        }
    }
}

/// A named prompt record: metadata plus the raw prompt string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    #[serde(flatten)]
    pub metadata: PromptMetadata,
    #[serde(rename = "prompt")]
    pub content: String,
}

impl Prompt {
    pub fn new(metadata: PromptMetadata, content: String) -> Self {
        Self { metadata, content }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Expands the prompt string into its tag variants.
    pub fn expand(&self) -> Expansion {
        expand(&self.content)
    }

    /// Case-insensitive match of `search` against name, description and prompt text.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&needle);

        contains(&self.metadata.name)
            || self.metadata.description.as_deref().is_some_and(contains)
            || contains(&self.content)
    }
}
