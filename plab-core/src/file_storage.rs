//! # File Storage
//!
//! This module provides functionality for storing and retrieving prompt records from the
//! local filesystem. Records are stored as individual markdown files with YAML frontmatter
//! in a specified directory, and the word index is kept next to them in a plain text file
//! with one word per line.
//!
//! The main component of this module is the [`FileStorage`] struct, which implements the
//! [`PromptStorage`] and [`WordIndex`] traits.
//!
//! # Examples
//!
//! ```rust
//! use plab_core::file_storage::FileStorage;
//! use plab_core::prompt::{Prompt, PromptMetadata};
//! use plab_core::registry::PromptStorage;
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let storage = FileStorage {
//!     base_path: temp_dir.path().to_path_buf(),
//! };
//!
//! let metadata = PromptMetadata::new("portrait".to_string(), None, None);
//! let prompt = Prompt::new(metadata, "1girl, {red|blue} eyes".to_string());
//!
//! storage.save_prompt(&prompt).expect("Failed to save prompt");
//! ```

use crate::prompt::{Prompt, PromptMetadata};
use crate::registry::{has_prefix_ignore_case, sort_newest_first, PromptStorage, WordIndex};
use std::collections::BTreeSet;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use walkdir::WalkDir;

const WORD_INDEX_FILE: &str = "prompt_words.txt";

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0:?}")]
    Serialization(serde_frontmatter::SerdeFMError),
    #[error("Invalid base path: {0}")]
    InvalidBasePath(String),
    #[error("Invalid prompt name: '{0}'")]
    InvalidPromptName(String),
    #[error("Prompt not found: {0}")]
    PromptNotFound(String),
}

impl From<serde_frontmatter::SerdeFMError> for FileStorageError {
    fn from(err: serde_frontmatter::SerdeFMError) -> Self {
        FileStorageError::Serialization(err)
    }
}

/// A local file storage for prompt records and the word index.
pub struct FileStorage {
    /// The base directory where prompt files are stored.
    pub base_path: PathBuf,
}

impl PromptStorage for FileStorage {
    type Error = FileStorageError;

    /// Saves a prompt record in the local file system.
    ///
    /// If `base_path` doesn't exist, it is created first.
    /// If the file already exists, it is overwritten.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the prompt is saved correctly.
    /// * `FileStorageError::InvalidPromptName` - If the name cannot be used as a file name.
    /// * `FileStorageError::InvalidBasePath` - If `base_path` is not a directory.
    fn save_prompt(&self, prompt: &Prompt) -> Result<(), FileStorageError> {
        let file_path = self.prompt_path(prompt.name())?;
        self.ensure_base_directory_exists()?;

        let serialized_data = serde_frontmatter::serialize(&prompt.metadata, prompt.content.as_str())?;
        fs::write(&file_path, serialized_data)?;
        log::debug!("Saved prompt '{}' to {}", prompt.name(), file_path.display());
        Ok(())
    }

    /// Gets a prompt given its name, or `None` if there is no such prompt.
    fn get_prompt(&self, name: &str) -> Result<Option<Prompt>, FileStorageError> {
        let file_path = self.prompt_path(name)?;
        if !file_path.is_file() {
            return Ok(None);
        }

        read_prompt_file(&file_path).map(Some)
    }

    /// Gets all prompts in the base directory, newest first.
    ///
    /// When `search` is given, only prompts whose name, description or content
    /// contain it (case-insensitively) are returned.
    fn get_prompts(&self, search: Option<&str>) -> Result<Vec<Prompt>, FileStorageError> {
        let mut prompts = Vec::new();

        for entry in self.get_md_files()? {
            let prompt = read_prompt_file(entry.path())?;
            if search.is_none_or(|needle| prompt.matches(needle)) {
                prompts.push(prompt);
            }
        }

        sort_newest_first(&mut prompts);
        Ok(prompts)
    }

    /// Deletes a prompt given its name.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the prompt was successfully deleted.
    /// * `FileStorageError::PromptNotFound` - If the prompt didn't exist.
    fn delete_prompt(&self, name: &str) -> Result<(), FileStorageError> {
        let file_path = self.prompt_path(name)?;
        if !file_path.is_file() {
            return Err(FileStorageError::PromptNotFound(name.to_string()));
        }

        fs::remove_file(file_path)?;
        log::debug!("Deleted prompt '{}'", name);
        Ok(())
    }
}

impl WordIndex for FileStorage {
    type Error = FileStorageError;

    fn insert_words(&self, words: &[String]) -> Result<(), FileStorageError> {
        if words.is_empty() {
            return Ok(());
        }

        self.ensure_base_directory_exists()?;
        let mut index = self.read_words()?;
        let before = index.len();
        for word in words.iter().filter(|w| !w.trim().is_empty()) {
            // One word per line in the index file.
            if word.contains(['\n', '\r']) {
                log::warn!("Skipping multi-line word {:?}", word);
                continue;
            }
            index.insert(word.clone());
        }
        let added = index.len() - before;

        if added > 0 {
            let mut serialized = index.into_iter().collect::<Vec<_>>().join("\n");
            serialized.push('\n');
            fs::write(self.base_path.join(WORD_INDEX_FILE), serialized)?;
        }
        log::debug!("Indexed {} new word(s)", added);
        Ok(())
    }

    fn search_words(&self, prefix: &str, limit: usize) -> Result<Vec<String>, FileStorageError> {
        Ok(self
            .read_words()?
            .into_iter()
            .filter(|word| has_prefix_ignore_case(word, prefix))
            .take(limit)
            .collect())
    }
}

impl FileStorage {
    pub fn ensure_base_directory_exists(&self) -> Result<(), FileStorageError> {
        if !self.base_path.exists() {
            create_dir_all(&self.base_path)?;
        } else if !self.base_path.is_dir() {
            return Err(FileStorageError::InvalidBasePath(
                self.base_path.display().to_string(),
            ));
        }
        Ok(())
    }

    fn prompt_path(&self, name: &str) -> Result<PathBuf, FileStorageError> {
        let valid = !name.trim().is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(FileStorageError::InvalidPromptName(name.to_string()));
        }
        Ok(self.base_path.join(format!("{}.md", name)))
    }

    fn get_md_files(&self) -> Result<Vec<walkdir::DirEntry>, FileStorageError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let entries = WalkDir::new(&self.base_path)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "md")
            })
            .collect();
        Ok(entries)
    }

    fn read_words(&self) -> Result<BTreeSet<String>, FileStorageError> {
        let path = self.base_path.join(WORD_INDEX_FILE);
        if !path.is_file() {
            return Ok(BTreeSet::new());
        }

        Ok(fs::read_to_string(path)?
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

fn read_prompt_file(file_path: &Path) -> Result<Prompt, FileStorageError> {
    let content = fs::read_to_string(file_path)?;
    let (metadata, raw_content): (PromptMetadata, String) =
        serde_frontmatter::deserialize(content.as_str())?;
    let content = raw_content.trim_start().to_string();

    Ok(Prompt::new(metadata, content))
}
