//! # plab Core
//!
//! This crate provides the core functionality for plab, a local prompt library for
//! image-generation workflows.
//!
//! plab stores named prompts (comma, newline or pipe separated tag lists with optional
//! weights and `{a|b}` variation groups), indexes their expanded tags for autocomplete,
//! and maintains a directory of reusable wildcard files referenced as `__name__`.
//!
//! # Modules
//!
//! - [`parser`] - nom parsers for the prompt tag syntax
//! - [`expander`] - Expansion of a prompt into its sorted tag variants
//! - [`prompt`] - Prompt record data structures
//! - [`registry`] - Prompt storage and word index traits
//! - [`file_storage`] - File-based storage implementation for prompts and the word index
//! - [`library`] - Save, browse and autocomplete workflow
//! - [`wildcards`] - Wildcard directory listing, editing, deduplication and cleanup
//!
//! # Examples
//!
//! ```rust
//! use plab_core::file_storage::FileStorage;
//! use plab_core::library::PromptLibrary;
//! use plab_core::prompt::{Prompt, PromptMetadata};
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let library = PromptLibrary::new(FileStorage {
//!     base_path: temp_dir.path().to_path_buf(),
//! });
//!
//! let metadata = PromptMetadata::new("portrait".to_string(), None, None);
//! let prompt = Prompt::new(metadata, "red {cat|dog}, __style__, weight:0.8".to_string());
//! library.save(prompt, false).expect("Failed to save prompt");
//!
//! assert_eq!(library.autocomplete("red").unwrap(), vec!["red cat", "red dog"]);
//! ```

pub mod expander;
pub mod file_storage;
pub mod library;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod wildcards;
