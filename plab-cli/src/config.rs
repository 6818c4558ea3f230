use crate::constants::{DEFAULT_PROMPTS_DIR, DEFAULT_WILDCARDS_DIR, PLAB_CLI};
use confy::ConfyError;
use plab_core::file_storage::FileStorage;
use plab_core::library::PromptLibrary;
use plab_core::wildcards::WildcardManager;
use serde::{Deserialize, Serialize};
use std::env::home_dir;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct PlabCliConfig {
    pub storage_path: String,
    pub wildcards_dir: String,
}

impl Default for PlabCliConfig {
    fn default() -> Self {
        let base_path = home_dir()
            .map(|p| p.join(PLAB_CLI))
            .unwrap_or_else(|| PathBuf::from(PLAB_CLI));

        Self {
            storage_path: base_path.join(DEFAULT_PROMPTS_DIR).display().to_string(),
            wildcards_dir: base_path.join(DEFAULT_WILDCARDS_DIR).display().to_string(),
        }
    }
}

impl PlabCliConfig {
    /// Replaces configured paths with the ones given on the command line.
    pub fn with_overrides(mut self, storage_path: Option<String>, wildcards_dir: Option<String>) -> Self {
        if let Some(path) = storage_path {
            self.storage_path = path;
        }
        if let Some(dir) = wildcards_dir {
            self.wildcards_dir = dir;
        }
        self
    }

    pub fn library(&self) -> PromptLibrary<FileStorage> {
        PromptLibrary::new(FileStorage {
            base_path: PathBuf::from(&self.storage_path),
        })
    }

    pub fn wildcards(&self) -> WildcardManager {
        WildcardManager::new(&self.wildcards_dir)
    }
}

pub fn load_config() -> PlabCliConfig {
    let config: Result<PlabCliConfig, ConfyError> = confy::load(PLAB_CLI, None);
    match config {
        Ok(config) => {
            log::debug!("Loaded config: {:?}", config);
            config
        }
        Err(e) => {
            eprintln!("Error: Problem loading config ({}). Exiting...", e);
            std::process::exit(exitcode::CONFIG);
        }
    }
}
