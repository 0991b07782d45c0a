//! Subcommand implementations and the state plumbing they share.

use std::path::PathBuf;

use anyhow::Result;

use gradepred_core::validation::{describe, ValidationIssue};
use gradepred_core::{AcademicRecordAggregator, PredictorError};
use gradepred_remote::config::{load_config_from, GradepredConfig, RemoteConfig};
use gradepred_store::{load_state, save_state, JsonFileStore};

pub mod add_grade;
pub mod delete_grades;
pub mod delete_predictions;
pub mod export;
pub mod health;
pub mod history;
pub mod init;
pub mod list_grades;
pub mod models;
pub mod predict;
pub mod stats;
pub mod sync;
pub mod update_grade;

/// Flags accepted by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Loaded configuration plus the store it points at.
pub struct Workspace {
    pub config: GradepredConfig,
    pub store: JsonFileStore,
}

impl Workspace {
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let mut config = load_config_from(opts.config.as_deref())?;
        if let Some(dir) = &opts.data_dir {
            config.data_dir = dir.clone();
        }
        let store = JsonFileStore::new(&config.data_dir);
        Ok(Self { config, store })
    }

    /// The `[remote]` section; commands that talk to the backend need one.
    pub fn remote(&self) -> Result<&RemoteConfig> {
        self.config
            .remote
            .as_ref()
            .ok_or_else(|| PredictorError::Unavailable.into())
    }

    pub fn load(&self) -> Result<AcademicRecordAggregator> {
        load_state(&self.store)
    }

    pub fn save(&self, aggregator: &AcademicRecordAggregator) -> Result<()> {
        save_state(&self.store, aggregator)
    }
}

/// Split a comma-separated id list, dropping blanks.
pub fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn ensure_valid(issues: &[ValidationIssue]) -> Result<()> {
    if !issues.is_empty() {
        anyhow::bail!("invalid input: {}", describe(issues));
    }
    Ok(())
}
