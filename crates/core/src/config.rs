//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{
    APP_AUTHOR, APP_NAME, APP_VERSION, DEFAULT_COUNTRY, DISEASES_FILENAME,
    MOCK_HISTORY_DISEASES_FILENAME, PATIENTS_FILENAME, PATIENT_HISTORY_FILENAME,
    RANDOM_HISTORY_COUNT, RANDOM_HISTORY_MAX_DAYS, RANDOM_HISTORY_MIN_DAYS, RELATIONS_FILENAME,
    STATE_DISEASES_FILENAME,
};
use crate::{NhlError, NhlResult};
use std::path::{Path, PathBuf};

/// Descriptive metadata served by the meta endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub country: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: APP_NAME.into(),
            version: APP_VERSION.into(),
            author: APP_AUTHOR.into(),
            country: DEFAULT_COUNTRY.into(),
        }
    }
}

/// Parameters for auto-generated patient history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryParams {
    pub count: usize,
    pub min_days: i64,
    pub max_days: i64,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            count: RANDOM_HISTORY_COUNT,
            min_days: RANDOM_HISTORY_MIN_DAYS,
            max_days: RANDOM_HISTORY_MAX_DAYS,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    metadata: AppMetadata,
    history: HistoryParams,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with default metadata and history parameters.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::InvalidInput` if `data_dir` is not an existing directory.
    pub fn new(data_dir: PathBuf) -> NhlResult<Self> {
        Self::with_settings(data_dir, AppMetadata::default(), HistoryParams::default())
    }

    /// Create a `CoreConfig` with explicit metadata and history parameters.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::InvalidInput` if `data_dir` is not an existing directory or the
    /// history day range is inverted or negative.
    pub fn with_settings(
        data_dir: PathBuf,
        metadata: AppMetadata,
        history: HistoryParams,
    ) -> NhlResult<Self> {
        if !data_dir.is_dir() {
            return Err(NhlError::InvalidInput(format!(
                "data directory does not exist: {}",
                data_dir.display()
            )));
        }

        if history.min_days < 0 || history.max_days < history.min_days {
            return Err(NhlError::InvalidInput(
                "history day range must satisfy 0 <= min_days <= max_days".into(),
            ));
        }

        Ok(Self {
            data_dir,
            metadata,
            history,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    pub fn history(&self) -> HistoryParams {
        self.history
    }

    pub fn patients_path(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILENAME)
    }

    pub fn diseases_path(&self) -> PathBuf {
        self.data_dir.join(DISEASES_FILENAME)
    }

    pub fn relations_path(&self) -> PathBuf {
        self.data_dir.join(RELATIONS_FILENAME)
    }

    pub fn state_diseases_path(&self) -> PathBuf {
        self.data_dir.join(STATE_DISEASES_FILENAME)
    }

    pub fn mock_history_diseases_path(&self) -> PathBuf {
        self.data_dir.join(MOCK_HISTORY_DISEASES_FILENAME)
    }

    pub fn patient_history_path(&self) -> PathBuf {
        self.data_dir.join(PATIENT_HISTORY_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_file_paths_under_data_dir() {
        let temp = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp.path().to_path_buf()).unwrap();

        assert_eq!(cfg.data_dir(), temp.path());
        assert!(cfg.relations_path().ends_with("relations.json"));
        assert!(cfg.patients_path().starts_with(temp.path()));
        assert_eq!(cfg.metadata().name, "Neural Health Link");
        assert_eq!(cfg.history().count, 5);
    }

    #[test]
    fn rejects_missing_data_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            CoreConfig::new(missing),
            Err(NhlError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_inverted_history_range() {
        let temp = TempDir::new().unwrap();
        let params = HistoryParams {
            count: 3,
            min_days: 100,
            max_days: 10,
        };
        assert!(CoreConfig::with_settings(
            temp.path().to_path_buf(),
            AppMetadata::default(),
            params
        )
        .is_err());
    }
}
