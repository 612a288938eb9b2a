//! Search settings loadable from a JSON file.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::search::{CoverConfig, RhymeConfig};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be opened
    #[error("Could not open config {0}: {1}")]
    Io(String, #[source] std::io::Error),

    /// The file is not a valid configuration
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub rhyme: RhymeConfig,
    pub cover: CoverConfig,
}

pub static DEFAULT_CONFIG: SearchConfig = SearchConfig::default();

impl SearchConfig {
    pub const fn default() -> SearchConfig {
        SearchConfig {
            rhyme: RhymeConfig::default(),
            cover: CoverConfig::default(),
        }
    }

    /// Reads a config file. Missing fields take their default value.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SearchConfig, ConfigError> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cover": {{"max_branch": 2}}}}"#).unwrap();

        let config = SearchConfig::from_path(file.path()).unwrap();
        assert_eq!(config.cover.max_branch, 2);
        assert!(config.cover.exclude_self);
        assert_eq!(config.rhyme, DEFAULT_CONFIG.rhyme);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SearchConfig::from_path(dir.path().join("nope.json")),
            Err(ConfigError::Io(..))
        ));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            SearchConfig::from_path(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
