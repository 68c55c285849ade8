//! Configuration module for the navigation indexer.
//!
//! Layered configuration: defaults, then a TOML settings file, then
//! environment variable overrides.
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `NAVIX_` and use double
//! underscores to separate nested levels:
//! - `NAVIX_INDEX_PATH=.navix/index` sets `index_path`
//! - `NAVIX_INDEXING__EXTENSIONS='["cc","h"]'` sets `indexing.extensions`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the on-disk store file inside `index_path`.
pub const STORE_FILE_NAME: &str = "navix.idx";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory the index store file is written to
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Workspace root directory (where .navix is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Indexing configuration
    #[serde(default)]
    pub indexing: IndexingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// File extensions treated as C++ translation units or headers
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether hidden files and directories are traversed
    #[serde(default = "default_false")]
    pub include_hidden: bool,
}

fn default_version() -> u32 {
    1
}

fn default_index_path() -> PathBuf {
    PathBuf::from(".navix/index")
}

fn default_false() -> bool {
    false
}

fn default_extensions() -> Vec<String> {
    ["cc", "cpp", "cxx", "c", "h", "hh", "hpp", "hxx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            workspace_root: None,
            debug: false,
            indexing: IndexingConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            include_hidden: false,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from(Path::new(".navix/settings.toml"))
    }

    /// Load configuration with an explicit settings file path
    pub fn load_from(config_path: &Path) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("NAVIX_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Full path of the store file for these settings
    pub fn store_path(&self) -> PathBuf {
        self.index_path.join(STORE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.index_path, PathBuf::from(".navix/index"));
        assert!(!settings.debug);
        assert!(settings.indexing.extensions.iter().any(|e| e == "cc"));
    }

    #[test]
    fn test_store_path() {
        let settings = Settings::default();
        assert_eq!(
            settings.store_path(),
            PathBuf::from(".navix/index").join(STORE_FILE_NAME)
        );
    }
}
