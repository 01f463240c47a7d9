use std::env;
use std::path::{Path, PathBuf};

use crate::gateway::PersistenceGateway;
use crate::slot::FileSlot;

/// Storage configuration.
///
/// Reads from the `HERO_DATA_DIR` environment variable, falling back to the
/// platform data directory (`~/.local/share/holiday-hero` on Linux) when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the snapshot file.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Environment variable that overrides the data directory.
    pub const ENV_VAR: &str = "HERO_DATA_DIR";

    /// Directory name under the platform data directory.
    pub const APP_DIR: &str = "holiday-hero";

    /// Build a config from the environment.
    ///
    /// Priority: `HERO_DATA_DIR` env var, then [`Self::default_data_dir`].
    pub fn from_env() -> Self {
        let data_dir = env::var_os(Self::ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_data_dir);
        Self { data_dir }
    }

    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform data directory joined with [`Self::APP_DIR`], or
    /// `./.holiday-hero` when the platform has none.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(Self::APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", Self::APP_DIR)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// A gateway writing to a [`FileSlot`] in this directory.
    pub fn open_gateway(&self) -> PersistenceGateway {
        PersistenceGateway::new(FileSlot::new(&self.data_dir))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
