//! Configuration file management for holiday-hero.
//!
//! Provides a TOML-based config file at `~/.config/holiday-hero/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use hero_core::generator::GeminiConfig;
use hero_db::config::StorageConfig;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub gemini: GeminiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the holiday-hero config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/holiday-hero` or
/// `~/.config/holiday-hero`, on macOS too.
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(StorageConfig::APP_DIR);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(StorageConfig::APP_DIR)
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file. A missing file is `Ok(None)`; an unreadable or
/// malformed one is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Write the config file to its standard location.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since the file may hold an API key.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct HeroConfig {
    pub storage: StorageConfig,
    api_key: Option<String>,
    gemini: GeminiSection,
}

impl HeroConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `HERO_DATA_DIR` env > `storage.data_dir` > platform data dir
    /// - API key: `GEMINI_API_KEY` env > `gemini.api_key` > none (only `onboard` needs it)
    pub fn resolve(cli_data_dir: Option<&Path>) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Ok(Self::from_parts(cli_data_dir, file))
    }

    fn from_parts(cli_data_dir: Option<&Path>, file: ConfigFile) -> Self {
        let env_data_dir = std::env::var_os(StorageConfig::ENV_VAR).filter(|v| !v.is_empty());
        let storage = if let Some(dir) = cli_data_dir {
            StorageConfig::new(dir)
        } else if let Some(dir) = env_data_dir {
            StorageConfig::new(dir)
        } else if let Some(dir) = file.storage.data_dir {
            StorageConfig::new(dir)
        } else {
            StorageConfig::new(StorageConfig::default_data_dir())
        };

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| file.gemini.api_key.clone())
            .filter(|k| !k.trim().is_empty());

        Self {
            storage,
            api_key,
            gemini: file.gemini,
        }
    }

    /// Gemini settings, failing when no API key is configured.
    pub fn gemini(&self) -> Result<GeminiConfig> {
        let Some(api_key) = &self.api_key else {
            bail!(
                "Gemini API key not found; set {API_KEY_ENV} or run `holiday-hero init --api-key KEY`"
            );
        };

        let mut config = GeminiConfig::new(api_key.trim());
        if let Some(url) = &self.gemini.base_url {
            config.base_url = url.clone();
        }
        if let Some(model) = &self.gemini.plan_model {
            config.plan_model = model.clone();
        }
        if let Some(model) = &self.gemini.image_model {
            config.image_model = model.clone();
        }
        if let Some(secs) = self.gemini.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_env() {
        unsafe { std::env::remove_var(StorageConfig::ENV_VAR) };
        unsafe { std::env::remove_var(API_KEY_ENV) };
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("holiday-hero").join("config.toml");

        let original = ConfigFile {
            storage: StorageSection {
                data_dir: Some(PathBuf::from("/srv/hero")),
            },
            gemini: GeminiSection {
                api_key: Some("test-key".to_string()),
                timeout_secs: Some(30),
                ..Default::default()
            },
        };
        save_config_to(&path, &original).unwrap();

        let loaded = load_config_from(&path).unwrap().expect("file exists");
        assert_eq!(loaded.storage.data_dir, original.storage.data_dir);
        assert_eq!(loaded.gemini.api_key.as_deref(), Some("test-key"));
        assert_eq!(loaded.gemini.timeout_secs, Some(30));
        assert!(loaded.gemini.plan_model.is_none());
    }

    #[test]
    fn missing_config_file_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(load_config_from(&tmp.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[storage\ndata_dir = 3").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn partial_config_file_uses_section_defaults() {
        let cfg: ConfigFile = toml::from_str("[gemini]\napi_key = \"k\"\n").unwrap();
        assert!(cfg.storage.data_dir.is_none());
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("k"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        save_config_to(&path, &ConfigFile::default()).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(StorageConfig::ENV_VAR, "/from/env") };

        let file = ConfigFile {
            storage: StorageSection {
                data_dir: Some(PathBuf::from("/from/file")),
            },
            ..Default::default()
        };
        let config = HeroConfig::from_parts(Some(Path::new("/from/cli")), file);
        assert_eq!(config.storage.data_dir(), Path::new("/from/cli"));

        clear_env();
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(StorageConfig::ENV_VAR, "/from/env") };
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };

        let file = ConfigFile {
            storage: StorageSection {
                data_dir: Some(PathBuf::from("/from/file")),
            },
            gemini: GeminiSection {
                api_key: Some("file-key".to_string()),
                ..Default::default()
            },
        };
        let config = HeroConfig::from_parts(None, file);
        assert_eq!(config.storage.data_dir(), Path::new("/from/env"));
        assert_eq!(config.gemini().unwrap().api_key, "env-key");

        clear_env();
    }

    #[test]
    fn resolve_falls_back_to_config_file_then_default() {
        let _lock = lock_env();
        clear_env();

        let file = ConfigFile {
            storage: StorageSection {
                data_dir: Some(PathBuf::from("/from/file")),
            },
            gemini: GeminiSection {
                api_key: Some("file-key".to_string()),
                plan_model: Some("gemini-test".to_string()),
                timeout_secs: Some(5),
                ..Default::default()
            },
        };
        let config = HeroConfig::from_parts(None, file);
        assert_eq!(config.storage.data_dir(), Path::new("/from/file"));
        let gemini = config.gemini().unwrap();
        assert_eq!(gemini.api_key, "file-key");
        assert_eq!(gemini.plan_model, "gemini-test");
        assert_eq!(gemini.image_model, GeminiConfig::DEFAULT_IMAGE_MODEL);
        assert_eq!(gemini.timeout, Duration::from_secs(5));

        let config = HeroConfig::from_parts(None, ConfigFile::default());
        assert_eq!(config.storage.data_dir(), StorageConfig::default_data_dir());
    }

    #[test]
    fn gemini_errors_when_no_api_key() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(API_KEY_ENV, "   ") };

        let config = HeroConfig::from_parts(None, ConfigFile::default());
        let msg = config.gemini().unwrap_err().to_string();
        assert!(msg.contains("API key not found"), "unexpected error: {msg}");

        clear_env();
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("holiday-hero/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
