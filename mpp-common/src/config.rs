//! Configuration loading and artifact folder resolution
//!
//! The artifact folder holds the fitted scaler and model exports. It is
//! resolved once at startup, in priority order:
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MPP_ARTIFACT_FOLDER`, then `MPP_ARTIFACTS`)
//! 3. TOML config file (`~/.config/mpp/<module>.toml`)
//! 4. OS-dependent compiled default (fallback)
//!
//! Resolution never fails and never logs: it runs before the tracing
//! subscriber exists, so callers log the outcome themselves. A missing or
//! unparseable config file simply falls through to the next tier.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Scaler artifact filename inside the artifact folder
pub const SCALER_FILENAME: &str = "scaler_aug.json";

/// Model artifact filename inside the artifact folder
pub const MODEL_FILENAME: &str = "champion_gradientboost_model.json";

/// Compiled-in fallback settings used when no other tier applies
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub artifact_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        let artifact_folder = if cfg!(target_os = "linux") {
            // ~/.local/share/mpp (or /var/lib/mpp for system-wide)
            dirs::data_local_dir()
                .map(|d| d.join("mpp"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/mpp"))
        } else if cfg!(target_os = "macos") {
            // ~/Library/Application Support/mpp
            dirs::data_dir()
                .map(|d| d.join("mpp"))
                .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mpp"))
        } else if cfg!(target_os = "windows") {
            // %LOCALAPPDATA%\mpp
            dirs::data_local_dir()
                .map(|d| d.join("mpp"))
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mpp"))
        } else {
            PathBuf::from("./mpp_data")
        };

        Self {
            artifact_folder,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Per-module configuration file contents
///
/// Every field is optional so a partial or empty file is still valid and
/// older files keep parsing as the schema grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the fitted scaler and model artifacts
    #[serde(default)]
    pub artifact_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Artifact folder resolution following the documented priority order
pub struct ArtifactFolderResolver {
    module_name: String,
    cli_override: Option<PathBuf>,
}

impl ArtifactFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_override: None,
        }
    }

    /// Attach a command-line override, which outranks every other tier
    pub fn with_cli_override(mut self, path: Option<PathBuf>) -> Self {
        self.cli_override = path;
        self
    }

    /// Resolve the artifact folder. Infallible: the compiled default is
    /// always available as the last tier.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_override {
            return path.clone();
        }
        if let Ok(path) = std::env::var("MPP_ARTIFACT_FOLDER") {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("MPP_ARTIFACTS") {
            return PathBuf::from(path);
        }
        if let Some(config) = self.load_config_file() {
            if let Some(folder) = config.artifact_folder {
                return folder;
            }
        }
        CompiledDefaults::for_current_platform().artifact_folder
    }

    /// Resolve the log level from the config file, falling back to the
    /// compiled default. `RUST_LOG` still outranks this at subscriber
    /// setup, which happens at the call site.
    pub fn resolve_log_level(&self) -> String {
        if let Some(config) = self.load_config_file() {
            return config.logging.level;
        }
        CompiledDefaults::for_current_platform().log_level
    }

    fn load_config_file(&self) -> Option<TomlConfig> {
        let path = self.config_file_path()?;
        let contents = std::fs::read_to_string(path).ok()?;
        toml::from_str(&contents).ok()
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        let file_name = format!("{}.toml", self.module_name);

        if let Some(user_config) = dirs::config_dir().map(|d| d.join("mpp").join(&file_name)) {
            if user_config.exists() {
                return Some(user_config);
            }
        }
        if cfg!(target_os = "linux") {
            let system_config = PathBuf::from("/etc/mpp").join(&file_name);
            if system_config.exists() {
                return Some(system_config);
            }
        }
        None
    }
}

/// Prepares a resolved artifact folder for use and names the files in it
pub struct ArtifactFolderInitializer {
    artifact_folder: PathBuf,
}

impl ArtifactFolderInitializer {
    pub fn new(artifact_folder: PathBuf) -> Self {
        Self { artifact_folder }
    }

    /// Create the artifact folder (and parents) if absent. Idempotent.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.artifact_folder).map_err(|e| {
            Error::Config(format!(
                "cannot create artifact folder {:?}: {}",
                self.artifact_folder, e
            ))
        })
    }

    pub fn artifact_folder(&self) -> &Path {
        &self.artifact_folder
    }

    /// Full path of the scaler artifact
    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_folder.join(SCALER_FILENAME)
    }

    /// Full path of the model artifact
    pub fn model_path(&self) -> PathBuf {
        self.artifact_folder.join(MODEL_FILENAME)
    }

    /// True when both artifact files are present
    pub fn artifacts_exist(&self) -> bool {
        self.scaler_path().exists() && self.model_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_compiled_defaults_are_populated() {
        let defaults = CompiledDefaults::for_current_platform();
        assert!(!defaults.artifact_folder.as_os_str().is_empty());
        assert_eq!(defaults.log_level, "info");
        assert!(defaults.log_file.is_none());
    }

    #[test]
    fn test_artifact_filenames() {
        let initializer = ArtifactFolderInitializer::new(PathBuf::from("/data/mpp"));
        assert_eq!(
            initializer.scaler_path(),
            PathBuf::from("/data/mpp/scaler_aug.json")
        );
        assert_eq!(
            initializer.model_path(),
            PathBuf::from("/data/mpp/champion_gradientboost_model.json")
        );
    }
}
