//! Configuration manager, the main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name used inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment overrides, e.g. `MEDIASHELF_IMPORT_TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "MEDIASHELF";

/// Main configuration manager
pub struct ConfigManager {
    persistence: ConfigPersistence,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    ///
    /// - Linux: `~/.config/mediashelf/`
    /// - macOS: `~/Library/Application Support/mediashelf/`
    /// - Windows: `%APPDATA%\mediashelf\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Self::with_file(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Creates a config manager for an explicit config file
    pub fn with_file(config_path: PathBuf) -> ConfigResult<Self> {
        if config_path.file_name().is_none() {
            return Err(ConfigError::PathResolutionError {
                reason: format!("{} does not name a file", config_path.display()),
            });
        }

        Ok(Self {
            persistence: ConfigPersistence::new(config_path),
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "mediashelf")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    /// Returns the directory holding the config file
    pub fn config_dir(&self) -> &Path {
        self.persistence.path().parent().unwrap_or(Path::new("."))
    }

    /// Returns the full config file path
    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    /// Loads the configuration from file
    ///
    /// A missing file yields defaults; a corrupted one is an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and atomically saves the configuration
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn`, and saves
    ///
    /// ```rust,no_run
    /// # use mediashelf_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.import.timeout_secs = 120;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if one doesn't exist
    ///
    /// Returns `Ok(true)` if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.persistence.write_default()?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Overwrites the config file with default values
    pub fn reset(&self) -> ConfigResult<()> {
        self.persistence.write_default().map(|_| ())
    }

    /// Returns the validation messages for the current file, empty when valid
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config and applies `MEDIASHELF_SECTION_FIELD` environment overrides
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }
}

/// Applies overrides looked up by variable name
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));

    if let Some(path) = var("APP_DATABASE_PATH") {
        config.app.database_path = PathBuf::from(path);
    }

    if let Some(level) = var("APP_LOG_LEVEL") {
        match level.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring {}_APP_LOG_LEVEL: {}", ENV_PREFIX, e),
        }
    }

    if let Some(secs) = var("IMPORT_TIMEOUT_SECS") {
        match secs.trim().parse::<u64>() {
            Ok(secs) => config.import.timeout_secs = secs,
            Err(_) => log::warn!(
                "Ignoring {}_IMPORT_TIMEOUT_SECS: '{}' is not a number",
                ENV_PREFIX,
                secs
            ),
        }
    }

    if let Some(interpreter) = var("IMPORT_INTERPRETER") {
        config.import.interpreter = interpreter;
    }
}
