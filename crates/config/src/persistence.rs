//! Reading and writing the config file
//!
//! Writes are atomic (temp file + rename) and the previous file is kept
//! as `config.toml.backup`.

use crate::{Config, ConfigError, ConfigResult, ValidationError, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    /// Creates a new persistence handler for the given config file path
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the managed file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Path of the backup written before each overwrite
    pub fn backup_path(&self) -> PathBuf {
        self.config_path.with_extension("toml.backup")
    }

    /// Loads configuration from file
    ///
    /// A missing file yields the defaults. An empty file is an error.
    /// Invalid values are logged and kept so the user can fix them.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: self.config_path.clone(),
                source: e,
            })?;

        check_version(&mut config)?;

        if let Err(errors) = config.validate() {
            log::warn!("Config validation warnings: {}", join_errors(&errors));
        }

        Ok(config)
    }

    /// Validates and writes the config atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            return Err(ConfigError::ValidationError(join_errors(&errors)));
        }

        if let Some(parent) = self.config_path.parent() {
            ensure_directory(parent)?;
        }

        if self.config_path.exists() {
            fs::copy(&self.config_path, self.backup_path())
                .map_err(|e| ConfigError::BackupError { source: e })?;
            log::debug!("Backed up config to {}", self.backup_path().display());
        }

        let toml_string = toml::to_string_pretty(config)?;
        self.write_atomic(&toml_string)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    /// Writes the default configuration, replacing any existing file
    pub fn write_default(&self) -> ConfigResult<Config> {
        let config = Config::default();
        self.save(&config)?;
        Ok(config)
    }

    fn write_atomic(&self, content: &str) -> ConfigResult<()> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Config path has no parent directory".to_string(),
            })?;

        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;

        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        Ok(())
    }
}

/// Rejects files from a newer release; stamps older ones with the current version
fn check_version(config: &mut Config) -> ConfigResult<()> {
    if config.version > CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: config.version,
            supported: CONFIG_VERSION,
        });
    }

    if config.version < CONFIG_VERSION {
        log::info!(
            "Config version {} predates {}; missing keys take their defaults",
            config.version,
            CONFIG_VERSION
        );
        config.version = CONFIG_VERSION;
    }

    Ok(())
}

fn ensure_directory(path: &Path) -> ConfigResult<()> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Created config directory: {}", path.display());
    Ok(())
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let config = persistence.load().expect("Should load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let mut config = Config::default();
        config.import.interpreter = "osascript -l JavaScript -e".to_string();

        persistence.save(&config).expect("Should save config");
        let loaded = persistence.load().expect("Should load config");

        assert_eq!(loaded.import.interpreter, "osascript -l JavaScript -e");
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("subdir").join("config.toml");
        let persistence = ConfigPersistence::new(config_path.clone());

        persistence
            .save(&Config::default())
            .expect("Should create directory and save");

        assert!(config_path.exists());
    }

    #[test]
    fn test_backup_created_on_overwrite() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        persistence.save(&Config::default()).unwrap();
        assert!(!persistence.backup_path().exists());

        persistence.save(&Config::default()).unwrap();
        assert!(persistence.backup_path().exists());
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "this is not valid TOML {{{").unwrap();

        let result = ConfigPersistence::new(config_path).load();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "   \n").unwrap();

        let result = ConfigPersistence::new(config_path).load();
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_newer_version_rejected() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "version = 99\n").unwrap();

        let result = ConfigPersistence::new(config_path).load();
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_older_version_upgraded_in_memory() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "version = 0\n[import]\ntimeout_secs = 30\n").unwrap();

        let config = ConfigPersistence::new(config_path).load().unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.import.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_load_but_do_not_save() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "[import]\ntimeout_secs = 0\n").unwrap();

        let persistence = ConfigPersistence::new(config_path);
        let config = persistence.load().expect("Invalid values still load");
        assert_eq!(config.import.timeout_secs, 0);

        assert!(matches!(
            persistence.save(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_write_default() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path.clone());

        persistence.write_default().unwrap();
        assert!(config_path.exists());
        assert_eq!(persistence.load().unwrap(), Config::default());
    }
}
