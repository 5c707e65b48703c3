//! Configuration management for dcaspt2-input.
//!
//! Program behaviour that is not part of a single input file is read from
//! INI-format configuration files with the following precedence:
//!
//! 1. Local configuration (`./dcaspt2_config.cfg`)
//! 2. User configuration (`~/.config/dcaspt2/dcaspt2_config.cfg`)
//! 3. System configuration (`/etc/dcaspt2/dcaspt2_config.cfg`)
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```ini
//! [output]
//! directory = .
//! ivo_file = active.ivo.inp
//! caspt2_file = active.inp
//! summary_json = false
//!
//! [general]
//! default_diracver = 21
//! default_active_occupied = 2
//! default_active_virtual = 2
//! print_level = 0
//!
//! [logging]
//! level = info
//! file_logging = false
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dcaspt2_input::settings::SettingsManager;
//!
//! let settings = SettingsManager::load()?;
//! println!("IVO input goes to {}", settings.ivo_path().display());
//! # Ok::<(), dcaspt2_input::settings::ConfigError>(())
//! ```

use configparser::ini::Ini;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file in every search location.
pub const CONFIG_FILE_NAME: &str = "dcaspt2_config.cfg";

/// Errors that can occur during configuration loading and processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Main configuration structure containing all program settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Output file locations
    pub output: OutputSettings,
    /// General program settings
    pub general: GeneralSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Where generated files are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory for all generated files (default: ".")
    pub directory: String,
    /// IVO parameter file, overwritten on every recomputation (default: "active.ivo.inp")
    pub ivo_file: String,
    /// CASPT2 main input file (default: "active.inp")
    pub caspt2_file: String,
    /// Also write `<input stem>_summary.json` (default: false)
    pub summary_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            ivo_file: "active.ivo.inp".to_string(),
            caspt2_file: "active.inp".to_string(),
            summary_json: false,
        }
    }
}

/// General program settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// DIRAC version used when the input does not give `diracver` (default: 21)
    pub default_diracver: u32,
    /// Highest occupied rows classified active by the template generator (default: 2)
    pub default_active_occupied: u32,
    /// Lowest virtual rows classified active by the template generator (default: 2)
    pub default_active_virtual: u32,
    /// Print level: 0 = quiet, 1 = normal, 2 = verbose (default: 0)
    pub print_level: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_diracver: crate::config::DEFAULT_DIRAC_VERSION,
            default_active_occupied: 2,
            default_active_virtual: 2,
            print_level: 0,
        }
    }
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (default: "info")
    pub level: String,
    /// Enable file-based logging (default: false)
    /// When enabled, writes dcaspt2_debug_<input_basename>.log
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
        }
    }
}

/// Configuration manager that handles loading and accessing program settings.
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the available configuration files.
    ///
    /// Searches system, user and local locations in that order; each file
    /// found overrides the values of the previous ones. A file that fails to
    /// parse is skipped with a warning.
    pub fn load() -> Result<Self, ConfigError> {
        let (settings, source) = Self::load_from_files()?;
        info!("Configuration loaded from: {}", source);
        Ok(Self {
            settings,
            config_source: source,
        })
    }

    /// Loads a single configuration file on top of the built-in defaults.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        settings.merge(Self::load_config(path)?);
        Ok(Self {
            settings,
            config_source: format!("file ({})", path.display()),
        })
    }

    /// Built-in defaults only.
    pub fn defaults() -> Self {
        Self {
            settings: Settings::default(),
            config_source: "built-in defaults".to_string(),
        }
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// Gets a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the output settings.
    pub fn output(&self) -> &OutputSettings {
        &self.settings.output
    }

    /// Gets the general settings.
    pub fn general(&self) -> &GeneralSettings {
        &self.settings.general
    }

    /// Gets the logging settings.
    pub fn logging(&self) -> &LoggingSettings {
        &self.settings.logging
    }

    /// Full path of the IVO parameter file.
    pub fn ivo_path(&self) -> PathBuf {
        Path::new(&self.settings.output.directory).join(&self.settings.output.ivo_file)
    }

    /// Full path of the CASPT2 main input file.
    pub fn caspt2_path(&self) -> PathBuf {
        Path::new(&self.settings.output.directory).join(&self.settings.output.caspt2_file)
    }

    /// Full path of the JSON summary for an input file.
    pub fn summary_path(&self, input_path: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dcaspt2");
        Path::new(&self.settings.output.directory).join(format!("{}_summary.json", stem))
    }

    /// Loads configuration from files with hierarchical precedence.
    fn load_from_files() -> Result<(Settings, String), ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let candidates = [
            ("system", Self::get_system_config_path()),
            ("user", Self::get_user_config_path()),
            ("local", Some(PathBuf::from(CONFIG_FILE_NAME))),
        ];

        for (kind, path) in candidates {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            match Self::load_config(&path) {
                Ok(config) => {
                    settings.merge(config);
                    config_source = format!("{} config ({})", kind, path.display());
                    debug!("Loaded {} configuration from: {}", kind, path.display());
                }
                Err(e) => {
                    warn!(
                        "Failed to load {} config from {}: {}",
                        kind,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok((settings, config_source))
    }

    /// Loads configuration from a single INI file.
    ///
    /// Keys absent from the file are left as `None` so that merging does not
    /// reset values set by a lower-priority file.
    fn load_config(path: &Path) -> Result<PartialSettings, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_config(content)
    }

    fn parse_config(content: String) -> Result<PartialSettings, ConfigError> {
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        let mut partial = PartialSettings::default();
        let map = ini.get_map_ref();

        if let Some(section) = map.get("output") {
            partial.directory = string_value(section, "directory");
            partial.ivo_file = string_value(section, "ivo_file");
            partial.caspt2_file = string_value(section, "caspt2_file");
            partial.summary_json = parsed_value(section, "summary_json")?;
        }

        if let Some(section) = map.get("general") {
            partial.default_diracver = parsed_value(section, "default_diracver")?;
            partial.default_active_occupied = parsed_value(section, "default_active_occupied")?;
            partial.default_active_virtual = parsed_value(section, "default_active_virtual")?;
            partial.print_level = parsed_value(section, "print_level")?;
        }

        if let Some(section) = map.get("logging") {
            partial.level = string_value(section, "level");
            partial.file_logging = parsed_value(section, "file_logging")?;
        }

        Ok(partial)
    }

    /// Gets the system configuration file path.
    fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/dcaspt2").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA")
                .ok()
                .map(|pd| PathBuf::from(pd).join("dcaspt2").join(CONFIG_FILE_NAME))
        }
    }

    /// Gets the user configuration file path.
    fn get_user_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("dcaspt2")
                    .join(CONFIG_FILE_NAME)
            })
        }
        #[cfg(windows)]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("dcaspt2").join(CONFIG_FILE_NAME))
        }
    }
}

type Section = HashMap<String, Option<String>>;

fn string_value(section: &Section, key: &str) -> Option<String> {
    section
        .get(key)
        .cloned()
        .flatten()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_value<T: std::str::FromStr>(section: &Section, key: &str) -> Result<Option<T>, ConfigError> {
    match string_value(section, key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid {}: {}", key, raw))),
        None => Ok(None),
    }
}

/// Values present in one configuration file.
#[derive(Debug, Default)]
struct PartialSettings {
    directory: Option<String>,
    ivo_file: Option<String>,
    caspt2_file: Option<String>,
    summary_json: Option<bool>,
    default_diracver: Option<u32>,
    default_active_occupied: Option<u32>,
    default_active_virtual: Option<u32>,
    print_level: Option<u32>,
    level: Option<String>,
    file_logging: Option<bool>,
}

impl Settings {
    /// Merges the values of one configuration file, overriding existing values.
    fn merge(&mut self, other: PartialSettings) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut self.output.directory, other.directory);
        set(&mut self.output.ivo_file, other.ivo_file);
        set(&mut self.output.caspt2_file, other.caspt2_file);
        set(&mut self.output.summary_json, other.summary_json);
        set(&mut self.general.default_diracver, other.default_diracver);
        set(&mut self.general.default_active_occupied, other.default_active_occupied);
        set(&mut self.general.default_active_virtual, other.default_active_virtual);
        set(&mut self.general.print_level, other.print_level);
        set(&mut self.logging.level, other.level);
        set(&mut self.logging.file_logging, other.file_logging);
    }
}

impl SettingsManager {
    /// Creates a dcaspt2_config.cfg file listing every option with its default.
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        let template_content = Self::generate_template_content();
        fs::write(path, template_content)?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    /// Generates the content for a dcaspt2_config.cfg template file.
    fn generate_template_content() -> String {
        let output = OutputSettings::default();
        let general = GeneralSettings::default();
        let logging = LoggingSettings::default();
        format!(
            r#"# dcaspt2-input Configuration File
#
# Configuration files are loaded in hierarchical order with local settings taking precedence:
#
# 1. Current working directory (./dcaspt2_config.cfg) - highest priority
# 2. User config directory (~/.config/dcaspt2/dcaspt2_config.cfg on Unix, %APPDATA%/dcaspt2/dcaspt2_config.cfg on Windows)
# 3. System config directory (/etc/dcaspt2/dcaspt2_config.cfg on Unix, %PROGRAMDATA%/dcaspt2/dcaspt2_config.cfg on Windows)
# 4. Built-in defaults (fallback)
#
# Any missing sections or values will use the built-in defaults shown below.

[output]
# Directory for generated files
directory = {}

# IVO parameter file, rewritten after every recomputation
ivo_file = {}

# DIRAC-CASPT2 main input file
caspt2_file = {}

# Write <input>_summary.json with counts, ranges and the memory estimate
summary_json = {}

[general]
# DIRAC major version used when the input file has no 'diracver'
default_diracver = {}

# Template generator: highest occupied orbitals classified as active
default_active_occupied = {}

# Template generator: lowest virtual orbitals classified as active
default_active_virtual = {}

# Print level (0 = quiet, 1 = normal, 2 = verbose)
print_level = {}

[logging]
# Log level: debug, info, warn, error
level = {}

# Write dcaspt2_debug_<input_basename>.log instead of logging to the console
file_logging = {}
"#,
            output.directory,
            output.ivo_file,
            output.caspt2_file,
            output.summary_json,
            general.default_diracver,
            general.default_active_occupied,
            general.default_active_virtual,
            general.print_level,
            logging.level,
            logging.file_logging,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_round_trip_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        SettingsManager::create_template(&path).unwrap();

        let manager = SettingsManager::load_file(&path).unwrap();
        assert_eq!(manager.output().ivo_file, "active.ivo.inp");
        assert_eq!(manager.output().caspt2_file, "active.inp");
        assert!(!manager.output().summary_json);
        assert_eq!(manager.general().default_diracver, 21);
        assert_eq!(manager.logging().level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let partial =
            SettingsManager::parse_config("[output]\nivo_file = ivo.inp\n".to_string()).unwrap();
        let mut settings = Settings::default();
        settings.general.default_diracver = 23;
        settings.merge(partial);
        assert_eq!(settings.output.ivo_file, "ivo.inp");
        assert_eq!(settings.output.caspt2_file, "active.inp");
        assert_eq!(settings.general.default_diracver, 23);
    }

    #[test]
    fn test_invalid_value() {
        let result = SettingsManager::parse_config("[general]\nprint_level = loud\n".to_string());
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_paths_join_directory() {
        let mut manager = SettingsManager::defaults();
        manager.settings.output.directory = "out".to_string();
        assert_eq!(manager.ivo_path(), Path::new("out").join("active.ivo.inp"));
        assert_eq!(manager.caspt2_path(), Path::new("out").join("active.inp"));
        assert_eq!(
            manager.summary_path(Path::new("/data/h2o.inp")),
            Path::new("out").join("h2o_summary.json")
        );
    }
}
