//! `id.toml` loading
//!
//! Every section and field is optional; missing values fall back to
//! [`super::defaults`].

use super::validator::validate_config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "id.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` level; `RUST_LOG` takes precedence
    pub level: String,
    /// Colorize log lines on stderr
    pub ansi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Lowercase the user name before printing
    pub lowercase_name: bool,
}

impl OutputConfig {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// How `id` prints an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// whoami-style tables
    Text,
    /// Pretty-printed serialized identity
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(OutputFormat::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(OutputFormat::Json)
        } else {
            Err(ConfigError::Invalid(format!(
                "Invalid output format: {}. Must be one of: text, json",
                s
            )))
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes one configuration file
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Parse the file; a missing file is [`ConfigError::FileNotFound`]
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Like [`load`](Self::load), but an absent file yields the defaults
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        fs::write(&self.config_path, toml::to_string_pretty(config)?)?;
        Ok(())
    }
}

/// Load and validate the configuration for `id`
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in the
/// working directory is used if present.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => ConfigLoader::new(path).load()?,
        None => ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()?,
    };
    validate_config(&config)?;
    Ok(config)
}
