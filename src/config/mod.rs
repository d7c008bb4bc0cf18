//! `id.toml` configuration: logging and output settings
//!
//! Loading lives in [`loader`], default values in [`defaults`] and level
//! checks in [`validator`].

mod defaults;
mod loader;
mod validator;

pub use defaults::{
    default_config, DEFAULT_ANSI, DEFAULT_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_LOWERCASE_NAME,
};
pub use loader::{
    load_config, Config, ConfigError, ConfigLoader, LoggingConfig, OutputConfig, OutputFormat,
    DEFAULT_CONFIG_FILE,
};
pub use validator::{validate_config, ConfigValidator};

pub type ConfigResult<T> = Result<T, ConfigError>;
