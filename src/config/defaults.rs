//! Default values for `id.toml`

use super::loader::{Config, LoggingConfig, OutputConfig, OutputFormat};

/// `tracing` level used when neither `RUST_LOG` nor `-v` is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_ANSI: bool = true;
pub const DEFAULT_FORMAT: OutputFormat = OutputFormat::Text;
/// `whoami.exe` prints the user name in lowercase
pub const DEFAULT_LOWERCASE_NAME: bool = true;

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: DEFAULT_LOG_LEVEL.to_string(),
            ansi: DEFAULT_ANSI,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: DEFAULT_FORMAT,
            lowercase_name: DEFAULT_LOWERCASE_NAME,
        }
    }
}

/// Returns the configuration used when no file is present
pub fn default_config() -> Config {
    Config::default()
}
