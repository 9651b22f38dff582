//! Configuration loading and resolution
//!
//! Every setting resolves independently with the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the service starts with defaults and
//! reports a warning. A TOML file that exists but cannot be parsed is a
//! configuration error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5740;

/// Default bulk upload size limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const ENV_CONFIG: &str = "PSCAT_CONFIG";
pub const ENV_DATABASE: &str = "PSCAT_DATABASE";
pub const ENV_BIND: &str = "PSCAT_BIND";
pub const ENV_PORT: &str = "PSCAT_PORT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "PSCAT_MAX_UPLOAD_BYTES";
pub const ENV_LOG_LEVEL: &str = "PSCAT_LOG_LEVEL";

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform the binary runs on
    ///
    /// The database lives under the per-user local data directory
    /// (`~/.local/share/pscat` on Linux).
    pub fn for_current_platform() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("pscat"))
            .unwrap_or_else(|| PathBuf::from("./pscat_data"));

        Self {
            database_path: data_dir.join("pscat.db"),
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ServiceConfig {
    /// `host:port` string for binding the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Resolution result plus warnings to log once tracing is initialized
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: ServiceConfig,
    pub warnings: Vec<String>,
}

/// Resolves [`ServiceConfig`] from CLI, environment, TOML and defaults
pub struct ConfigResolver {
    overrides: CliOverrides,
}

impl ConfigResolver {
    pub fn new(overrides: CliOverrides) -> Self {
        Self { overrides }
    }

    /// Resolve every setting
    pub fn resolve(&self) -> Result<Resolution> {
        let mut warnings = Vec::new();
        let defaults = CompiledDefaults::for_current_platform();

        let toml_config = match self.config_file_path() {
            Some(path) => match load_toml_config(&path)? {
                Some(config) => config,
                None => {
                    warnings.push(format!(
                        "Config file not found at {}, using defaults",
                        path.display()
                    ));
                    TomlConfig::default()
                }
            },
            None => {
                warnings.push("Could not determine config directory, using defaults".to_string());
                TomlConfig::default()
            }
        };

        let database_path = self
            .overrides
            .database_path
            .clone()
            .or_else(|| env_string(ENV_DATABASE).map(PathBuf::from))
            .or(toml_config.database_path)
            .unwrap_or(defaults.database_path);

        let bind_address = self
            .overrides
            .bind_address
            .clone()
            .or_else(|| env_string(ENV_BIND))
            .or(toml_config.bind_address)
            .unwrap_or(defaults.bind_address);

        let port = match self.overrides.port {
            Some(port) => port,
            None => env_parsed::<u16>(ENV_PORT)?
                .or(toml_config.port)
                .unwrap_or(defaults.port),
        };

        let max_upload_bytes = env_parsed::<usize>(ENV_MAX_UPLOAD_BYTES)?
            .or(toml_config.max_upload_bytes)
            .unwrap_or(defaults.max_upload_bytes);

        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }

        let log_level = self
            .overrides
            .log_level
            .clone()
            .or_else(|| env_string(ENV_LOG_LEVEL))
            .unwrap_or(toml_config.logging.level);

        Ok(Resolution {
            config: ServiceConfig {
                database_path,
                bind_address,
                port,
                max_upload_bytes,
                log_level,
            },
            warnings,
        })
    }

    /// Config file location: CLI, then `PSCAT_CONFIG`, then the user config dir
    fn config_file_path(&self) -> Option<PathBuf> {
        self.overrides
            .config_file
            .clone()
            .or_else(|| env_string(ENV_CONFIG).map(PathBuf::from))
            .or_else(|| dirs::config_dir().map(|d| d.join("pscat").join("config.toml")))
    }
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(Some(config))
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", name, raw))),
        None => Ok(None),
    }
}
