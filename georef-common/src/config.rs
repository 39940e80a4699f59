//! Bootstrap configuration loading and data path resolution
//!
//! Configuration is read once at startup. Sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is never fatal: a warning is logged and defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "GEOREF_DATA_DIR";

/// Environment variable pointing at an explicit TOML config file
pub const CONFIG_ENV: &str = "GEOREF_CONFIG";

/// Default file name of the regions source inside the data directory
pub const REGIONS_FILE: &str = "regions.csv";

/// Default file name of the communes source inside the data directory
pub const COMMUNES_FILE: &str = "communes.csv";

/// What startup does when the data load fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Abort startup with the load error
    #[default]
    Abort,
    /// Log the load error and serve empty indices
    Degraded,
}

impl FromStr for LoadPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(LoadPolicy::Abort),
            "degraded" => Ok(LoadPolicy::Degraded),
            other => Err(Error::Config(format!(
                "Unknown load policy '{}' (expected 'abort' or 'degraded')",
                other
            ))),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional in the file; absent fields take the compiled defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Directory holding `regions.csv` and `communes.csv`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Explicit regions source (relative paths resolve against `data_dir`)
    #[serde(default)]
    pub regions_file: Option<PathBuf>,

    /// Explicit communes source (relative paths resolve against `data_dir`)
    #[serde(default)]
    pub communes_file: Option<PathBuf>,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Behaviour when the startup load fails
    #[serde(default)]
    pub load_policy: LoadPolicy,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Global request rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second; 0 disables the limiter
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Maximum burst above the sustained rate
    #[serde(default = "default_burst")]
    pub burst: u32,
}

fn default_host() -> String {
    CompiledDefaults::for_current_platform().host
}

fn default_port() -> u16 {
    CompiledDefaults::for_current_platform().port
}

fn default_log_level() -> String {
    CompiledDefaults::for_current_platform().log_level
}

fn default_requests_per_second() -> u32 {
    50
}

fn default_burst() -> u32 {
    100
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            regions_file: None,
            communes_file: None,
            host: default_host(),
            port: default_port(),
            load_policy: LoadPolicy::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

impl RateLimitConfig {
    pub fn is_enabled(&self) -> bool {
        self.requests_per_second > 0
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields defaults and a warning. A file that exists but
    /// cannot be read or parsed is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, else from the discovered config file, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(find_config_file) {
            Some(path) => Self::load(&path),
            None => {
                debug!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Locate the config file: `GEOREF_CONFIG`, then `<config_dir>/georef/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("georef").join("config.toml"))
        .filter(|p| p.exists())
}

/// Compiled fallback values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Resolves where the two tabular sources live
#[derive(Debug, Clone)]
pub struct DataPathResolver {
    cli_data_dir: Option<PathBuf>,
    toml_data_dir: Option<PathBuf>,
    regions_file: Option<PathBuf>,
    communes_file: Option<PathBuf>,
}

impl DataPathResolver {
    pub fn new(cli_data_dir: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_data_dir,
            toml_data_dir: config.data_dir.clone(),
            regions_file: config.regions_file.clone(),
            communes_file: config.communes_file.clone(),
        }
    }

    /// Resolve the data directory by priority order
    pub fn data_dir(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(dir) = &self.cli_data_dir {
            return dir.clone();
        }

        // Priority 2: Environment variable
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }

        // Priority 3: TOML config file
        if let Some(dir) = &self.toml_data_dir {
            return dir.clone();
        }

        // Priority 4: Compiled default
        CompiledDefaults::for_current_platform().data_dir
    }

    pub fn regions_path(&self) -> PathBuf {
        self.source_path(self.regions_file.as_deref(), REGIONS_FILE)
    }

    pub fn communes_path(&self) -> PathBuf {
        self.source_path(self.communes_file.as_deref(), COMMUNES_FILE)
    }

    // An absolute override replaces the data directory entirely (Path::join semantics)
    fn source_path(&self, file_override: Option<&Path>, default_name: &str) -> PathBuf {
        let dir = self.data_dir();
        match file_override {
            Some(file) => dir.join(file),
            None => dir.join(default_name),
        }
    }
}
