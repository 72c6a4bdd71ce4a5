//! Application configuration management
//!
//! Every path, compiler and checker setting lives here. Values are loaded
//! from environment variables (and an optional `.env` file) at startup,
//! command-line flags are applied on top, and relative paths are resolved
//! against the configured working directory.

use std::env::{self, VarError};
use std::path::{Path, PathBuf};

use crate::benchmark::BenchmarkLeg;
use crate::constants::{
    env_vars, DEFAULT_COMPILER, DEFAULT_DOWNCAST_THRESHOLD, DEFAULT_FLOAT_MAP_FILE,
    DEFAULT_LOG_FILTER, DEFAULT_MODIFIED_BINARY, DEFAULT_MODIFIED_SOURCE,
    DEFAULT_OPTIMIZATION_FLAG, DEFAULT_ORIGINAL_BINARY, DEFAULT_ORIGINAL_SOURCE,
    DEFAULT_OUTPUT_FILE,
};
use crate::models::Precision;

/// Source of variable values; `env::var` outside of tests
type Lookup<'a> = &'a dyn Fn(&str) -> Result<String, VarError>;

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub paths: PathsConfig,
    pub compiler: CompilerConfig,
    pub downcast: DowncastConfig,
    pub logging: LoggingConfig,
}

/// Input, binary and report locations
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Directory relative paths are resolved against (empty = process cwd)
    pub workdir: PathBuf,
    pub original_source: PathBuf,
    pub modified_source: PathBuf,
    pub original_binary: PathBuf,
    pub modified_binary: PathBuf,
    pub output: PathBuf,
    pub float_map: PathBuf,
}

/// Compiler invocation settings
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Compiler program name or path
    pub program: String,
    /// Optimization flag, passed before the source path
    pub optimization_flag: String,
}

/// Float literal checker settings
#[derive(Debug, Clone)]
pub struct DowncastConfig {
    pub precision: Precision,
    /// Inclusive upper bound on the relative error of a rewritten literal
    pub threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub filter: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|name: &str| env::var(name))
    }

    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            paths: PathsConfig::from_lookup(lookup)?,
            compiler: CompilerConfig::from_lookup(lookup)?,
            downcast: DowncastConfig::from_lookup(lookup)?,
            logging: LoggingConfig::default(),
        })
    }

    /// Same configuration with every relative path resolved against `dir`
    pub fn rooted_at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.workdir = dir.into();
        self
    }

    /// Check settings that can only be verified against the filesystem
    pub fn validate(&self) -> Result<(), ConfigError> {
        let workdir = &self.paths.workdir;
        if !workdir.as_os_str().is_empty() && !workdir.is_dir() {
            return Err(ConfigError::MissingWorkdir(workdir.clone()));
        }
        Ok(())
    }
}

impl PathsConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            workdir: lookup_var(lookup, env_vars::WORKDIR)?
                .map(PathBuf::from)
                .unwrap_or_default(),
            original_source: var_or(lookup, env_vars::ORIGINAL, DEFAULT_ORIGINAL_SOURCE)?.into(),
            modified_source: var_or(lookup, env_vars::MODIFIED, DEFAULT_MODIFIED_SOURCE)?.into(),
            original_binary: var_or(lookup, env_vars::ORIGINAL_BIN, DEFAULT_ORIGINAL_BINARY)?.into(),
            modified_binary: var_or(lookup, env_vars::MODIFIED_BIN, DEFAULT_MODIFIED_BINARY)?.into(),
            output: var_or(lookup, env_vars::OUTPUT, DEFAULT_OUTPUT_FILE)?.into(),
            float_map: var_or(lookup, env_vars::FLOAT_MAP, DEFAULT_FLOAT_MAP_FILE)?.into(),
        })
    }

    /// Resolve a configured path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.workdir.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    /// The baseline leg
    pub fn original_leg(&self) -> BenchmarkLeg {
        BenchmarkLeg::new(
            self.resolve(&self.original_source),
            self.resolve(&self.original_binary),
        )
    }

    /// The comparison leg
    pub fn modified_leg(&self) -> BenchmarkLeg {
        BenchmarkLeg::new(
            self.resolve(&self.modified_source),
            self.resolve(&self.modified_binary),
        )
    }

    /// Resolved report path
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }

    /// Resolved float map path
    pub fn float_map_path(&self) -> PathBuf {
        self.resolve(&self.float_map)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::new(),
            original_source: DEFAULT_ORIGINAL_SOURCE.into(),
            modified_source: DEFAULT_MODIFIED_SOURCE.into(),
            original_binary: DEFAULT_ORIGINAL_BINARY.into(),
            modified_binary: DEFAULT_MODIFIED_BINARY.into(),
            output: DEFAULT_OUTPUT_FILE.into(),
            float_map: DEFAULT_FLOAT_MAP_FILE.into(),
        }
    }
}

impl CompilerConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            program: var_or(lookup, env_vars::COMPILER, DEFAULT_COMPILER)?,
            optimization_flag: var_or(lookup, env_vars::OPT_FLAG, DEFAULT_OPTIMIZATION_FLAG)?,
        })
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_string(),
            optimization_flag: DEFAULT_OPTIMIZATION_FLAG.to_string(),
        }
    }
}

impl DowncastConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let precision = match lookup_var(lookup, env_vars::DOWNCAST_MODE)? {
            Some(raw) => raw
                .parse::<Precision>()
                .map_err(|reason| ConfigError::invalid(env_vars::DOWNCAST_MODE, reason))?,
            None => Precision::default(),
        };

        let threshold = match lookup_var(lookup, env_vars::THRESHOLD)? {
            Some(raw) => {
                let value = raw.trim().parse::<f64>().map_err(|_| {
                    ConfigError::invalid(env_vars::THRESHOLD, format!("`{}` is not a number", raw))
                })?;
                check_threshold(env_vars::THRESHOLD, value)?
            }
            None => DEFAULT_DOWNCAST_THRESHOLD,
        };

        Ok(Self {
            precision,
            threshold,
        })
    }
}

impl Default for DowncastConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            threshold: DEFAULT_DOWNCAST_THRESHOLD,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// `None` when unset; a value that is not valid Unicode is an error.
fn lookup_var(lookup: Lookup<'_>, name: &str) -> Result<Option<String>, ConfigError> {
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::invalid(name, "not valid Unicode")),
    }
}

/// Read `name`, falling back to `default`; blank values are rejected.
fn var_or(lookup: Lookup<'_>, name: &str, default: &str) -> Result<String, ConfigError> {
    match lookup_var(lookup, name)? {
        Some(value) => non_empty(name, value),
        None => Ok(default.to_string()),
    }
}

pub(crate) fn non_empty(name: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(name, "must not be empty"));
    }
    Ok(value)
}

pub(crate) fn check_threshold(name: &str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            name,
            format!("threshold must be a non-negative number, got {}", value),
        ));
    }
    Ok(value)
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Working directory does not exist: {0}")]
    MissingWorkdir(PathBuf),
}

impl ConfigError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
