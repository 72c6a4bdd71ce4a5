//! Custom error types and handling
//!
//! Everything that can abort a benchmark run surfaces as an [`AppError`].
//! A missing input file is not an error: the runner reports it and stops
//! without side effects (see [`crate::benchmark::RunReport`]).

use std::path::PathBuf;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Subprocess errors
    #[error("Compilation of {} failed ({}):\n{stderr}", .source_file.display(), describe_exit(.exit_code))]
    CompilationFailed {
        source_file: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to launch {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Filesystem and serialization errors
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CompilationFailed { .. } => "COMPILATION_ERROR",
            Self::Spawn { .. } => "SPAWN_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
