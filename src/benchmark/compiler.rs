//! Compilation of benchmark sources.
//!
//! The compiler is invoked directly on the host as
//! `<program> <optimization-flag> <source> -o <binary>`. Its exit status
//! is reported as a [`CompileOutcome`] rather than an error so the caller
//! decides how a failed build affects the run; only a compiler that cannot
//! be started at all is an [`AppError`].

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::CompilerConfig;
use crate::constants::{MAX_STDERR_CHARS, OUTPUT_FLAG};
use crate::error::{AppError, AppResult};

/// Result of one compiler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Compiler exited zero; stderr may still hold warnings
    Success { stderr: String },
    /// Compiler exited non-zero or was killed by a signal
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Compiler handles the compilation of benchmark sources.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile `source` into `binary`.
    pub async fn compile(&self, source: &Path, binary: &Path) -> AppResult<CompileOutcome> {
        let args = self.command_args(source, binary);

        tracing::debug!(
            compiler = %self.config.program,
            args = ?args,
            "Invoking compiler"
        );

        let output = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| AppError::Spawn {
                program: self.config.program.clone().into(),
                source,
            })?;

        let stderr = truncate_stderr(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            if !stderr.is_empty() {
                tracing::warn!(
                    source = %source.display(),
                    "Compiler emitted diagnostics:\n{}",
                    stderr
                );
            }
            Ok(CompileOutcome::Success { stderr })
        } else {
            Ok(CompileOutcome::Failed {
                exit_code: output.status.code(),
                stderr,
            })
        }
    }

    /// Arguments in the order the compiler expects them.
    fn command_args(&self, source: &Path, binary: &Path) -> Vec<OsString> {
        vec![
            OsString::from(&self.config.optimization_flag),
            source.as_os_str().to_owned(),
            OsString::from(OUTPUT_FLAG),
            binary.as_os_str().to_owned(),
        ]
    }
}

/// Keep the tail of the compiler's stderr, where the fatal error usually is.
fn truncate_stderr(stderr: &str) -> String {
    let stderr = stderr.trim_end();
    let total = stderr.chars().count();
    if total <= MAX_STDERR_CHARS {
        return stderr.to_string();
    }
    let tail: String = stderr.chars().skip(total - MAX_STDERR_CHARS).collect();
    format!("...{}", tail)
}
