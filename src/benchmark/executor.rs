//! Timed execution of compiled benchmark binaries

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::error::{AppError, AppResult};

/// One timed run of a binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedRun {
    /// Wall time from just before spawn to just after exit
    pub elapsed: Duration,
    /// Exit code, `None` when killed by a signal
    pub exit_code: Option<i32>,
}

impl TimedRun {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a binary once with stdout discarded and measures wall time.
///
/// Stdin and stderr are inherited. The exit status is recorded, not
/// judged; the runner only logs a non-zero status.
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    /// Execute `binary` with no arguments.
    pub async fn run_timed(&self, binary: &Path) -> AppResult<TimedRun> {
        let program = executable_path(binary);
        let mut command = Command::new(&program);
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let start = Instant::now();
        let status = command
            .status()
            .await
            .map_err(|source| AppError::Spawn {
                program: program.clone(),
                source,
            })?;
        let elapsed = start.elapsed();

        let run = TimedRun {
            elapsed,
            exit_code: status.code(),
        };

        if !run.succeeded() {
            tracing::warn!(
                binary = %program.display(),
                exit_code = ?run.exit_code,
                "Benchmark binary exited unsuccessfully"
            );
        }

        Ok(run)
    }
}

/// A bare file name would be looked up on `PATH`; run the local file instead.
fn executable_path(binary: &Path) -> PathBuf {
    let mut components = binary.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Path::new(".").join(binary),
        _ => binary.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_path() {
        assert_eq!(executable_path(Path::new("test")), PathBuf::from("./test"));
        assert_eq!(executable_path(Path::new("./test")), PathBuf::from("./test"));
        assert_eq!(executable_path(Path::new("bin/test")), PathBuf::from("bin/test"));
        assert_eq!(executable_path(Path::new("/tmp/test")), PathBuf::from("/tmp/test"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = Executor::new()
            .run_timed(Path::new("/nonexistent/speedcheck-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_records_exit_status_without_failing() {
        let run = Executor::new().run_timed(Path::new("/bin/false")).await.unwrap();
        assert_eq!(run.exit_code, Some(1));
        assert!(!run.succeeded());

        let run = Executor::new().run_timed(Path::new("/bin/true")).await.unwrap();
        assert!(run.succeeded());
    }
}
