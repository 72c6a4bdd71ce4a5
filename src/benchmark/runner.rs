//! Benchmark runner - Orchestrates the benchmarking process
//!
//! One invocation checks both sources exist, compiles and times the
//! original, then the modified, and writes a single result to the report
//! file. Everything runs strictly in sequence so the two timed runs never
//! compete for the machine.

use std::path::PathBuf;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::BenchmarkResult,
    report,
    utils::time::{duration_secs, format_seconds},
};

use super::{
    compiler::{CompileOutcome, Compiler},
    executor::Executor,
};

/// Source and binary paths of one compile-run-time cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkLeg {
    pub source: PathBuf,
    pub binary: PathBuf,
}

impl BenchmarkLeg {
    pub fn new(source: impl Into<PathBuf>, binary: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            binary: binary.into(),
        }
    }
}

/// How a run ended without a fatal error
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// One or both sources were absent; nothing was compiled or written
    MissingInputs(Vec<PathBuf>),
    /// Both legs ran and the report was written
    Completed(BenchmarkResult),
}

/// Benchmark runner comparing an original and a modified program
pub struct BenchmarkRunner {
    config: Config,
    compiler: Compiler,
    executor: Executor,
}

impl BenchmarkRunner {
    /// Create a new benchmark runner
    pub fn new(config: Config) -> Self {
        let compiler = Compiler::new(config.compiler.clone());

        Self {
            config,
            compiler,
            executor: Executor::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sources that do not exist, original first
    pub fn missing_inputs(&self) -> Vec<PathBuf> {
        [self.config.paths.original_leg(), self.config.paths.modified_leg()]
            .into_iter()
            .map(|leg| leg.source)
            .filter(|source| !source.exists())
            .collect()
    }

    /// Run both legs and write the report
    pub async fn run(&self) -> AppResult<RunReport> {
        let missing = self.missing_inputs();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
            println!("Missing input file(s): {}", names.join(", "));
            tracing::debug!(missing = ?names, "Aborting before compilation");
            return Ok(RunReport::MissingInputs(missing));
        }

        let original_time = self
            .compile_and_time(&self.config.paths.original_leg())
            .await?;
        let modified_time = self
            .compile_and_time(&self.config.paths.modified_leg())
            .await?;

        println!();
        println!("Original Runtime: {}", format_seconds(original_time));
        println!("Modified Runtime: {}", format_seconds(modified_time));

        let result = BenchmarkResult::new(original_time, modified_time);
        println!("{}", speedup_line(&result));
        match result.speedup_ratio {
            Some(ratio) => tracing::info!(speedup_ratio = ratio, "Benchmark complete"),
            None => tracing::warn!("Modified runtime rounded to zero; speedup ratio omitted"),
        }

        let output = self.config.paths.output_path();
        report::write_report(&output, &result).await?;
        println!("Results saved to {} (overwritten)", output.display());

        Ok(RunReport::Completed(result))
    }

    /// Compile one source, run the binary once, and return its wall time in seconds.
    pub async fn compile_and_time(&self, leg: &BenchmarkLeg) -> AppResult<f64> {
        println!("Compiling {}...", leg.source.display());

        match self.compiler.compile(&leg.source, &leg.binary).await? {
            CompileOutcome::Success { .. } => {}
            CompileOutcome::Failed { exit_code, stderr } => {
                return Err(AppError::CompilationFailed {
                    source_file: leg.source.clone(),
                    exit_code,
                    stderr,
                });
            }
        }

        println!("Running {}...", leg.binary.display());
        let run = self.executor.run_timed(&leg.binary).await?;
        let elapsed_sec = duration_secs(run.elapsed);

        tracing::info!(
            source = %leg.source.display(),
            binary = %leg.binary.display(),
            elapsed_sec,
            exit_code = ?run.exit_code,
            "Leg finished"
        );

        Ok(elapsed_sec)
    }
}

/// Console summary of the ratio
fn speedup_line(result: &BenchmarkResult) -> String {
    match result.speedup_ratio {
        Some(ratio) if result.is_improvement() => {
            format!("Speedup: {:.4}x (modified is faster)", ratio)
        }
        Some(ratio) => format!("Speedup: {:.4}x (no improvement)", ratio),
        None => "Speedup: n/a (modified runtime too short to measure)".to_string(),
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_speedup_line_reports_improvement() {
        assert_eq!(
            speedup_line(&BenchmarkResult::new(0.2, 0.1)),
            "Speedup: 2.0000x (modified is faster)"
        );
        assert_eq!(
            speedup_line(&BenchmarkResult::new(0.1, 0.1)),
            "Speedup: 1.0000x (no improvement)"
        );
        assert_eq!(
            speedup_line(&BenchmarkResult::new(0.1, 0.0)),
            "Speedup: n/a (modified runtime too short to measure)"
        );
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use super::*;
    use crate::config::CompilerConfig;
    use crate::utils::time::round_to;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// A "compiler" that copies the shell-script source to the binary path
    fn copying_compiler(dir: &Path) -> CompilerConfig {
        let program = dir.join("fake-cc");
        write_script(
            &program,
            r#"touch "$(dirname "$0")/compiler-invoked"
cp "$2" "$4" && chmod +x "$4""#,
        );
        CompilerConfig {
            program: program.display().to_string(),
            optimization_flag: "-O3".to_string(),
        }
    }

    fn failing_compiler(dir: &Path) -> CompilerConfig {
        let program = dir.join("broken-cc");
        write_script(&program, r#"echo "error: expected ';' in $2" >&2; exit 1"#);
        CompilerConfig {
            program: program.display().to_string(),
            optimization_flag: "-O3".to_string(),
        }
    }

    fn runner_in(dir: &Path, compiler: CompilerConfig) -> BenchmarkRunner {
        let mut config = Config::default().rooted_at(dir);
        config.compiler = compiler;
        BenchmarkRunner::new(config)
    }

    fn write_sources(dir: &Path, original: &str, modified: &str) {
        fs::write(dir.join("test.cpp"), format!("#!/bin/sh\n{}\n", original)).unwrap();
        fs::write(dir.join("modified.cpp"), format!("#!/bin/sh\n{}\n", modified)).unwrap();
    }

    #[tokio::test]
    async fn test_missing_original_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("modified.cpp"), "int main() {}").unwrap();
        fs::write(dir.path().join("run_test.json"), "previous").unwrap();

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        let report = runner.run().await.unwrap();

        assert_eq!(
            report,
            RunReport::MissingInputs(vec![dir.path().join("test.cpp")])
        );
        assert!(!dir.path().join("compiler-invoked").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("run_test.json")).unwrap(),
            "previous"
        );
    }

    #[tokio::test]
    async fn test_both_missing_are_listed_without_writing_output() {
        let dir = tempfile::tempdir().unwrap();

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        let report = runner.run().await.unwrap();

        assert_eq!(
            report,
            RunReport::MissingInputs(vec![
                dir.path().join("test.cpp"),
                dir.path().join("modified.cpp"),
            ])
        );
        assert!(!dir.path().join("run_test.json").exists());
        assert!(!dir.path().join("compiler-invoked").exists());
    }

    #[tokio::test]
    async fn test_end_to_end_speedup_close_to_two() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), "sleep 0.4", "sleep 0.2");

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        let result = match runner.run().await.unwrap() {
            RunReport::Completed(result) => result,
            other => panic!("unexpected report: {:?}", other),
        };

        assert!(result.original_time_sec > 0.0);
        assert!(result.modified_time_sec > 0.0);
        assert_eq!(round_to(result.original_time_sec, 6), result.original_time_sec);
        assert_eq!(round_to(result.modified_time_sec, 6), result.modified_time_sec);

        let ratio = result.speedup_ratio.unwrap();
        assert_eq!(
            ratio,
            round_to(result.original_time_sec / result.modified_time_sec, 4)
        );
        assert!(ratio > 1.5 && ratio < 2.5, "ratio was {}", ratio);

        assert!(dir.path().join("test").exists());
        assert!(dir.path().join("test_modified").exists());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("run_test.json")).unwrap())
                .unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);

        let benchmark = records[0]["benchmark"].as_object().unwrap();
        let mut keys: Vec<&str> = benchmark.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["modified_time_sec", "original_time_sec", "speedup_ratio"]
        );
        assert_eq!(benchmark["original_time_sec"], result.original_time_sec);
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), "exit 0", "exit 0");
        let stale = serde_json::json!([
            {"benchmark": {"original_time_sec": 9.0, "modified_time_sec": 3.0, "speedup_ratio": 3.0}},
            {"benchmark": {"original_time_sec": 8.0, "modified_time_sec": 4.0, "speedup_ratio": 2.0}}
        ]);
        fs::write(dir.path().join("run_test.json"), stale.to_string()).unwrap();

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        runner.run().await.unwrap();
        let second = match runner.run().await.unwrap() {
            RunReport::Completed(result) => result,
            other => panic!("unexpected report: {:?}", other),
        };

        let records = report::read_report(&dir.path().join("run_test.json"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].benchmark, second);
    }

    #[tokio::test]
    async fn test_compile_failure_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), "exit 0", "exit 0");

        let runner = runner_in(dir.path(), failing_compiler(dir.path()));
        let err = runner.run().await.unwrap_err();

        match err {
            AppError::CompilationFailed {
                source_file,
                exit_code,
                stderr,
            } => {
                assert_eq!(source_file, dir.path().join("test.cpp"));
                assert_eq!(exit_code, Some(1));
                assert!(stderr.contains("expected ';'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!dir.path().join("run_test.json").exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_of_benchmark_binary_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), "exit 3", "exit 0");

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        let report = runner.run().await.unwrap();

        assert!(matches!(report, RunReport::Completed(_)));
        assert!(dir.path().join("run_test.json").exists());
    }

    #[tokio::test]
    async fn test_compile_and_time_single_leg() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), "sleep 0.05", "exit 0");

        let runner = runner_in(dir.path(), copying_compiler(dir.path()));
        let leg = runner.config().paths.original_leg();
        let elapsed = runner.compile_and_time(&leg).await.unwrap();

        assert!(elapsed >= 0.05, "elapsed was {}", elapsed);
        assert_eq!(round_to(elapsed, 6), elapsed);
        assert!(dir.path().join("compiler-invoked").exists());
    }
}
