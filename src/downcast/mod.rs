//! Float literal downcast checker
//!
//! Reads the original source, reports every floating literal that survives
//! narrowing to `__fp16` or `__bf16` within the configured relative error,
//! and writes a modified source where those literals are wrapped in the
//! narrow type, plus a JSON map describing every literal.
//!
//! The modified source is what the benchmark runner then times against the
//! original.

pub mod analyzer;
pub mod scanner;
pub mod simulate;

pub use analyzer::{analyze, assess, Analysis, Diagnostic, Level, LiteralAssessment};
pub use scanner::{scan_float_literals, FloatLiteral, LiteralType};
pub use simulate::{narrow, simulate_bf16, simulate_fp16};

use tokio::fs;

use crate::{
    config::{Config, ConfigError},
    error::{AppError, AppResult},
    report,
};

/// Runs the analysis over the configured source and writes its outputs
pub struct DowncastChecker {
    config: Config,
}

impl DowncastChecker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Analyze the original source, then write the modified source and the float map
    pub async fn run(&self) -> AppResult<Analysis> {
        let paths = &self.config.paths;
        let settings = &self.config.downcast;
        let input = paths.resolve(&paths.original_source);
        let output = paths.resolve(&paths.modified_source);
        let map = paths.float_map_path();

        if input == output {
            return Err(ConfigError::InvalidValue {
                name: "--modified".to_string(),
                reason: format!("would overwrite the analyzed source {}", input.display()),
            }
            .into());
        }

        // Locations are reported against the path as configured
        let label = paths.original_source.display().to_string();

        println!("Analyzing {}...", input.display());
        let source = fs::read_to_string(&input)
            .await
            .map_err(|e| AppError::io(&input, e))?;

        let analysis = analyze(&source, settings.precision, settings.threshold);
        for diagnostic in analysis.diagnostics() {
            eprintln!("{}", diagnostic.render(&label));
        }

        fs::write(&output, &analysis.rewritten)
            .await
            .map_err(|e| AppError::io(&output, e))?;
        report::write_float_map(&map, &analysis.entries(&label)).await?;

        let rewritten = analysis.rewritten_count();
        tracing::info!(
            source = %input.display(),
            mode = %settings.precision,
            threshold = settings.threshold,
            literals = analysis.assessments.len(),
            rewritten,
            "Downcast analysis complete"
        );

        println!(
            "Rewrote {} of {} float literal(s) as {}",
            rewritten,
            analysis.assessments.len(),
            settings.precision.type_name()
        );
        println!("Modified source saved to {}", output.display());
        println!("Float map saved to {}", map.display());

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;
    use std::path::Path;

    use super::*;
    use crate::models::Precision;

    fn checker_in(dir: &Path, precision: Precision, threshold: f64) -> DowncastChecker {
        let mut config = Config::default().rooted_at(dir);
        config.downcast.precision = precision;
        config.downcast.threshold = threshold;
        DowncastChecker::new(config)
    }

    #[tokio::test]
    async fn test_run_writes_modified_source_and_float_map() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(
            dir.path().join("test.cpp"),
            "float f(float x) { return x * 0.5f + 1e-6f; }\n",
        )
        .unwrap();

        let checker = checker_in(dir.path(), Precision::Fp16, 0.001);
        let analysis = checker.run().await.unwrap();
        assert_eq!(analysis.rewritten_count(), 1);

        let modified = std_fs::read_to_string(dir.path().join("modified.cpp")).unwrap();
        assert_eq!(
            modified,
            "float f(float x) { return x * __fp16(0.5) + 1e-6f; }\n"
        );

        let entries = report::read_float_map(&dir.path().join("float_map.json"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, "test.cpp:1, col 31");
        assert!(entries[0].safe);
        assert_eq!(entries[1].mode, Precision::Fp16);
        assert!(!entries[1].safe);
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("test.cpp"), "double d = 1.0;\n").unwrap();
        std_fs::write(dir.path().join("modified.cpp"), "stale contents").unwrap();

        let checker = checker_in(dir.path(), Precision::Bf16, 0.001);
        checker.run().await.unwrap();
        checker.run().await.unwrap();

        assert_eq!(
            std_fs::read_to_string(dir.path().join("modified.cpp")).unwrap(),
            "double d = __bf16(1);\n"
        );
        let entries = report::read_float_map(&dir.path().join("float_map.json"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_source_is_io_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let checker = checker_in(dir.path(), Precision::Fp16, 0.001);
        let err = checker.run().await.unwrap_err();

        match err {
            AppError::Io { path, .. } => assert_eq!(path, dir.path().join("test.cpp")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!dir.path().join("modified.cpp").exists());
        assert!(!dir.path().join("float_map.json").exists());
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_analyzed_source() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("test.cpp"), "float f = 1.0f;\n").unwrap();

        let mut checker = checker_in(dir.path(), Precision::Fp16, 0.001);
        checker.config.paths.modified_source = "test.cpp".into();
        let err = checker.run().await.unwrap_err();

        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(
            std_fs::read_to_string(dir.path().join("test.cpp")).unwrap(),
            "float f = 1.0f;\n"
        );
    }
}
