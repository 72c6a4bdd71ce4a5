//! Application-wide constants
//!
//! Default values for every configurable path, compiler and checker setting.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// INPUT / OUTPUT FILES
// =============================================================================

/// Baseline source file
pub const DEFAULT_ORIGINAL_SOURCE: &str = "test.cpp";

/// Comparison source file
pub const DEFAULT_MODIFIED_SOURCE: &str = "modified.cpp";

/// Binary produced from the baseline source
pub const DEFAULT_ORIGINAL_BINARY: &str = "test";

/// Binary produced from the comparison source
pub const DEFAULT_MODIFIED_BINARY: &str = "test_modified";

/// Report file, overwritten on every run
pub const DEFAULT_OUTPUT_FILE: &str = "run_test.json";

/// Per-literal record written by the downcast checker
pub const DEFAULT_FLOAT_MAP_FILE: &str = "float_map.json";

// =============================================================================
// COMPILER DEFAULTS
// =============================================================================

/// Optimizing C++ compiler invoked for both legs
pub const DEFAULT_COMPILER: &str = "clang++";

/// Optimization flag passed ahead of the source path
pub const DEFAULT_OPTIMIZATION_FLAG: &str = "-O3";

/// Flag that precedes the output binary path
pub const OUTPUT_FLAG: &str = "-o";

/// Maximum number of compiler stderr characters kept in an error
pub const MAX_STDERR_CHARS: usize = 4000;

// =============================================================================
// DOWNCAST CHECKER
// =============================================================================

/// Largest relative error a literal may pick up and still be rewritten
pub const DEFAULT_DOWNCAST_THRESHOLD: f64 = 0.001;

// =============================================================================
// REPORTING PRECISION
// =============================================================================

/// Decimal places kept for durations in seconds
pub const DURATION_DECIMALS: i32 = 6;

/// Decimal places kept for the speedup ratio
pub const SPEEDUP_DECIMALS: i32 = 4;

/// Decimal places for literal values and errors in diagnostics and the float map
pub const DIAGNOSTIC_DECIMALS: i32 = 6;

// =============================================================================
// LOGGING
// =============================================================================

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "speedcheck=warn";

/// Environment variable names
pub mod env_vars {
    pub const ORIGINAL: &str = "SPEEDCHECK_ORIGINAL";
    pub const MODIFIED: &str = "SPEEDCHECK_MODIFIED";
    pub const ORIGINAL_BIN: &str = "SPEEDCHECK_ORIGINAL_BIN";
    pub const MODIFIED_BIN: &str = "SPEEDCHECK_MODIFIED_BIN";
    pub const OUTPUT: &str = "SPEEDCHECK_OUTPUT";
    pub const COMPILER: &str = "SPEEDCHECK_COMPILER";
    pub const OPT_FLAG: &str = "SPEEDCHECK_OPT_FLAG";
    pub const WORKDIR: &str = "SPEEDCHECK_WORKDIR";
    pub const FLOAT_MAP: &str = "SPEEDCHECK_FLOAT_MAP";
    pub const DOWNCAST_MODE: &str = "SPEEDCHECK_DOWNCAST_MODE";
    pub const THRESHOLD: &str = "SPEEDCHECK_THRESHOLD";
}
