//! Benchmark result models

use serde::{Deserialize, Serialize};

use crate::utils::time::speedup_ratio;

/// Outcome of one invocation: both timings and their ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Wall time of the baseline binary, in seconds
    pub original_time_sec: f64,
    /// Wall time of the comparison binary, in seconds
    pub modified_time_sec: f64,
    /// `original / modified` rounded to 4 places; `null` when the comparison took no measurable time
    pub speedup_ratio: Option<f64>,
}

impl BenchmarkResult {
    /// Build a result from two already rounded timings
    pub fn new(original_time_sec: f64, modified_time_sec: f64) -> Self {
        Self {
            original_time_sec,
            modified_time_sec,
            speedup_ratio: speedup_ratio(original_time_sec, modified_time_sec),
        }
    }

    /// Whether the comparison binary ran faster than the baseline
    pub fn is_improvement(&self) -> bool {
        self.speedup_ratio.is_some_and(|ratio| ratio > 1.0)
    }
}

/// One element of the report array: `{"benchmark": {...}}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub benchmark: BenchmarkResult,
}

impl From<BenchmarkResult> for BenchmarkRecord {
    fn from(benchmark: BenchmarkResult) -> Self {
        Self { benchmark }
    }
}
