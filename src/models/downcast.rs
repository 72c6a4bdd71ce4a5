//! Float literal downcast models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Half-width float format a literal is narrowed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// IEEE binary16 (`__fp16`)
    #[default]
    Fp16,
    /// bfloat16 (`__bf16`)
    Bf16,
}

impl Precision {
    /// Type name used in the rewritten source, e.g. `__bf16`
    pub fn type_name(&self) -> &'static str {
        match self {
            Precision::Fp16 => "__fp16",
            Precision::Bf16 => "__bf16",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Fp16 => write!(f, "fp16"),
            Precision::Bf16 => write!(f, "bf16"),
        }
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp16" => Ok(Precision::Fp16),
            "bf16" => Ok(Precision::Bf16),
            other => Err(format!("unknown precision `{}` (expected fp16 or bf16)", other)),
        }
    }
}

/// How much a literal changes when narrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Narrowed value equals the original
    Exact,
    /// Relative error at or below the threshold
    WithinThreshold,
    /// Relative error above the threshold
    ExceedsThreshold,
    /// Zero literal; relative error is undefined
    Undefined,
}

impl Fidelity {
    /// Whether the literal may be rewritten
    pub fn is_safe(&self) -> bool {
        matches!(self, Fidelity::Exact | Fidelity::WithinThreshold)
    }
}

/// One element of `float_map.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowncastEntry {
    /// Literal value as written, rounded to 6 places
    pub value: f64,
    /// Value after narrowing, rounded to 6 places
    pub downcast: f64,
    /// Relative error rounded to 6 places; `null` for zero literals
    pub error: Option<f64>,
    pub mode: Precision,
    pub safe: bool,
    /// `file:line, col N`
    pub location: String,
}
