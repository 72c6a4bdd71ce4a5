//! Classification and rewriting of floating literals.
//!
//! Every literal found by the scanner is narrowed to the target precision
//! and judged by its relative error. Literals at or below the threshold are
//! replaced in the source by a cast to the narrow type, e.g. `__bf16(3.140625)`.

use std::fmt;

use crate::constants::DIAGNOSTIC_DECIMALS;
use crate::models::{DowncastEntry, Fidelity, Precision};
use crate::utils::{format_significant, round_to};

use super::scanner::{scan_float_literals, FloatLiteral};
use super::simulate::narrow;

/// Significant digits of the narrowed value written into the source
const REWRITE_SIGNIFICANT_DIGITS: usize = 8;

/// Verdict for one literal
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralAssessment {
    pub literal: FloatLiteral,
    pub downcast: f32,
    /// `|value - downcast| / |value|`; `None` when undefined
    pub relative_error: Option<f64>,
    pub fidelity: Fidelity,
}

/// Result of analyzing one source text
#[derive(Debug, Clone)]
pub struct Analysis {
    pub precision: Precision,
    pub threshold: f64,
    pub assessments: Vec<LiteralAssessment>,
    /// Source with every safe literal replaced
    pub rewritten: String,
}

/// Narrow `value` and judge the relative error against `threshold`.
pub fn assess(value: f64, precision: Precision, threshold: f64) -> (f32, Option<f64>, Fidelity) {
    let downcast = narrow(value as f32, precision);

    if value == 0.0 || !value.is_finite() {
        return (downcast, None, Fidelity::Undefined);
    }

    let error = (value - f64::from(downcast)).abs() / value.abs();
    let fidelity = if error == 0.0 {
        Fidelity::Exact
    } else if error <= threshold {
        Fidelity::WithinThreshold
    } else {
        Fidelity::ExceedsThreshold
    };
    (downcast, Some(error), fidelity)
}

/// Scan `source`, assess every floating literal and build the rewritten text.
pub fn analyze(source: &str, precision: Precision, threshold: f64) -> Analysis {
    let assessments: Vec<LiteralAssessment> = scan_float_literals(source)
        .into_iter()
        .map(|literal| {
            let (downcast, relative_error, fidelity) = assess(literal.value, precision, threshold);
            LiteralAssessment {
                literal,
                downcast,
                relative_error,
                fidelity,
            }
        })
        .collect();

    let rewritten = rewrite(source, &assessments, precision);

    Analysis {
        precision,
        threshold,
        assessments,
        rewritten,
    }
}

/// Cast expression that replaces a safe literal
pub fn replacement(downcast: f32, precision: Precision) -> String {
    format!(
        "{}({})",
        precision.type_name(),
        format_significant(f64::from(downcast), REWRITE_SIGNIFICANT_DIGITS)
    )
}

fn rewrite(source: &str, assessments: &[LiteralAssessment], precision: Precision) -> String {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for assessment in assessments.iter().filter(|a| a.fidelity.is_safe()) {
        let span = &assessment.literal.span;
        out.push_str(&source[cursor..span.start]);
        out.push_str(&replacement(assessment.downcast, precision));
        cursor = span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

impl Analysis {
    /// Number of literals that were rewritten
    pub fn rewritten_count(&self) -> usize {
        self.assessments
            .iter()
            .filter(|a| a.fidelity.is_safe())
            .count()
    }

    /// Records for the float map, `file` naming the analyzed source
    pub fn entries(&self, file: &str) -> Vec<DowncastEntry> {
        self.assessments
            .iter()
            .map(|a| DowncastEntry {
                value: round_to(a.literal.value, DIAGNOSTIC_DECIMALS),
                downcast: round_to(f64::from(a.downcast), DIAGNOSTIC_DECIMALS),
                error: a.relative_error.map(|e| round_to(e, DIAGNOSTIC_DECIMALS)),
                mode: self.precision,
                safe: a.fidelity.is_safe(),
                location: format!("{}:{}, col {}", file, a.literal.line, a.literal.column),
            })
            .collect()
    }

    /// Compiler-style diagnostics for every literal, in source order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mode = self.precision.type_name();
        let threshold = fixed(self.threshold);
        let mut diagnostics = Vec::new();

        for a in &self.assessments {
            let at = |level, message| Diagnostic {
                level,
                line: a.literal.line,
                column: a.literal.column,
                message,
            };
            let value = fixed(a.literal.value);
            let error = a.relative_error.map(fixed).unwrap_or_default();

            match a.fidelity {
                Fidelity::Exact => diagnostics.push(at(
                    Level::Warning,
                    format!("float literal '{}' can be safely downcast to '{}'", value, mode),
                )),
                Fidelity::WithinThreshold => {
                    diagnostics.push(at(
                        Level::Warning,
                        format!(
                            "float literal '{}' can be downcast to '{}' within acceptable error",
                            value, mode
                        ),
                    ));
                    diagnostics.push(at(
                        Level::Note,
                        format!("relative error is {}, threshold is {}", error, threshold),
                    ));
                }
                Fidelity::ExceedsThreshold => diagnostics.push(at(
                    Level::Note,
                    format!(
                        "converting to '{}' would introduce relative error of {}, exceeding threshold {}",
                        mode, error, threshold
                    ),
                )),
                Fidelity::Undefined => diagnostics.push(at(
                    Level::Note,
                    format!(
                        "relative error of float literal '{}' is undefined; left unchanged",
                        value
                    ),
                )),
            }
        }

        diagnostics
    }
}

fn fixed(value: f64) -> String {
    format!("{:.*}", DIAGNOSTIC_DECIMALS as usize, value)
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// One message attached to a literal
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    /// `file:line:col: level: message`
    pub fn render(&self, file: &str) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            file, self.line, self.column, self.level, self.message
        )
    }
}
