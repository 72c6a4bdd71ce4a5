//! Time utilities

use std::time::Duration;

use crate::constants::{DURATION_DECIMALS, SPEEDUP_DECIMALS};

/// Round `value` to `places` decimal places (half away from zero)
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Elapsed wall time in seconds, rounded to microsecond precision
pub fn duration_secs(elapsed: Duration) -> f64 {
    round_to(elapsed.as_secs_f64(), DURATION_DECIMALS)
}

/// Baseline over comparison, rounded; `None` unless the comparison is positive
pub fn speedup_ratio(original_secs: f64, modified_secs: f64) -> Option<f64> {
    if modified_secs > 0.0 {
        Some(round_to(original_secs / modified_secs, SPEEDUP_DECIMALS))
    } else {
        None
    }
}

/// Format seconds the way the console report prints them
pub fn format_seconds(secs: f64) -> String {
    format!("{:.6} s", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 6), 1.234568);
        assert_eq!(round_to(2.0, 4), 2.0);
        assert_eq!(round_to(0.00000049, 6), 0.0);
        assert_eq!(round_to(1.99996, 4), 2.0);
    }

    #[test]
    fn test_duration_secs() {
        assert_eq!(duration_secs(Duration::from_nanos(123_456_789)), 0.123457);
        assert_eq!(duration_secs(Duration::from_millis(1500)), 1.5);
        assert_eq!(duration_secs(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_speedup_ratio() {
        assert_eq!(speedup_ratio(0.2, 0.1), Some(2.0));
        assert_eq!(speedup_ratio(0.1, 0.3), Some(0.3333));
        assert_eq!(speedup_ratio(1.0, 0.0), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.5), "0.500000 s");
        assert_eq!(format_seconds(12.3456789), "12.345679 s");
    }
}
