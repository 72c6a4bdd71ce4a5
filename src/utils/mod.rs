//! Utility functions

pub mod format;
pub mod time;

pub use format::format_significant;
pub use time::{duration_secs, format_seconds, round_to, speedup_ratio};
