//! Domain models

pub mod benchmark;
pub mod downcast;

pub use benchmark::{BenchmarkRecord, BenchmarkResult};
pub use downcast::{DowncastEntry, Fidelity, Precision};
