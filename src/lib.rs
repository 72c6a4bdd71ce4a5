//! speedcheck - float literal downcasting and compile-and-time comparison of C++ programs
//!
//! The downcast checker finds floating literals in a C++ source that fit
//! `__fp16` or `__bf16` within a relative error threshold and writes a
//! modified source using the narrow type. The benchmark runner compiles the
//! original and the modified source with an optimizing compiler, runs each
//! binary once while measuring wall time, and writes the timings plus their
//! speedup ratio to a JSON report.
//!
//! # Architecture
//!
//! - **Config**: paths, compiler and checker settings from env, `.env` and flags
//! - **Downcast**: literal scanner, narrowing simulation and source rewrite
//! - **Benchmark**: compiler, executor and the sequential runner
//! - **Report**: JSON serialization of the timing result and the float map

pub mod benchmark;
pub mod cli;
pub mod config;
pub mod constants;
pub mod downcast;
pub mod error;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use benchmark::{BenchmarkRunner, RunReport};
pub use config::Config;
pub use downcast::DowncastChecker;
pub use error::{AppError, AppResult};
pub use models::BenchmarkResult;
