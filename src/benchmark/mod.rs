//! Benchmark execution engine
//!
//! A run is two legs, each a compile followed by one timed execution:
//!
//! 1. **Compiler** (`compiler.rs`): invokes the optimizing compiler and
//!    reports success or failure as a value.
//! 2. **Executor** (`executor.rs`): launches the produced binary with
//!    stdout discarded and measures wall time.
//! 3. **Runner** (`runner.rs`): checks inputs, drives both legs in order,
//!    and writes the report.

pub mod compiler;
pub mod executor;
pub mod runner;

pub use compiler::{CompileOutcome, Compiler};
pub use executor::{Executor, TimedRun};
pub use runner::{BenchmarkLeg, BenchmarkRunner, RunReport};
