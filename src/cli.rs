//! Command-line interface.
//!
//! Every flag is optional and overrides the matching value loaded by
//! [`Config::from_env`]. Path flags are global, so they may appear before
//! or after the subcommand.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{check_threshold, non_empty, Config, ConfigError};
use crate::models::Precision;

/// Downcast float literals in a C++ program and time it against the original.
#[derive(Parser, Debug, Default)]
#[command(name = "speedcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run; `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Baseline source file.
    #[arg(long, value_name = "PATH", global = true)]
    pub original: Option<PathBuf>,

    /// Comparison source file.
    #[arg(long, value_name = "PATH", global = true)]
    pub modified: Option<PathBuf>,

    /// Binary produced from the baseline source.
    #[arg(long, value_name = "PATH", global = true)]
    pub original_bin: Option<PathBuf>,

    /// Binary produced from the comparison source.
    #[arg(long, value_name = "PATH", global = true)]
    pub modified_bin: Option<PathBuf>,

    /// Report file (overwritten on every run).
    #[arg(short, long, value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Compiler program.
    #[arg(long, value_name = "PROGRAM", global = true)]
    pub compiler: Option<String>,

    /// Optimization flag passed to the compiler.
    #[arg(long, value_name = "FLAG", allow_hyphen_values = true, global = true)]
    pub opt_level: Option<String>,

    /// Directory relative paths are resolved against.
    #[arg(short = 'C', long, value_name = "DIR", global = true)]
    pub workdir: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Compile and time the original and modified sources.
    Run,

    /// Rewrite float literals that fit a half-width type into the modified
    /// source and record every literal in the float map.
    Downcast(DowncastArgs),
}

/// Options of the `downcast` command.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct DowncastArgs {
    /// Narrow type literals are tested against [default: fp16].
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<Precision>,

    /// Largest relative error a rewritten literal may pick up [default: 0.001].
    #[arg(long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Float map file (overwritten on every run).
    #[arg(long, value_name = "PATH")]
    pub map: Option<PathBuf>,
}

impl Cli {
    /// The command to run.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Result<Config, ConfigError> {
        let paths = &mut config.paths;
        if let Some(path) = &self.original {
            paths.original_source = path.clone();
        }
        if let Some(path) = &self.modified {
            paths.modified_source = path.clone();
        }
        if let Some(path) = &self.original_bin {
            paths.original_binary = path.clone();
        }
        if let Some(path) = &self.modified_bin {
            paths.modified_binary = path.clone();
        }
        if let Some(path) = &self.output {
            paths.output = path.clone();
        }
        if let Some(dir) = &self.workdir {
            paths.workdir = dir.clone();
        }

        if let Some(program) = &self.compiler {
            config.compiler.program = non_empty("--compiler", program.clone())?;
        }
        if let Some(flag) = &self.opt_level {
            config.compiler.optimization_flag = non_empty("--opt-level", flag.clone())?;
        }

        if let Some(Commands::Downcast(args)) = &self.command {
            if let Some(mode) = args.mode {
                config.downcast.precision = mode;
            }
            if let Some(threshold) = args.threshold {
                config.downcast.threshold = check_threshold("--threshold", threshold)?;
            }
            if let Some(map) = &args.map {
                config.paths.float_map = map.clone();
            }
        }

        if self.verbose {
            config.logging.filter = "speedcheck=debug".to_string();
        }

        Ok(config)
    }
}
