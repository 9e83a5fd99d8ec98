//! CLI module for rotalog.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;
pub mod util;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for crate::level::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::Trace,
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

/// rotalog - Write rotating logs from the command line.
#[derive(Parser)]
#[command(
    name = "rotalog",
    version,
    about = "Write rotating logs from the command line"
)]
pub struct Cli {
    /// Config file (default: <config dir>/rotalog/rotalog.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print rotalog's own diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Log a message through a logger built from config and environment.
    Log {
        /// Log level
        #[arg(value_enum)]
        level: LogLevel,
        /// Log message
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print the rotation boundary at or before a point in time.
    Boundary {
        /// RFC 3339 timestamp (default: now)
        #[arg(long)]
        at: Option<String>,
        /// Rotation interval (e.g. "24h", "200ms")
        #[arg(long, default_value = "24h")]
        interval: String,
        /// Phase offset (e.g. "17h")
        #[arg(long, default_value = "0s", allow_hyphen_values = true)]
        offset: String,
    },
    /// Write random lines from many threads and report throughput.
    Stress {
        /// Concurrent writer threads
        #[arg(long, default_value_t = 100)]
        threads: usize,
        /// Lines per thread
        #[arg(long, default_value_t = 25)]
        lines: usize,
        /// Shortest random word
        #[arg(long, default_value_t = 10)]
        min_len: usize,
        /// Longest random word
        #[arg(long, default_value_t = 2000)]
        max_len: usize,
    },
}

pub use commands::{cmd_boundary, cmd_log, cmd_stress};
pub use util::{load_logger_config, random_word};
