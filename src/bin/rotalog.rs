//! `rotalog` binary.
//!
//! Usage:
//!   rotalog log <level> <msg...>                          Log a message
//!   rotalog boundary [--at T] [--interval D] [--offset D]  Show the rotation boundary
//!   rotalog stress [--threads N] [--lines M]              Concurrent write demo
//!
//! The logger comes from the config file, then `LOG_FILE_PATH`, `LOG_LEVEL_INFO` and
//! `LOG_NOT_STDOUT` on top.

use clap::Parser;
use rotalog::LoggerRegistry;
use rotalog::cli::{Cli, Command, cmd_boundary, cmd_log, cmd_stress, load_logger_config};
use rotalog::internal;
use rotalog::level::Level;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        internal::init(Level::Debug);
    }

    // No logger needed to compute a boundary.
    if let Command::Boundary {
        at,
        interval,
        offset,
    } = &cli.command
    {
        return cmd_boundary(at.as_deref(), interval, offset);
    }

    let registry = match load_logger_config(cli.config.as_deref())
        .and_then(|config| LoggerRegistry::new(&config))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building logger: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match cli.command {
        Command::Log { level, message } => cmd_log(&registry, level.into(), &message),
        Command::Stress {
            threads,
            lines,
            min_len,
            max_len,
        } => cmd_stress(&registry, threads, lines, min_len, max_len),
        Command::Boundary { .. } => ExitCode::SUCCESS,
    };

    if let Err(e) = registry.close() {
        eprintln!("Error closing logger: {e}");
        return ExitCode::FAILURE;
    }
    code
}
