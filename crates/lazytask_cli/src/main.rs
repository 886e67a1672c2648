//! `lazytask` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, run one command and map failures to an exit code.
//! - Keep stdout for command output and stderr for error messages.

mod args;
mod commands;
mod config;
mod output;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Usage errors, --help and --version exit here with clap's own codes.
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match commands::execute(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("lazytask: {message}");
            ExitCode::FAILURE
        }
    }
}
