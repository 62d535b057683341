//! depot - a multi-backend package manager.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod context;
mod fetcher;
mod interface;
mod output;

use clap::Parser;
use commands::{Cli, Commands, ExitCode};
use context::Context;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).without_time().init();

    let mut ctx = match Context::load() {
        Ok(ctx) => ctx,
        Err(err) => {
            output::error(&err.display_with_suggestions());
            return ExitCode::UserError.into();
        }
    };

    let code = match &cli.command {
        Commands::Query(args) => commands::query::run(args, &ctx),
        Commands::Install(args) => commands::install::run(args, &ctx),
        Commands::Remove(args) => commands::remove::run(args, &ctx),
        Commands::Upgrade(args) => commands::upgrade::run(args, &ctx),
        Commands::Reinstall(args) => commands::reinstall::run(args, &mut ctx),
        Commands::Search(args) => commands::search::run(args, &ctx),
        Commands::Status(args) => commands::status::run(args, &ctx),
    };

    code.into()
}
