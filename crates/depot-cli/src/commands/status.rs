//! `depot status` (ambient; §6): lists installed packages and their channel.

use clap::Args;

use crate::commands::ExitCode;
use crate::context::Context;
use crate::output;

/// Arguments for `depot status`.
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {}

/// Runs `depot status`.
pub fn run(_args: &StatusArgs, ctx: &Context) -> ExitCode {
    let rows: Vec<Vec<String>> = ctx
        .cache
        .get_packages(None)
        .filter(|p| p.installed())
        .map(|p| vec![p.identity().to_string(), format!("{:?}", p.loaders())])
        .collect();

    if rows.is_empty() {
        output::info("no packages installed");
        return ExitCode::Success;
    }

    println!("{}", output::table(&["PACKAGE", "LOADERS"], rows));
    ExitCode::Success
}
