//! CLI surface (§6): `query`, `install`, `remove`, `upgrade`, `reinstall`,
//! plus the ambient `search`/`status` commands.

pub mod install;
pub mod query;
pub mod reinstall;
pub mod remove;
pub mod search;
pub mod status;
pub mod upgrade;

use clap::{Args, Parser, Subcommand};
use depot_resolver::{ChangeOp, Changeset};

use crate::context::Context;
use crate::output;

/// A high-performance multi-backend package manager.
#[derive(Parser, Debug)]
#[command(name = "depot", version, about = "A multi-backend package manager", propagate_version = true)]
pub struct Cli {
    /// Do not output any message.
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Do not ask any interactive question; assume yes.
    #[arg(short = 'n', long = "no-interaction", global = true)]
    pub no_interaction: bool,

    /// Increase verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every transaction-driving command.
#[derive(Args, Debug, Clone, Default)]
pub struct TransactionArgs {
    /// Show the URLs that would be fetched instead of committing.
    #[arg(long)]
    pub urls: bool,

    /// Emit a metalink document describing the fetches instead of committing.
    #[arg(long)]
    pub metalink: bool,

    /// Download artifacts for the planned steps without committing them.
    #[arg(long)]
    pub download: bool,

    /// Print each execution step as it would run, without committing.
    #[arg(long)]
    pub stepped: bool,

    /// Turn on verbose unmet-relation-chain reporting.
    #[arg(long)]
    pub explain: bool,

    /// Assume yes to every confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// The CLI's subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the cache: search, or ask `whoprovides`/`whorequires`/`whoconflicts`/`whoobsoletes`.
    Query(query::QueryArgs),
    /// Install packages.
    Install(install::InstallArgs),
    /// Remove packages.
    Remove(remove::RemoveArgs),
    /// Upgrade packages (or everything, if none named).
    Upgrade(upgrade::UpgradeArgs),
    /// Uninstall and reinstall the named packages.
    Reinstall(reinstall::ReinstallArgs),
    /// Search for packages by name (exact, glob, regex, or fuzzy).
    Search(search::SearchArgs),
    /// List installed packages and their channel.
    Status(status::StatusArgs),
}

/// Process exit codes (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,
    /// User or dependency error (e.g. unsatisfiable requirement, a lock conflict).
    UserError = 1,
    /// CLI usage error (bad arguments).
    UsageError = 2,
    /// Interrupted (e.g. `Ctrl-C`, or a declined confirmation).
    Interrupted = 130,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Renders a solved changeset: an execution-preview mode (`--urls`,
/// `--metalink`, `--download`, `--stepped`) if any was requested, else a
/// table of the planned changes (committing a real backend transaction is
/// out of scope — see §1).
pub fn render_plan(ctx: &Context, changeset: &Changeset, txn: &TransactionArgs) -> ExitCode {
    if changeset.is_empty() {
        output::info("nothing to do");
        return ExitCode::Success;
    }

    let report = depot_report::build_report(&ctx.cache, changeset);
    let steps = depot_report::order(&ctx.cache, changeset);

    if txn.urls || txn.metalink || txn.download || txn.stepped {
        return render_preview(ctx, &steps, txn);
    }

    let rows = changeset
        .iter()
        .map(|(id, op)| {
            let identity = ctx.cache.package(id).map_or_else(|| id.to_string(), |p| p.identity().to_string());
            vec![op.to_string(), identity]
        })
        .collect();
    println!("{}", output::table(&["ACTION", "PACKAGE"], rows));

    if txn.explain {
        for (id, op) in changeset.iter() {
            if op != ChangeOp::Install {
                continue;
            }
            let detail = report.describe(id);
            if !detail.requires.is_empty() {
                output::info(&format!("{} requires: {:?}", id, detail.requires));
            }
        }
    }

    ExitCode::Success
}

fn render_preview(ctx: &Context, steps: &[Vec<depot_report::Step>], txn: &TransactionArgs) -> ExitCode {
    for stage in steps {
        for step in stage {
            let identity = ctx.cache.package(step.package).map_or_else(|| step.package.to_string(), |p| p.identity().to_string());
            if txn.urls || txn.metalink {
                println!("https://example.test/packages/{identity}");
            } else if txn.download {
                println!("downloading {identity}");
            } else {
                println!("{}: {identity}", step.op);
            }
        }
    }
    ExitCode::Success
}
