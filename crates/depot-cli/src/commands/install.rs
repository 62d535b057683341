//! `depot install` (§6).

use clap::Args;
use depot_core::PackageId;
use depot_policy::InstallPolicy;
use depot_resolver::{solve, Queue, QueueOp};

use crate::commands::{ExitCode, TransactionArgs};
use crate::context::Context;
use crate::output;

/// Arguments for `depot install`.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Package names to install.
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub transaction: TransactionArgs,
}

/// Runs `depot install`.
pub fn run(args: &InstallArgs, ctx: &Context) -> ExitCode {
    let mut queue = Queue::new();
    let mut missing = Vec::new();
    for name in &args.packages {
        match resolve_candidate(ctx, name) {
            Some(id) => {
                queue.insert(id, QueueOp::Install);
            }
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        output::error(&format!("no such package: {}", missing.join(", ")));
        return ExitCode::UserError;
    }

    let policy = InstallPolicy::new(ctx.locks.clone());
    match solve(&ctx.cache, &queue, &policy, &ctx.priorities()) {
        Ok(changeset) => super::render_plan(ctx, &changeset, &args.transaction),
        Err(err) => {
            output::error(&err.display_with_suggestions());
            ExitCode::UserError
        }
    }
}

/// Picks the highest-priority candidate for `name`, the installer's default
/// disambiguation when a bare name is given without a version.
fn resolve_candidate(ctx: &Context, name: &str) -> Option<PackageId> {
    ctx.cache.get_packages(Some(name)).max_by_key(|p| p.version().clone()).map(depot_core::Package::id)
}
