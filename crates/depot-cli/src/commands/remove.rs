//! `depot remove` (§6).

use clap::Args;
use depot_policy::InstallPolicy;
use depot_resolver::{solve, Queue, QueueOp};

use crate::commands::{ExitCode, TransactionArgs};
use crate::context::Context;
use crate::output;

/// Arguments for `depot remove`.
#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Package names to remove.
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub transaction: TransactionArgs,
}

/// Runs `depot remove`.
pub fn run(args: &RemoveArgs, ctx: &Context) -> ExitCode {
    let mut queue = Queue::new();
    let mut missing = Vec::new();
    for name in &args.packages {
        let installed: Vec<_> = ctx.cache.get_packages(Some(name)).filter(|p| p.installed()).collect();
        if installed.is_empty() {
            missing.push(name.clone());
            continue;
        }
        for pkg in installed {
            queue.insert(pkg.id(), QueueOp::Remove);
        }
    }

    if !missing.is_empty() {
        output::error(&format!("not installed: {}", missing.join(", ")));
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
