//! `depot upgrade` (§6).

use clap::Args;
use depot_policy::UpgradePolicy;
use depot_resolver::{solve, Queue, QueueOp};

use crate::commands::{ExitCode, TransactionArgs};
use crate::context::Context;
use crate::output;

/// Arguments for `depot upgrade`.
#[derive(Args, Debug, Clone)]
pub struct UpgradeArgs {
    /// Package names to upgrade (every installed package, if none given).
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub transaction: TransactionArgs,
}

/// Runs `depot upgrade`.
pub fn run(args: &UpgradeArgs, ctx: &Context) -> ExitCode {
    let names: Vec<String> = if args.packages.is_empty() {
        ctx.cache.get_packages(None).filter(|p| p.installed()).map(|p| p.name().to_string()).collect()
    } else {
        args.packages.clone()
    };

    let mut queue = Queue::new();
    for name in &names {
        if let Some(best) = ctx.cache.get_packages(Some(name)).max_by_key(|p| p.version().clone()) {
            queue.insert(best.id(), QueueOp::Upgrade);
        } else {
            output::warning(&format!("no such package: {name}"));
        }
    }

    let policy = UpgradePolicy::new(ctx.locks.clone());
    match solve(&ctx.cache, &queue, &policy, &ctx.priorities()) {
        Ok(changeset) => super::render_plan(ctx, &changeset, &args.transaction),
        Err(err) => {
            output::error(&err.display_with_suggestions());
            ExitCode::UserError
        }
    }
}
