//! `depot reinstall` (§6), fully specified from `smart/commands/reinstall.py`:
//! searches for each argument, restricts suggestions on a miss to installed
//! packages, skips (rather than fails) a matched-but-not-installed package,
//! and requires at least one owning loader to report the package installed.

use clap::Args;
use depot_policy::InstallPolicy;
use depot_query::search_packages;
use depot_resolver::{solve, Queue, QueueOp};

use crate::commands::{ExitCode, TransactionArgs};
use crate::context::Context;
use crate::output;

/// Arguments for `depot reinstall`.
#[derive(Args, Debug, Clone)]
pub struct ReinstallArgs {
    /// Package names to reinstall.
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub transaction: TransactionArgs,
}

/// Runs `depot reinstall`.
pub fn run(args: &ReinstallArgs, ctx: &mut Context) -> ExitCode {
    if args.transaction.explain {
        ctx.config.explain_changesets = true;
    }

    let mut queue = Queue::new();
    for name in &args.packages {
        let outcome = match search_packages(&ctx.cache, name, false) {
            Ok(outcome) => outcome,
            Err(err) => {
                output::error(&err.display_with_suggestions());
                return ExitCode::UserError;
            }
        };

        if outcome.hits.is_empty() {
            let installed_suggestions = depot_query::search_installed_suggestions(&ctx.cache, name);
            let names: Vec<String> = installed_suggestions
                .iter()
                .filter_map(|s| ctx.cache.package(s.package).map(|p| p.name().to_string()))
                .collect();
            output::error(&format!(
                "package '{name}' was not found{}",
                if names.is_empty() { String::new() } else { format!(", did you mean: {}", names.join(", ")) }
            ));
            return ExitCode::UserError;
        }

        for hit in &outcome.hits {
            let Some(pkg) = ctx.cache.package(*hit) else { continue };
            if !pkg.installed() {
                output::warning(&format!("'{}' matches no installed packages", pkg.identity()));
                continue;
            }
            if pkg.loaders().is_empty() {
                output::error(&format!("'{}' is not available for reinstallation", pkg.identity()));
                return ExitCode::UserError;
            }
            queue.insert(*hit, QueueOp::Reinstall);
        }
    }

    if queue.is_empty() {
        output::info("nothing to reinstall");
        return ExitCode::Success;
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
