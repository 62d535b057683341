//! `depot search` (ambient, grounded in the teacher's `search`/`show` commands; §6).

use clap::{Args, ValueEnum};
use depot_query::search_packages;

use crate::commands::ExitCode;
use crate::context::Context;
use crate::output;

/// Output format for `depot search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one package per line.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Arguments for `depot search`.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// The query to search for.
    #[arg(required = true, value_name = "QUERY")]
    pub query: String,

    /// Interpret `query` as a regex rather than a glob/exact name.
    #[arg(long)]
    pub regex: bool,

    /// Output format.
    #[arg(long = "output", value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Runs `depot search`.
pub fn run(args: &SearchArgs, ctx: &Context) -> ExitCode {
    let outcome = match search_packages(&ctx.cache, &args.query, args.regex) {
        Ok(outcome) => outcome,
        Err(err) => {
            output::error(&err.display_with_suggestions());
            return ExitCode::UserError;
        }
    };

    if matches!(args.output, OutputFormat::Json) {
        let names: Vec<String> = outcome
            .hits
            .iter()
            .filter_map(|id| ctx.cache.package(*id).map(|p| p.identity().to_string()))
            .collect();
        println!("{}", output::to_json_pretty(&names));
        return ExitCode::Success;
    }

    if outcome.hits.is_empty() {
        output::warning(&format!("no packages found matching '{}'", args.query));
        for s in &outcome.suggestions {
            if let Some(pkg) = ctx.cache.package(s.package) {
                println!("  did you mean {} ({:.0}%)?", pkg.identity(), s.ratio * 100.0);
            }
        }
        return ExitCode::Success;
    }

    for id in &outcome.hits {
        if let Some(pkg) = ctx.cache.package(*id) {
            println!("{}", pkg.identity());
        }
    }
    ExitCode::Success
}
