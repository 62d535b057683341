//! `depot query` (§6): search, or `whoprovides`/`whorequires`/`whoconflicts`/`whoobsoletes`.

use clap::Args;
use depot_core::Package;
use depot_query::{who_conflicts, who_obsoletes, who_provides, who_requires, search_packages, Spec};

use crate::commands::ExitCode;
use crate::context::Context;
use crate::output;

/// Arguments for `depot query`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// A name/glob/regex to search for, when no `--who*` flag is given.
    pub term: Option<String>,

    /// List declared Provides for the matched packages.
    #[arg(long)]
    pub provides: bool,

    /// List declared Requires for the matched packages.
    #[arg(long)]
    pub requires: bool,

    /// List declared Conflicts for the matched packages.
    #[arg(long)]
    pub conflicts: bool,

    /// List declared Obsoletes for the matched packages.
    #[arg(long)]
    pub obsoletes: bool,

    /// Only print packages whose identity satisfies this Depends spec.
    #[arg(long)]
    pub satisfies: Option<String>,

    /// Who provides this capability (repeatable).
    #[arg(long = "whoprovides", value_name = "DEP")]
    pub who_provides: Vec<String>,

    /// Who requires this capability (repeatable).
    #[arg(long = "whorequires", value_name = "DEP")]
    pub who_requires: Vec<String>,

    /// Who conflicts with this capability (repeatable).
    #[arg(long = "whoconflicts", value_name = "DEP")]
    pub who_conflicts: Vec<String>,

    /// Who obsoletes this capability (repeatable).
    #[arg(long = "whoobsoletes", value_name = "DEP")]
    pub who_obsoletes: Vec<String>,

    /// Interpret `--who*` arguments as regexes rather than exact names.
    #[arg(long)]
    pub regex: bool,
}

/// Runs `depot query`.
pub fn run(args: &QueryArgs, ctx: &Context) -> ExitCode {
    let relation_queries: &[(&[String], &str)] = &[
        (&args.who_provides, "provides"),
        (&args.who_requires, "requires"),
        (&args.who_conflicts, "conflicts"),
        (&args.who_obsoletes, "obsoletes"),
    ];

    if relation_queries.iter().any(|(v, _)| !v.is_empty()) {
        return run_relation_queries(args, ctx);
    }

    let Some(term) = &args.term else {
        output::error("query requires a search term or a --who* flag");
        return ExitCode::UsageError;
    };

    let outcome = match search_packages(&ctx.cache, term, args.regex) {
        Ok(outcome) => outcome,
        Err(err) => {
            output::error(&err.display_with_suggestions());
            return ExitCode::UserError;
        }
    };

    if outcome.hits.is_empty() {
        for suggestion in &outcome.suggestions {
            if let Some(pkg) = ctx.cache.package(suggestion.package) {
                output::info(&format!("{} (ratio {:.2})", pkg.identity(), suggestion.ratio));
            }
        }
        return ExitCode::Success;
    }

    for id in &outcome.hits {
        let Some(pkg) = ctx.cache.package(*id) else { continue };
        print_package(pkg, args);
    }
    ExitCode::Success
}

fn print_package(pkg: &Package, args: &QueryArgs) {
    println!("{}", pkg.identity());
    if args.provides {
        for p in pkg.provides() {
            println!("  provides: {p}");
        }
    }
    if args.requires {
        for d in pkg.requires() {
            println!("  requires: {d}");
        }
    }
    if args.conflicts {
        for d in pkg.conflicts() {
            println!("  conflicts: {d}");
        }
    }
    if args.obsoletes {
        for d in pkg.obsoletes() {
            println!("  obsoletes: {d}");
        }
    }
}

fn run_relation_queries(args: &QueryArgs, ctx: &Context) -> ExitCode {
    let groups: [(&[String], &str); 4] = [
        (&args.who_provides, "provides"),
        (&args.who_requires, "requires"),
        (&args.who_conflicts, "conflicts"),
        (&args.who_obsoletes, "obsoletes"),
    ];

    for (terms, label) in groups {
        if terms.is_empty() {
            continue;
        }
        let specs: Vec<Spec> = match terms.iter().map(|t| Spec::parse(t)).collect::<Result<_, _>>() {
            Ok(specs) => specs,
            Err(err) => {
                output::error(&format!("{err}"));
                return ExitCode::UsageError;
            }
        };

        let result: Result<Vec<(String, Vec<_>)>, depot_core::Error> = match label {
            "provides" => who_provides(&ctx.cache, &specs, args.regex)
                .map(|entries| entries.into_iter().map(|e| (e.value().to_string(), e.packages().to_vec())).collect()),
            "requires" => who_requires(&ctx.cache, &specs, args.regex)
                .map(|entries| entries.into_iter().map(|e| (e.value().to_string(), e.packages().to_vec())).collect()),
            "conflicts" => who_conflicts(&ctx.cache, &specs, args.regex)
                .map(|entries| entries.into_iter().map(|e| (e.value().to_string(), e.packages().to_vec())).collect()),
            _ => who_obsoletes(&ctx.cache, &specs, args.regex)
                .map(|entries| entries.into_iter().map(|e| (e.value().to_string(), e.packages().to_vec())).collect()),
        };

        match result {
            Ok(entries) => {
                for (value, packages) in entries {
                    for pid in packages {
                        if let Some(pkg) = ctx.cache.package(pid) {
                            println!("{label}: {value} -> {}", pkg.identity());
                        }
                    }
                }
            }
            Err(err) => {
                output::error(&err.display_with_suggestions());
                return ExitCode::UserError;
            }
        }
    }
    ExitCode::Success
}
