//! CLI integration tests for depot.
//!
//! These exercise the binary as a subprocess, asserting on exit status and
//! rendered output rather than calling into the command modules directly.

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn depot() -> Command {
    Command::new(cargo_bin!("depot"))
}

#[test]
fn help_lists_every_subcommand() {
    depot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("upgrade"))
        .stdout(predicate::str::contains("reinstall"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn version_flag_reports_the_binary_name() {
    depot().arg("--version").assert().success().stdout(predicate::str::contains("depot"));
}

#[test]
fn search_finds_a_known_fixture_package() {
    depot().args(["search", "foo"]).assert().success().stdout(predicate::str::contains("foo"));
}

#[test]
fn search_for_an_unknown_name_suggests_nothing_fatal() {
    depot().args(["search", "zzz-does-not-exist"]).assert().success();
}

#[test]
fn status_lists_installed_fixture_packages() {
    depot().arg("status").assert().success().stdout(predicate::str::contains("installed").or(predicate::str::contains("PACKAGE")));
}

#[test]
fn install_of_an_unknown_package_is_a_user_error() {
    depot().args(["install", "zzz-does-not-exist"]).assert().failure().code(1);
}

#[test]
fn query_without_a_term_or_who_flag_is_a_usage_error() {
    depot().arg("query").assert().failure().code(2);
}

#[test]
fn reinstall_of_an_uninstalled_package_is_rejected() {
    // bar is a fixture package that is never marked installed.
    depot().args(["reinstall", "bar"]).assert().failure();
}
