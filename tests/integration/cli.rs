use assert_cmd::Command;
use predicates::prelude::*;

fn do_release() -> Command {
    let mut cmd = Command::cargo_bin("do-release").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("RELEASE_AGENT_CONFIG");
    cmd
}

#[test]
fn test_missing_arguments_print_usage() {
    do_release()
        .args(["rtb", "snapshot"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Usage: do-release <project_name> <release|snapshot> <app_name> [force]",
        ))
        .stdout(predicate::str::contains("Example: do-release rtb snapshot data-sync"));
}

#[test]
fn test_no_arguments_print_usage() {
    do_release()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Example: do-release rtb release bundle-distance force"));
}

#[test]
fn test_unknown_channel_prints_usage() {
    do_release()
        .args(["rtb", "nightly", "data-sync"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Usage: "));
}

#[test]
fn test_unknown_fourth_argument_prints_usage() {
    do_release()
        .args(["rtb", "release", "data-sync", "please"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Usage: "));
}

#[test]
fn test_too_many_arguments_print_usage() {
    do_release()
        .args(["rtb", "release", "data-sync", "force", "extra"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Usage: "));
}

#[test]
fn test_help_exits_zero() {
    do_release()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-attempts"))
        .stdout(predicate::str::contains("--retry-delay"));
}

#[test]
fn test_version_exits_zero() {
    do_release()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
