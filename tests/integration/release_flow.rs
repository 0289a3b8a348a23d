use predicates::prelude::*;

use crate::common::{APP, PROJECT, TestProject};
use release_agent::version::Version;

#[test]
fn test_newer_build_is_installed_and_service_restarted() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("1.0.0").unwrap();
    project.fixture().publish("1.10.0").unwrap();
    project.fixture().publish("1.9.3").unwrap();
    project.fixture().install("1.0.0").unwrap();

    project
        .command()
        .args([PROJECT, "snapshot", APP])
        .assert()
        .success()
        .stderr(predicate::str::contains("Artifact version: 1.10.0, installed version: 1.0.0"))
        .stderr(predicate::str::contains("Doing release"));

    assert_eq!(project.installed_version(), Version::new(1, 10, 0));
    assert_eq!(project.service_calls(), vec!["stop", "start"]);
    assert_eq!(project.fixture().scratch_entries().unwrap(), 0);
}

#[test]
fn test_first_install_without_existing_jar() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("0.1.0").unwrap();

    project.command().args([PROJECT, "snapshot", APP]).assert().success();

    assert_eq!(project.installed_version(), Version::new(0, 1, 0));
}

#[test]
fn test_current_install_does_nothing() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("2.3.0").unwrap();
    project.fixture().install("2.3").unwrap();

    project
        .command()
        .args([PROJECT, "snapshot", APP])
        .assert()
        .success()
        .stderr(predicate::str::contains("do nothing"));

    assert!(project.service_calls().is_empty());
}

#[test]
fn test_force_reinstalls_current_version() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("2.3.0").unwrap();
    project.fixture().install("2.3.0").unwrap();

    project
        .command()
        .args([PROJECT, "snapshot", APP, "force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Forcing release"));

    assert_eq!(project.service_calls(), vec!["stop", "start"]);
}

#[test]
fn test_second_run_is_a_no_op() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("4.0.0").unwrap();
    project.fixture().install("3.9.9").unwrap();

    project.command().args([PROJECT, "snapshot", APP]).assert().success();
    project.command().args([PROJECT, "snapshot", APP]).assert().success();

    assert_eq!(project.service_calls(), vec!["stop", "start"]);
}

#[test]
fn test_start_status_becomes_exit_code() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("1.1.0").unwrap();
    project.fixture().install("1.0.0").unwrap();
    project.write_config("true", "exit 3").unwrap();

    project.command().args([PROJECT, "snapshot", APP]).assert().code(3);

    assert_eq!(project.installed_version(), Version::new(1, 1, 0));
}

#[test]
fn test_failing_runs_stop_after_max_attempts() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["--max-attempts", "2", "--retry-delay", "0", PROJECT, "snapshot", APP])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Attempt 1 failed"))
        .stderr(predicate::str::contains("Attempt 2 failed"))
        .stderr(predicate::str::contains("No published artifacts found"));

    assert!(project.service_calls().is_empty());
}

#[test]
fn test_invalid_config_template_fails_run() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("1.0.0").unwrap();
    project.write_config("systemctl stop {{ service }}", "true").unwrap();

    project
        .command()
        .args(["--max-attempts", "1", PROJECT, "snapshot", APP])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to render 'systemctl stop {{ service }}'"));
}

#[test]
fn test_service_commands_keep_shell_braces() {
    let project = TestProject::new().unwrap();
    project.fixture().publish("1.1.0").unwrap();
    project.fixture().install("1.0.0").unwrap();
    let log = project.service_log();
    project
        .write_config(
            &format!(": \"${{HOME}}\"; echo stop-{{{{ app }}}} >> '{}'", log.display()),
            &format!("for step in {{1..3}}; do :; done; echo start-{{{{ app }}}} >> '{}'", log.display()),
        )
        .unwrap();

    project.command().args([PROJECT, "snapshot", APP]).assert().success();

    assert_eq!(project.service_calls(), vec!["stop-data-sync", "start-data-sync"]);
}
