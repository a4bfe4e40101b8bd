//! `check-package` end-to-end behavior.

use predicates::prelude::*;

use super::common::Fixture;

#[test]
fn test_reaching_the_target_exits_one_with_verdict() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "tea", "--target", "python2"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("tea depends on python2"));
}

#[test]
fn test_unrelated_package_exits_zero() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "water", "--target", "python2"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("water does not depend on python2"));
}

#[test]
fn test_unknown_package_exits_two() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "ghost", "--target", "python2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'ghost' not found"));
}

#[test]
fn test_unknown_target_exits_two() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "tea", "--target", "ghost"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'ghost' not found"));
}

#[test]
fn test_dot_output_draws_the_proving_path() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "tea", "--target", "python2", "--dot"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("digraph G {"))
        .stdout(predicate::str::contains(
            "\"tea\" -> \"instant-leaves\" [color=blue];  // Depends",
        ))
        .stdout(predicate::str::contains(
            "\"instant-leaves\" -> \"python2\" [color=blue];  // Depends",
        ))
        // The rejected alternative contributes nothing.
        .stdout(predicate::str::contains("\"leaves\"").not());
}

#[test]
fn test_dot_output_includes_virtual_resolution() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-package", "app", "--target", "python2", "--dot"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "\"app\" -> \"runtime\" [color=blue];  // Depends",
        ))
        .stdout(predicate::str::contains(
            "\"runtime\" -> \"impl\" [color=green];  // virtual",
        ));
}

#[test]
fn test_quiet_suppresses_the_verdict() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["--quiet", "check-package", "tea", "--target", "python2"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_status_file_exits_two() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args([
            "check-package",
            "tea",
            "--target",
            "python2",
            "--status-file",
            "/does/not/exist",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}
