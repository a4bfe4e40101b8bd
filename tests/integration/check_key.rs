//! `check-key` end-to-end behavior.

use predicates::prelude::*;

use super::common::Fixture;

#[test]
fn test_key_reaching_the_target_exits_one() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-key", "teakey", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("teakey depends on python2"));
}

#[test]
fn test_key_not_reaching_the_target_exits_zero() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-key", "waterkey", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("waterkey does not depend on python2"));
}

#[test]
fn test_unknown_key_exits_two() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-key", "ghostkey", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'ghostkey' not found in the key index"));
}

#[test]
fn test_dot_output_links_key_to_package_chain() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-key", "teakey", "--target", "python2", "--dot"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "\"teakey\" [color=orange,shape=oval];  // key",
        ))
        .stdout(predicate::str::contains(
            "\"teakey\" -> \"tea\" [color=orange];  // key",
        ))
        .stdout(predicate::str::contains(
            "\"instant-leaves\" -> \"python2\" [color=blue];  // Depends",
        ));
}

#[test]
fn test_keys_file_can_come_from_the_environment() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .env("DEPTRACE_KEYS_FILE", fixture.keys_file())
        .args(["check-key", "teakey", "--target", "python2"])
        .assert()
        .code(1);
}
