//! `check-manifest` end-to-end behavior.

use predicates::prelude::*;

use super::common::Fixture;

#[test]
fn test_manifest_reaching_the_target_exits_one() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-manifest", "nav", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .arg("--search-path")
        .arg(fixture.workspace())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("nav depends on python2"));
}

#[test]
fn test_unknown_manifest_exits_two() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-manifest", "ghost", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .arg("--search-path")
        .arg(fixture.workspace())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'ghost' not found in the manifest index"));
}

#[test]
fn test_dot_output_crosses_all_three_domains() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-manifest", "nav", "--target", "python2", "--dot"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .arg("--search-path")
        .arg(fixture.workspace())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "\"nav\" [color=pink,shape=hexagon];  // manifest",
        ))
        .stdout(predicate::str::contains(
            "\"nav\" -> \"geometry\" [color=pink];  // exec_depend",
        ))
        .stdout(predicate::str::contains(
            "\"geometry\" -> \"teakey\" [color=pink];  // exec_depend",
        ))
        .stdout(predicate::str::contains(
            "\"teakey\" -> \"tea\" [color=orange];  // key",
        ))
        .stdout(predicate::str::contains(
            "\"instant-leaves\" -> \"python2\" [color=blue];  // Depends",
        ));
}

#[test]
fn test_search_paths_can_come_from_the_environment() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .env("DEPTRACE_MANIFEST_PATH", fixture.workspace())
        .args(["check-manifest", "geometry", "--target", "python2"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("geometry depends on python2"));
}

#[test]
fn test_manifest_with_no_reaching_dependency_exits_zero() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["check-manifest", "nav", "--target", "app"])
        .arg("--keys-file")
        .arg(fixture.keys_file())
        .arg("--search-path")
        .arg(fixture.workspace())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("nav does not depend on app"));
}
