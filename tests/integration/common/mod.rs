//! Shared fixtures for the integration suite.
//!
//! One tempdir per fixture holding a small but representative world: a
//! control file with a real chain, an alternative, and a virtual package; a
//! key database; and a two-manifest workspace that crosses into the key and
//! package domains. The target of interest throughout is `python2`.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

const STATUS: &str = "\
Package: tea
Version: 2.0-1
Depends: water (>= 1.0), leaves | instant-leaves
Suggests: biscuit

Package: water
Depends: pipes

Package: pipes

Package: leaves

Package: instant-leaves
Depends: python2

Package: python2

Package: biscuit

Package: app
Depends: runtime

Package: impl
Provides: runtime
Depends: python2
";

const KEYS: &str = "\
teakey:
  - tea
waterkey: water
";

const NAV_XML: &str = r#"<?xml version="1.0"?>
<package format="3">
  <name>nav</name>
  <version>0.1.0</version>
  <depend>geometry</depend>
</package>
"#;

const GEOMETRY_XML: &str = r#"<?xml version="1.0"?>
<package format="3">
  <name>geometry</name>
  <version>0.1.0</version>
  <exec_depend>teakey</exec_depend>
</package>
"#;

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Build the fixture world in a fresh tempdir.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        fs::write(dir.path().join("status"), STATUS).expect("write status");
        fs::write(dir.path().join("keys.yaml"), KEYS).expect("write keys");

        let nav = dir.path().join("ws/nav");
        let geometry = dir.path().join("ws/geometry");
        fs::create_dir_all(&nav).expect("create nav");
        fs::create_dir_all(&geometry).expect("create geometry");
        fs::write(nav.join("package.xml"), NAV_XML).expect("write nav manifest");
        fs::write(geometry.join("package.xml"), GEOMETRY_XML).expect("write geometry manifest");

        Self { dir }
    }

    pub fn status_file(&self) -> PathBuf {
        self.dir.path().join("status")
    }

    pub fn keys_file(&self) -> PathBuf {
        self.dir.path().join("keys.yaml")
    }

    pub fn workspace(&self) -> PathBuf {
        self.dir.path().join("ws")
    }

    /// A `deptrace` command with color disabled and the fixture's status
    /// file wired in through the environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("deptrace").expect("binary exists");
        cmd.env("NO_COLOR", "1");
        cmd.env("DEPTRACE_STATUS_FILE", self.status_file());
        cmd.env_remove("DEPTRACE_KEYS_FILE");
        cmd.env_remove("DEPTRACE_MANIFEST_PATH");
        cmd
    }
}
