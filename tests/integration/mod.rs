//! Integration tests driving the compiled `deptrace` binary.
//!
//! Each module covers one subcommand against shared tempdir fixtures; the
//! fixtures live in [`common`].

mod common;

mod check_key;
mod check_manifest;
mod check_package;
