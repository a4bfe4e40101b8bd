//! Core types shared across the crate.
//!
//! Currently this is the error taxonomy. Only lookup-class failures cross the
//! tracer's public boundary (see [`error::TraceError`]); everything else the
//! traversal encounters is absorbed and degrades the completeness of the
//! result instead of aborting it.

pub mod error;

pub use error::TraceError;
