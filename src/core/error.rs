//! Error types for dependency tracing.
//!
//! The taxonomy is deliberately small:
//!
//! - **Lookup failures** ([`TraceError::NotFound`]): the start or target of a
//!   trace is absent from the relevant index. Fatal to the invocation; the CLI
//!   surfaces these as exit status 2.
//! - **Data-source failures** (IO and parse variants): the index backing an
//!   adapter could not be loaded at all. Also fatal, also exit status 2.
//!
//! A dependency *referenced* by a package but missing from the index is not an
//! error: the tracer logs a warning and skips the edge, so incomplete metadata
//! degrades the search instead of aborting it. Cycle deferral is internal
//! control flow and never becomes an error.

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeKind;

/// Errors that can cross the tracer's public boundary.
#[derive(Error, Debug)]
pub enum TraceError {
    /// A start or target name is absent from the index it was looked up in.
    #[error("'{name}' not found in the {kind} index")]
    NotFound {
        /// The name that failed to resolve.
        name: String,
        /// Which index was consulted.
        kind: NodeKind,
    },

    /// A data source backing an adapter could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A control-file stanza could not be parsed.
    #[error("malformed control stanza in {}: {reason}", path.display())]
    ControlParse {
        /// File containing the stanza.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The key database was not valid YAML of the expected shape.
    #[error("invalid key database {}", path.display())]
    KeyDbParse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A manifest file was not valid XML of the expected shape.
    #[error("invalid manifest {}", path.display())]
    ManifestParse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: quick_xml::DeError,
    },
}

impl TraceError {
    /// Convenience constructor for lookup failures.
    pub fn not_found(name: impl Into<String>, kind: NodeKind) -> Self {
        Self::NotFound {
            name: name.into(),
            kind,
        }
    }
}
