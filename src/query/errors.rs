/// Errors from the query layer.
use std::path::PathBuf;

use thiserror::Error;

use crate::jmx::JmxError;

/// Everything that can abort an invocation.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Connection or lookup failure from the transport.
    #[error(transparent)]
    Jmx(#[from] JmxError),

    /// A type filter matched none of the value's sub-keys.
    #[error("Invalid type specified ({bean}::{attribute}::{type_filter}).")]
    TypeFilterEmpty {
        bean: String,
        attribute: String,
        type_filter: String,
    },

    /// A target did not carry both a bean and an attribute.
    #[error("Target must be splittable by tab character ({raw}).")]
    MalformedTarget {
        /// The target as given, before tab rewriting.
        raw: String,
    },

    /// Mutually exclusive inputs were supplied together.
    #[error("{0}")]
    ConfigurationConflict(String),

    /// The target file could not be read.
    #[error("Cannot read target file ({}): {source}", .path.display())]
    TargetFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// Return the CLI exit code for this error.
    ///
    /// Every domain failure shares one code; there is no degraded-success code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Jmx(_)
            | Self::TypeFilterEmpty { .. }
            | Self::MalformedTarget { .. }
            | Self::ConfigurationConflict(_)
            | Self::TargetFile { .. } => 1,
        }
    }
}
