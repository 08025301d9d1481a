use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::template::TemplateError;

/// Custom error type for barmon
#[derive(Error, Debug)]
pub enum BarError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse {value:?} from {path:?}")]
    Parse { path: PathBuf, value: String },

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Unknown module type: {0}")]
    UnknownModule(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for barmon
pub type Result<T> = std::result::Result<T, BarError>;

impl BarError {
    /// Create an IO error bound to the path that failed
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        BarError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a value read from `path`
    pub fn parse<P: Into<PathBuf>, S: Into<String>>(path: P, value: S) -> Self {
        BarError::Parse {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn missing_resource<S: Into<String>>(msg: S) -> Self {
        BarError::MissingResource(msg.into())
    }

    pub fn unknown_module<S: Into<String>>(name: S) -> Self {
        BarError::UnknownModule(name.into())
    }

    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        BarError::Runtime(msg.into())
    }
}
