//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, parsing or rendering content files
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front-matter in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("No content found for slug '{slug}' in {collection:?}")]
    NotFound { collection: PathBuf, slug: String },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Body of '{0}' was elided by a collection listing and cannot be rendered")]
    BodyElided(String),
}

impl ContentError {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ContentError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested item does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
