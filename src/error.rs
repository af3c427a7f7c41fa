//! Error types for folio operations.

use thiserror::Error;

/// Errors that can occur while driving the page runtime or validating content.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("missing fixture for entry {entry}: {path}")]
    MissingFixture { entry: String, path: String },

    #[error("invalid index document: {0}")]
    InvalidIndex(String),
}

pub type Result<T> = std::result::Result<T, Error>;
