use std::path::PathBuf;

use thiserror::Error;

use crate::app::domain::encoding::TextEncoding;

/// Failures raised by document reading, writing and mutation.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not decode document as {encoding}: {detail}")]
    DecodingFailure {
        encoding: TextEncoding,
        detail: String,
    },

    #[error("Text cannot be saved as {encoding}: {detail}")]
    EncodingFailure {
        encoding: TextEncoding,
        detail: String,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document is read-only")]
    ReadOnly,

    #[error("Hyphenation factor {0} is outside 0.0-1.0")]
    InvalidHyphenationFactor(f32),

    #[error("Saving over the original would lose information; confirmation required")]
    OverwriteNeedsConfirmation,

    #[error("Document has no file location")]
    NoLocation,

    #[error("No open document with id {0}")]
    UnknownDocument(u64),

    #[error("Range {start}..{end} is not valid for this text")]
    InvalidRange { start: usize, end: usize },
}

impl DocumentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
