use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::DocumentError;

/// File formats a document can be read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    PlainText,
    RichText,
    Html,
}

impl DocumentFormat {
    pub fn type_identifier(&self) -> &'static str {
        match self {
            Self::PlainText => "public.plain-text",
            Self::RichText => "public.rtf",
            Self::Html => "public.html",
        }
    }

    pub fn preferred_extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::RichText => "rtf",
            Self::Html => "html",
        }
    }

    pub fn is_rich(&self) -> bool {
        !matches!(self, Self::PlainText)
    }

    /// Resolve a format from a type identifier or a bare extension.
    pub fn from_type_name(name: &str) -> Result<Self, DocumentError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "public.plain-text" | "public.text" | "txt" | "text" => Ok(Self::PlainText),
            "public.rtf" | "rtf" => Ok(Self::RichText),
            "public.html" | "html" | "htm" => Ok(Self::Html),
            _ => Err(DocumentError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_type_name(ext)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_identifier())
    }
}
