//! Document codecs: turn bytes on disk into text plus document attributes and
//! back. The document model only talks to the `DocumentCodec` trait; the
//! registry picks the codec for a format.

pub mod html;
pub mod plain;
pub mod rtf;

use crate::app::domain::encoding::TextEncoding;
use crate::app::domain::format::DocumentFormat;
use crate::app::domain::geometry::{Color, OrientationSection, Size};
use crate::app::domain::preferences::{HtmlStylingMode, Preferences};
use crate::app::domain::properties::DocumentProperties;
use crate::app::infrastructure::error::DocumentError;

pub use html::HtmlCodec;
pub use plain::PlainTextCodec;
pub use rtf::RtfCodec;

/// Document-level attributes a rich format can carry alongside the text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAttributes {
    pub properties: DocumentProperties,
    pub background_color: Color,
    pub hyphenation_factor: f32,
    pub view_size: Size,
    pub paper_size: Size,
    pub scale_factor: f64,
    pub has_multiple_pages: bool,
    pub uses_screen_fonts: bool,
    pub read_only: bool,
    /// Per-page text orientation; empty means horizontal throughout.
    pub orientation_sections: Vec<OrientationSection>,
}

impl Default for DocumentAttributes {
    fn default() -> Self {
        Self {
            properties: DocumentProperties::default(),
            background_color: Color::WHITE,
            hyphenation_factor: 0.0,
            view_size: Size::ZERO,
            paper_size: Size::LETTER,
            scale_factor: 1.0,
            has_multiple_pages: false,
            uses_screen_fonts: false,
            read_only: false,
            orientation_sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodeOptions {
    pub encoding: TextEncoding,
    pub ignore_rich_formatting: bool,
    pub ignore_markup: bool,
}

/// What a codec recovered from a byte stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDocument {
    pub text: String,
    pub attributes: DocumentAttributes,
    pub encoding: TextEncoding,
    pub is_rich: bool,
    /// The stream held content the model cannot represent and it was dropped.
    pub lossy: bool,
    /// The text was filtered out of another format and cannot be saved back
    /// to it without loss.
    pub converted: bool,
}

impl DecodedDocument {
    pub fn plain(text: String, encoding: TextEncoding) -> Self {
        Self {
            text,
            attributes: DocumentAttributes::default(),
            encoding,
            is_rich: false,
            lossy: false,
            converted: false,
        }
    }
}

/// HTML export settings, taken from preferences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HtmlExportOptions {
    pub xhtml: bool,
    pub transitional: bool,
    pub styling: HtmlStylingMode,
    pub preserve_whitespace: bool,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            xhtml: false,
            transitional: false,
            styling: HtmlStylingMode::EmbeddedCss,
            preserve_whitespace: true,
        }
    }
}

impl HtmlExportOptions {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            xhtml: prefs.use_xhtml_doc_type,
            transitional: prefs.use_transitional_doc_type,
            styling: prefs.html_styling_mode(),
            preserve_whitespace: prefs.preserve_whitespace,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    pub encoding: TextEncoding,
    pub font_name: String,
    pub font_size: f64,
    pub html: HtmlExportOptions,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            html: HtmlExportOptions::default(),
        }
    }
}

pub trait DocumentCodec {
    fn format(&self) -> DocumentFormat;

    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedDocument, DocumentError>;

    fn encode(
        &self,
        text: &str,
        attributes: &DocumentAttributes,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, DocumentError>;
}

/// Codecs keyed by format.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn DocumentCodec>>,
}

impl CodecRegistry {
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Later registrations for the same format replace earlier ones.
    pub fn register(&mut self, codec: Box<dyn DocumentCodec>) {
        let format = codec.format();
        self.codecs.retain(|c| c.format() != format);
        self.codecs.push(codec);
    }

    pub fn codec_for(&self, format: DocumentFormat) -> Result<&dyn DocumentCodec, DocumentError> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| c.as_ref())
            .ok_or_else(|| DocumentError::UnsupportedFormat(format.to_string()))
    }

    pub fn formats(&self) -> Vec<DocumentFormat> {
        self.codecs.iter().map(|c| c.format()).collect()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlainTextCodec));
        registry.register(Box::new(RtfCodec));
        registry.register(Box::new(HtmlCodec));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_formats() {
        let registry = CodecRegistry::default();
        for format in [DocumentFormat::PlainText, DocumentFormat::RichText, DocumentFormat::Html] {
            assert_eq!(registry.codec_for(format).unwrap().format(), format);
        }
    }

    #[test]
    fn test_empty_registry_is_unsupported() {
        let registry = CodecRegistry::empty();
        assert!(matches!(
            registry.codec_for(DocumentFormat::RichText),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_register_replaces_same_format() {
        let mut registry = CodecRegistry::default();
        registry.register(Box::new(PlainTextCodec));
        assert_eq!(registry.formats().len(), 3);
    }
}
