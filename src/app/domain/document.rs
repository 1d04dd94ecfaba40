use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::encoding::TextEncoding;
use super::format::DocumentFormat;
use super::geometry::{Color, OrientationSection, Size};
use super::preferences::{FontSpec, Preferences};
use super::properties::DocumentProperties;
use crate::app::infrastructure::error::DocumentError;
use crate::app::services::codec::{
    CodecRegistry, DecodeOptions, DocumentAttributes, EncodeOptions, HtmlExportOptions,
};
use crate::app::services::text_ops::extract_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOperation {
    /// Overwrite the document's own file.
    Save,
    /// Write to a new location and adopt it.
    SaveAs,
    /// Export a copy; the document keeps its location and state.
    SaveTo,
    Autosave,
}

/// Reasons an in-place save needs the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteWarning {
    Lossy,
    Converted,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReadOptions {
    /// Format to read as; `None` resolves it from the file extension.
    pub format: Option<DocumentFormat>,
    pub encoding: TextEncoding,
    pub ignore_rich_formatting: bool,
    pub ignore_markup: bool,
}

impl ReadOptions {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            format: None,
            encoding: prefs.plain_text_encoding_for_read,
            ignore_rich_formatting: prefs.ignore_rich_text,
            ignore_markup: prefs.ignore_html,
        }
    }
}

/// Typing attributes for new text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAttributes {
    pub font: FontSpec,
    /// Tab stop interval, in characters.
    pub tab_width: u32,
    pub uses_screen_fonts: bool,
}

impl TextAttributes {
    fn defaults(rich: bool, prefs: &Preferences, uses_screen_fonts: bool) -> Self {
        Self {
            font: if rich {
                prefs.rich_text_font.clone()
            } else {
                prefs.plain_text_font.clone()
            },
            tab_width: prefs.tab_width,
            uses_screen_fonts,
        }
    }
}

/// A text document: content, descriptive properties, page attributes and
/// the provenance of its last read.
///
/// Read-only documents refuse every content mutation with
/// [`DocumentError::ReadOnly`]; page and property attributes stay editable.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    display_name: String,
    file_path: Option<PathBuf>,
    file_format: DocumentFormat,

    text: String,
    edited: bool,
    rich_text: bool,

    read_only: bool,
    background_color: Color,
    hyphenation_factor: f32,
    view_size: Size,
    paper_size: Size,
    scale_factor: f64,
    has_multiple_pages: bool,
    uses_screen_fonts: bool,
    properties: DocumentProperties,
    original_orientation_sections: Vec<OrientationSection>,
    text_attributes: TextAttributes,

    opened_ignoring_rich_text: bool,
    converted: bool,
    lossy: bool,
    transient: bool,

    encoding: TextEncoding,
    encoding_for_saving: TextEncoding,
}

impl Document {
    pub fn new_untitled(id: DocumentId, counter: u32, prefs: &Preferences) -> Self {
        let display_name = if counter <= 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled {}", counter)
        };
        let rich_text = prefs.rich_text;
        let mut properties = DocumentProperties::default();
        if rich_text {
            properties.set_to_defaults(prefs);
        }
        let text_attributes = TextAttributes::defaults(rich_text, prefs, prefs.use_screen_fonts);

        Self {
            id,
            display_name,
            file_path: None,
            file_format: if rich_text {
                DocumentFormat::RichText
            } else {
                DocumentFormat::PlainText
            },
            text: String::new(),
            edited: false,
            rich_text,
            read_only: false,
            background_color: Color::WHITE,
            hyphenation_factor: 0.0,
            view_size: Size::ZERO,
            paper_size: Size::LETTER,
            scale_factor: 1.0,
            has_multiple_pages: prefs.show_page_breaks,
            uses_screen_fonts: prefs.use_screen_fonts,
            properties,
            original_orientation_sections: Vec::new(),
            text_attributes,
            opened_ignoring_rich_text: false,
            converted: false,
            lossy: false,
            transient: false,
            encoding: TextEncoding::Automatic,
            encoding_for_saving: prefs.plain_text_encoding_for_write,
        }
    }

    /// Create a document by reading `path`.
    pub fn open(
        id: DocumentId,
        path: &Path,
        options: &ReadOptions,
        prefs: &Preferences,
        codecs: &CodecRegistry,
    ) -> Result<Self, DocumentError> {
        let mut doc = Self::new_untitled(id, 1, prefs);
        doc.read_from(path, options, codecs)?;
        doc.apply_default_text_attributes(doc.rich_text, prefs);
        Ok(doc)
    }

    /// Replace this document's state with the contents of `path`.
    pub fn read_from(
        &mut self,
        path: &Path,
        options: &ReadOptions,
        codecs: &CodecRegistry,
    ) -> Result<(), DocumentError> {
        let format = match options.format {
            Some(format) => format,
            None => DocumentFormat::from_path(path)?,
        };
        let codec = codecs.codec_for(format)?;
        let bytes = fs::read(path).map_err(|e| DocumentError::io(path, e))?;

        let decoded = codec.decode(
            &bytes,
            &DecodeOptions {
                encoding: options.encoding,
                ignore_rich_formatting: options.ignore_rich_formatting,
                ignore_markup: options.ignore_markup,
            },
        )?;

        let ignored = match format {
            DocumentFormat::RichText => options.ignore_rich_formatting,
            DocumentFormat::Html => options.ignore_markup,
            DocumentFormat::PlainText => false,
        };

        let attrs = decoded.attributes;
        self.text = decoded.text;
        self.rich_text = decoded.is_rich;
        self.read_only = attrs.read_only;
        self.background_color = attrs.background_color;
        self.hyphenation_factor = attrs.hyphenation_factor.clamp(0.0, 1.0);
        self.view_size = attrs.view_size;
        self.paper_size = attrs.paper_size;
        self.scale_factor = attrs.scale_factor;
        self.has_multiple_pages = attrs.has_multiple_pages;
        self.uses_screen_fonts = attrs.uses_screen_fonts;
        self.properties = attrs.properties;
        self.original_orientation_sections = attrs.orientation_sections;

        self.opened_ignoring_rich_text = ignored;
        self.converted = decoded.converted;
        self.lossy = decoded.lossy;
        self.transient = false;
        self.edited = false;

        self.encoding = decoded.encoding;
        self.encoding_for_saving = decoded.encoding.for_saving();
        self.file_format = if ignored { DocumentFormat::PlainText } else { format };
        self.file_path = Some(path.to_path_buf());
        self.display_name = extract_filename(&path.to_string_lossy());

        log::info!(
            "Opened {} as {} ({}{}{})",
            path.display(),
            format,
            self.encoding,
            if self.lossy { ", lossy" } else { "" },
            if self.converted { ", converted" } else { "" }
        );
        Ok(())
    }

    /// Re-read the file with the options it was opened with.
    pub fn revert(&mut self, codecs: &CodecRegistry) -> Result<(), DocumentError> {
        let path = self.file_path.clone().ok_or(DocumentError::NoLocation)?;
        let format = if self.opened_ignoring_rich_text {
            DocumentFormat::from_path(&path).ok()
        } else {
            Some(self.file_format)
        };
        let options = ReadOptions {
            format,
            encoding: self.encoding,
            ignore_rich_formatting: self.opened_ignoring_rich_text,
            ignore_markup: self.opened_ignoring_rich_text,
        };
        self.read_from(&path, &options, codecs)
    }

    /// Warnings an in-place save would have to confirm.
    pub fn overwrite_warnings(&self) -> Vec<OverwriteWarning> {
        let mut warnings = Vec::new();
        if self.lossy {
            warnings.push(OverwriteWarning::Lossy);
        }
        if self.converted {
            warnings.push(OverwriteWarning::Converted);
        }
        warnings
    }

    /// Save over the document's own file. Lossy or converted documents need
    /// `confirmed` to be set.
    pub fn save(
        &mut self,
        confirmed: bool,
        prefs: &Preferences,
        codecs: &CodecRegistry,
    ) -> Result<(), DocumentError> {
        let path = self.file_path.clone().ok_or(DocumentError::NoLocation)?;
        if !confirmed && !self.overwrite_warnings().is_empty() {
            return Err(DocumentError::OverwriteNeedsConfirmation);
        }
        self.write_to(&path, self.file_format, SaveOperation::Save, prefs, codecs)
    }

    pub fn write_to(
        &mut self,
        path: &Path,
        format: DocumentFormat,
        operation: SaveOperation,
        prefs: &Preferences,
        codecs: &CodecRegistry,
    ) -> Result<(), DocumentError> {
        let encoding = match operation {
            SaveOperation::SaveAs | SaveOperation::SaveTo => self.encoding_for_saving,
            SaveOperation::Save | SaveOperation::Autosave => match self.encoding {
                TextEncoding::Automatic => self.encoding_for_saving,
                enc => enc,
            },
        }
        .for_saving();
        let encoding = if format == DocumentFormat::Html {
            match prefs.html_encoding {
                TextEncoding::Automatic => encoding,
                enc => enc,
            }
        } else {
            encoding
        };

        let codec = codecs.codec_for(format)?;
        let attributes = self.attributes();
        let font = self.default_text_attributes(format.is_rich(), prefs).font;
        let options = EncodeOptions {
            encoding,
            font_name: font.name,
            font_size: font.size,
            html: HtmlExportOptions::from_preferences(prefs),
        };
        let bytes = codec.encode(&self.text, &attributes, &options)?;
        fs::write(path, bytes).map_err(|e| DocumentError::io(path, e))?;

        if operation != SaveOperation::SaveTo {
            self.file_path = Some(path.to_path_buf());
            self.file_format = format;
            self.display_name = extract_filename(&path.to_string_lossy());
            self.encoding = encoding;
            self.edited = false;
            self.transient = false;
            self.lossy = false;
            self.converted = false;
            self.opened_ignoring_rich_text = false;
        }
        log::info!("Saved {} as {} ({:?})", path.display(), format, operation);
        Ok(())
    }

    /// Snapshot of the attributes a codec stores with the text.
    pub fn attributes(&self) -> DocumentAttributes {
        DocumentAttributes {
            properties: self.properties.clone(),
            background_color: self.background_color,
            hyphenation_factor: self.hyphenation_factor,
            view_size: self.view_size,
            paper_size: self.paper_size,
            scale_factor: self.scale_factor,
            has_multiple_pages: self.has_multiple_pages,
            uses_screen_fonts: self.uses_screen_fonts,
            read_only: self.read_only,
            orientation_sections: self.original_orientation_sections.clone(),
        }
    }

    // Content

    pub fn text(&self) -> &str {
        &self.text
    }

    fn check_writable(&self) -> Result<(), DocumentError> {
        if self.read_only {
            Err(DocumentError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        let valid = range.start <= range.end
            && range.end <= self.text.len()
            && self.text.is_char_boundary(range.start)
            && self.text.is_char_boundary(range.end);
        if valid {
            Ok(())
        } else {
            Err(DocumentError::InvalidRange {
                start: range.start,
                end: range.end,
            })
        }
    }

    fn mark_edited(&mut self) {
        self.edited = true;
        self.transient = false;
    }

    /// Replace the whole text content.
    pub fn set_text(&mut self, text: &str) -> Result<(), DocumentError> {
        self.check_writable()?;
        self.text = text.to_string();
        self.mark_edited();
        Ok(())
    }

    pub fn insert(&mut self, at: usize, text: &str) -> Result<(), DocumentError> {
        self.replace_range(at..at, text)
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<(), DocumentError> {
        self.replace_range(range, "")
    }

    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), DocumentError> {
        self.check_writable()?;
        self.check_range(&range)?;
        self.text.replace_range(range, text);
        self.mark_edited();
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.edited
    }

    pub fn mark_clean(&mut self) {
        self.edited = false;
    }

    // Rich / plain

    pub fn is_rich_text(&self) -> bool {
        self.rich_text
    }

    /// Whether converting to plain text would drop information.
    pub fn toggle_rich_will_lose_information(&self) -> bool {
        self.rich_text
            && (self.properties.has_document_properties()
                || self.background_color != Color::WHITE
                || self.hyphenation_factor > 0.0)
    }

    /// Switch between rich and plain text. Going plain drops the document
    /// properties and background; going rich fills properties from defaults.
    pub fn set_rich_text(&mut self, rich: bool, prefs: &Preferences) -> Result<(), DocumentError> {
        if rich == self.rich_text {
            return Ok(());
        }
        self.check_writable()?;
        self.rich_text = rich;
        self.apply_default_text_attributes(rich, prefs);
        if rich {
            self.properties.set_to_defaults(prefs);
            self.file_format = DocumentFormat::RichText;
        } else {
            self.properties.clear();
            self.background_color = Color::WHITE;
            self.hyphenation_factor = 0.0;
            self.file_format = DocumentFormat::PlainText;
        }
        self.mark_edited();
        Ok(())
    }

    /// Typing attributes currently applied to the text.
    pub fn text_attributes(&self) -> &TextAttributes {
        &self.text_attributes
    }

    /// Reset the text's attributes to the preference defaults for rich or
    /// plain text. Formatting only, so read-only documents accept it.
    pub fn apply_default_text_attributes(&mut self, rich: bool, prefs: &Preferences) {
        self.text_attributes = self.default_text_attributes(rich, prefs);
    }

    pub fn default_text_attributes(&self, rich: bool, prefs: &Preferences) -> TextAttributes {
        TextAttributes::defaults(rich, prefs, self.uses_screen_fonts)
    }

    // Attributes

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn toggle_read_only(&mut self) {
        self.read_only = !self.read_only;
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn hyphenation_factor(&self) -> f32 {
        self.hyphenation_factor
    }

    /// Values outside 0.0-1.0 (and NaN) are rejected; the old value stays.
    pub fn set_hyphenation_factor(&mut self, factor: f32) -> Result<(), DocumentError> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(DocumentError::InvalidHyphenationFactor(factor));
        }
        self.hyphenation_factor = factor;
        Ok(())
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
    }

    pub fn paper_size(&self) -> Size {
        self.paper_size
    }

    pub fn set_paper_size(&mut self, size: Size) {
        self.paper_size = size;
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Non-positive or non-finite scales are ignored.
    pub fn set_scale_factor(&mut self, scale: f64) -> bool {
        if scale.is_finite() && scale > 0.0 {
            self.scale_factor = scale;
            true
        } else {
            false
        }
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.has_multiple_pages
    }

    pub fn set_has_multiple_pages(&mut self, flag: bool) {
        self.has_multiple_pages = flag;
    }

    pub fn toggle_page_breaks(&mut self) {
        self.has_multiple_pages = !self.has_multiple_pages;
    }

    pub fn uses_screen_fonts(&self) -> bool {
        self.uses_screen_fonts
    }

    pub fn set_uses_screen_fonts(&mut self, flag: bool) {
        self.uses_screen_fonts = flag;
    }

    /// Per-page text orientation as last read from disk; written back on
    /// save.
    pub fn original_orientation_sections(&self) -> &[OrientationSection] {
        &self.original_orientation_sections
    }

    pub fn set_original_orientation_sections(&mut self, sections: Vec<OrientationSection>) {
        self.original_orientation_sections = sections;
    }

    // Properties

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.properties = properties;
    }

    /// Set a descriptive property by name; false for unknown names.
    pub fn set_property(&mut self, name: &str, value: &str) -> bool {
        self.properties.set(name, value)
    }

    pub fn clear_document_properties(&mut self) {
        self.properties.clear();
    }

    pub fn set_document_properties_to_defaults(&mut self, prefs: &Preferences) {
        self.properties.set_to_defaults(prefs);
    }

    pub fn has_document_properties(&self) -> bool {
        self.properties.has_document_properties()
    }

    // Provenance

    pub fn is_opened_ignoring_rich_text(&self) -> bool {
        self.opened_ignoring_rich_text
    }

    pub fn set_opened_ignoring_rich_text(&mut self, flag: bool) {
        self.opened_ignoring_rich_text = flag;
    }

    pub fn is_converted(&self) -> bool {
        self.converted
    }

    pub fn set_converted(&mut self, flag: bool) {
        self.converted = flag;
    }

    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    pub fn set_lossy(&mut self, flag: bool) {
        self.lossy = flag;
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn set_transient(&mut self, flag: bool) {
        self.transient = flag;
    }

    /// An auto-opened document nobody has touched may be swapped out for the
    /// next opened file without asking.
    pub fn is_transient_and_can_be_replaced(&self) -> bool {
        self.transient && !self.edited && self.file_path.is_none()
    }

    // Encoding

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    pub fn encoding_for_saving(&self) -> TextEncoding {
        self.encoding_for_saving
    }

    pub fn set_encoding_for_saving(&mut self, encoding: TextEncoding) {
        self.encoding_for_saving = encoding;
    }

    // Identity

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn file_format(&self) -> DocumentFormat {
        self.file_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::geometry::TextOrientation;

    fn prefs() -> Preferences {
        Preferences {
            author: "Ada Lovelace".to_string(),
            company: "Analytical Engines".to_string(),
            copyright: "1843".to_string(),
            ..Default::default()
        }
    }

    fn untitled() -> Document {
        Document::new_untitled(DocumentId(1), 1, &prefs())
    }

    #[test]
    fn test_new_rich_document_takes_default_properties() {
        let doc = untitled();
        assert!(doc.is_rich_text());
        assert_eq!(doc.display_name(), "Untitled");
        assert_eq!(doc.properties().author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(doc.properties().copyright.as_deref(), Some("1843"));
        assert_eq!(doc.properties().title, None);
    }

    #[test]
    fn test_new_plain_document_has_no_properties() {
        let prefs = Preferences {
            rich_text: false,
            ..prefs()
        };
        let doc = Document::new_untitled(DocumentId(2), 3, &prefs);
        assert!(!doc.is_rich_text());
        assert!(!doc.has_document_properties());
        assert_eq!(doc.display_name(), "Untitled 3");
        assert_eq!(doc.file_format(), DocumentFormat::PlainText);
    }

    #[test]
    fn test_hyphenation_factor_rejects_out_of_range() {
        let mut doc = untitled();
        doc.set_hyphenation_factor(0.4).unwrap();
        for bad in [-0.01, 1.01, 7.0, f32::NAN, f32::INFINITY] {
            let err = doc.set_hyphenation_factor(bad).unwrap_err();
            assert!(matches!(err, DocumentError::InvalidHyphenationFactor(_)));
            assert_eq!(doc.hyphenation_factor(), 0.4);
        }
        doc.set_hyphenation_factor(0.0).unwrap();
        doc.set_hyphenation_factor(1.0).unwrap();
        assert_eq!(doc.hyphenation_factor(), 1.0);
    }

    #[test]
    fn test_read_only_rejects_every_content_mutation() {
        let mut doc = untitled();
        doc.set_text("keep me").unwrap();
        doc.mark_clean();
        doc.set_read_only(true);

        assert!(matches!(doc.set_text("x"), Err(DocumentError::ReadOnly)));
        assert!(matches!(doc.insert(0, "x"), Err(DocumentError::ReadOnly)));
        assert!(matches!(doc.delete(0..4), Err(DocumentError::ReadOnly)));
        assert!(matches!(doc.replace_range(0..4, "lose"), Err(DocumentError::ReadOnly)));
        assert!(matches!(doc.set_rich_text(false, &prefs()), Err(DocumentError::ReadOnly)));
        assert_eq!(doc.text(), "keep me");
        assert!(!doc.is_dirty());
        assert!(doc.is_rich_text());

        doc.toggle_read_only();
        doc.insert(0, "now ").unwrap();
        assert_eq!(doc.text(), "now keep me");
    }

    #[test]
    fn test_edit_ranges() {
        let mut doc = untitled();
        doc.set_text("héllo world").unwrap();
        doc.replace_range(7..12, "there").unwrap();
        assert_eq!(doc.text(), "héllo there");
        assert!(matches!(doc.delete(1..2), Err(DocumentError::InvalidRange { .. })));
        assert!(matches!(doc.insert(99, "x"), Err(DocumentError::InvalidRange { .. })));
        doc.delete(0..7).unwrap();
        assert_eq!(doc.text(), "there");
    }

    #[test]
    fn test_transient_until_edited() {
        let mut doc = untitled();
        doc.set_transient(true);
        assert!(doc.is_transient_and_can_be_replaced());
        doc.insert(0, "a").unwrap();
        assert!(!doc.is_transient());
        assert!(!doc.is_transient_and_can_be_replaced());
    }

    #[test]
    fn test_rtf_round_trip_preserves_content_and_properties() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.rtf");
        let codecs = CodecRegistry::default();
        let prefs = prefs();

        let mut doc = untitled();
        doc.set_text("Dear Charles,\n\tThe engine works.\n").unwrap();
        doc.set_property("title", "On the Engine");
        doc.set_hyphenation_factor(0.25).unwrap();
        doc.write_to(&path, DocumentFormat::RichText, SaveOperation::SaveAs, &prefs, &codecs)
            .unwrap();
        assert!(!doc.is_dirty());
        assert_eq!(doc.display_name(), "memo.rtf");

        let reopened = Document::open(DocumentId(9), &path, &ReadOptions::default(), &prefs, &codecs).unwrap();
        assert_eq!(reopened.text(), doc.text());
        assert_eq!(reopened.properties(), doc.properties());
        assert_eq!(reopened.hyphenation_factor(), 0.25);
        assert!(!reopened.is_lossy());
        assert!(reopened.is_rich_text());
    }

    #[test]
    fn test_plain_round_trip_with_save_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let codecs = CodecRegistry::default();
        let prefs = Preferences {
            rich_text: false,
            ..Default::default()
        };

        let mut doc = Document::new_untitled(DocumentId(1), 1, &prefs);
        doc.set_text("grüße").unwrap();
        doc.set_encoding_for_saving(TextEncoding::Utf16Le);
        doc.write_to(&path, DocumentFormat::PlainText, SaveOperation::SaveAs, &prefs, &codecs)
            .unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);

        let reopened = Document::open(DocumentId(2), &path, &ReadOptions::default(), &prefs, &codecs).unwrap();
        assert_eq!(reopened.text(), "grüße");
        assert_eq!(reopened.encoding(), TextEncoding::Utf16Le);
        assert!(!reopened.has_document_properties());
    }

    #[test]
    fn test_lossy_read_requires_confirmation_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picture.rtf");
        fs::write(&path, r"{\rtf1 caption{\pict\pngblip 00ff}}").unwrap();
        let codecs = CodecRegistry::default();
        let prefs = prefs();

        let mut doc = Document::open(DocumentId(1), &path, &ReadOptions::default(), &prefs, &codecs).unwrap();
        assert!(doc.is_lossy());
        assert_eq!(doc.text(), "caption");
        assert_eq!(doc.overwrite_warnings(), vec![OverwriteWarning::Lossy]);
        assert!(matches!(
            doc.save(false, &prefs, &codecs),
            Err(DocumentError::OverwriteNeedsConfirmation)
        ));

        doc.save(true, &prefs, &codecs).unwrap();
        assert!(!doc.is_lossy());
        assert!(doc.overwrite_warnings().is_empty());
    }

    #[test]
    fn test_html_read_is_converted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<html><body><p>Hi</p></body></html>").unwrap();
        let doc = Document::open(
            DocumentId(1),
            &path,
            &ReadOptions::default(),
            &prefs(),
            &CodecRegistry::default(),
        )
        .unwrap();
        assert!(doc.is_converted());
        assert_eq!(doc.overwrite_warnings(), vec![OverwriteWarning::Converted]);
        assert_eq!(doc.text(), "Hi");
    }

    #[test]
    fn test_read_failures() {
        let dir = tempfile::tempdir().unwrap();
        let codecs = CodecRegistry::default();
        let mut doc = untitled();

        let unsupported = dir.path().join("deck.key");
        fs::write(&unsupported, "x").unwrap();
        assert!(matches!(
            doc.read_from(&unsupported, &ReadOptions::default(), &codecs),
            Err(DocumentError::UnsupportedFormat(_))
        ));

        let missing = dir.path().join("missing.txt");
        let err = doc.read_from(&missing, &ReadOptions::default(), &codecs).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));

        let latin = dir.path().join("latin.txt");
        fs::write(&latin, [b'c', b'a', b'f', 0xE9]).unwrap();
        let options = ReadOptions {
            encoding: TextEncoding::Utf8,
            ..Default::default()
        };
        assert!(matches!(
            doc.read_from(&latin, &options, &codecs),
            Err(DocumentError::DecodingFailure { .. })
        ));
        assert_eq!(doc.file_path(), None);
    }

    #[test]
    fn test_ignore_rich_text_opens_source_as_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styled.rtf");
        fs::write(&path, r"{\rtf1 styled}").unwrap();
        let options = ReadOptions {
            ignore_rich_formatting: true,
            ..Default::default()
        };
        let codecs = CodecRegistry::default();
        let mut doc = Document::open(DocumentId(1), &path, &options, &prefs(), &codecs).unwrap();
        assert!(doc.is_opened_ignoring_rich_text());
        assert!(!doc.is_rich_text());
        assert_eq!(doc.file_format(), DocumentFormat::PlainText);
        assert_eq!(doc.text(), r"{\rtf1 styled}");

        doc.revert(&codecs).unwrap();
        assert!(doc.is_opened_ignoring_rich_text());
        assert_eq!(doc.text(), r"{\rtf1 styled}");
    }

    #[test]
    fn test_revert_discards_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "original").unwrap();
        let codecs = CodecRegistry::default();
        let mut doc = Document::open(DocumentId(1), &path, &ReadOptions::default(), &prefs(), &codecs).unwrap();
        doc.set_text("changed").unwrap();
        doc.revert(&codecs).unwrap();
        assert_eq!(doc.text(), "original");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_save_to_keeps_location() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.txt");
        let export = dir.path().join("a.html");
        fs::write(&original, "text").unwrap();
        let codecs = CodecRegistry::default();
        let prefs = prefs();
        let mut doc = Document::open(DocumentId(1), &original, &ReadOptions::default(), &prefs, &codecs).unwrap();
        doc.insert(4, "!").unwrap();
        doc.write_to(&export, DocumentFormat::Html, SaveOperation::SaveTo, &prefs, &codecs)
            .unwrap();
        assert_eq!(doc.file_path(), Some(original.as_path()));
        assert!(doc.is_dirty());
        assert!(fs::read_to_string(&export).unwrap().contains("text!"));
    }

    #[test]
    fn test_save_without_location() {
        let mut doc = untitled();
        assert!(matches!(
            doc.save(true, &prefs(), &CodecRegistry::default()),
            Err(DocumentError::NoLocation)
        ));
    }

    #[test]
    fn test_toggle_rich_loses_information() {
        let mut doc = untitled();
        assert!(doc.toggle_rich_will_lose_information());
        doc.clear_document_properties();
        assert!(!doc.toggle_rich_will_lose_information());
        doc.set_background_color(Color::rgb(0, 0, 0));
        assert!(doc.toggle_rich_will_lose_information());

        doc.set_rich_text(false, &prefs()).unwrap();
        assert!(!doc.is_rich_text());
        assert_eq!(doc.background_color(), Color::WHITE);
        assert!(!doc.toggle_rich_will_lose_information());

        doc.set_rich_text(true, &prefs()).unwrap();
        assert_eq!(doc.properties().company.as_deref(), Some("Analytical Engines"));
    }

    #[test]
    fn test_default_text_attributes() {
        let doc = untitled();
        let prefs = prefs();
        assert_eq!(doc.default_text_attributes(true, &prefs).font, prefs.rich_text_font);
        let plain = doc.default_text_attributes(false, &prefs);
        assert_eq!(plain.font, prefs.plain_text_font);
        assert_eq!(plain.tab_width, 8);
    }

    #[test]
    fn test_apply_default_text_attributes() {
        let mut doc = untitled();
        let prefs = prefs();
        assert_eq!(doc.text_attributes().font, prefs.rich_text_font);
        doc.set_read_only(true);
        doc.apply_default_text_attributes(false, &prefs);
        assert_eq!(doc.text_attributes(), &doc.default_text_attributes(false, &prefs));
        assert_eq!(doc.text_attributes().font, prefs.plain_text_font);
    }

    #[test]
    fn test_switching_to_plain_applies_plain_attributes() {
        let mut doc = untitled();
        let prefs = prefs();
        doc.set_rich_text(false, &prefs).unwrap();
        assert_eq!(doc.text_attributes().font, prefs.plain_text_font);
    }

    #[test]
    fn test_orientation_sections_survive_rtf_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tategaki.rtf");
        let codecs = CodecRegistry::default();
        let prefs = prefs();

        let mut doc = untitled();
        doc.set_text("縦書き").unwrap();
        let sections = vec![OrientationSection::new(TextOrientation::Vertical, 0..doc.text().len())];
        doc.set_original_orientation_sections(sections.clone());
        doc.write_to(&path, DocumentFormat::RichText, SaveOperation::SaveAs, &prefs, &codecs)
            .unwrap();

        let reopened = Document::open(DocumentId(2), &path, &ReadOptions::default(), &prefs, &codecs).unwrap();
        assert_eq!(reopened.original_orientation_sections(), sections.as_slice());
        assert_eq!(reopened.text_attributes().font, prefs.rich_text_font);
    }

    #[test]
    fn test_page_toggles_and_scale() {
        let mut doc = untitled();
        doc.toggle_page_breaks();
        assert!(doc.has_multiple_pages());
        assert!(!doc.set_scale_factor(0.0));
        assert!(!doc.set_scale_factor(f64::NAN));
        assert!(doc.set_scale_factor(1.5));
        assert_eq!(doc.scale_factor(), 1.5);
    }
}
