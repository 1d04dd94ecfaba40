use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::encoding::TextEncoding;
use crate::app::infrastructure::error::AppError;
use crate::app::infrastructure::paths;

/// A font by family name and point size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(name: &str, size: f64) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

/// Doctype flags for HTML export, stored as two booleans but surfaced as a
/// single pop-up tag.
pub const HTML_DOCTYPE_TRANSITIONAL: u8 = 1 << 0;
pub const HTML_DOCTYPE_XHTML: u8 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlStylingMode {
    EmbeddedCss = 0,
    InlineCss = 1,
    NoCss = 2,
}

impl HtmlStylingMode {
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(Self::EmbeddedCss),
            1 => Some(Self::InlineCss),
            2 => Some(Self::NoCss),
            _ => None,
        }
    }
}

/// Every persisted setting, by its on-disk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    RichText,
    ShowPageBreaks,
    AddExtensionToNewPlainTextFiles,
    WindowWidth,
    WindowHeight,
    PlainTextEncodingForRead,
    PlainTextEncodingForWrite,
    IgnoreRichText,
    IgnoreHtml,
    TabWidth,
    ForegroundLayoutToIndex,
    OpenPanelFollowsMainWindow,
    CheckSpellingAsYouType,
    CheckGrammarWithSpelling,
    CorrectSpellingAutomatically,
    ShowRuler,
    SmartCopyPaste,
    SmartQuotes,
    SmartDashes,
    SmartLinks,
    DataDetectors,
    TextReplacement,
    SubstitutionsEnabledInRichTextOnly,
    UseXhtmlDocType,
    UseTransitionalDocType,
    UseEmbeddedCss,
    UseInlineCss,
    HtmlEncoding,
    PreserveWhitespace,
    AutosavingDelay,
    NumberPagesWhenPrinting,
    WrapToFitWhenPrinting,
    UseScreenFonts,
    Author,
    Company,
    Copyright,
    RichTextFont,
    PlainTextFont,
}

impl PreferenceKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RichText => "RichText",
            Self::ShowPageBreaks => "ShowPageBreaks",
            Self::AddExtensionToNewPlainTextFiles => "AddExtensionToNewPlainTextFiles",
            Self::WindowWidth => "WidthInChars",
            Self::WindowHeight => "HeightInChars",
            Self::PlainTextEncodingForRead => "PlainTextEncoding",
            Self::PlainTextEncodingForWrite => "PlainTextEncodingForWrite",
            Self::IgnoreRichText => "IgnoreRichText",
            Self::IgnoreHtml => "IgnoreHTML",
            Self::TabWidth => "TabWidth",
            Self::ForegroundLayoutToIndex => "ForegroundLayoutToIndex",
            Self::OpenPanelFollowsMainWindow => "OpenPanelFollowsMainWindow",
            Self::CheckSpellingAsYouType => "CheckSpellingWhileTyping",
            Self::CheckGrammarWithSpelling => "CheckGrammarWithSpelling",
            Self::CorrectSpellingAutomatically => "CorrectSpellingAutomatically",
            Self::ShowRuler => "ShowRuler",
            Self::SmartCopyPaste => "SmartCopyPaste",
            Self::SmartQuotes => "SmartQuotes",
            Self::SmartDashes => "SmartDashes",
            Self::SmartLinks => "SmartLinks",
            Self::DataDetectors => "DataDetectors",
            Self::TextReplacement => "TextReplacement",
            Self::SubstitutionsEnabledInRichTextOnly => "SubstitutionsEnabledInRichTextOnly",
            Self::UseXhtmlDocType => "UseXHTMLDocType",
            Self::UseTransitionalDocType => "UseTransitionalDocType",
            Self::UseEmbeddedCss => "UseEmbeddedCSS",
            Self::UseInlineCss => "UseInlineCSS",
            Self::HtmlEncoding => "HTMLEncoding",
            Self::PreserveWhitespace => "PreserveWhitespace",
            Self::AutosavingDelay => "AutosavingDelay",
            Self::NumberPagesWhenPrinting => "NumberPagesWhenPrinting",
            Self::WrapToFitWhenPrinting => "WrapToFitWhenPrinting",
            Self::UseScreenFonts => "UseScreenFonts",
            Self::Author => "author",
            Self::Company => "company",
            Self::Copyright => "copyright",
            Self::RichTextFont => "RichTextFont",
            Self::PlainTextFont => "PlainTextFont",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }

    pub fn all() -> &'static [PreferenceKey] {
        &[
            Self::RichText,
            Self::ShowPageBreaks,
            Self::AddExtensionToNewPlainTextFiles,
            Self::WindowWidth,
            Self::WindowHeight,
            Self::PlainTextEncodingForRead,
            Self::PlainTextEncodingForWrite,
            Self::IgnoreRichText,
            Self::IgnoreHtml,
            Self::TabWidth,
            Self::ForegroundLayoutToIndex,
            Self::OpenPanelFollowsMainWindow,
            Self::CheckSpellingAsYouType,
            Self::CheckGrammarWithSpelling,
            Self::CorrectSpellingAutomatically,
            Self::ShowRuler,
            Self::SmartCopyPaste,
            Self::SmartQuotes,
            Self::SmartDashes,
            Self::SmartLinks,
            Self::DataDetectors,
            Self::TextReplacement,
            Self::SubstitutionsEnabledInRichTextOnly,
            Self::UseXhtmlDocType,
            Self::UseTransitionalDocType,
            Self::UseEmbeddedCss,
            Self::UseInlineCss,
            Self::HtmlEncoding,
            Self::PreserveWhitespace,
            Self::AutosavingDelay,
            Self::NumberPagesWhenPrinting,
            Self::WrapToFitWhenPrinting,
            Self::UseScreenFonts,
            Self::Author,
            Self::Company,
            Self::Copyright,
            Self::RichTextFont,
            Self::PlainTextFont,
        ]
    }
}

/// A single setting value, as seen through the key/value interface.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceValue {
    Bool(bool),
    Int(u32),
    Text(String),
    Encoding(TextEncoding),
    Font(FontSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "RichText", default = "default_true")]
    pub rich_text: bool,

    #[serde(rename = "ShowPageBreaks", default)]
    pub show_page_breaks: bool,

    #[serde(rename = "AddExtensionToNewPlainTextFiles", default = "default_true")]
    pub add_extension_to_new_plain_text_files: bool,

    #[serde(rename = "WidthInChars", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "HeightInChars", default = "default_window_height")]
    pub window_height: u32,

    #[serde(rename = "PlainTextEncoding", default)]
    pub plain_text_encoding_for_read: TextEncoding,

    #[serde(rename = "PlainTextEncodingForWrite", default)]
    pub plain_text_encoding_for_write: TextEncoding,

    #[serde(rename = "IgnoreRichText", default)]
    pub ignore_rich_text: bool,

    #[serde(rename = "IgnoreHTML", default)]
    pub ignore_html: bool,

    #[serde(rename = "TabWidth", default = "default_tab_width")]
    pub tab_width: u32,

    #[serde(rename = "ForegroundLayoutToIndex", default = "default_foreground_layout")]
    pub foreground_layout_to_index: u32,

    #[serde(rename = "OpenPanelFollowsMainWindow", default)]
    pub open_panel_follows_main_window: bool,

    #[serde(rename = "CheckSpellingWhileTyping", default = "default_true")]
    pub check_spelling_as_you_type: bool,

    #[serde(rename = "CheckGrammarWithSpelling", default)]
    pub check_grammar_with_spelling: bool,

    #[serde(rename = "CorrectSpellingAutomatically", default)]
    pub correct_spelling_automatically: bool,

    #[serde(rename = "ShowRuler", default = "default_true")]
    pub show_ruler: bool,

    #[serde(rename = "SmartCopyPaste", default = "default_true")]
    pub smart_copy_paste: bool,

    #[serde(rename = "SmartQuotes", default = "default_true")]
    pub smart_quotes: bool,

    #[serde(rename = "SmartDashes", default = "default_true")]
    pub smart_dashes: bool,

    #[serde(rename = "SmartLinks", default)]
    pub smart_links: bool,

    #[serde(rename = "DataDetectors", default)]
    pub data_detectors: bool,

    #[serde(rename = "TextReplacement", default = "default_true")]
    pub text_replacement: bool,

    #[serde(rename = "SubstitutionsEnabledInRichTextOnly", default = "default_true")]
    pub substitutions_enabled_in_rich_text_only: bool,

    #[serde(rename = "UseXHTMLDocType", default)]
    pub use_xhtml_doc_type: bool,

    #[serde(rename = "UseTransitionalDocType", default)]
    pub use_transitional_doc_type: bool,

    #[serde(rename = "UseEmbeddedCSS", default = "default_true")]
    pub use_embedded_css: bool,

    #[serde(rename = "UseInlineCSS", default)]
    pub use_inline_css: bool,

    #[serde(rename = "HTMLEncoding", default)]
    pub html_encoding: TextEncoding,

    #[serde(rename = "PreserveWhitespace", default = "default_true")]
    pub preserve_whitespace: bool,

    /// Seconds between autosaves; 0 disables autosaving.
    #[serde(rename = "AutosavingDelay", default = "default_autosaving_delay")]
    pub autosaving_delay: u32,

    #[serde(rename = "NumberPagesWhenPrinting", default)]
    pub number_pages_when_printing: bool,

    #[serde(rename = "WrapToFitWhenPrinting", default)]
    pub wrap_to_fit_when_printing: bool,

    #[serde(rename = "UseScreenFonts", default)]
    pub use_screen_fonts: bool,

    #[serde(rename = "author", default)]
    pub author: String,

    #[serde(rename = "company", default)]
    pub company: String,

    #[serde(rename = "copyright", default)]
    pub copyright: String,

    #[serde(rename = "RichTextFont", default = "default_rich_text_font")]
    pub rich_text_font: FontSpec,

    #[serde(rename = "PlainTextFont", default = "default_plain_text_font")]
    pub plain_text_font: FontSpec,
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    75
}

fn default_window_height() -> u32 {
    30
}

fn default_tab_width() -> u32 {
    8
}

fn default_foreground_layout() -> u32 {
    25_000
}

fn default_autosaving_delay() -> u32 {
    30
}

fn default_rich_text_font() -> FontSpec {
    FontSpec::new("Helvetica", 12.0)
}

fn default_plain_text_font() -> FontSpec {
    FontSpec::new("Menlo", 11.0)
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            rich_text: true,
            show_page_breaks: false,
            add_extension_to_new_plain_text_files: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            plain_text_encoding_for_read: TextEncoding::Automatic,
            plain_text_encoding_for_write: TextEncoding::Automatic,
            ignore_rich_text: false,
            ignore_html: false,
            tab_width: default_tab_width(),
            foreground_layout_to_index: default_foreground_layout(),
            open_panel_follows_main_window: false,
            check_spelling_as_you_type: true,
            check_grammar_with_spelling: false,
            correct_spelling_automatically: false,
            show_ruler: true,
            smart_copy_paste: true,
            smart_quotes: true,
            smart_dashes: true,
            smart_links: false,
            data_detectors: false,
            text_replacement: true,
            substitutions_enabled_in_rich_text_only: true,
            use_xhtml_doc_type: false,
            use_transitional_doc_type: false,
            use_embedded_css: true,
            use_inline_css: false,
            html_encoding: TextEncoding::Automatic,
            preserve_whitespace: true,
            autosaving_delay: default_autosaving_delay(),
            number_pages_when_printing: false,
            wrap_to_fit_when_printing: false,
            use_screen_fonts: false,
            author: String::new(),
            company: String::new(),
            copyright: String::new(),
            rich_text_font: default_rich_text_font(),
            plain_text_font: default_plain_text_font(),
        }
    }
}

impl Preferences {
    /// Read a setting through the key/value interface.
    pub fn value(&self, key: PreferenceKey) -> PreferenceValue {
        use PreferenceKey as K;
        use PreferenceValue as V;
        match key {
            K::RichText => V::Bool(self.rich_text),
            K::ShowPageBreaks => V::Bool(self.show_page_breaks),
            K::AddExtensionToNewPlainTextFiles => V::Bool(self.add_extension_to_new_plain_text_files),
            K::WindowWidth => V::Int(self.window_width),
            K::WindowHeight => V::Int(self.window_height),
            K::PlainTextEncodingForRead => V::Encoding(self.plain_text_encoding_for_read),
            K::PlainTextEncodingForWrite => V::Encoding(self.plain_text_encoding_for_write),
            K::IgnoreRichText => V::Bool(self.ignore_rich_text),
            K::IgnoreHtml => V::Bool(self.ignore_html),
            K::TabWidth => V::Int(self.tab_width),
            K::ForegroundLayoutToIndex => V::Int(self.foreground_layout_to_index),
            K::OpenPanelFollowsMainWindow => V::Bool(self.open_panel_follows_main_window),
            K::CheckSpellingAsYouType => V::Bool(self.check_spelling_as_you_type),
            K::CheckGrammarWithSpelling => V::Bool(self.check_grammar_with_spelling),
            K::CorrectSpellingAutomatically => V::Bool(self.correct_spelling_automatically),
            K::ShowRuler => V::Bool(self.show_ruler),
            K::SmartCopyPaste => V::Bool(self.smart_copy_paste),
            K::SmartQuotes => V::Bool(self.smart_quotes),
            K::SmartDashes => V::Bool(self.smart_dashes),
            K::SmartLinks => V::Bool(self.smart_links),
            K::DataDetectors => V::Bool(self.data_detectors),
            K::TextReplacement => V::Bool(self.text_replacement),
            K::SubstitutionsEnabledInRichTextOnly => V::Bool(self.substitutions_enabled_in_rich_text_only),
            K::UseXhtmlDocType => V::Bool(self.use_xhtml_doc_type),
            K::UseTransitionalDocType => V::Bool(self.use_transitional_doc_type),
            K::UseEmbeddedCss => V::Bool(self.use_embedded_css),
            K::UseInlineCss => V::Bool(self.use_inline_css),
            K::HtmlEncoding => V::Encoding(self.html_encoding),
            K::PreserveWhitespace => V::Bool(self.preserve_whitespace),
            K::AutosavingDelay => V::Int(self.autosaving_delay),
            K::NumberPagesWhenPrinting => V::Bool(self.number_pages_when_printing),
            K::WrapToFitWhenPrinting => V::Bool(self.wrap_to_fit_when_printing),
            K::UseScreenFonts => V::Bool(self.use_screen_fonts),
            K::Author => V::Text(self.author.clone()),
            K::Company => V::Text(self.company.clone()),
            K::Copyright => V::Text(self.copyright.clone()),
            K::RichTextFont => V::Font(self.rich_text_font.clone()),
            K::PlainTextFont => V::Font(self.plain_text_font.clone()),
        }
    }

    /// Write a setting through the key/value interface. The value's kind must
    /// match the key's.
    pub fn set_value(&mut self, key: PreferenceKey, value: PreferenceValue) -> Result<(), AppError> {
        use PreferenceKey as K;
        use PreferenceValue as V;
        match (key, value) {
            (K::RichText, V::Bool(v)) => self.rich_text = v,
            (K::ShowPageBreaks, V::Bool(v)) => self.show_page_breaks = v,
            (K::AddExtensionToNewPlainTextFiles, V::Bool(v)) => self.add_extension_to_new_plain_text_files = v,
            (K::WindowWidth, V::Int(v)) => self.window_width = v,
            (K::WindowHeight, V::Int(v)) => self.window_height = v,
            (K::PlainTextEncodingForRead, V::Encoding(v)) => self.plain_text_encoding_for_read = v,
            (K::PlainTextEncodingForWrite, V::Encoding(v)) => self.plain_text_encoding_for_write = v,
            (K::IgnoreRichText, V::Bool(v)) => self.ignore_rich_text = v,
            (K::IgnoreHtml, V::Bool(v)) => self.ignore_html = v,
            (K::TabWidth, V::Int(v)) => self.tab_width = v,
            (K::ForegroundLayoutToIndex, V::Int(v)) => self.foreground_layout_to_index = v,
            (K::OpenPanelFollowsMainWindow, V::Bool(v)) => self.open_panel_follows_main_window = v,
            (K::CheckSpellingAsYouType, V::Bool(v)) => self.check_spelling_as_you_type = v,
            (K::CheckGrammarWithSpelling, V::Bool(v)) => self.check_grammar_with_spelling = v,
            (K::CorrectSpellingAutomatically, V::Bool(v)) => self.correct_spelling_automatically = v,
            (K::ShowRuler, V::Bool(v)) => self.show_ruler = v,
            (K::SmartCopyPaste, V::Bool(v)) => self.smart_copy_paste = v,
            (K::SmartQuotes, V::Bool(v)) => self.smart_quotes = v,
            (K::SmartDashes, V::Bool(v)) => self.smart_dashes = v,
            (K::SmartLinks, V::Bool(v)) => self.smart_links = v,
            (K::DataDetectors, V::Bool(v)) => self.data_detectors = v,
            (K::TextReplacement, V::Bool(v)) => self.text_replacement = v,
            (K::SubstitutionsEnabledInRichTextOnly, V::Bool(v)) => self.substitutions_enabled_in_rich_text_only = v,
            (K::UseXhtmlDocType, V::Bool(v)) => self.use_xhtml_doc_type = v,
            (K::UseTransitionalDocType, V::Bool(v)) => self.use_transitional_doc_type = v,
            (K::UseEmbeddedCss, V::Bool(v)) => self.use_embedded_css = v,
            (K::UseInlineCss, V::Bool(v)) => self.use_inline_css = v,
            (K::HtmlEncoding, V::Encoding(v)) => self.html_encoding = v,
            (K::PreserveWhitespace, V::Bool(v)) => self.preserve_whitespace = v,
            (K::AutosavingDelay, V::Int(v)) => self.autosaving_delay = v,
            (K::NumberPagesWhenPrinting, V::Bool(v)) => self.number_pages_when_printing = v,
            (K::WrapToFitWhenPrinting, V::Bool(v)) => self.wrap_to_fit_when_printing = v,
            (K::UseScreenFonts, V::Bool(v)) => self.use_screen_fonts = v,
            (K::Author, V::Text(v)) => self.author = v,
            (K::Company, V::Text(v)) => self.company = v,
            (K::Copyright, V::Text(v)) => self.copyright = v,
            (K::RichTextFont, V::Font(v)) => self.rich_text_font = v,
            (K::PlainTextFont, V::Font(v)) => self.plain_text_font = v,
            (key, value) => {
                return Err(AppError::Settings(format!(
                    "{} cannot hold {:?}",
                    key.name(),
                    value
                )));
            }
        }
        Ok(())
    }

    /// Doctype flags combined into one pop-up tag.
    pub fn html_document_type_options(&self) -> u8 {
        let mut options = 0;
        if self.use_transitional_doc_type {
            options |= HTML_DOCTYPE_TRANSITIONAL;
        }
        if self.use_xhtml_doc_type {
            options |= HTML_DOCTYPE_XHTML;
        }
        options
    }

    pub fn set_html_document_type_options(&mut self, options: u8) {
        self.use_transitional_doc_type = options & HTML_DOCTYPE_TRANSITIONAL != 0;
        self.use_xhtml_doc_type = options & HTML_DOCTYPE_XHTML != 0;
    }

    pub fn html_styling_mode(&self) -> HtmlStylingMode {
        if self.use_embedded_css {
            HtmlStylingMode::EmbeddedCss
        } else if self.use_inline_css {
            HtmlStylingMode::InlineCss
        } else {
            HtmlStylingMode::NoCss
        }
    }

    pub fn set_html_styling_mode(&mut self, mode: HtmlStylingMode) {
        self.use_embedded_css = mode == HtmlStylingMode::EmbeddedCss;
        self.use_inline_css = mode == HtmlStylingMode::InlineCss;
    }

    /// Load preferences from the default location, or create defaults if missing
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    /// Load preferences from `path`. A missing file yields defaults (which are
    /// written back); an unreadable or unparsable one yields defaults and is
    /// left untouched.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(e) => {
                    log::warn!("Failed to parse preferences: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    log::debug!("Could not write default preferences to {}: {}", path.display(), e);
                }
                default
            }
            Err(e) => {
                log::warn!("Failed to read preferences from {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save preferences to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        paths::preferences_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert!(prefs.rich_text);
        assert_eq!(prefs.window_width, 75);
        assert_eq!(prefs.window_height, 30);
        assert_eq!(prefs.tab_width, 8);
        assert_eq!(prefs.autosaving_delay, 30);
        assert_eq!(prefs.plain_text_encoding_for_read, TextEncoding::Automatic);
        assert_eq!(prefs.html_styling_mode(), HtmlStylingMode::EmbeddedCss);
        assert!(prefs.author.is_empty());
    }

    #[test]
    fn test_serde_defaults_match_default_impl() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_on_disk_key_names() {
        let json = serde_json::to_string(&Preferences::default()).unwrap();
        for key in PreferenceKey::all() {
            assert!(json.contains(&format!("\"{}\"", key.name())), "missing {}", key.name());
        }
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"WidthInChars": 100, "author": "Ada"}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.window_width, 100);
        assert_eq!(prefs.author, "Ada");
        assert_eq!(prefs.window_height, 30);
    }

    #[test]
    fn test_key_value_interface() {
        let mut prefs = Preferences::default();
        prefs
            .set_value(PreferenceKey::TabWidth, PreferenceValue::Int(4))
            .unwrap();
        assert_eq!(prefs.value(PreferenceKey::TabWidth), PreferenceValue::Int(4));

        let err = prefs
            .set_value(PreferenceKey::TabWidth, PreferenceValue::Bool(true))
            .unwrap_err();
        assert!(err.to_string().contains("TabWidth"));
        assert_eq!(prefs.tab_width, 4);
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in PreferenceKey::all() {
            assert_eq!(PreferenceKey::from_name(key.name()), Some(*key));
        }
        assert_eq!(PreferenceKey::from_name("Nope"), None);
    }

    #[test]
    fn test_html_doctype_options() {
        let mut prefs = Preferences::default();
        prefs.set_html_document_type_options(HTML_DOCTYPE_XHTML | HTML_DOCTYPE_TRANSITIONAL);
        assert!(prefs.use_xhtml_doc_type);
        assert!(prefs.use_transitional_doc_type);
        assert_eq!(prefs.html_document_type_options(), 3);
        prefs.set_html_document_type_options(0);
        assert_eq!(prefs.html_document_type_options(), 0);
    }

    #[test]
    fn test_html_styling_mode() {
        let mut prefs = Preferences::default();
        prefs.set_html_styling_mode(HtmlStylingMode::NoCss);
        assert!(!prefs.use_embedded_css);
        assert!(!prefs.use_inline_css);
        assert_eq!(prefs.html_styling_mode(), HtmlStylingMode::NoCss);
        prefs.set_html_styling_mode(HtmlStylingMode::InlineCss);
        assert_eq!(prefs.html_styling_mode(), HtmlStylingMode::InlineCss);
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences::load_from(&path);
        assert_eq!(prefs, Preferences::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Preferences::load_from(&path), Preferences::default());
    }

    #[test]
    fn test_load_unreadable_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let bytes = b"{\"author\": \"Jos\xE9\", \"TabWidth\": 4}".to_vec();
        fs::write(&path, &bytes).unwrap();

        assert_eq!(Preferences::load_from(&path), Preferences::default());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let prefs = Preferences {
            company: "Initech".to_string(),
            smart_quotes: false,
            ..Default::default()
        };
        prefs.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path), prefs);
    }
}
