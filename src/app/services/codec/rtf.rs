use std::fmt::Write as _;

use super::{DecodeOptions, DecodedDocument, DocumentAttributes, DocumentCodec, EncodeOptions};
use crate::app::domain::format::DocumentFormat;
use crate::app::domain::geometry::{Color, OrientationSection, TextOrientation};
use crate::app::domain::properties::{DocumentProperties, join_keywords, split_keywords};
use crate::app::infrastructure::error::DocumentError;

/// RTF reader/writer covering plain paragraphs, the `\info` group and the
/// document-level page, view and hyphenation controls. Character formatting
/// is not modelled; embedded pictures, objects and unknown ignorable
/// destinations are dropped and flag the read as lossy.
///
/// `\hyphfactor` carries a whole percentage, so the hyphenation factor is
/// rounded to two decimals on the way through (0.333 reads back as 0.33).
/// Keywords share one `\keywords` field; commas inside a keyword are
/// backslash-escaped (see `join_keywords`). Orientation is document-wide in
/// RTF: the first section's orientation is written and a read yields one
/// section spanning the text.
pub struct RtfCodec;

impl DocumentCodec for RtfCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::RichText
    }

    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedDocument, DocumentError> {
        if options.ignore_rich_formatting {
            let (text, encoding) = options.encoding.decode(bytes)?;
            return Ok(DecodedDocument::plain(text, encoding));
        }
        let mut decoded = RtfReader::new(bytes).parse()?;
        decoded.encoding = options.encoding;
        Ok(decoded)
    }

    fn encode(
        &self,
        text: &str,
        attributes: &DocumentAttributes,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, DocumentError> {
        Ok(write_rtf(text, attributes, options).into_bytes())
    }
}

fn to_twips(points: f64) -> i64 {
    (points * 20.0).round() as i64
}

fn from_twips(param: Option<i32>) -> f64 {
    param.unwrap_or(0) as f64 / 20.0
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\\n"),
            '\t' => out.push_str("\\tab "),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\'{:02x}", c as u32);
            }
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }
}

fn write_info(out: &mut String, props: &DocumentProperties) {
    if !props.has_document_properties() {
        return;
    }
    let keywords = join_keywords(&props.keywords);
    let fields: [(&str, Option<&str>); 7] = [
        ("\\title", props.title.as_deref()),
        ("\\author", props.author.as_deref()),
        ("\\subject", props.subject.as_deref()),
        ("\\doccomm", props.comment.as_deref()),
        ("\\keywords", (!keywords.is_empty()).then_some(keywords.as_str())),
        ("\\*\\company", props.company.as_deref()),
        ("\\*\\copyright", props.copyright.as_deref()),
    ];
    out.push_str("{\\info\n");
    for (word, value) in fields {
        if let Some(value) = value {
            let _ = write!(out, "{{{} ", word);
            escape_into(out, value);
            out.push_str("}\n");
        }
    }
    out.push_str("}\n");
}

fn write_rtf(text: &str, attrs: &DocumentAttributes, options: &EncodeOptions) -> String {
    let mut out = String::with_capacity(text.len() + 256);
    out.push_str("{\\rtf1\\ansi\\ansicpg1252\\uc1\\deff0\n");
    out.push_str("{\\fonttbl\\f0\\fnil ");
    escape_into(&mut out, &options.font_name);
    out.push_str(";}\n");
    write_info(&mut out, &attrs.properties);

    let bg = attrs.background_color;
    if bg != Color::WHITE {
        let _ = writeln!(
            out,
            "{{\\*\\background\\red{}\\green{}\\blue{}\\alpha{}}}",
            bg.r, bg.g, bg.b, bg.a
        );
    }

    let _ = write!(
        out,
        "\\paperw{}\\paperh{}",
        to_twips(attrs.paper_size.width),
        to_twips(attrs.paper_size.height)
    );
    if !attrs.view_size.is_zero() {
        let _ = write!(
            out,
            "\\vieww{}\\viewh{}",
            to_twips(attrs.view_size.width),
            to_twips(attrs.view_size.height)
        );
    }
    let _ = write!(out, "\\viewkind{}", if attrs.has_multiple_pages { 1 } else { 0 });
    if let Some(section) = attrs.orientation_sections.first() {
        out.push_str(match section.orientation {
            TextOrientation::Horizontal => "\\horzdoc",
            TextOrientation::Vertical => "\\vertdoc",
        });
    }
    if attrs.scale_factor != 1.0 {
        let _ = write!(out, "\\viewscale{}", (attrs.scale_factor * 100.0).round() as i64);
    }
    if attrs.hyphenation_factor > 0.0 {
        let _ = write!(
            out,
            "\\hyphauto1\\hyphfactor{}",
            (attrs.hyphenation_factor * 100.0).round() as i64
        );
    }
    if attrs.read_only {
        out.push_str("\\readonlydoc1");
    }
    if attrs.uses_screen_fonts {
        out.push_str("\\cocoascreenfonts1");
    }
    let _ = writeln!(out, "\n\\pard\\f0\\fs{}", (options.font_size * 2.0).round() as i64);
    escape_into(&mut out, text);
    out.push('}');
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
    Title,
    Author,
    Subject,
    Comment,
    Keywords,
    Company,
    Copyright,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Body,
    Info,
    Field(InfoField),
    Background,
    Skip,
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    dest: Destination,
    uc: usize,
}

struct RtfReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    stack: Vec<GroupState>,
    state: GroupState,
    group_fresh: bool,
    ignorable: bool,
    skip_chars: usize,
    pending_high: Option<u16>,
    text: String,
    field_buf: String,
    attrs: DocumentAttributes,
    background: Option<[u8; 4]>,
    hyph_auto: bool,
    orientation: Option<TextOrientation>,
    code_page: u16,
    lossy: bool,
}

/// Characters for Windows-1252 bytes 0x80..=0x9F. Unassigned slots keep the
/// byte value.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize],
        b => b as char,
    }
}

fn malformed(detail: &str) -> DocumentError {
    DocumentError::DecodingFailure {
        encoding: crate::app::domain::encoding::TextEncoding::Ascii,
        detail: format!("malformed RTF: {}", detail),
    }
}

impl<'a> RtfReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            stack: Vec::new(),
            state: GroupState {
                dest: Destination::Body,
                uc: 1,
            },
            group_fresh: false,
            ignorable: false,
            skip_chars: 0,
            pending_high: None,
            text: String::new(),
            field_buf: String::new(),
            attrs: DocumentAttributes::default(),
            background: None,
            hyph_auto: false,
            orientation: None,
            code_page: 1252,
            lossy: false,
        }
    }

    fn parse(mut self) -> Result<DecodedDocument, DocumentError> {
        if !self.bytes.starts_with(b"{\\rtf") {
            return Err(malformed("missing {\\rtf header"));
        }
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            self.pos += 1;
            match b {
                b'{' => {
                    self.stack.push(self.state);
                    self.group_fresh = true;
                    self.ignorable = false;
                }
                b'}' => {
                    self.end_group()?;
                    if self.stack.is_empty() {
                        break;
                    }
                }
                b'\\' => self.control()?,
                b'\r' | b'\n' => {}
                _ => {
                    self.group_fresh = false;
                    self.emit_byte(b);
                }
            }
        }
        if !self.stack.is_empty() {
            return Err(malformed("unexpected end of stream"));
        }
        self.finish()
    }

    fn finish(mut self) -> Result<DecodedDocument, DocumentError> {
        if let Some([r, g, b, a]) = self.background {
            self.attrs.background_color = Color { r, g, b, a };
        }
        if !self.hyph_auto {
            self.attrs.hyphenation_factor = 0.0;
        }
        if self.pending_high.is_some() {
            self.text.push('\u{FFFD}');
        }
        if let Some(orientation) = self.orientation {
            self.attrs.orientation_sections = vec![OrientationSection::new(orientation, 0..self.text.len())];
        }
        Ok(DecodedDocument {
            text: self.text,
            attributes: self.attrs,
            encoding: Default::default(),
            is_rich: true,
            lossy: self.lossy,
            converted: false,
        })
    }

    fn end_group(&mut self) -> Result<(), DocumentError> {
        let closing = self.state.dest;
        self.state = self.stack.pop().ok_or_else(|| malformed("unbalanced closing brace"))?;
        self.skip_chars = 0;
        self.group_fresh = false;
        if let Destination::Field(field) = closing {
            if self.state.dest != closing {
                let value = std::mem::take(&mut self.field_buf);
                self.commit_field(field, value);
            }
        }
        Ok(())
    }

    fn commit_field(&mut self, field: InfoField, value: String) {
        let props = &mut self.attrs.properties;
        let value = if value.is_empty() { None } else { Some(value) };
        match field {
            InfoField::Title => props.title = value,
            InfoField::Author => props.author = value,
            InfoField::Subject => props.subject = value,
            InfoField::Comment => props.comment = value,
            InfoField::Company => props.company = value,
            InfoField::Copyright => props.copyright = value,
            InfoField::Keywords => props.keywords = value.as_deref().map(split_keywords).unwrap_or_default(),
        }
    }

    fn control(&mut self) -> Result<(), DocumentError> {
        let Some(&c) = self.bytes.get(self.pos) else {
            return Err(malformed("dangling backslash"));
        };
        if c.is_ascii_alphabetic() {
            let start = self.pos;
            while self.bytes.get(self.pos).is_some_and(u8::is_ascii_alphabetic) {
                self.pos += 1;
            }
            let word: String = self.bytes[start..self.pos].iter().map(|&b| b as char).collect();

            let negative = self.bytes.get(self.pos) == Some(&b'-')
                && self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit);
            if negative {
                self.pos += 1;
            }
            let digits_start = self.pos;
            let mut value: i64 = 0;
            while let Some(d) = self.bytes.get(self.pos).filter(|b| b.is_ascii_digit()) {
                value = value.saturating_mul(10).saturating_add((d - b'0') as i64);
                self.pos += 1;
            }
            let param = (self.pos > digits_start).then(|| {
                let v = if negative { -value } else { value };
                v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
            });
            if self.bytes.get(self.pos) == Some(&b' ') {
                self.pos += 1;
            }
            self.word(&word, param);
            self.group_fresh = false;
            return Ok(());
        }

        self.pos += 1;
        match c {
            b'\\' | b'{' | b'}' => self.emit_char(c as char),
            b'~' => self.emit_char('\u{A0}'),
            b'_' => self.emit_char('\u{2011}'),
            b'\n' | b'\r' => self.push_text('\n'),
            b'*' => {
                self.ignorable = true;
                return Ok(());
            }
            b'\'' => {
                let hex = self
                    .bytes
                    .get(self.pos..self.pos + 2)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| malformed("bad \\' escape"))?;
                self.pos += 2;
                self.emit_byte(hex);
            }
            _ => {}
        }
        self.group_fresh = false;
        Ok(())
    }

    fn enter_field(&mut self, field: InfoField) {
        if self.state.dest == Destination::Info {
            self.state.dest = Destination::Field(field);
            self.field_buf.clear();
        } else {
            self.state.dest = Destination::Skip;
        }
    }

    fn word(&mut self, word: &str, param: Option<i32>) {
        let ignorable = std::mem::take(&mut self.ignorable);
        let fresh = self.group_fresh;
        match word {
            "info" => self.state.dest = Destination::Info,
            "title" => self.enter_field(InfoField::Title),
            "author" => self.enter_field(InfoField::Author),
            "subject" => self.enter_field(InfoField::Subject),
            "doccomm" => self.enter_field(InfoField::Comment),
            "keywords" => self.enter_field(InfoField::Keywords),
            "company" => self.enter_field(InfoField::Company),
            "copyright" => self.enter_field(InfoField::Copyright),
            "background" => self.state.dest = Destination::Background,

            "pict" | "object" | "shp" | "shppict" | "fldinst" | "header" | "footer" | "footnote" => {
                self.state.dest = Destination::Skip;
                self.lossy = true;
            }
            "fonttbl" | "colortbl" | "stylesheet" | "listtable" | "listoverridetable"
            | "expandedcolortbl" | "generator" | "nonshppict" => {
                self.state.dest = Destination::Skip;
            }

            "par" | "line" => self.push_text('\n'),
            "tab" => self.push_text('\t'),
            "emdash" => self.push_text('\u{2014}'),
            "endash" => self.push_text('\u{2013}'),
            "bullet" => self.push_text('\u{2022}'),
            "lquote" => self.push_text('\u{2018}'),
            "rquote" => self.push_text('\u{2019}'),
            "ldblquote" => self.push_text('\u{201C}'),
            "rdblquote" => self.push_text('\u{201D}'),
            "emspace" | "enspace" => self.push_text(' '),

            "u" => {
                if let Some(n) = param {
                    self.push_unit(n as i16 as u16);
                    self.skip_chars = self.state.uc;
                }
            }
            "uc" => self.state.uc = param.unwrap_or(1).max(0) as usize,
            "ansicpg" => self.code_page = param.unwrap_or(1252).clamp(0, u16::MAX as i32) as u16,
            "mac" => self.code_page = 10000,
            "pc" => self.code_page = 437,
            "pca" => self.code_page = 850,

            "paperw" => self.attrs.paper_size.width = from_twips(param),
            "paperh" => self.attrs.paper_size.height = from_twips(param),
            "vieww" => self.attrs.view_size.width = from_twips(param),
            "viewh" => self.attrs.view_size.height = from_twips(param),
            "viewkind" => self.attrs.has_multiple_pages = param == Some(1),
            "horzdoc" => self.orientation = Some(TextOrientation::Horizontal),
            "vertdoc" => self.orientation = Some(TextOrientation::Vertical),
            "viewscale" => self.attrs.scale_factor = param.unwrap_or(100) as f64 / 100.0,
            "hyphauto" => self.hyph_auto = param.unwrap_or(1) != 0,
            "hyphfactor" => {
                self.attrs.hyphenation_factor = (param.unwrap_or(0) as f32 / 100.0).clamp(0.0, 1.0)
            }
            "readonlydoc" => self.attrs.read_only = param.unwrap_or(1) != 0,
            "cocoascreenfonts" => self.attrs.uses_screen_fonts = param.unwrap_or(1) != 0,

            "red" | "green" | "blue" | "alpha" if self.state.dest == Destination::Background => {
                let channel = param.unwrap_or(0).clamp(0, 255) as u8;
                let color = self.background.get_or_insert([0, 0, 0, 255]);
                let idx = match word {
                    "red" => 0,
                    "green" => 1,
                    "blue" => 2,
                    _ => 3,
                };
                color[idx] = channel;
            }

            _ => {
                if ignorable && fresh {
                    log::debug!("Skipping unknown RTF destination \\{}", word);
                    self.state.dest = Destination::Skip;
                    self.lossy = true;
                } else if fresh && self.state.dest == Destination::Info {
                    self.state.dest = Destination::Skip;
                }
            }
        }
    }

    /// Text byte in the document's ANSI code page. Windows-1252 and Latin-1
    /// are decoded; high bytes of kept text in other code pages are read as
    /// Windows-1252 and flag the read as lossy.
    fn emit_byte(&mut self, byte: u8) {
        if self.skip_chars > 0 {
            self.skip_chars -= 1;
            return;
        }
        let c = match self.code_page {
            _ if byte < 0x80 => byte as char,
            1252 => cp1252_char(byte),
            28591 => byte as char,
            _ => {
                if matches!(self.state.dest, Destination::Body | Destination::Field(_)) {
                    self.lossy = true;
                }
                cp1252_char(byte)
            }
        };
        self.emit_char(c);
    }

    fn emit_char(&mut self, c: char) {
        if self.skip_chars > 0 {
            self.skip_chars -= 1;
            return;
        }
        if self.pending_high.take().is_some() {
            self.push_text('\u{FFFD}');
        }
        self.push_text(c);
    }

    fn push_unit(&mut self, unit: u16) {
        match unit {
            0xD800..=0xDBFF => {
                if self.pending_high.replace(unit).is_some() {
                    self.push_text('\u{FFFD}');
                }
            }
            0xDC00..=0xDFFF => {
                let c = self
                    .pending_high
                    .take()
                    .and_then(|high| char::decode_utf16([high, unit]).next())
                    .and_then(|r| r.ok())
                    .unwrap_or('\u{FFFD}');
                self.push_text(c);
            }
            _ => {
                if self.pending_high.take().is_some() {
                    self.push_text('\u{FFFD}');
                }
                self.push_text(char::from_u32(unit as u32).unwrap_or('\u{FFFD}'));
            }
        }
    }

    fn push_text(&mut self, c: char) {
        match self.state.dest {
            Destination::Body => self.text.push(c),
            Destination::Field(_) => self.field_buf.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::geometry::Size;

    fn decode(src: &str) -> Result<DecodedDocument, DocumentError> {
        RtfCodec.decode(src.as_bytes(), &DecodeOptions::default())
    }

    #[test]
    fn test_round_trip_text_and_properties() {
        let attrs = DocumentAttributes {
            properties: DocumentProperties {
                author: Some("Ada Lovelace".to_string()),
                company: Some("Analytical {Engines}".to_string()),
                title: Some("Notes on the Engine".to_string()),
                keywords: vec!["math".to_string(), "engines, analytical".to_string()],
                ..Default::default()
            },
            background_color: Color::rgb(250, 240, 200),
            hyphenation_factor: 0.5,
            view_size: Size::new(600.0, 400.0),
            has_multiple_pages: true,
            read_only: true,
            uses_screen_fonts: true,
            scale_factor: 1.25,
            ..Default::default()
        };
        let text = "Line one\n\tindented \\ back\\slash {braces}\r\ncafé ✓ 𝄞";
        let attrs = DocumentAttributes {
            orientation_sections: vec![OrientationSection::new(TextOrientation::Vertical, 0..text.len())],
            ..attrs
        };
        let bytes = RtfCodec.encode(text, &attrs, &EncodeOptions::default()).unwrap();
        assert!(bytes.is_ascii());

        let decoded = RtfCodec.decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.attributes, attrs);
        assert!(decoded.is_rich);
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_plain_paragraphs_and_symbols() {
        let decoded = decode(r"{\rtf1\ansi{\fonttbl\f0 Times;}\f0 Hello\par World\emdash ok\'e9}").unwrap();
        assert_eq!(decoded.text, "Hello\nWorld\u{2014}ok\u{e9}");
    }

    #[test]
    fn test_unicode_skips_fallback() {
        let decoded = decode(r"{\rtf1\uc2\u8364 EUx}").unwrap();
        assert_eq!(decoded.text, "\u{20AC}x");
    }

    #[test]
    fn test_picture_marks_lossy() {
        let decoded = decode(r"{\rtf1 before{\pict\pngblip 89504e47}after}").unwrap();
        assert_eq!(decoded.text, "beforeafter");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_unknown_ignorable_destination_marks_lossy() {
        let decoded = decode(r"{\rtf1{\*\mystery hidden}shown}").unwrap();
        assert_eq!(decoded.text, "shown");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_unknown_info_fields_are_skipped() {
        let decoded = decode(r"{\rtf1{\info{\operator Someone}{\title T}}body}").unwrap();
        assert_eq!(decoded.text, "body");
        assert_eq!(decoded.attributes.properties.title.as_deref(), Some("T"));
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_malformed_streams() {
        assert!(matches!(decode("plain text"), Err(DocumentError::DecodingFailure { .. })));
        assert!(matches!(decode(r"{\rtf1 {unclosed}"), Err(DocumentError::DecodingFailure { .. })));
        assert!(matches!(decode(r"{\rtf1 \'zz}"), Err(DocumentError::DecodingFailure { .. })));
    }

    #[test]
    fn test_ignore_rich_formatting_reads_source() {
        let src = r"{\rtf1 Hi}";
        let options = DecodeOptions {
            ignore_rich_formatting: true,
            ..Default::default()
        };
        let decoded = RtfCodec.decode(src.as_bytes(), &options).unwrap();
        assert_eq!(decoded.text, src);
        assert!(!decoded.is_rich);
    }

    #[test]
    fn test_hyphfactor_needs_hyphauto() {
        let decoded = decode(r"{\rtf1\hyphfactor80 x}").unwrap();
        assert_eq!(decoded.attributes.hyphenation_factor, 0.0);
        let decoded = decode(r"{\rtf1\hyphauto1\hyphfactor80 x}").unwrap();
        assert_eq!(decoded.attributes.hyphenation_factor, 0.8);
    }

    #[test]
    fn test_ansi_escapes_use_windows_1252() {
        let decoded = decode(r"{\rtf1\ansi\ansicpg1252 \'93Hi\'94 \'80}").unwrap();
        assert_eq!(decoded.text, "\u{201C}Hi\u{201D} \u{20AC}");
        assert!(!decoded.lossy);

        let decoded = RtfCodec.decode(b"{\\rtf1 \x93x\x94 \xe9}", &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "\u{201C}x\u{201D} \u{e9}");
    }

    #[test]
    fn test_other_code_pages_mark_lossy() {
        let decoded = decode(r"{\rtf1\mac \'d2}").unwrap();
        assert!(decoded.lossy);
        let decoded = decode(r"{\rtf1\mac\uc1\u8220 \'d2x}").unwrap();
        assert_eq!(decoded.text, "\u{201C}x");
        assert!(!decoded.lossy);
        let decoded = decode(r"{\rtf1\ansicpg28591 \'93}").unwrap();
        assert_eq!(decoded.text, "\u{93}");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_document_orientation() {
        let decoded = decode(r"{\rtf1\vertdoc abc}").unwrap();
        assert_eq!(
            decoded.attributes.orientation_sections,
            vec![OrientationSection::new(TextOrientation::Vertical, 0..3)]
        );
        let decoded = decode(r"{\rtf1 abc}").unwrap();
        assert!(decoded.attributes.orientation_sections.is_empty());
    }

    #[test]
    fn test_hyphfactor_is_written_as_percentage() {
        let attrs = DocumentAttributes {
            hyphenation_factor: 0.333,
            ..Default::default()
        };
        let bytes = RtfCodec.encode("x", &attrs, &EncodeOptions::default()).unwrap();
        let decoded = RtfCodec.decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.attributes.hyphenation_factor, 0.33);
    }
}
