use std::fmt::Write as _;

use super::{
    DecodeOptions, DecodedDocument, DocumentAttributes, DocumentCodec, EncodeOptions,
    HtmlExportOptions,
};
use crate::app::domain::format::DocumentFormat;
use crate::app::domain::geometry::Color;
use crate::app::domain::preferences::HtmlStylingMode;
use crate::app::domain::properties::{DocumentProperties, join_keywords, split_keywords};
use crate::app::infrastructure::error::DocumentError;

/// HTML export of paragraphs plus metadata, and a tag-stripping import.
/// Imported HTML is always marked as converted: markup beyond paragraphs and
/// line breaks does not survive a save back to HTML.
pub struct HtmlCodec;

impl DocumentCodec for HtmlCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Html
    }

    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedDocument, DocumentError> {
        let (source, encoding) = options.encoding.decode(bytes)?;
        if options.ignore_markup {
            return Ok(DecodedDocument::plain(source, encoding));
        }
        let mut decoded = HtmlReader::default().read(&source);
        decoded.encoding = encoding;
        Ok(decoded)
    }

    fn encode(
        &self,
        text: &str,
        attributes: &DocumentAttributes,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, DocumentError> {
        let encoding = options.encoding.for_saving();
        let html = write_html(text, attributes, options, |c| encoding.can_encode(&c.to_string()));
        encoding.encode(&html)
    }
}

fn doctype(options: &HtmlExportOptions) -> &'static str {
    match (options.xhtml, options.transitional) {
        (true, true) => {
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">"
        }
        (true, false) => {
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">"
        }
        (false, true) => {
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"http://www.w3.org/TR/html4/loose.dtd\">"
        }
        (false, false) => {
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">"
        }
    }
}

/// Escape markup characters; characters the target encoding cannot hold
/// become numeric references.
fn escape_into(out: &mut String, text: &str, encodable: &impl Fn(char) -> bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if !encodable(c) => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c => out.push(c),
        }
    }
}

fn escape_line(out: &mut String, line: &str, preserve_whitespace: bool, encodable: &impl Fn(char) -> bool) {
    if !preserve_whitespace {
        escape_into(out, line, encodable);
        return;
    }
    let mut prev_space = true;
    for c in line.chars() {
        match c {
            ' ' if prev_space => out.push_str("&nbsp;"),
            '\t' => out.push_str("<span class=\"Apple-tab-span\" style=\"white-space:pre\">\t</span>"),
            c => {
                let mut buf = [0u8; 4];
                escape_into(out, c.encode_utf8(&mut buf), encodable);
            }
        }
        prev_space = c == ' ';
    }
}

fn write_html(
    text: &str,
    attrs: &DocumentAttributes,
    options: &EncodeOptions,
    encodable: impl Fn(char) -> bool,
) -> String {
    let html = &options.html;
    let xhtml = html.xhtml;
    let close = if xhtml { " />" } else { ">" };
    let props = &attrs.properties;
    let mut out = String::with_capacity(text.len() * 2 + 512);

    out.push_str(doctype(html));
    out.push('\n');
    out.push_str(if xhtml {
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n"
    } else {
        "<html>\n"
    });
    out.push_str("<head>\n");
    let _ = writeln!(
        out,
        "<meta http-equiv=\"Content-Type\" content=\"text/html; charset={}\"{}",
        options.encoding.for_saving().charset_name(),
        close
    );
    if let Some(title) = &props.title {
        out.push_str("<title>");
        escape_into(&mut out, title, &encodable);
        out.push_str("</title>\n");
    }
    let keywords = join_keywords(&props.keywords);
    let metas = [
        ("author", props.author.as_deref()),
        ("copyright", props.copyright.as_deref()),
        ("company", props.company.as_deref()),
        ("subject", props.subject.as_deref()),
        ("description", props.comment.as_deref()),
        ("keywords", (!keywords.is_empty()).then_some(keywords.as_str())),
    ];
    for (name, value) in metas {
        if let Some(value) = value {
            let _ = write!(out, "<meta name=\"{}\" content=\"", name);
            escape_into(&mut out, value, &encodable);
            let _ = writeln!(out, "\"{}", close);
        }
    }

    let paragraph_css = format!("margin: 0.0px 0.0px 0.0px 0.0px; font: {}px {}", options.font_size, options.font_name);
    let background = (attrs.background_color != Color::WHITE).then(|| attrs.background_color.to_hex());
    if html.styling == HtmlStylingMode::EmbeddedCss {
        out.push_str("<style type=\"text/css\">\n");
        let _ = writeln!(out, "p.p1 {{{}}}", paragraph_css);
        if let Some(bg) = &background {
            let _ = writeln!(out, "body {{background-color: {}}}", bg);
        }
        out.push_str("</style>\n");
    }
    out.push_str("</head>\n");

    match (&background, html.styling) {
        (Some(bg), HtmlStylingMode::InlineCss) => {
            let _ = writeln!(out, "<body style=\"background-color: {}\">", bg);
        }
        _ => out.push_str("<body>\n"),
    }

    let open_p = match html.styling {
        HtmlStylingMode::EmbeddedCss => "<p class=\"p1\">".to_string(),
        HtmlStylingMode::InlineCss => format!("<p style=\"{}\">", paragraph_css),
        HtmlStylingMode::NoCss => "<p>".to_string(),
    };
    for line in text.split('\n') {
        out.push_str(&open_p);
        if line.is_empty() {
            let _ = write!(out, "<br{}", close);
        } else {
            escape_line(&mut out, line, html.preserve_whitespace, &encodable);
        }
        out.push_str("</p>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "blockquote", "pre", "ul", "ol", "table",
];
const SKIPPED_CONTENT_TAGS: &[&str] = &["script", "style", "head"];
const LOSSY_TAGS: &[&str] = &[
    "img", "object", "embed", "iframe", "video", "audio", "canvas", "svg", "script",
];

struct Tag<'s> {
    name: String,
    closing: bool,
    attrs: &'s str,
}

fn parse_tag(raw: &str) -> Tag<'_> {
    let raw = raw.trim().trim_end_matches('/');
    let (closing, body) = match raw.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let name_end = body
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(body.len());
    Tag {
        name: body[..name_end].to_ascii_lowercase(),
        closing,
        attrs: &body[name_end..],
    }
}

/// Value of `key="..."` (or single-quoted) inside a tag's attribute text.
fn attribute<'s>(attrs: &'s str, key: &str) -> Option<&'s str> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = lower[search..].find(key) {
        let at = search + found;
        search = at + key.len();
        let preceded_ok = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        let rest = lower[search..].trim_start();
        if !preceded_ok || !rest.starts_with('=') {
            continue;
        }
        let value_start = attrs.len() - rest.len() + 1;
        let value = attrs[value_start..].trim_start();
        let quote = value.chars().next()?;
        if quote == '"' || quote == '\'' {
            let inner = &value[1..];
            return inner.find(quote).map(|end| &inner[..end]);
        }
        let end = value.find(|c: char| c.is_ascii_whitespace()).unwrap_or(value.len());
        return Some(&value[..end]);
    }
    None
}

pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{A0}'),
                _ => {
                    let num = entity.strip_prefix('#')?;
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => num.parse().ok()?,
                    };
                    char::from_u32(code)
                }
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Default)]
struct HtmlReader {
    text: String,
    title: String,
    in_title: bool,
    skip_depth: Vec<String>,
    pre_stack: Vec<String>,
    paragraph_start: Option<usize>,
    properties: DocumentProperties,
    lossy: bool,
}

impl HtmlReader {
    fn read(mut self, source: &str) -> DecodedDocument {
        let mut rest = source;
        while !rest.is_empty() {
            match rest.find('<') {
                Some(0) => {
                    if let Some(comment_body) = rest.strip_prefix("<!--") {
                        rest = comment_body.find("-->").map_or("", |end| &comment_body[end + 3..]);
                        continue;
                    }
                    let Some(end) = rest.find('>') else {
                        self.push_text(rest);
                        break;
                    };
                    let raw = &rest[1..end];
                    rest = &rest[end + 1..];
                    if !raw.starts_with('!') && !raw.starts_with('?') {
                        self.handle_tag(parse_tag(raw));
                    }
                }
                Some(lt) => {
                    self.push_text(&rest[..lt]);
                    rest = &rest[lt..];
                }
                None => {
                    self.push_text(rest);
                    rest = "";
                }
            }
        }

        if self.text.ends_with('\n') {
            self.text.pop();
        }
        if !self.title.trim().is_empty() {
            self.properties.title = Some(decode_entities(self.title.trim()));
        }
        let attributes = DocumentAttributes {
            properties: self.properties,
            ..Default::default()
        };
        DecodedDocument {
            text: self.text,
            attributes,
            encoding: Default::default(),
            is_rich: true,
            lossy: self.lossy,
            converted: true,
        }
    }

    fn handle_tag(&mut self, tag: Tag<'_>) {
        let name = tag.name.as_str();
        if LOSSY_TAGS.contains(&name) {
            self.lossy = true;
        }

        if tag.closing {
            if self.skip_depth.last().is_some_and(|t| t == name) {
                self.skip_depth.pop();
                return;
            }
            if name == "title" {
                self.in_title = false;
                return;
            }
            if !self.skip_depth.is_empty() {
                return;
            }
            if self.pre_stack.last().is_some_and(|t| t == name) {
                self.pre_stack.pop();
            }
            if BLOCK_TAGS.contains(&name) {
                self.end_block();
            }
            return;
        }

        if name == "meta" {
            self.read_meta(tag.attrs);
            return;
        }
        if name == "title" {
            self.in_title = true;
            return;
        }
        if !self.skip_depth.is_empty() {
            return;
        }
        if SKIPPED_CONTENT_TAGS.contains(&name) {
            self.skip_depth.push(tag.name.clone());
            return;
        }

        let preformatted = name == "pre"
            || attribute(tag.attrs, "style").is_some_and(|s| s.replace(' ', "").contains("white-space:pre"));
        if preformatted {
            self.pre_stack.push(tag.name.clone());
        }
        match name {
            "br" => self.text.push('\n'),
            "p" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre" => {
                if !self.text.is_empty() && !self.text.ends_with('\n') {
                    self.text.push('\n');
                }
                self.paragraph_start = Some(self.text.len());
            }
            _ => {}
        }
    }

    fn end_block(&mut self) {
        let only_break = self
            .paragraph_start
            .take()
            .is_some_and(|start| &self.text[start..] == "\n");
        if !only_break && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn read_meta(&mut self, attrs: &str) {
        let (Some(name), Some(content)) = (attribute(attrs, "name"), attribute(attrs, "content")) else {
            return;
        };
        let value = decode_entities(content);
        if value.is_empty() {
            return;
        }
        match name.to_ascii_lowercase().as_str() {
            "author" => self.properties.author = Some(value),
            "copyright" => self.properties.copyright = Some(value),
            "company" => self.properties.company = Some(value),
            "subject" => self.properties.subject = Some(value),
            "description" => self.properties.comment = Some(value),
            "keywords" => self.properties.keywords = split_keywords(&value),
            _ => {}
        }
    }

    fn push_text(&mut self, raw: &str) {
        if self.in_title {
            self.title.push_str(raw);
            return;
        }
        if !self.skip_depth.is_empty() {
            return;
        }
        if !self.pre_stack.is_empty() {
            self.text.push_str(&decode_entities(raw));
            return;
        }
        let mut collapsed = String::with_capacity(raw.len());
        let mut in_space = false;
        for c in raw.chars() {
            if c.is_ascii_whitespace() {
                in_space = true;
                continue;
            }
            if in_space {
                let after_break = collapsed.is_empty()
                    && (self.text.is_empty() || self.text.ends_with('\n') || self.text.ends_with(' '));
                if !after_break {
                    collapsed.push(' ');
                }
                in_space = false;
            }
            collapsed.push(c);
        }
        if in_space && !collapsed.is_empty() {
            collapsed.push(' ');
        }
        let line_start = self.text.is_empty() || self.text.ends_with(['\n', ' ']);
        self.text.push_str(&decode_entities(&preserved_spaces(&collapsed, line_start)));
    }
}

/// Turn the `&nbsp;` entities written for whitespace preservation back into
/// spaces: those opening a line or following a space. Other non-breaking
/// spaces are kept.
fn preserved_spaces(text: &str, line_start: bool) -> String {
    const NBSP: &str = "&nbsp;";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find(NBSP) {
        out.push_str(&rest[..at]);
        let after_space = if out.is_empty() { line_start } else { out.ends_with(' ') };
        out.push_str(if after_space { " " } else { NBSP });
        rest = &rest[at + NBSP.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::encoding::TextEncoding;

    fn encode_with(text: &str, attrs: &DocumentAttributes, html: HtmlExportOptions) -> String {
        let options = EncodeOptions {
            html,
            ..Default::default()
        };
        String::from_utf8(HtmlCodec.encode(text, attrs, &options).unwrap()).unwrap()
    }

    #[test]
    fn test_export_contains_metadata_and_paragraphs() {
        let attrs = DocumentAttributes {
            properties: DocumentProperties {
                title: Some("Q&A".to_string()),
                author: Some("Ada".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = encode_with("first\nsecond <b>", &attrs, HtmlExportOptions::default());
        assert!(html.starts_with("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\""));
        assert!(html.contains("<title>Q&amp;A</title>"));
        assert!(html.contains("<meta name=\"author\" content=\"Ada\">"));
        assert!(html.contains("<p class=\"p1\">first</p>"));
        assert!(html.contains("second &lt;b&gt;"));
        assert!(html.contains("p.p1 {"));
    }

    #[test]
    fn test_xhtml_transitional_inline_css() {
        let attrs = DocumentAttributes {
            background_color: Color::rgb(0, 0, 255),
            ..Default::default()
        };
        let options = HtmlExportOptions {
            xhtml: true,
            transitional: true,
            styling: HtmlStylingMode::InlineCss,
            preserve_whitespace: false,
        };
        let html = encode_with("a\n", &attrs, options);
        assert!(html.contains("XHTML 1.0 Transitional"));
        assert!(html.contains("<body style=\"background-color: #0000FF\">"));
        assert!(html.contains("<p style=\"margin"));
        assert!(html.contains("<br />"));
        assert!(!html.contains("<style"));
    }

    #[test]
    fn test_unencodable_characters_become_references() {
        let options = EncodeOptions {
            encoding: TextEncoding::Ascii,
            ..Default::default()
        };
        let bytes = HtmlCodec
            .encode("naïve", &DocumentAttributes::default(), &options)
            .unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("na&#239;ve"));
        assert!(html.contains("charset=us-ascii"));
    }

    #[test]
    fn test_import_round_trips_export() {
        let attrs = DocumentAttributes {
            properties: DocumentProperties {
                title: Some("Plan".to_string()),
                author: Some("Ada".to_string()),
                comment: Some("draft".to_string()),
                keywords: vec!["one".to_string(), "two".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let text = "Intro\n\nBody with a\ttab & more\na  b   c\n  indented\n";
        let bytes = HtmlCodec.encode(text, &attrs, &EncodeOptions::default()).unwrap();
        let decoded = HtmlCodec.decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.attributes.properties, attrs.properties);
        assert!(decoded.converted);
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_import_collapses_whitespace_and_skips_scripts() {
        let src = "<html><head><style>p{}</style></head><body>\n<p>  Hello\n   world </p><script>x()</script><p>A&nbsp;&#x42;</p></body></html>";
        let decoded = HtmlCodec.decode(src.as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "Hello world \nA\u{A0}B");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_preserved_spaces_import_as_spaces() {
        let bytes = HtmlCodec
            .encode("  lead\nmid  dle\nkeep\u{A0}this", &DocumentAttributes::default(), &EncodeOptions::default())
            .unwrap();
        let html = String::from_utf8(bytes.clone()).unwrap();
        assert!(html.contains("&nbsp;&nbsp;lead"));
        assert!(html.contains("mid &nbsp;dle"));
        let decoded = HtmlCodec.decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "  lead\nmid  dle\nkeep\u{A0}this");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_image_marks_lossy() {
        let src = "<p>see <img src=\"x.png\"> here</p>";
        let decoded = HtmlCodec.decode(src.as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "see here");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_ignore_markup_reads_source() {
        let src = "<p>raw</p>";
        let options = DecodeOptions {
            ignore_markup: true,
            ..Default::default()
        };
        let decoded = HtmlCodec.decode(src.as_bytes(), &options).unwrap();
        assert_eq!(decoded.text, src);
        assert!(!decoded.is_rich);
        assert!(!decoded.converted);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &#65;&#x42; &bogus; &"), "a & b AB &bogus; &");
    }

    #[test]
    fn test_attribute_lookup() {
        let attrs = " name=\"Author\" content='Grace Hopper' data-x=1";
        assert_eq!(attribute(attrs, "name"), Some("Author"));
        assert_eq!(attribute(attrs, "content"), Some("Grace Hopper"));
        assert_eq!(attribute(attrs, "x"), None);
    }
}
