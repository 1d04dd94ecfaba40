use super::{DecodeOptions, DecodedDocument, DocumentAttributes, DocumentCodec, EncodeOptions};
use crate::app::domain::format::DocumentFormat;
use crate::app::infrastructure::error::DocumentError;

pub struct PlainTextCodec;

impl DocumentCodec for PlainTextCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::PlainText
    }

    fn decode(&self, bytes: &[u8], options: &DecodeOptions) -> Result<DecodedDocument, DocumentError> {
        let (text, encoding) = options.encoding.decode(bytes)?;
        Ok(DecodedDocument::plain(text, encoding))
    }

    fn encode(
        &self,
        text: &str,
        _attributes: &DocumentAttributes,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, DocumentError> {
        options.encoding.encode(text)
    }
}
