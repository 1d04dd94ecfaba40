use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::DocumentError;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Character encodings a plain-text document can be read or saved in.
///
/// `Automatic` is only meaningful for reading: the byte-order mark decides,
/// then UTF-8, then ISO Latin-1 (which accepts any byte sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TextEncoding {
    #[default]
    Automatic,
    Utf8,
    Utf16Le,
    Utf16Be,
    IsoLatin1,
    Ascii,
}

impl TextEncoding {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Utf8 => "Unicode (UTF-8)",
            Self::Utf16Le => "Unicode (UTF-16LE)",
            Self::Utf16Be => "Unicode (UTF-16BE)",
            Self::IsoLatin1 => "Western (ISO Latin 1)",
            Self::Ascii => "Western (ASCII)",
        }
    }

    /// IANA charset name, used in HTML and RTF output.
    pub fn charset_name(&self) -> &'static str {
        match self {
            Self::Automatic | Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::IsoLatin1 => "iso-8859-1",
            Self::Ascii => "us-ascii",
        }
    }

    pub fn all() -> &'static [TextEncoding] {
        &[
            Self::Automatic,
            Self::Utf8,
            Self::Utf16Le,
            Self::Utf16Be,
            Self::IsoLatin1,
            Self::Ascii,
        ]
    }

    /// The encoding actually used when this one is picked for saving.
    pub fn for_saving(self) -> TextEncoding {
        match self {
            Self::Automatic => Self::Utf8,
            other => other,
        }
    }

    /// Decode `bytes`, returning the text and the encoding that was applied.
    pub fn decode(self, bytes: &[u8]) -> Result<(String, TextEncoding), DocumentError> {
        match self {
            Self::Automatic => Ok(sniff_and_decode(bytes)),
            Self::Utf8 => {
                let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
                let text = std::str::from_utf8(body).map_err(|e| DocumentError::DecodingFailure {
                    encoding: self,
                    detail: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                })?;
                Ok((text.to_string(), self))
            }
            Self::Utf16Le | Self::Utf16Be => {
                let bom = if self == Self::Utf16Le { UTF16LE_BOM } else { UTF16BE_BOM };
                let body = bytes.strip_prefix(&bom[..]).unwrap_or(bytes);
                decode_utf16(body, self).map(|text| (text, self))
            }
            Self::IsoLatin1 => Ok((bytes.iter().map(|&b| b as char).collect(), self)),
            Self::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(DocumentError::DecodingFailure {
                        encoding: self,
                        detail: format!("non-ASCII byte 0x{:02X} at offset {}", bytes[pos], pos),
                    });
                }
                Ok((bytes.iter().map(|&b| b as char).collect(), self))
            }
        }
    }

    /// Encode `text` for writing. UTF-16 output carries a byte-order mark.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, DocumentError> {
        match self.for_saving() {
            Self::Utf8 | Self::Automatic => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => {
                let mut out = UTF16LE_BOM.to_vec();
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                Ok(out)
            }
            Self::Utf16Be => {
                let mut out = UTF16BE_BOM.to_vec();
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                Ok(out)
            }
            enc @ (Self::IsoLatin1 | Self::Ascii) => {
                let limit = if enc == Self::Ascii { 0x7F } else { 0xFF };
                text.chars()
                    .map(|c| {
                        if (c as u32) <= limit {
                            Ok(c as u8)
                        } else {
                            Err(DocumentError::EncodingFailure {
                                encoding: enc,
                                detail: format!("character {:?} is not representable", c),
                            })
                        }
                    })
                    .collect()
            }
        }
    }

    /// Whether every character of `text` survives a save in this encoding.
    pub fn can_encode(self, text: &str) -> bool {
        match self.for_saving() {
            Self::Ascii => text.is_ascii(),
            Self::IsoLatin1 => text.chars().all(|c| (c as u32) <= 0xFF),
            _ => true,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn decode_utf16(body: &[u8], encoding: TextEncoding) -> Result<String, DocumentError> {
    if body.len() % 2 != 0 {
        return Err(DocumentError::DecodingFailure {
            encoding,
            detail: "odd number of bytes in UTF-16 stream".to_string(),
        });
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if encoding == TextEncoding::Utf16Le {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| DocumentError::DecodingFailure {
        encoding,
        detail: "unpaired surrogate in UTF-16 stream".to_string(),
    })
}

fn sniff_and_decode(bytes: &[u8]) -> (String, TextEncoding) {
    if let Some(body) = bytes.strip_prefix(&UTF8_BOM[..]) {
        if let Ok(text) = std::str::from_utf8(body) {
            return (text.to_string(), TextEncoding::Utf8);
        }
    }
    for enc in [TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
        let bom = if enc == TextEncoding::Utf16Le { UTF16LE_BOM } else { UTF16BE_BOM };
        if let Some(body) = bytes.strip_prefix(&bom[..]) {
            if let Ok(text) = decode_utf16(body, enc) {
                return (text, enc);
            }
        }
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::IsoLatin1,
        ),
    }
}
