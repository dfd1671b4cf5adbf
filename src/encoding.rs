// 🔤 Input decoding
// Turns the raw export bytes into text before any CSV parsing happens.

use crate::error::{ConvertError, Result};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Strict UTF-8
    Utf8,
    /// UTF-8, possibly prefixed with a byte-order mark
    Utf8Bom,
    /// Western European code page used by older banking software
    Windows1252,
    /// Backslash escapes (`\u00e9`, `\xa3`, `\n`) embedded in otherwise plain text
    UnicodeEscape,
}

impl SourceEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Utf8Bom => "UTF-8 (BOM)",
            SourceEncoding::Windows1252 => "Windows-1252",
            SourceEncoding::UnicodeEscape => "escaped unicode",
        }
    }

    /// Decode the whole file into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            SourceEncoding::Utf8 => utf8(bytes, self.name()),
            SourceEncoding::Utf8Bom => {
                utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes), self.name())
            }
            SourceEncoding::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned)
                .ok_or_else(|| ConvertError::Decode {
                    encoding: self.name(),
                    message: "byte sequence outside the code page".to_string(),
                }),
            SourceEncoding::UnicodeEscape => {
                // Escapes are ASCII; whatever surrounds them is UTF-8 when it
                // can be, Latin-1 otherwise.
                let text = match std::str::from_utf8(bytes) {
                    Ok(s) => Cow::Borrowed(s),
                    Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
                };
                unescape(&text)
            }
        }
    }
}

fn utf8(bytes: &[u8], encoding: &'static str) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ConvertError::Decode {
        encoding,
        message: e.to_string(),
    })
}

/// Resolve backslash escapes.
///
/// Unknown escapes are kept as written; a `\x`, `\u` or `\U` not followed by
/// the right number of hex digits is an error.
pub fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };

        let digits = match next {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => 0,
        };

        if digits > 0 {
            chars.next();
            let hex: String = chars.by_ref().take(digits).collect();
            out.push(hex_char(&hex, digits)?);
            continue;
        }

        let resolved = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            _ => None,
        };

        match resolved {
            Some(r) => {
                chars.next();
                out.push(r);
            }
            None => out.push('\\'),
        }
    }

    Ok(out)
}

fn hex_char(hex: &str, digits: usize) -> Result<char> {
    let invalid = || ConvertError::Decode {
        encoding: SourceEncoding::UnicodeEscape.name(),
        message: format!("truncated or invalid escape '{}'", hex),
    };

    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}
