//! # Text Codec
//!
//! Converts UTF-8 strings into the byte encoding of the printer's active
//! code system. UTF-8 passes through unchanged; the CJK code systems go
//! through `encoding_rs`.
//!
//! Characters the target encoding cannot represent are printed as `?`
//! rather than as HTML numeric references.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{BIG5, EUC_KR, Encoding, GB18030};
use tracing::instrument;

use crate::error::PrinterError;

/// Printed in place of characters the code system cannot represent.
const REPLACEMENT: u8 = b'?';

/// Character sets the printer can switch between with `FS C n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterSet {
    Gb18030,
    Big5,
    Ksc5601,
    #[default]
    Utf8,
}

impl CharacterSet {
    /// All supported character sets, in protocol parameter order.
    pub const ALL: [Self; 4] = [Self::Gb18030, Self::Big5, Self::Ksc5601, Self::Utf8];

    /// The `n` parameter of the select-code-system command.
    pub fn param(self) -> u8 {
        match self {
            Self::Gb18030 => 0x00,
            Self::Big5 => 0x01,
            Self::Ksc5601 => 0x02,
            Self::Utf8 => 0xFF,
        }
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gb18030 => "GB18030",
            Self::Big5 => "BIG5",
            Self::Ksc5601 => "KSC5601",
            Self::Utf8 => "UTF8",
        }
    }

    /// The `encoding_rs` encoder, `None` for UTF-8 passthrough.
    fn encoding(self) -> Option<&'static Encoding> {
        match self {
            Self::Gb18030 => Some(GB18030),
            Self::Big5 => Some(BIG5),
            Self::Ksc5601 => Some(EUC_KR),
            Self::Utf8 => None,
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterSet {
    type Err = PrinterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['-', '_'], "").as_str() {
            "GB18030" => Ok(Self::Gb18030),
            "BIG5" => Ok(Self::Big5),
            "KSC5601" | "EUCKR" => Ok(Self::Ksc5601),
            "UTF8" => Ok(Self::Utf8),
            _ => Err(PrinterError::invalid(format!(
                "unknown character set \"{s}\": expected GB18030, BIG5, KSC5601 or UTF8"
            ))),
        }
    }
}

/// Encode `text` for the given character set.
///
/// ```
/// use thermal_dispatch::protocol::codec::{encode, CharacterSet};
///
/// assert_eq!(encode(CharacterSet::Utf8, "héllo"), "héllo".as_bytes());
/// assert_eq!(encode(CharacterSet::Gb18030, "你好"), vec![0xC4, 0xE3, 0xBA, 0xC3]);
/// ```
#[instrument(level = "trace", skip(text), fields(len = text.len()))]
pub fn encode(charset: CharacterSet, text: &str) -> Vec<u8> {
    let Some(encoding) = charset.encoding() else {
        return text.as_bytes().to_vec();
    };

    let (encoded, _, had_errors) = encoding.encode(text);
    if !had_errors {
        return encoded.into_owned();
    }

    // Slow path: encode per character so unmappable ones can be replaced
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let (bytes, _, unmappable) = encoding.encode(c.encode_utf8(&mut buf));
        if unmappable {
            out.push(REPLACEMENT);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}
