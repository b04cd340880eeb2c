//! Target encodings and what they can represent.
//!
//! ```text
//! label ──resolve──▶ TargetEncoding ──can_represent / try_encode──▶ scanner
//! ```
//!
//! Labels follow the WHATWG Encoding Standard (`shift_jis`, `euc-jp`,
//! `windows-1252`, ...), resolved through `encoding_rs`.

mod provider;
mod substitute;

use std::fmt;

use encoding_rs::Encoding;

use crate::core::ScanError;

pub use provider::StandardEncodings;

/// Encoding families that need distinct representability rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFamily {
    /// UTF-8 / UTF-16: every scalar value is representable.
    Unicode,
    /// Shift_JIS, whose ASCII range is JIS X 0201 Roman.
    ShiftJis,
    /// Other multi-byte East Asian encodings, GB18030 included: its encoder
    /// still rejects a few private-use code points.
    Cjk,
    SingleByte,
}

impl EncodingFamily {
    fn of(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8
            || encoding == encoding_rs::UTF_16LE
            || encoding == encoding_rs::UTF_16BE
        {
            Self::Unicode
        } else if encoding == encoding_rs::SHIFT_JIS {
            Self::ShiftJis
        } else if encoding.is_single_byte() {
            Self::SingleByte
        } else {
            Self::Cjk
        }
    }
}

/// A resolved scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEncoding {
    /// Label as requested (kept for notices).
    pub label: String,
    pub encoding: &'static Encoding,
    pub family: EncodingFamily,
}

impl TargetEncoding {
    /// Resolve a WHATWG label.
    ///
    /// The `replacement` encoding exists only to neutralize dangerous
    /// legacy labels, so it counts as unsupported.
    pub fn for_label(label: &str) -> Result<Self, ScanError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .filter(|&encoding| encoding != encoding_rs::REPLACEMENT)
            .ok_or_else(|| ScanError::EncodingUnsupported(label.to_string()))?;

        Ok(Self {
            label: label.to_string(),
            encoding,
            family: EncodingFamily::of(encoding),
        })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl fmt::Display for TargetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representability queries the scanner depends on.
pub trait EncodingCapability: Send + Sync {
    fn resolve(&self, label: &str) -> Result<TargetEncoding, ScanError> {
        TargetEncoding::for_label(label)
    }

    /// Whether the whole `text` converts without loss.
    fn can_represent(&self, text: &str, encoding: &TargetEncoding) -> bool;

    /// Best-effort replacement for a character that does not convert.
    fn try_encode(&self, character: &str, encoding: &TargetEncoding) -> Option<String>;
}
