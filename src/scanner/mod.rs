//! Compatibility scanner.
//!
//! Maps a text snapshot and a target encoding to the ordered list of
//! grapheme clusters the encoding cannot represent.
//!
//! ```text
//! text ─┬─ can_represent? ──yes──▶ []                    (one pass)
//!       └─ no ──▶ graphemes ──▶ test each ──▶ [Occurrence]  (cancellable)
//! ```
//!
//! Delivery is all-or-nothing: a cancelled scan returns
//! [`ScanError::Cancelled`] and drops whatever it had collected.

mod cancel;


use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::core::{CharRange, Occurrence, OccurrenceId, ScanError};
use crate::encoding::{EncodingCapability, TargetEncoding};

pub use cancel::CancelFlag;

/// Stateless scanner over a shared capability provider.
#[derive(Clone)]
pub struct CompatibilityScanner {
    provider: Arc<dyn EncodingCapability>,
}

impl CompatibilityScanner {
    pub fn new(provider: Arc<dyn EncodingCapability>) -> Self {
        Self { provider }
    }

    #[inline]
    pub fn provider(&self) -> &dyn EncodingCapability {
        self.provider.as_ref()
    }

    /// Resolve `label` and scan. Unsupported labels surface as
    /// [`ScanError::EncodingUnsupported`].
    pub fn scan_label(
        &self,
        text: &str,
        label: &str,
        generation: u64,
        cancel: &CancelFlag,
    ) -> Result<Vec<Occurrence>, ScanError> {
        let encoding = self.provider.resolve(label)?;
        self.scan(text, &encoding, generation, cancel)
    }

    /// Scan `text` for characters `encoding` cannot represent.
    ///
    /// Occurrence ids carry `generation` so rows from different scans never
    /// collide.
    pub fn scan(
        &self,
        text: &str,
        encoding: &TargetEncoding,
        generation: u64,
        cancel: &CancelFlag,
    ) -> Result<Vec<Occurrence>, ScanError> {
        cancel.check()?;

        if self.provider.can_represent(text, encoding) {
            return Ok(Vec::new());
        }

        let mut occurrences = Vec::new();
        let mut position = 0;

        for grapheme in text.graphemes(true) {
            cancel.check()?;

            let width = grapheme.chars().count();
            let range = CharRange::new(position, position + width);
            position += width;

            if self.provider.can_represent(grapheme, encoding) {
                continue;
            }

            #[allow(clippy::cast_possible_truncation)]
            let index = occurrences.len() as u32;
            occurrences.push(Occurrence {
                id: OccurrenceId { generation, index },
                range,
                character: grapheme.to_string(),
                substitute: self.provider.try_encode(grapheme, encoding),
            });
        }

        Ok(occurrences)
    }
}
