//! Incompatible character occurrences.
//!
//! Positions count Unicode scalar values from the start of the text, which is
//! how editor buffers address characters.

use std::fmt;

/// Half-open interval `[start, end)` of character positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharRange {
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the range still fits a buffer of `len` characters.
    #[inline]
    pub const fn fits(&self, len: usize) -> bool {
        self.end <= len
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Identity of an occurrence: the scan generation it came from plus its row.
///
/// Ids never repeat across generations, so a selection request made against
/// an older result cannot hit a row of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccurrenceId {
    pub generation: u64,
    pub index: u32,
}

/// One character the target encoding cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub range: CharRange,
    /// The grapheme cluster as it appears in the text.
    pub character: String,
    /// Best-effort replacement, if the encoding has one.
    pub substitute: Option<String>,
}

impl Occurrence {
    /// Printable form of the character.
    ///
    /// Controls and whitespace separators would render as nothing in a
    /// table, so they are shown as their code point instead.
    pub fn display_character(&self) -> String {
        match self.character.chars().next() {
            Some(c) if is_invisible(c) => format!("U+{:04X}", c as u32),
            _ => self.character.clone(),
        }
    }
}

fn is_invisible(c: char) -> bool {
    c.is_control() || c.is_whitespace() || matches!(c, '\u{2028}' | '\u{2029}')
}
