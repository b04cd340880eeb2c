//! Per-family substitution rules.

use super::EncodingFamily;

/// Characters a family rejects even though `encoding_rs` maps them, the
/// replacements they get instead, and how decoded bytes read in the family.
pub(super) struct FamilyPolicy {
    excluded: &'static [char],
    table: &'static [(char, &'static str)],
    /// Decoded characters that the family displays as another character.
    reads_as: &'static [(char, char)],
}

/// Bytes 0x5C and 0x7E are JIS X 0201 Roman yen sign and overline, so a
/// Shift_JIS file cannot carry a backslash or tilde.
static SHIFT_JIS: FamilyPolicy = FamilyPolicy {
    excluded: &['\\', '~'],
    table: &[('\\', "¥"), ('~', "‾")],
    reads_as: &[('\\', '¥'), ('~', '‾')],
};

static NONE: FamilyPolicy = FamilyPolicy {
    excluded: &[],
    table: &[],
    reads_as: &[],
};

/// Replacements tried for every family before transliteration.
const COMMON: &[(char, &str)] = &[
    ('\u{00A0}', " "),
    ('\u{2007}', " "),
    ('\u{202F}', " "),
    ('\u{3000}', " "),
    ('\u{FEFF}', ""),
];

impl FamilyPolicy {
    pub(super) fn of(family: EncodingFamily) -> &'static Self {
        match family {
            EncodingFamily::ShiftJis => &SHIFT_JIS,
            _ => &NONE,
        }
    }

    #[inline]
    pub(super) fn excludes(&self, c: char) -> bool {
        self.excluded.contains(&c)
    }

    /// Whether `decoded` reads as `original` once the family's display
    /// rules are applied.
    pub(super) fn reads_back(&self, original: &str, decoded: &str) -> bool {
        if self.reads_as.is_empty() {
            return original == decoded;
        }
        original.chars().eq(decoded.chars().map(|c| {
            self.reads_as
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        }))
    }

    /// Table lookup for a single-scalar grapheme.
    pub(super) fn lookup(&self, character: &str) -> Option<&'static str> {
        let mut chars = character.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.table
            .iter()
            .chain(COMMON)
            .find(|(from, _)| *from == c)
            .map(|(_, to)| *to)
    }
}

/// ASCII transliteration of a grapheme.
///
/// Rejects syllable spellings: `deunicode` renders CJK ideographs as
/// romanized syllables followed by a space, which is not a substitute.
pub(super) fn transliterate(character: &str) -> Option<String> {
    let mut out = String::new();
    for c in character.chars() {
        out.push_str(deunicode::deunicode_char(c)?);
    }

    if out.ends_with(' ') || out.trim().is_empty() || out == character {
        return None;
    }
    Some(out)
}
