//! Config field path used in diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `trigger.debounce_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Table the field lives in (`trigger` for `trigger.debounce_ms`).
    pub fn section(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(section, _)| section)
    }

    /// Key inside the table (`debounce_ms` for `trigger.debounce_ms`).
    pub fn key(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(_, key)| key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_and_key() {
        let path = FieldPath::new("trigger.debounce_ms");
        assert_eq!(path.section(), "trigger");
        assert_eq!(path.key(), "debounce_ms");

        let bare = FieldPath::new("scan");
        assert_eq!(bare.section(), "scan");
        assert_eq!(bare.key(), "scan");
    }
}
