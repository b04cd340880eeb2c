//! Report table shared by the scan and watch commands.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::core::Occurrence;

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

/// One row per occurrence: `line:column  character  →  converted`.
///
/// `locate` maps an occurrence to its 1-based (line, column). At most
/// `max_rows` rows are rendered; the rest are counted in a footer.
pub fn render_rows(
    occurrences: &[Occurrence],
    locate: impl Fn(&Occurrence) -> (usize, usize),
    max_rows: usize,
) -> String {
    let mut rows = Vec::with_capacity(occurrences.len().min(max_rows) + 1);

    for occurrence in occurrences.iter().take(max_rows) {
        let (line, column) = locate(occurrence);
        let location = format!("{line}:{column}");
        let converted = match &occurrence.substitute {
            Some(substitute) if substitute.is_empty() => "(removed)".dimmed().to_string(),
            Some(substitute) => substitute.green().to_string(),
            None => "(none)".dimmed().to_string(),
        };
        rows.push(format!(
            "  {:>9}  {}  →  {}",
            location.dimmed(),
            occurrence.display_character().red(),
            converted
        ));
    }

    let hidden = occurrences.len().saturating_sub(max_rows);
    if hidden > 0 {
        rows.push(format!("  ... and {hidden} more"));
    }

    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharRange, OccurrenceId};
    use crate::source::LineIndex;

    fn occurrence(index: u32, range: (usize, usize), character: &str, sub: Option<&str>) -> Occurrence {
        Occurrence {
            id: OccurrenceId {
                generation: 1,
                index,
            },
            range: CharRange::new(range.0, range.1),
            character: character.to_string(),
            substitute: sub.map(str::to_string),
        }
    }

    #[test]
    fn test_render_rows() {
        let lines = LineIndex::new("a~\n\u{3000}x");
        let rows = render_rows(
            &[
                occurrence(0, (1, 2), "~", Some("‾")),
                occurrence(1, (3, 4), "\u{3000}", Some(" ")),
                occurrence(2, (4, 5), "x", None),
            ],
            |o| lines.location(o.range.start),
            10,
        );
        let rows: Vec<_> = rows.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("1:2") && rows[0].contains('~') && rows[0].contains('‾'));
        assert!(rows[1].contains("2:1") && rows[1].contains("U+3000"));
        assert!(rows[2].contains("2:2") && rows[2].contains("(none)"));
    }

    #[test]
    fn test_render_rows_truncates() {
        let lines = LineIndex::new("~~~");
        let all: Vec<_> = (0..3)
            .map(|i| occurrence(i, (i as usize, i as usize + 1), "~", None))
            .collect();

        let rows = render_rows(&all, |o| lines.location(o.range.start), 2);
        assert_eq!(rows.lines().count(), 3);
        assert!(rows.ends_with("... and 1 more"));
    }

    #[test]
    fn test_read_text_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }
}
