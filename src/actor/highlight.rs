//! Highlight synchronization.
//!
//! Mirrors the committed result onto the editor surface and resolves
//! selection requests against the live buffer. Only the coordinator task
//! calls into this type.

use std::sync::Arc;

use crate::core::{Occurrence, OccurrenceId, ScanResult};
use crate::source::{HighlightSurface, TextSource};

pub struct HighlightSync {
    surface: Box<dyn HighlightSurface>,
    current: Arc<ScanResult>,
    /// Whether the surface carries decorations from us.
    highlighted: bool,
}

impl HighlightSync {
    pub fn new(surface: Box<dyn HighlightSurface>) -> Self {
        Self {
            surface,
            current: Arc::default(),
            highlighted: false,
        }
    }

    #[inline]
    pub fn current(&self) -> &Arc<ScanResult> {
        &self.current
    }

    /// Replace all decorations with one per occurrence.
    pub fn apply(&mut self, result: Arc<ScanResult>) {
        self.clear_surface();
        for occurrence in &result.occurrences {
            self.surface.highlight(occurrence.range);
        }
        self.highlighted = !result.is_empty();
        self.current = result;
    }

    /// Remove every decoration and forget the result.
    pub fn clear(&mut self) {
        self.clear_surface();
        self.current = Arc::default();
    }

    /// Select an occurrence of the current result.
    ///
    /// Ignored when the id is unknown or the range no longer fits a buffer
    /// of `buffer_len` characters (the text shrank since the scan).
    pub fn select(&mut self, id: OccurrenceId, buffer_len: usize) -> bool {
        let Some(occurrence) = self.current.find(id) else {
            return false;
        };
        if !occurrence.range.fits(buffer_len) {
            crate::debug!("highlight"; "selection {} out of bounds ({})", occurrence.range, buffer_len);
            return false;
        }
        self.surface.select(occurrence.range);
        true
    }

    fn clear_surface(&mut self) {
        if self.highlighted {
            self.surface.clear_highlights();
            self.highlighted = false;
        }
    }
}

/// Lazy occurrence → line and column lookup for table rows.
#[derive(Clone)]
pub struct LineResolver {
    source: Arc<dyn TextSource>,
}

impl LineResolver {
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self { source }
    }

    /// 1-based line of the occurrence's first character.
    pub fn line_number(&self, occurrence: &Occurrence) -> usize {
        self.source.line_number(occurrence.range.start)
    }

    /// 1-based (line, column) of the occurrence's first character.
    pub fn location(&self, occurrence: &Occurrence) -> (usize, usize) {
        self.source.location(occurrence.range.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CharRange;
    use crate::source::{MemoryDocument, RecordingSurface};

    fn result(generation: u64, ranges: &[(usize, usize)]) -> Arc<ScanResult> {
        let occurrences = ranges
            .iter()
            .enumerate()
            .map(|(index, &(start, end))| Occurrence {
                id: OccurrenceId {
                    generation,
                    index: index as u32,
                },
                range: CharRange::new(start, end),
                character: "~".to_string(),
                substitute: None,
            })
            .collect();
        Arc::new(ScanResult {
            generation,
            version: 0,
            encoding: "shift_jis".to_string(),
            occurrences,
        })
    }

    #[test]
    fn test_apply_replaces_decorations() {
        let surface = RecordingSurface::new();
        let mut sync = HighlightSync::new(Box::new(surface.clone()));

        sync.apply(result(1, &[(1, 2), (3, 4)]));
        assert_eq!(
            surface.log().highlights,
            vec![CharRange::new(1, 2), CharRange::new(3, 4)]
        );
        assert_eq!(surface.log().clears, 0);

        sync.apply(result(2, &[(5, 6)]));
        let log = surface.log();
        assert_eq!(log.highlights, vec![CharRange::new(5, 6)]);
        assert_eq!(log.clears, 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let surface = RecordingSurface::new();
        let mut sync = HighlightSync::new(Box::new(surface.clone()));

        let same = result(1, &[(1, 2), (3, 4)]);
        sync.apply(Arc::clone(&same));
        sync.apply(Arc::clone(&same));
        sync.apply(same);

        assert_eq!(
            surface.log().highlights,
            vec![CharRange::new(1, 2), CharRange::new(3, 4)]
        );
    }

    #[test]
    fn test_clear_without_highlights_is_noop() {
        let surface = RecordingSurface::new();
        let mut sync = HighlightSync::new(Box::new(surface.clone()));

        sync.clear();
        sync.apply(result(1, &[]));
        sync.clear();
        assert_eq!(surface.log().clears, 0);
    }

    #[test]
    fn test_select_checks_bounds() {
        let surface = RecordingSurface::new();
        let mut sync = HighlightSync::new(Box::new(surface.clone()));
        sync.apply(result(3, &[(1, 2), (8, 9)]));

        let far = OccurrenceId {
            generation: 3,
            index: 1,
        };
        assert!(!sync.select(far, 5));
        assert_eq!(surface.log().selection, None);

        let near = OccurrenceId {
            generation: 3,
            index: 0,
        };
        assert!(sync.select(near, 5));
        assert_eq!(surface.log().selection, Some(CharRange::new(1, 2)));
    }

    #[test]
    fn test_select_unknown_id() {
        let surface = RecordingSurface::new();
        let mut sync = HighlightSync::new(Box::new(surface.clone()));
        sync.apply(result(3, &[(1, 2)]));

        let stale = OccurrenceId {
            generation: 2,
            index: 0,
        };
        assert!(!sync.select(stale, 100));
        assert_eq!(surface.log().selection, None);
    }

    #[test]
    fn test_line_resolver() {
        let doc = Arc::new(MemoryDocument::new("a\n~\n\n~", "shift_jis"));
        let resolver = LineResolver::new(doc);
        let result = result(1, &[(2, 3), (5, 6)]);

        let lines: Vec<usize> = result
            .occurrences
            .iter()
            .map(|o| resolver.line_number(o))
            .collect();
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(resolver.location(&result.occurrences[1]), (4, 1));
    }
}
