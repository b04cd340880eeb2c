//! Scan results and the published panel state.

use std::sync::Arc;

use super::occurrence::{Occurrence, OccurrenceId};

/// Ordered occurrences computed from one text version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub generation: u64,
    /// Text version the scan read.
    pub version: u64,
    pub encoding: String,
    pub occurrences: Vec<Occurrence>,
}

impl ScanResult {
    pub fn empty(generation: u64, version: u64, encoding: impl Into<String>) -> Self {
        Self {
            generation,
            version,
            encoding: encoding.into(),
            occurrences: Vec::new(),
        }
    }

    pub fn find(&self, id: OccurrenceId) -> Option<&Occurrence> {
        if id.generation != self.generation {
            return None;
        }
        self.occurrences
            .get(id.index as usize)
            .filter(|occurrence| occurrence.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning(u64),
    /// Outstanding work that will never be honored (deactivated mid-scan).
    Superseded(u64),
}

impl ScanState {
    #[inline]
    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning(_))
    }
}

/// Table column the panel sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Location,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// What a side panel observes.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub is_scanning: bool,
    pub result: Arc<ScanResult>,
}

impl PanelState {
    #[inline]
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.result.occurrences
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.result.len()
    }

    pub fn summary(&self) -> String {
        if self.is_scanning {
            "Scanning incompatible characters…".to_string()
        } else if self.result.is_empty() {
            "No issues found.".to_string()
        } else {
            format!("Found {} incompatible characters.", self.count())
        }
    }

    /// Rows reordered for display. Ids are untouched, so selection keeps
    /// working on a sorted view.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&Occurrence> {
        let mut rows: Vec<&Occurrence> = self.occurrences().iter().collect();
        rows.sort_by(|a, b| {
            let ord = match key {
                SortKey::Location => a.range.start.cmp(&b.range.start),
                SortKey::Character => a
                    .character
                    .cmp(&b.character)
                    .then(a.range.start.cmp(&b.range.start)),
            };
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        rows
    }
}

impl PartialEq for PanelState {
    fn eq(&self, other: &Self) -> bool {
        self.is_scanning == other.is_scanning && self.result == other.result
    }
}
