//! `incompat scan` - one-shot synchronous scan.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use super::common::{read_text, render_rows};
use crate::config::EngineConfig;
use crate::core::{PanelState, ScanResult};
use crate::encoding::StandardEncodings;
use crate::scanner::{CancelFlag, CompatibilityScanner};
use crate::source::LineIndex;
use crate::{debug, log};

/// Scan `file` once and print the report.
///
/// Returns whether anything was found.
pub fn scan_file(config: &EngineConfig, file: &Path) -> Result<bool> {
    let text = read_text(file)?;
    let state = scan_text(config, &text)?;

    log!("scan"; "{} ({})", state.summary(), state.result.encoding);
    if state.count() == 0 {
        return Ok(false);
    }

    let lines = LineIndex::new(&text);
    println!(
        "{}",
        render_rows(
            state.occurrences(),
            |o| lines.location(o.range.start),
            config.report.max_rows,
        )
    );
    Ok(true)
}

/// Run the scanner over `text` with the configured encoding.
fn scan_text(config: &EngineConfig, text: &str) -> Result<PanelState> {
    let scanner =
        CompatibilityScanner::new(Arc::new(StandardEncodings::new(config.scan.substitutes)));
    let encoding = scanner.provider().resolve(&config.scan.encoding)?;
    debug!("scan"; "target {} ({:?})", encoding, encoding.family);

    let occurrences = scanner.scan(text, &encoding, 1, &CancelFlag::new())?;
    Ok(PanelState {
        is_scanning: false,
        result: Arc::new(ScanResult {
            generation: 1,
            version: 0,
            encoding: config.scan.encoding.clone(),
            occurrences,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;

    fn config(encoding: &str, substitutes: bool) -> EngineConfig {
        EngineConfig {
            scan: ScanConfig {
                encoding: encoding.to_string(),
                substitutes,
            },
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_scan_text() {
        let state = scan_text(&config("shift_jis", true), "a~b\\c").unwrap();
        assert_eq!(state.count(), 2);
        assert_eq!(state.summary(), "Found 2 incompatible characters.");
        assert_eq!(state.occurrences()[1].substitute.as_deref(), Some("¥"));
    }

    #[test]
    fn test_scan_text_without_substitutes() {
        let state = scan_text(&config("shift_jis", false), "~").unwrap();
        assert_eq!(state.occurrences()[0].substitute, None);
    }

    #[test]
    fn test_scan_text_unsupported_encoding() {
        assert!(scan_text(&config("klingon", true), "~").is_err());
    }

    #[test]
    fn test_scan_file_reports_findings() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.txt");
        let dirty = dir.path().join("dirty.txt");
        std::fs::write(&clean, "plain ascii\n").unwrap();
        std::fs::write(&dirty, "tilde ~\n").unwrap();

        let config = config("shift_jis", true);
        assert!(!scan_file(&config, &clean).unwrap());
        assert!(scan_file(&config, &dirty).unwrap());
    }
}
