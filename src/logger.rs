//! Logging utilities with colored output and status display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` for output only shown with `--verbose`
//! - `ScanStatus` for the single-block status line of watch mode
//!
//! # Example
//!
//! ```ignore
//! log!("scan"; "{} incompatible characters", count);
//! debug!("coordinator"; "generation {} committed", generation);
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "scan" => prefix.bright_blue().bold().to_string(),
        "watch" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Scan Status (single-block status with overwrite)
// ============================================================================

/// Current UTC time formatted as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Status block for watch mode
///
/// Each message overwrites the previous block, so the terminal always shows
/// the panel summary for the latest committed result.
///
/// # Example
///
/// ```ignore
/// let mut status = ScanStatus::new();
/// status.scanning("Scanning incompatible characters…");
/// status.found("Found 2 incompatible characters.", "  1:2  ~  →  ‾");
/// ```
pub struct ScanStatus {
    /// Lines of previous output to clear
    last_lines: usize,
}

/// Global status display shared by the watch loop and the config watcher.
static SCAN_STATUS: LazyLock<Mutex<ScanStatus>> = LazyLock::new(|| Mutex::new(ScanStatus::new()));

impl ScanStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// Display an in-progress message (dimmed, no symbol).
    pub fn scanning(&mut self, message: &str) {
        self.display(String::new(), &format!("{}", message.dimmed()));
    }

    /// Display a clean result (✓ prefix, green).
    pub fn clean(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display findings (✗ prefix, red) followed by the table rows.
    pub fn found(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&mut self, detail: &str) {
        self.display(format!("{}", "⚠".yellow()), detail);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines.min(u16::MAX as usize) as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now()).dimmed().to_string();
        let line = if symbol.is_empty() {
            format!("{timestamp} {message}")
        } else {
            format!("{timestamp} {symbol} {message}")
        };

        writeln!(stdout, "{line}").ok();
        stdout.flush().ok();

        self.last_lines = line_count(message);
    }
}

/// Terminal lines a status message occupies.
#[inline]
fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

/// Global scan status: scanning
pub fn status_scanning(message: &str) {
    SCAN_STATUS.lock().scanning(message);
}

/// Global scan status: clean
pub fn status_clean(message: &str) {
    SCAN_STATUS.lock().clean(message);
}

/// Global scan status: found
pub fn status_found(summary: &str, detail: &str) {
    SCAN_STATUS.lock().found(summary, detail);
}

/// Global scan status: warning
pub fn status_warning(detail: &str) {
    SCAN_STATUS.lock().warning(detail);
}

// ============================================================================
// Tests
// ============================================================================
