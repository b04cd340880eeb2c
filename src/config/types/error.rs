//! Config loading errors and validation diagnostics.
//!
//! Diagnostics render grouped by table, in the order the tables were
//! validated:
//!
//! ```text
//! incompat.toml has 2 invalid settings
//! [scan]
//!   encoding: encoding `klingon` is not supported
//!     try: use a WHATWG label such as `shift_jis`
//! [report]
//!   max_rows: must be greater than 0
//! ```

use std::fmt;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use super::FieldPath;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    // Rendered in full by its own Display; no #[source] so it prints once
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One invalid setting.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    /// Suggested fix, if there is an obvious one.
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    pub fn new(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field.key().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {}", "try:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Every invalid setting found by one validation pass.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic::new(field, message));
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors
            .push(ConfigDiagnostic::new(field, message).with_hint(hint));
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 {
            "setting"
        } else {
            "settings"
        };
        write!(
            f,
            "{}",
            format_args!("incompat.toml has {} invalid {noun}", self.errors.len())
                .red()
                .bold()
        )?;

        let mut section = None;
        for diagnostic in &self.errors {
            let current = diagnostic.field.section();
            if section != Some(current) {
                write!(f, "\n{}", format_args!("[{current}]").dimmed())?;
                section = Some(current);
            }
            write!(f, "\n{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
