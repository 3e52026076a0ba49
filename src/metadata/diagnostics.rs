//! Diagnostics collected while weaving a module.
//!
//! Guard injection never aborts a pass: a method that can not be guarded is left untouched and
//! the failure is recorded here, so the driving pipeline can finish the pass and then fail the
//! build if any error was recorded (see [`Diagnostics::into_result`]).
//!
//! The container is append-only and takes `&self` for every push, so one instance can be shared
//! by workers processing different methods.
//!
//! # Examples
//!
//! ```rust
//! use dotguard::metadata::{
//!     diagnostics::{DiagnosticCategory, Diagnostics},
//!     token::Token,
//! };
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.warning(DiagnosticCategory::Method, "guard on a static method", Token::new(0x0600_0001));
//! assert!(!diagnostics.has_errors());
//! assert!(diagnostics.into_result().is_ok());
//! ```

use std::fmt;

use crate::{metadata::token::Token, Error, Result};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Something suspicious that does not fail the build
    Warning,
    /// A method could not be processed; fails the build
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Area a diagnostic entry relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Guard injection
    Guard,
    /// Shape of a guarded method
    Method,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Guard => write!(f, "Guard"),
            DiagnosticCategory::Method => write!(f, "Method"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity
    pub severity: DiagnosticSeverity,
    /// Category
    pub category: DiagnosticCategory,
    /// Message
    pub message: String,
    /// Token of the offending method or type, if known
    pub token: Option<Token>,
}

impl Diagnostic {
    /// Create a new entry without location
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            token: None,
        }
    }

    /// Attach the token of the offending item
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(token) = self.token {
            write!(f, " (token: {token})")?;
        }

        Ok(())
    }
}

/// Append-only, thread-safe collection of diagnostics.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Record a warning about the item identified by `token`
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>, token: Token) {
        self.push(
            Diagnostic::new(DiagnosticSeverity::Warning, category, message).with_token(token),
        );
    }

    /// Record an error raised while processing the item identified by `token`
    pub fn report(&self, category: DiagnosticCategory, error: &Error, token: Token) {
        self.push(
            Diagnostic::new(DiagnosticSeverity::Error, category, error.to_string())
                .with_token(token),
        );
    }

    /// Record a prepared entry
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if anything was recorded
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if an error was recorded
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if a warning was recorded
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Number of entries
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Error)
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Warning)
    }

    /// Iterate all entries in recording order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// All errors
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect()
    }

    /// All entries of one category
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Turn the outcome of a pass into a `Result`.
    ///
    /// # Errors
    /// Returns [`Error::WeavingFailed`] with the number of errors if any error was recorded.
    pub fn into_result(self) -> Result<()> {
        match self.error_count() {
            0 => Ok(()),
            errors => Err(Error::WeavingFailed(errors)),
        }
    }

    fn count_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == severity)
            .count()
    }
}
