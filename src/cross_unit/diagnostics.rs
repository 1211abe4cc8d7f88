//! Reporting of cross-unit failures to the caller.
//!
//! Hard failures met while resolving (unreadable or malformed index, unit
//! snapshots that fail to load) are absorbed by the resolver and recorded
//! here exactly once. A symbol that simply cannot be found is never a
//! diagnostic.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::project::{IndexError, LoadError};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message, optionally pointing at a file and line.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "X0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// The file the diagnostic is about.
    pub path: Option<PathBuf>,
    /// 1-based line within `path`.
    pub line: Option<usize>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    /// Set the file this diagnostic refers to.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the line this diagnostic refers to.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for cross-unit failures.
pub mod codes {
    /// The index file could not be opened.
    pub const MISSING_INDEX_FILE: &str = "X0001";
    /// A record of the index file is malformed.
    pub const INVALID_INDEX_FORMAT: &str = "X0002";
    /// The same symbol id appears twice in the index.
    pub const MULTIPLE_DEFINITIONS: &str = "X0003";
    /// A unit snapshot named by the index could not be loaded.
    pub const UNIT_LOAD_FAILURE: &str = "X0004";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during a resolution session.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a failed index parse.
    pub fn index_error(&mut self, index_path: &Path, error: &IndexError) {
        let diag = match error {
            IndexError::MissingIndexFile { .. } => Diagnostic::error(format!(
                "error opening file '{}': required by cross-unit resolution",
                index_path.display()
            ))
            .with_code(codes::MISSING_INDEX_FILE),
            IndexError::InvalidIndexFormat { line } => Diagnostic::error(format!(
                "error parsing index file '{}' line {}: expected '<symbol-id> <path>'",
                index_path.display(),
                line
            ))
            .with_line(*line)
            .with_code(codes::INVALID_INDEX_FORMAT),
            IndexError::MultipleDefinitions { line, id } => Diagnostic::error(format!(
                "index file '{}' line {}: '{}' is already mapped to another unit",
                index_path.display(),
                line,
                id
            ))
            .with_line(*line)
            .with_code(codes::MULTIPLE_DEFINITIONS),
        };
        self.add(diag.with_path(index_path));
    }

    /// Report a unit snapshot that could not be loaded.
    pub fn unit_load_failure(&mut self, error: &LoadError) {
        self.add(
            Diagnostic::warning(format!("cross-unit definition unavailable: {error}"))
                .with_path(error.path())
                .with_code(codes::UNIT_LOAD_FAILURE),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
