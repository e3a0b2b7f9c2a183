//! Non-fatal compilation diagnostics.
//!
//! Fallbacks taken by the compiler (assumed target name, synthesized active
//! field names) are reported here and mirrored to `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Info,
}

/// Diagnostic codes for categorizing fallbacks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// `target_fields` not set, default target name used.
    TargetFieldAssumed,
    /// `active_fields` not set, `x1..xN` synthesized.
    ActiveFieldsAssumed,
    /// Verification data supplied for an unsupervised estimator.
    VerificationIgnored,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Collector threaded through one compilation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(code, message);
        tracing::warn!(code = ?diagnostic.code, "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    pub fn info(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let diagnostic = Diagnostic::info(code, message);
        tracing::info!(code = ?diagnostic.code, "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
