use std::fmt;

use serde::Serialize;

use crate::resolver::stage::StageId;

/// Severity accepted by the logger sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A legacy signal was honoured; a newer one is recommended.
    Deprecation,
    /// A legacy signal was ignored because an explicit override exists.
    IgnoredLegacy,
    /// Two explicit overrides disagree; the last declared one won.
    AmbiguousOverride,
    /// A default was supplied where a signal was expected.
    DefaultApplied,
    /// An annotation payload could not be interpreted.
    MalformedAnnotation,
}

/// One message attached to a record during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub stage: StageId,
    pub tier: u8,
    pub message: String,
}

impl Diagnostic {
    pub fn info(stage: StageId, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            kind,
            stage,
            tier: stage.tier(),
            message: message.into(),
        }
    }

    pub fn warning(stage: StageId, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            kind,
            stage,
            tier: stage.tier(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.stage, self.message)
    }
}
