//! Malformed construct reporting for strict rendering.

use std::fmt;
use thiserror::Error;

/// Kind of malformed construct found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Opening code fence without a closing fence.
    UnclosedFence,
    /// Backtick without a matching closing backtick on the same line.
    UnclosedCodeSpan,
    /// Emphasis or strikethrough delimiter run without a closing run.
    UnmatchedDelimiter(&'static str),
    /// `[label](` or `![alt](` without a closing parenthesis.
    MalformedLink,
    /// Table row whose cell count differs from the first row of its table.
    RaggedTableRow { expected: usize, found: usize },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnclosedFence => write!(f, "code fence is never closed"),
            DiagnosticKind::UnclosedCodeSpan => write!(f, "inline code span is never closed"),
            DiagnosticKind::UnmatchedDelimiter(delim) => {
                write!(f, "`{}` has no matching closing delimiter", delim)
            }
            DiagnosticKind::MalformedLink => write!(f, "link target is missing `)`"),
            DiagnosticKind::RaggedTableRow { expected, found } => {
                write!(f, "table row has {} cells, expected {}", found, expected)
            }
        }
    }
}

/// A malformed construct with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub(crate) fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Error returned by strict rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed markdown at {diagnostic} ({total} issue(s) in total)")]
    Malformed { diagnostic: Diagnostic, total: usize },
}

impl RenderError {
    /// First diagnostic that caused the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            RenderError::Malformed { diagnostic, .. } => diagnostic,
        }
    }
}
