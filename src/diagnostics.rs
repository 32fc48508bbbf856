//! Non-fatal diagnostics collected during one mapping invocation.
//!
//! Diagnostics are informational: the UI may surface them, but every one
//! of them leaves a complete, playable event list behind.

use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Characters that have no mapping in the active mode
    UnsupportedCharacter,
    /// Input was cut at a token boundary to respect the length cap
    Truncated,
    /// Every event hit the duration floor, so the total exceeds the target
    DegenerateTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte range of the input the diagnostic refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_range: Option<Range<usize>>,
}

impl Diagnostic {
    pub fn unsupported(text: &str, range: Range<usize>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedCharacter,
            message: format!("Dropped unsupported character(s) {:?}", text),
            source_range: Some(range),
        }
    }

    pub fn truncated(kept_chars: usize, total_chars: usize, cut_at: usize) -> Self {
        Self {
            kind: DiagnosticKind::Truncated,
            message: format!(
                "Input truncated to {} of {} characters",
                kept_chars, total_chars
            ),
            source_range: Some(cut_at..cut_at),
        }
    }

    pub fn degenerate_timing(total_seconds: f64, target_seconds: f64) -> Self {
        Self {
            kind: DiagnosticKind::DegenerateTiming,
            message: format!(
                "Every event is at the minimum duration; total is {:.3}s instead of {:.3}s",
                total_seconds, target_seconds
            ),
            source_range: None,
        }
    }
}
