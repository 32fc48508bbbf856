//! # Public API
//!
//! Entry points of the mapping engine.
//!
//! ## Mapping Functions
//!
//! - [`map_text()`] - Events plus diagnostics and the total duration
//! - [`map_text_to_events()`] - Events only
//! - [`map_source()`] - Text with an optional YAML frontmatter block that
//!   configures the mapping
//!
//! ## Typical Usage
//!
//! ```rust
//! use pianotrainer::{map_text, MappingConfig};
//!
//! let output = map_text("Hi 21!", &MappingConfig::default())?;
//! for event in &output.events {
//!     println!("{:?} {:?} {:.2}s", event.kind, event.pitches, event.duration_seconds);
//! }
//! assert!((output.total_seconds - 8.0).abs() < 1e-6);
//! # Ok::<(), pianotrainer::MappingError>(())
//! ```
//!
//! ## Frontmatter
//!
//! ```rust
//! use pianotrainer::{map_source, EventKind};
//!
//! let source = r#"---
//! mode: letters
//! tonic: E
//! target-seconds: 4
//! ---
//! ef"#;
//!
//! let output = map_source(source)?;
//! assert_eq!(output.events[1].pitches[0].to_string(), "F#4");
//! assert!(output.events.iter().all(|e| e.kind == EventKind::Note));
//! # Ok::<(), pianotrainer::MappingError>(())
//! ```

use log::debug;
use serde::Serialize;

use crate::config::MappingConfig;
use crate::diagnostics::Diagnostic;
use crate::error::MappingError;
use crate::mapping::{map_tokens, MappingRules, MusicEvent};
use crate::timeline::Timeline;
use crate::timing::normalize_events;
use crate::token::{tokenize, truncate_tokens, TokenStream};

/// Result of one mapping invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingOutput {
    pub events: Vec<MusicEvent>,
    pub diagnostics: Vec<Diagnostic>,
    pub total_seconds: f64,
}

impl MappingOutput {
    pub fn timeline(&self) -> Timeline<'_> {
        Timeline::new(&self.events)
    }
}

/// Map a text to a time-normalized event sequence.
///
/// # Pipeline
/// 1. Validate the configuration
/// 2. Tokenize in the configured mode and apply the length cap
/// 3. Fold the tokens into weighted events
/// 4. Normalize the weights to the target duration
///
/// Input with no mappable content yields a single rest spanning the target.
///
/// # Errors
/// Returns [`MappingError::ConfigError`] for an unusable configuration.
/// Nothing about the input text itself is an error.
pub fn map_text(input: &str, config: &MappingConfig) -> Result<MappingOutput, MappingError> {
    config.validate()?;

    let TokenStream {
        mut tokens,
        mut diagnostics,
    } = tokenize(input, config.mode);

    if let Some(cut) = truncate_tokens(&mut tokens, input, config.max_input_chars) {
        let cut_at = cut.source_range.as_ref().map_or(input.len(), |r| r.start);
        diagnostics.retain(|d| d.source_range.as_ref().map_or(true, |r| r.start < cut_at));
        diagnostics.push(cut);
    }

    let rules = MappingRules::from_config(config);
    let mut events = map_tokens(&tokens, &rules);
    if events.is_empty() {
        events.push(MusicEvent::rest(config.target_seconds, None));
    }

    if let Some(diagnostic) =
        normalize_events(&mut events, config.target_seconds, config.min_event_seconds)
    {
        diagnostics.push(diagnostic);
    }

    let total_seconds = events.iter().map(|e| e.duration_seconds).sum();
    debug!(
        "Mapped {} tokens to {} events ({:.3}s, mode {}, {} diagnostics)",
        tokens.len(),
        events.len(),
        total_seconds,
        config.mode,
        diagnostics.len()
    );

    Ok(MappingOutput {
        events,
        diagnostics,
        total_seconds,
    })
}

/// Map a text and return only the events.
///
/// # Example
/// ```rust
/// use pianotrainer::{map_text_to_events, MappingConfig};
///
/// let events = map_text_to_events("21", &MappingConfig::default())?;
/// let labels: Vec<_> = events.iter().map(|e| e.label.as_deref()).collect();
/// assert_eq!(labels, vec![Some("20"), Some("1")]);
/// # Ok::<(), pianotrainer::MappingError>(())
/// ```
pub fn map_text_to_events(
    input: &str,
    config: &MappingConfig,
) -> Result<Vec<MusicEvent>, MappingError> {
    Ok(map_text(input, config)?.events)
}

/// Map a text whose optional `---` frontmatter block configures the run.
///
/// The block must open on the first line. Its keys are those of
/// [`MappingConfig::from_yaml`]. Source ranges in the output refer to the
/// text after the block.
///
/// # Errors
/// Returns [`MappingError::MetadataError`] for malformed YAML and
/// [`MappingError::ConfigError`] for unusable values.
pub fn map_source(source: &str) -> Result<MappingOutput, MappingError> {
    let (metadata, body) = extract_frontmatter(source);
    let config = match metadata {
        Some(yaml) => MappingConfig::from_yaml(yaml)?,
        None => MappingConfig::default(),
    };
    map_text(body, &config)
}

/// Split a leading `---` delimited block from the rest of the source.
///
/// Returns `(None, source)` when the first line is not `---` or the block
/// is never closed.
fn extract_frontmatter(source: &str) -> (Option<&str>, &str) {
    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim() == "---" => {}
        _ => return (None, source),
    }

    let metadata_start = source.find('\n').map_or(source.len(), |i| i + 1);
    let mut offset = metadata_start;
    for line in lines {
        let line_end = offset + line.len();
        if line.trim() == "---" {
            return (Some(&source[metadata_start..offset]), &source[line_end..]);
        }
        offset = line_end;
    }

    (None, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputMode;
    use crate::diagnostics::DiagnosticKind;
    use crate::mapping::EventKind;

    #[test]
    fn test_extract_frontmatter() {
        let (meta, body) = extract_frontmatter("---\nmode: letters\n---\nabc");
        assert_eq!(meta, Some("mode: letters\n"));
        assert_eq!(body, "abc");
    }

    #[test]
    fn test_extract_frontmatter_absent_or_unclosed() {
        assert_eq!(extract_frontmatter("abc"), (None, "abc"));
        let unclosed = "---\nmode: letters\nabc";
        assert_eq!(extract_frontmatter(unclosed), (None, unclosed));
        // A block further down is plain text
        assert_eq!(extract_frontmatter("a\n---\nb\n---\n").0, None);
    }

    #[test]
    fn test_extract_empty_frontmatter() {
        let (meta, body) = extract_frontmatter("---\n---\nabc\n");
        assert_eq!(meta, Some(""));
        assert_eq!(body, "abc\n");
    }

    #[test]
    fn test_empty_input_is_one_rest() {
        let output = map_text("", &MappingConfig::default()).unwrap();
        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].kind, EventKind::Rest);
        assert_eq!(output.events[0].duration_seconds, 8.0);
        assert_eq!(output.events[0].label, None);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_only_unsupported_is_one_rest_with_diagnostic() {
        let output = map_text("😀😀", &MappingConfig::default()).unwrap();
        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].kind, EventKind::Rest);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::UnsupportedCharacter);
    }

    #[test]
    fn test_invalid_config_rejected_before_mapping() {
        let config = MappingConfig {
            target_seconds: -1.0,
            ..MappingConfig::default()
        };
        assert!(matches!(
            map_text("abc", &config),
            Err(MappingError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_truncation_drops_later_diagnostics() {
        let config = MappingConfig {
            max_input_chars: 3,
            mode: InputMode::Letters,
            ..MappingConfig::default()
        };
        let output = map_text("ab😀cd😀", &config).unwrap();
        let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::UnsupportedCharacter, DiagnosticKind::Truncated]
        );
        assert_eq!(output.events.len(), 2);
    }

    #[test]
    fn test_degenerate_timing_reported() {
        let config = MappingConfig {
            target_seconds: 0.5,
            min_event_seconds: 0.1,
            ..MappingConfig::default()
        };
        let output = map_text("abcdefghij", &config).unwrap();
        assert!(output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::DegenerateTiming));
        assert!((output.total_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_map_source_without_frontmatter_uses_defaults() {
        assert_eq!(
            map_source("ab 12").unwrap(),
            map_text("ab 12", &MappingConfig::default()).unwrap()
        );
    }

    #[test]
    fn test_map_source_bad_yaml() {
        let result = map_source("---\nmode: [\n---\nabc");
        assert!(matches!(result, Err(MappingError::MetadataError(_))));
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let output = map_text("a1", &MappingConfig::default()).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["totalSeconds"].is_f64());
        assert_eq!(json["events"][0]["type"], "NOTE");
        assert_eq!(json["events"][0]["pitches"][0], "A3");
        assert_eq!(json["events"][1]["type"], "CHORD");
        assert_eq!(json["events"][1]["durationSeconds"], 4.0);
        assert_eq!(json["events"][1]["startSeconds"], 4.0);
        assert_eq!(json["events"][1]["sourceRange"]["start"], 1);
    }
}
