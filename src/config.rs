//! # Configuration
//!
//! [`MappingConfig`] carries every knob of one mapping invocation. It can
//! be built in code, from a YAML document, or from the frontmatter block of
//! a source text (see [`crate::map_source`]).
//!
//! ## YAML Keys
//! All keys are optional; missing keys keep their default.
//! ```yaml
//! mode: phonemes          # letters | letters-and-digits | phonemes
//! tonic: A                # A-G with optional # or b
//! scale: minor            # minor | major (letter rule only)
//! alternate-mode: false   # alternate minor/major per letter
//! target-seconds: 8.0
//! min-event-seconds: 0.05
//! consonant-ticks: false
//! max-input-chars: 160
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;
use crate::pitch::{ScaleMode, Tonic};

pub const DEFAULT_TARGET_SECONDS: f64 = 8.0;
pub const DEFAULT_MIN_EVENT_SECONDS: f64 = 0.05;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 160;

/// Which classification rules the tokenizer applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Letters become notes; digits are unsupported
    Letters,
    /// Letters become notes, digit runs become chords
    #[default]
    LettersAndDigits,
    /// Words become phonemes, vowels become notes
    Phonemes,
}

impl FromStr for InputMode {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "letters" | "letters-only" => Ok(InputMode::Letters),
            "letters-and-digits" | "digits" => Ok(InputMode::LettersAndDigits),
            "phonemes" => Ok(InputMode::Phonemes),
            other => Err(MappingError::config(
                "mode",
                format!(
                    "unknown mode '{}', expected letters, letters-and-digits or phonemes",
                    other
                ),
            )),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMode::Letters => "letters",
            InputMode::LettersAndDigits => "letters-and-digits",
            InputMode::Phonemes => "phonemes",
        };
        f.write_str(name)
    }
}

/// Configuration for one mapping invocation
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    pub mode: InputMode,
    pub tonic: Tonic,
    /// Scale used by the letter rule. Digits and phonemes always use the
    /// natural minor scale on the tonic.
    pub letter_scale: ScaleMode,
    /// Alternate the letter scale between `letter_scale` and its parallel
    /// mode on every other letter.
    pub alternate_mode: bool,
    pub target_seconds: f64,
    /// Floor for any single event; 0 disables flooring.
    pub min_event_seconds: f64,
    /// Consonant phonemes produce a low tick instead of a rest.
    pub consonant_ticks: bool,
    /// Input beyond this many characters is cut at a token boundary.
    pub max_input_chars: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::default(),
            tonic: Tonic::default(),
            letter_scale: ScaleMode::Minor,
            alternate_mode: false,
            target_seconds: DEFAULT_TARGET_SECONDS,
            min_event_seconds: DEFAULT_MIN_EVENT_SECONDS,
            consonant_ticks: false,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub mode: Option<String>,
    pub tonic: Option<String>,
    pub scale: Option<String>,
    pub alternate_mode: Option<bool>,
    pub target_seconds: Option<f64>,
    pub min_event_seconds: Option<f64>,
    pub consonant_ticks: Option<bool>,
    pub max_input_chars: Option<usize>,
}

impl MappingConfig {
    /// Parse a YAML document layered over the defaults.
    ///
    /// The result is validated, so a document that parses always yields a
    /// usable configuration.
    ///
    /// # Example
    /// ```
    /// use pianotrainer::{InputMode, MappingConfig};
    ///
    /// let config = MappingConfig::from_yaml("mode: phonemes\ntarget-seconds: 4").unwrap();
    /// assert_eq!(config.mode, InputMode::Phonemes);
    /// assert_eq!(config.target_seconds, 4.0);
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, MappingError> {
        // An empty document deserializes as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(content)
            .map_err(|e| MappingError::MetadataError(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, MappingError> {
        let mut config = Self::default();

        if let Some(mode) = &raw.mode {
            config.mode = mode.parse()?;
        }
        if let Some(tonic) = &raw.tonic {
            config.tonic = tonic.parse()?;
        }
        if let Some(scale) = &raw.scale {
            config.letter_scale = scale.parse()?;
        }
        if let Some(alternate) = raw.alternate_mode {
            config.alternate_mode = alternate;
        }
        if let Some(seconds) = raw.target_seconds {
            config.target_seconds = seconds;
        }
        if let Some(floor) = raw.min_event_seconds {
            config.min_event_seconds = floor;
        }
        if let Some(ticks) = raw.consonant_ticks {
            config.consonant_ticks = ticks;
        }
        if let Some(max) = raw.max_input_chars {
            config.max_input_chars = max;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), MappingError> {
        if !self.target_seconds.is_finite() || self.target_seconds <= 0.0 {
            return Err(MappingError::config(
                "target-seconds",
                format!(
                    "must be a positive number of seconds, got {}",
                    self.target_seconds
                ),
            ));
        }
        if !self.min_event_seconds.is_finite() || self.min_event_seconds < 0.0 {
            return Err(MappingError::config(
                "min-event-seconds",
                format!(
                    "must be zero or a positive number of seconds, got {}",
                    self.min_event_seconds
                ),
            ));
        }
        if self.max_input_chars == 0 {
            return Err(MappingError::config(
                "max-input-chars",
                "must allow at least one character",
            ));
        }
        Ok(())
    }
}
