//! # Mapping Rules
//!
//! Converts a token stream into musical events with relative durations.
//!
//! ## Pipeline Position
//! `tokenize` → **`map_tokens`** → `normalize_events`
//!
//! Every event produced here carries a *relative weight* in
//! `duration_seconds`; the timing normalizer turns the weights into
//! absolute seconds afterwards.
//!
//! ## Rules
//! - **Letter** → NOTE. Letters fold onto A-G (H→A, I→B, …). A letter
//!   that spells the tonic sounds in the bass octave; every other letter,
//!   including one that only folds onto the tonic, sounds in the treble
//!   octave. With alternate mode on, every second letter uses the parallel
//!   scale.
//! - **Digit run** → CHORDs, see [`decompose_digits`]. Zero is a low tick.
//! - **Symbol** → short REST from the symbol table.
//! - **Space** → REST.
//! - **Vowel** → NOTE chosen from the vowel's candidate steps, avoiding
//!   the previous pitch letter.
//! - **Diphthong** → two NOTEs gliding between its start and end vowels.
//! - **Consonant** → short REST, or a tick when consonant ticks are on.
//! - **Unsupported** → nothing.
//!
//! ## Context
//! The rules are stateless apart from [`FoldState`], which is threaded
//! through one left-to-right fold over the tokens and dropped afterwards.

use serde::Serialize;
use std::ops::Range;

use crate::config::MappingConfig;
use crate::pitch::{Key, NoteName, Pitch, ScaleMode};
use crate::tables::{self, ChordSpec};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Note,
    Chord,
    Rest,
}

/// One playable/drawable unit.
///
/// Invariant: a NOTE has exactly one pitch, a CHORD at least two, a REST
/// none. The constructors are the only places events are built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub pitches: Vec<Pitch>,
    /// Relative weight before normalization, seconds after
    pub duration_seconds: f64,
    /// Offset from the start of the sequence; set by normalization
    pub start_seconds: f64,
    /// Text of the token the event came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_range: Option<Range<usize>>,
}

impl MusicEvent {
    pub fn note(pitch: Pitch, weight: f64, token: Option<&Token>) -> Self {
        Self::build(EventKind::Note, vec![pitch], weight, token)
    }

    pub fn chord(pitches: Vec<Pitch>, weight: f64, token: Option<&Token>) -> Self {
        debug_assert!(pitches.len() >= 2, "a chord needs at least two pitches");
        Self::build(EventKind::Chord, pitches, weight, token)
    }

    pub fn rest(weight: f64, token: Option<&Token>) -> Self {
        Self::build(EventKind::Rest, Vec::new(), weight, token)
    }

    fn build(kind: EventKind, pitches: Vec<Pitch>, weight: f64, token: Option<&Token>) -> Self {
        Self {
            kind,
            pitches,
            duration_seconds: weight,
            start_seconds: 0.0,
            label: token.map(|t| t.text.clone()),
            source_range: token.map(|t| t.range.clone()),
        }
    }

    fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// MIDI note numbers of the pitches, for the audio player
    pub fn midi_notes(&self) -> Vec<u8> {
        self.pitches.iter().map(Pitch::midi).collect()
    }

    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// A musical unit inside a digit run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitUnit {
    /// A zero
    Tick,
    /// 1-9
    Ones(u8),
    /// 10-19
    Teens(u8),
    /// 20, 30, … 90
    Tens(u8),
    /// 100
    Cadence,
}

impl DigitUnit {
    pub fn value(self) -> u8 {
        match self {
            DigitUnit::Tick => 0,
            DigitUnit::Ones(n) | DigitUnit::Teens(n) | DigitUnit::Tens(n) => n,
            DigitUnit::Cadence => 100,
        }
    }
}

/// Split a digit run into table units, most significant first.
///
/// 1. a leading zero is a tick; the remaining digits continue
/// 2. one digit is a ones unit
/// 3. two digits are a teen, or a tens unit followed by the ones digit
///    when it is not zero
/// 4. three digits are a hundred (`1` gives the cadence alone, any other
///    digit plays itself then the cadence) followed by the last two
///    digits read as a number, where zero adds nothing
/// 5. longer runs play their first digit alone and continue
///
/// # Example
/// ```
/// use pianotrainer::mapping::{decompose_digits, DigitUnit::*};
///
/// assert_eq!(decompose_digits("21"), vec![Tens(20), Ones(1)]);
/// assert_eq!(decompose_digits("301"), vec![Ones(3), Cadence, Ones(1)]);
/// assert_eq!(decompose_digits("123"), vec![Cadence, Tens(20), Ones(3)]);
/// assert_eq!(decompose_digits("2000"), vec![Ones(2), Tick, Tick, Tick]);
/// ```
pub fn decompose_digits(run: &str) -> Vec<DigitUnit> {
    let digits: Vec<u8> = run
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    let mut units = Vec::new();
    let mut rest = digits.as_slice();

    while !rest.is_empty() {
        match rest {
            [0, tail @ ..] => {
                units.push(DigitUnit::Tick);
                rest = tail;
            }
            [d] => {
                units.push(DigitUnit::Ones(*d));
                rest = &[];
            }
            [tens, ones] => {
                push_below_hundred(tens * 10 + ones, &mut units);
                rest = &[];
            }
            [hundreds, tens, ones] => {
                if *hundreds != 1 {
                    units.push(DigitUnit::Ones(*hundreds));
                }
                units.push(DigitUnit::Cadence);
                push_below_hundred(tens * 10 + ones, &mut units);
                rest = &[];
            }
            [d, tail @ ..] => {
                units.push(DigitUnit::Ones(*d));
                rest = tail;
            }
            [] => break,
        }
    }

    units
}

fn push_below_hundred(n: u8, units: &mut Vec<DigitUnit>) {
    match n {
        0 => {}
        1..=9 => units.push(DigitUnit::Ones(n)),
        10..=19 => units.push(DigitUnit::Teens(n)),
        _ => {
            units.push(DigitUnit::Tens(n / 10 * 10));
            if n % 10 != 0 {
                units.push(DigitUnit::Ones(n % 10));
            }
        }
    }
}

/// The keys and switches the rules need, derived once from the config
#[derive(Debug, Clone)]
pub struct MappingRules {
    /// Natural minor on the tonic: digits, phonemes, ticks
    pub minor_key: Key,
    /// Key for letters (may be major)
    pub letter_key: Key,
    pub alternate_mode: bool,
    pub consonant_ticks: bool,
}

impl MappingRules {
    pub fn from_config(config: &MappingConfig) -> Self {
        Self {
            minor_key: Key::new(config.tonic, ScaleMode::Minor),
            letter_key: Key::new(config.tonic, config.letter_scale),
            alternate_mode: config.alternate_mode,
            consonant_ticks: config.consonant_ticks,
        }
    }

    fn tick(&self) -> Pitch {
        self.minor_key.pitch_at(0, tables::TICK_OCTAVE)
    }
}

/// State threaded through the token fold
#[derive(Debug, Clone, Default)]
pub struct FoldState {
    pub events: Vec<MusicEvent>,
    /// Letter of the last melodic note, for repeat avoidance
    pub previous: Option<NoteName>,
    /// Letters seen so far, for alternate mode
    pub letter_index: usize,
    /// Next cadence variant
    pub cadence_index: usize,
}

impl FoldState {
    fn push_melodic(&mut self, event: MusicEvent) {
        if let Some(pitch) = event.pitches.first() {
            self.previous = Some(pitch.name);
        }
        self.events.push(event);
    }

    fn next_cadence(&mut self) -> &'static ChordSpec {
        let spec = &tables::CADENCES[self.cadence_index % tables::CADENCES.len()];
        self.cadence_index = (self.cadence_index + 1) % tables::CADENCES.len();
        spec
    }
}

/// Map a token stream to weighted events.
pub fn map_tokens(tokens: &[Token], rules: &MappingRules) -> Vec<MusicEvent> {
    tokens
        .iter()
        .fold(FoldState::default(), |state, token| map_token(state, token, rules))
        .events
}

fn map_token(mut state: FoldState, token: &Token, rules: &MappingRules) -> FoldState {
    match token.kind {
        TokenKind::Letter => map_letter(&mut state, token, rules),
        TokenKind::DigitRun => map_digits(&mut state, token, rules),
        TokenKind::Symbol => {
            let weight = token
                .text
                .chars()
                .next()
                .and_then(tables::symbol_weight)
                .unwrap_or(tables::SPACE_WEIGHT);
            state.events.push(MusicEvent::rest(weight, Some(token)));
        }
        TokenKind::Space => {
            state.events.push(MusicEvent::rest(tables::SPACE_WEIGHT, Some(token)));
        }
        TokenKind::PhonemeVowel => {
            if let Some(symbol) = token.phoneme {
                let pitch = choose_vowel_pitch(symbol, state.previous, &rules.minor_key);
                state.push_melodic(MusicEvent::note(pitch, tables::VOWEL_WEIGHT, Some(token)));
            }
        }
        TokenKind::PhonemeDiphthong => map_diphthong(&mut state, token, rules),
        TokenKind::PhonemeConsonant => {
            let event = if rules.consonant_ticks {
                MusicEvent::note(rules.tick(), tables::CONSONANT_WEIGHT, Some(token))
            } else {
                MusicEvent::rest(tables::CONSONANT_WEIGHT, Some(token))
            };
            state.events.push(event);
        }
        TokenKind::Unsupported => {}
    }
    state
}

/// Fold any ASCII letter onto A-G by alphabet position
fn fold_letter(c: char) -> Option<NoteName> {
    if !c.is_ascii_alphabetic() {
        return None;
    }
    let offset = (c.to_ascii_uppercase() as u8 - b'A') % 7;
    NoteName::from_char((b'A' + offset) as char)
}

fn map_letter(state: &mut FoldState, token: &Token, rules: &MappingRules) {
    let Some(letter) = token.text.chars().next() else {
        return;
    };
    let Some(name) = fold_letter(letter) else {
        return;
    };

    let key = if rules.alternate_mode && state.letter_index % 2 == 1 {
        Key::new(rules.letter_key.tonic, rules.letter_key.mode.toggled())
    } else {
        rules.letter_key
    };
    state.letter_index += 1;

    // Only a letter that spells the tonic goes to the bass; folded letters stay high
    let octave = if NoteName::from_char(letter) == Some(key.tonic.name) {
        tables::TONIC_LETTER_OCTAVE
    } else {
        tables::LETTER_OCTAVE
    };
    let pitch = Pitch::new(name, key.accidental_for(name), octave);
    state.push_melodic(MusicEvent::note(pitch, tables::LETTER_WEIGHT, Some(token)));
}

fn map_digits(state: &mut FoldState, token: &Token, rules: &MappingRules) {
    let key = &rules.minor_key;
    for unit in decompose_digits(&token.text) {
        let label = unit.value().to_string();
        let event = match unit {
            DigitUnit::Tick => MusicEvent::note(rules.tick(), tables::TICK_WEIGHT, Some(token)),
            DigitUnit::Ones(n) => {
                let spec = &tables::ONES[(n - 1) as usize];
                let pitches = spec.pitches(key, tables::CHORD_OCTAVE);
                MusicEvent::chord(pitches, tables::ONES_WEIGHT, Some(token))
            }
            DigitUnit::Teens(n) => {
                let spec = &tables::TEENS[(n - 10) as usize];
                let pitches = spec.pitches(key, tables::CHORD_OCTAVE);
                MusicEvent::chord(pitches, tables::TEENS_WEIGHT, Some(token))
            }
            DigitUnit::Tens(n) => {
                let spec = &tables::TENS[(n / 10 - 2) as usize];
                let pitches = spec.pitches(key, tables::CHORD_OCTAVE);
                MusicEvent::chord(pitches, tables::TENS_WEIGHT, Some(token))
            }
            DigitUnit::Cadence => {
                let spec = state.next_cadence();
                let chord = MusicEvent::chord(
                    spec.pitches(key, tables::CHORD_OCTAVE),
                    tables::CADENCE_WEIGHT,
                    Some(token),
                )
                .labelled(label);
                state.events.push(chord);
                let mut breath = MusicEvent::rest(tables::BREATH_WEIGHT, Some(token));
                breath.label = None;
                state.events.push(breath);
                continue;
            }
        };
        state.events.push(event.labelled(label));
    }
}

fn map_diphthong(state: &mut FoldState, token: &Token, rules: &MappingRules) {
    let Some((start, end)) = token.phoneme.and_then(tables::diphthong_glide) else {
        return;
    };
    let (first_weight, second_weight) = tables::GLIDE_WEIGHTS;

    let first = choose_vowel_pitch(start, state.previous, &rules.minor_key);
    state.push_melodic(MusicEvent::note(first, first_weight, Some(token)));

    let second = choose_vowel_pitch(end, state.previous, &rules.minor_key);
    state.push_melodic(MusicEvent::note(second, second_weight, Some(token)));
}

/// Pick the pitch for a vowel symbol.
///
/// Takes the first candidate whose letter differs from `previous`, or the
/// first candidate when every candidate repeats it.
pub fn choose_vowel_pitch(symbol: &str, previous: Option<NoteName>, key: &Key) -> Pitch {
    let candidates: Vec<Pitch> = tables::vowel_candidates(symbol)
        .unwrap_or(&[0])
        .iter()
        .map(|&step| key.pitch_at(step, tables::PHONEME_OCTAVE))
        .collect();

    candidates
        .iter()
        .find(|p| Some(p.name) != previous)
        .or_else(|| candidates.first())
        .copied()
        .unwrap_or_else(|| key.pitch_at(0, tables::PHONEME_OCTAVE))
}
