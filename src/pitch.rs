//! # Pitch Types
//!
//! Note names, accidentals, spelled pitches and keys.
//!
//! ## Octave System
//! - Octave numbers follow scientific pitch notation: middle C is `C4`
//!   (MIDI 60), and the octave number **always changes at C**, never at
//!   the tonic of the key.
//! - Example: in A minor the scale from `A3` runs `A3 B3 C4 D4 E4 F4 G4`.
//!
//! ## Spelling
//! A [`Key`] spells every diatonic step with its own letter: step 0 is the
//! tonic letter, step 1 the next letter, and so on. The accidental is
//! whatever makes that letter land on the semitone the scale pattern asks
//! for, so `E` minor spells step 1 as `F#` and `G#` minor spells step 6
//! as `F##`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Note names C through B, in staff order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteName {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    const ALL: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    /// Position in staff order (C = 0 … B = 6)
    pub fn index(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        }
    }

    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    /// Semitones above C for the natural (unaltered) note
    pub fn natural_semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Parse an ASCII letter a-g / A-G
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    #[default]
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    /// Accidental for a semitone offset from the natural note.
    /// Offsets beyond a double accidental cannot come out of a seven-step
    /// scale on a singly-altered tonic, so they are clamped.
    fn from_semitones(offset: i32) -> Self {
        match offset {
            i32::MIN..=-2 => Accidental::DoubleFlat,
            -1 => Accidental::Flat,
            0 => Accidental::Natural,
            1 => Accidental::Sharp,
            _ => Accidental::DoubleSharp,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

/// A spelled pitch: letter name, accidental and octave number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: i8,
}

impl Pitch {
    pub fn new(name: NoteName, accidental: Accidental, octave: i8) -> Self {
        Self {
            name,
            accidental,
            octave,
        }
    }

    /// Same letter and octave, accidental moved by `semitones`
    pub fn altered(self, semitones: i32) -> Self {
        Self {
            accidental: Accidental::from_semitones(self.accidental.semitones() + semitones),
            ..self
        }
    }

    /// MIDI note number (C4 = 60), clamped to the valid MIDI range.
    pub fn midi(&self) -> u8 {
        let total = 12 * (self.octave as i32 + 1)
            + self.name.natural_semitone()
            + self.accidental.semitones();
        total.clamp(0, 127) as u8
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.name.as_char(),
            self.accidental.symbol(),
            self.octave
        )
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scale pattern used to spell a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    #[default]
    Minor,
    Major,
}

impl ScaleMode {
    /// Semitones above the tonic for each of the seven steps
    fn intervals(self) -> [i32; 7] {
        match self {
            ScaleMode::Minor => [0, 2, 3, 5, 7, 8, 10],
            ScaleMode::Major => [0, 2, 4, 5, 7, 9, 11],
        }
    }

    /// The parallel mode (minor <-> major)
    pub fn toggled(self) -> Self {
        match self {
            ScaleMode::Minor => ScaleMode::Major,
            ScaleMode::Major => ScaleMode::Minor,
        }
    }
}

impl FromStr for ScaleMode {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" | "natural-minor" | "m" => Ok(ScaleMode::Minor),
            "major" | "maj" => Ok(ScaleMode::Major),
            other => Err(MappingError::config(
                "scale",
                format!("unknown scale '{}', expected 'minor' or 'major'", other),
            )),
        }
    }
}

/// Root pitch class of a key, e.g. `A`, `F#`, `Bb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tonic {
    pub name: NoteName,
    pub accidental: Accidental,
}

impl Default for Tonic {
    fn default() -> Self {
        Self {
            name: NoteName::A,
            accidental: Accidental::Natural,
        }
    }
}

impl FromStr for Tonic {
    type Err = MappingError;

    /// Parse a tonic: a letter `A`-`G` (either case) optionally followed
    /// by `#` or `b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            MappingError::config(
                "tonic",
                format!("'{}' is not a note name like A, F# or Bb", trimmed),
            )
        };

        let mut chars = trimmed.chars();
        let name = chars.next().and_then(NoteName::from_char).ok_or_else(invalid)?;
        let accidental = match chars.as_str() {
            "" => Accidental::Natural,
            "#" => Accidental::Sharp,
            "b" => Accidental::Flat,
            _ => return Err(invalid()),
        };
        Ok(Self { name, accidental })
    }
}

impl fmt::Display for Tonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name.as_char(), self.accidental.symbol())
    }
}

/// A tonic plus a scale mode; spells diatonic steps as pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Key {
    pub tonic: Tonic,
    pub mode: ScaleMode,
}

impl Key {
    pub fn new(tonic: Tonic, mode: ScaleMode) -> Self {
        Self { tonic, mode }
    }

    /// Pitch `step` diatonic steps above the tonic placed in `octave`.
    ///
    /// Negative steps go below the tonic; steps of 7 or more climb into
    /// the next octave.
    ///
    /// # Example
    /// ```
    /// use pianotrainer::{Key, Tonic, ScaleMode};
    ///
    /// let a_minor = Key::new(Tonic::default(), ScaleMode::Minor);
    /// assert_eq!(a_minor.pitch_at(0, 3).to_string(), "A3");
    /// assert_eq!(a_minor.pitch_at(2, 3).to_string(), "C4");
    /// assert_eq!(a_minor.pitch_at(7, 3).to_string(), "A4");
    /// ```
    pub fn pitch_at(&self, step: i32, octave: i8) -> Pitch {
        let tonic_index = self.tonic.name.index();
        let absolute = octave as i32 * 7 + tonic_index + step;
        let name = NoteName::from_index(absolute);
        let pitch_octave = absolute.div_euclid(7);

        let interval = self.mode.intervals()[step.rem_euclid(7) as usize] + 12 * step.div_euclid(7);
        let target = 12 * (octave as i32 + 1)
            + self.tonic.name.natural_semitone()
            + self.tonic.accidental.semitones()
            + interval;
        let natural = 12 * (pitch_octave + 1) + name.natural_semitone();

        Pitch {
            name,
            accidental: Accidental::from_semitones(target - natural),
            octave: pitch_octave as i8,
        }
    }

    /// Accidental this key gives to a letter name.
    pub fn accidental_for(&self, name: NoteName) -> Accidental {
        self.pitch_at(self.step_of(name), 4).accidental
    }

    /// Diatonic step of a letter name above the tonic letter (0..7)
    pub fn step_of(&self, name: NoteName) -> i32 {
        (name.index() - self.tonic.name.index()).rem_euclid(7)
    }
}
