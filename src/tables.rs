//! # Mapping Tables
//!
//! Every mapping rule reads its musical material from the immutable tables
//! in this module. Chords and phoneme pitches are stored as scale steps,
//! not as concrete pitches, so the same tables serve any tonic: a [`Key`]
//! turns them into spelled pitches at mapping time.
//!
//! ## Chord Spelling
//! A [`ChordSpec`] names the scale degree its root sits on (relative to
//! the tonic, negative degrees lie below it) and lists its tones as scale
//! steps above that root. A tone may carry a chromatic alteration, which is
//! how the raised third of a major V or a Picardy I is expressed.
//!
//! In A minor with the chord root octave at 3:
//!
//! | unit | chord      | pitches          |
//! |------|------------|------------------|
//! | 1    | i          | A3 C4 E4         |
//! | 4    | iv         | D3 F3 A3         |
//! | 15   | V7         | E3 G#3 B3 D4     |
//! | 20   | i6         | C4 E4 A4         |
//! | 100  | i (cadence)| A3 C4 E4 A4      |

use crate::pitch::{Key, Pitch};

/// Octave that holds the tonic for chord roots
pub const CHORD_OCTAVE: i8 = 3;
/// Octave of the tonic letter in letter mode (bass register)
pub const TONIC_LETTER_OCTAVE: i8 = 3;
/// Octave of every other letter in letter mode (treble register)
pub const LETTER_OCTAVE: i8 = 4;
/// Octave of sung phoneme pitches
pub const PHONEME_OCTAVE: i8 = 4;
/// Octave of the tick used for zeros and, optionally, consonants
pub const TICK_OCTAVE: i8 = 2;

pub const LETTER_WEIGHT: f64 = 1.0;
pub const SPACE_WEIGHT: f64 = 0.5;
pub const ONES_WEIGHT: f64 = 1.0;
pub const TEENS_WEIGHT: f64 = 1.25;
pub const TENS_WEIGHT: f64 = 1.25;
pub const CADENCE_WEIGHT: f64 = 1.5;
/// Rest appended after every cadence chord
pub const BREATH_WEIGHT: f64 = 0.25;
pub const TICK_WEIGHT: f64 = 0.25;
pub const VOWEL_WEIGHT: f64 = 1.0;
/// First and second half of a diphthong glide
pub const GLIDE_WEIGHTS: (f64, f64) = (0.4, 0.6);
pub const CONSONANT_WEIGHT: f64 = 0.25;

/// One chord tone: scale steps above the chord root plus an alteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTone {
    pub step: i32,
    pub alter: i32,
}

const fn tone(step: i32) -> ChordTone {
    ChordTone { step, alter: 0 }
}

const fn raised(step: i32) -> ChordTone {
    ChordTone { step, alter: 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSpec {
    /// Roman-numeral name, for labels and debugging
    pub symbol: &'static str,
    /// Scale degree of the root relative to the tonic
    pub degree: i32,
    pub tones: &'static [ChordTone],
}

impl ChordSpec {
    /// Spell the chord in `key` with the tonic in `octave`.
    pub fn pitches(&self, key: &Key, octave: i8) -> Vec<Pitch> {
        self.tones
            .iter()
            .map(|t| key.pitch_at(self.degree + t.step, octave).altered(t.alter))
            .collect()
    }
}

const fn chord(symbol: &'static str, degree: i32, tones: &'static [ChordTone]) -> ChordSpec {
    ChordSpec {
        symbol,
        degree,
        tones,
    }
}

const TRIAD: &[ChordTone] = &[tone(0), tone(2), tone(4)];
const SEVENTH: &[ChordTone] = &[tone(0), tone(2), tone(4), tone(6)];
const ADD9: &[ChordTone] = &[tone(0), tone(2), tone(4), tone(8)];
const NINTH: &[ChordTone] = &[tone(0), tone(2), tone(4), tone(6), tone(8)];
const SUS2: &[ChordTone] = &[tone(0), tone(1), tone(4)];
const FIRST_INVERSION: &[ChordTone] = &[tone(2), tone(4), tone(7)];
const SECOND_INVERSION: &[ChordTone] = &[tone(4), tone(7), tone(9)];
/// Minor-key v with its third raised
const DOMINANT_SEVENTH: &[ChordTone] = &[tone(0), raised(2), tone(4), tone(6)];
const DOUBLED_ROOT: &[ChordTone] = &[tone(0), tone(2), tone(4), tone(7)];
const OPEN_THIRD_ON_TOP: &[ChordTone] = &[tone(-7), tone(0), tone(4), tone(9)];
const PICARDY: &[ChordTone] = &[tone(0), raised(2), tone(4), tone(7)];

/// Chords for 1-9, indexed by `n - 1`
pub static ONES: [ChordSpec; 9] = [
    chord("i", 0, TRIAD),
    chord("ii°", 1, TRIAD),
    chord("III", 2, TRIAD),
    chord("iv", -4, TRIAD),
    chord("v", -3, TRIAD),
    chord("VI", -2, TRIAD),
    chord("VII", -1, TRIAD),
    chord("i7", 0, SEVENTH),
    chord("iv7", -4, SEVENTH),
];

/// Color chords for 10-19, indexed by `n - 10`
pub static TEENS: [ChordSpec; 10] = [
    chord("i(add9)", 0, ADD9),
    chord("IIImaj7", 2, SEVENTH),
    chord("VImaj7", -2, SEVENTH),
    chord("VII7", -1, SEVENTH),
    chord("v7", -3, SEVENTH),
    chord("V7", -3, DOMINANT_SEVENTH),
    chord("iiø7", 1, SEVENTH),
    chord("iv9", -4, NINTH),
    chord("isus2", 0, SUS2),
    chord("VI(add9)", -2, ADD9),
];

/// Compact voicings for 20-90, indexed by `n / 10 - 2`
pub static TENS: [ChordSpec; 8] = [
    chord("i6", 0, FIRST_INVERSION),
    chord("III6", 2, FIRST_INVERSION),
    chord("iv6", -4, FIRST_INVERSION),
    chord("v6", -3, FIRST_INVERSION),
    chord("VI6", -2, FIRST_INVERSION),
    chord("VII6", -1, FIRST_INVERSION),
    chord("i64", 0, SECOND_INVERSION),
    chord("iv64", -4, SECOND_INVERSION),
];

/// Cadence variants for 100, used round-robin within one invocation
pub static CADENCES: [ChordSpec; 3] = [
    chord("i", 0, DOUBLED_ROOT),
    chord("i(open)", 0, OPEN_THIRD_ON_TOP),
    chord("I(picardy)", 0, PICARDY),
];

/// Rest weight for each allowed symbol
pub static SYMBOL_WEIGHTS: &[(char, f64)] = &[
    ('/', 0.25),
    ('%', 0.25),
    ('+', 0.25),
    ('=', 0.25),
    ('#', 0.25),
    ('@', 0.25),
    ('$', 0.25),
    ('.', 0.5),
    (',', 0.35),
    (':', 0.35),
    ('\'', 0.15),
    ('-', SPACE_WEIGHT),
];

pub fn symbol_weight(symbol: char) -> Option<f64> {
    SYMBOL_WEIGHTS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, weight)| *weight)
}

/// Candidate scale steps for each vowel, most preferred first
pub static VOWEL_CANDIDATES: &[(&str, &[i32])] = &[
    ("IY", &[4, 6]),
    ("IH", &[3, 4]),
    ("EH", &[2, 3]),
    ("AE", &[2, 0]),
    ("AA", &[0, 2]),
    ("AH", &[0, 1]),
    ("AO", &[6, 0]),
    ("UH", &[5, 6]),
    ("UW", &[5, 3]),
    ("ER", &[1, 2]),
];

/// Diphthong -> (start vowel, end vowel)
pub static DIPHTHONG_GLIDES: &[(&str, (&str, &str))] = &[
    ("AY", ("AA", "IY")),
    ("AW", ("AA", "UH")),
    ("EY", ("EH", "IY")),
    ("OW", ("AO", "UW")),
    ("OY", ("AO", "IY")),
];

pub fn vowel_candidates(symbol: &str) -> Option<&'static [i32]> {
    VOWEL_CANDIDATES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, steps)| *steps)
}

pub fn diphthong_glide(symbol: &str) -> Option<(&'static str, &'static str)> {
    DIPHTHONG_GLIDES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, glide)| *glide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phoneme::{classify, PhonemeClass};
    use crate::pitch::{ScaleMode, Tonic};

    fn a_minor() -> Key {
        Key::new(Tonic::default(), ScaleMode::Minor)
    }

    fn spelled(spec: &ChordSpec) -> Vec<String> {
        spec.pitches(&a_minor(), CHORD_OCTAVE)
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_ones_table_in_a_minor() {
        assert_eq!(spelled(&ONES[0]), vec!["A3", "C4", "E4"]);
        assert_eq!(spelled(&ONES[1]), vec!["B3", "D4", "F4"]);
        assert_eq!(spelled(&ONES[3]), vec!["D3", "F3", "A3"]);
        assert_eq!(spelled(&ONES[6]), vec!["G3", "B3", "D4"]);
        assert_eq!(spelled(&ONES[8]), vec!["D3", "F3", "A3", "C4"]);
    }

    #[test]
    fn test_altered_tones() {
        assert_eq!(spelled(&TEENS[5]), vec!["E3", "G#3", "B3", "D4"]);
        assert_eq!(spelled(&CADENCES[2]), vec!["A3", "C#4", "E4", "A4"]);
    }

    #[test]
    fn test_compact_voicings_and_cadences() {
        assert_eq!(spelled(&TENS[0]), vec!["C4", "E4", "A4"]);
        assert_eq!(spelled(&TENS[7]), vec!["A3", "D4", "F4"]);
        assert_eq!(spelled(&CADENCES[0]), vec!["A3", "C4", "E4", "A4"]);
        assert_eq!(spelled(&CADENCES[1]), vec!["A2", "A3", "E4", "C5"]);
    }

    #[test]
    fn test_every_chord_has_at_least_two_tones() {
        for spec in ONES.iter().chain(&TEENS).chain(&TENS).chain(&CADENCES) {
            assert!(spec.tones.len() >= 2, "{} is not a chord", spec.symbol);
        }
    }

    #[test]
    fn test_cadence_variants_differ() {
        let voicings: Vec<_> = CADENCES.iter().map(spelled).collect();
        assert_ne!(voicings[0], voicings[1]);
        assert_ne!(voicings[1], voicings[2]);
        assert_ne!(voicings[0], voicings[2]);
    }

    #[test]
    fn test_every_vowel_and_diphthong_has_material() {
        for (symbol, steps) in VOWEL_CANDIDATES {
            assert_eq!(classify(symbol), Some(PhonemeClass::Vowel));
            assert!(!steps.is_empty());
        }
        for (symbol, (start, end)) in DIPHTHONG_GLIDES {
            assert_eq!(classify(symbol), Some(PhonemeClass::Diphthong));
            assert!(vowel_candidates(start).is_some());
            assert!(vowel_candidates(end).is_some());
        }
    }

    #[test]
    fn test_symbol_weights_cover_every_symbol() {
        for symbol in crate::token::SYMBOLS {
            let weight = symbol_weight(*symbol).unwrap();
            assert!(weight > 0.0);
        }
        assert_eq!(symbol_weight('-'), Some(SPACE_WEIGHT));
        assert_eq!(symbol_weight('!'), None);
    }

    #[test]
    fn test_tables_follow_the_tonic() {
        let e_minor = Key::new("E".parse().unwrap(), ScaleMode::Minor);
        let pitches: Vec<_> = ONES[1]
            .pitches(&e_minor, CHORD_OCTAVE)
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(pitches, vec!["F#3", "A3", "C4"]);
    }
}
