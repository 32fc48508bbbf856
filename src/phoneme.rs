//! # Phonemes
//!
//! Phoneme inventory, a small pronunciation table, and the spelling
//! heuristic used for words the table does not know.
//!
//! ## Inventory
//! ARPAbet-style symbols, split into three classes:
//! - vowels: `AA AE AH AO EH ER IH IY UH UW`
//! - diphthongs: `AY AW EY OW OY` (glides between two vowels)
//! - consonants: everything else
//!
//! ## Alignment
//! Every pronunciation is a list of grapheme chunks, each carrying exactly
//! one phoneme, and the chunks concatenate back to the word. That keeps
//! phoneme tokens aligned with the text so a caption can highlight the
//! letters that produced each sound.
//!
//! ## Accuracy
//! The spelling heuristic is an approximation, not a pronunciation model:
//! it gets common English spellings roughly right and is only required to
//! be deterministic and total. Words that matter to the site belong in
//! [`PRONUNCIATIONS`].

/// Phoneme class, which decides how a phoneme is mapped to music
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonemeClass {
    Vowel,
    Diphthong,
    Consonant,
}

const VOWELS: &[&str] = &["AA", "AE", "AH", "AO", "EH", "ER", "IH", "IY", "UH", "UW"];

const DIPHTHONGS: &[&str] = &["AY", "AW", "EY", "OW", "OY"];

const CONSONANTS: &[&str] = &[
    "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L", "M", "N", "NG", "P", "R", "S", "SH",
    "T", "TH", "V", "W", "Y", "Z", "ZH",
];

/// Class of a phoneme symbol, or `None` for symbols outside the inventory
pub fn classify(symbol: &str) -> Option<PhonemeClass> {
    if VOWELS.contains(&symbol) {
        Some(PhonemeClass::Vowel)
    } else if DIPHTHONGS.contains(&symbol) {
        Some(PhonemeClass::Diphthong)
    } else if CONSONANTS.contains(&symbol) {
        Some(PhonemeClass::Consonant)
    } else {
        None
    }
}

/// Word -> grapheme-aligned phonemes. Lowercase keys.
pub static PRONUNCIATIONS: &[(&str, &[(&str, &str)])] = &[
    ("a", &[("a", "AH")]),
    ("birthday", &[("b", "B"), ("ir", "ER"), ("th", "TH"), ("d", "D"), ("ay", "EY")]),
    ("blue", &[("b", "B"), ("l", "L"), ("ue", "UW")]),
    ("book", &[("b", "B"), ("oo", "UH"), ("k", "K")]),
    ("boy", &[("b", "B"), ("oy", "OY")]),
    ("cat", &[("c", "K"), ("a", "AE"), ("t", "T")]),
    ("chord", &[("ch", "K"), ("or", "AO"), ("d", "D")]),
    ("coin", &[("c", "K"), ("oi", "OY"), ("n", "N")]),
    ("day", &[("d", "D"), ("ay", "EY")]),
    ("dog", &[("d", "D"), ("o", "AO"), ("g", "G")]),
    ("friend", &[("f", "F"), ("r", "R"), ("ie", "EH"), ("n", "N"), ("d", "D")]),
    ("go", &[("g", "G"), ("o", "OW")]),
    ("good", &[("g", "G"), ("oo", "UH"), ("d", "D")]),
    ("green", &[("g", "G"), ("r", "R"), ("ee", "IY"), ("n", "N")]),
    ("happy", &[("h", "HH"), ("a", "AE"), ("pp", "P"), ("y", "IY")]),
    ("heart", &[("h", "HH"), ("ear", "AA"), ("t", "T")]),
    ("hello", &[("h", "HH"), ("e", "EH"), ("ll", "L"), ("o", "OW")]),
    ("hi", &[("h", "HH"), ("i", "AY")]),
    ("house", &[("h", "HH"), ("ou", "AW"), ("se", "S")]),
    ("how", &[("h", "HH"), ("ow", "AW")]),
    ("i", &[("i", "AY")]),
    ("joy", &[("j", "JH"), ("oy", "OY")]),
    ("key", &[("k", "K"), ("ey", "IY")]),
    ("light", &[("l", "L"), ("igh", "AY"), ("t", "T")]),
    ("love", &[("l", "L"), ("o", "AH"), ("ve", "V")]),
    ("me", &[("m", "M"), ("e", "IY")]),
    ("moon", &[("m", "M"), ("oo", "UW"), ("n", "N")]),
    ("music", &[("m", "M"), ("u", "UW"), ("s", "Z"), ("i", "IH"), ("c", "K")]),
    ("my", &[("m", "M"), ("y", "AY")]),
    ("name", &[("n", "N"), ("a", "EY"), ("me", "M")]),
    ("night", &[("n", "N"), ("igh", "AY"), ("t", "T")]),
    ("no", &[("n", "N"), ("o", "OW")]),
    ("note", &[("n", "N"), ("o", "OW"), ("te", "T")]),
    ("now", &[("n", "N"), ("ow", "AW")]),
    ("piano", &[("p", "P"), ("i", "IY"), ("a", "AE"), ("n", "N"), ("o", "OW")]),
    ("play", &[("p", "P"), ("l", "L"), ("ay", "EY")]),
    ("rain", &[("r", "R"), ("ai", "EY"), ("n", "N")]),
    ("red", &[("r", "R"), ("e", "EH"), ("d", "D")]),
    ("see", &[("s", "S"), ("ee", "IY")]),
    ("sing", &[("s", "S"), ("i", "IH"), ("ng", "NG")]),
    ("snow", &[("s", "S"), ("n", "N"), ("ow", "OW")]),
    ("song", &[("s", "S"), ("o", "AO"), ("ng", "NG")]),
    ("star", &[("s", "S"), ("t", "T"), ("ar", "AA")]),
    ("sun", &[("s", "S"), ("u", "AH"), ("n", "N")]),
    ("the", &[("th", "DH"), ("e", "AH")]),
    ("time", &[("t", "T"), ("i", "AY"), ("me", "M")]),
    ("train", &[("t", "T"), ("r", "R"), ("ai", "EY"), ("n", "N")]),
    ("trainer", &[("t", "T"), ("r", "R"), ("ai", "EY"), ("n", "N"), ("er", "ER")]),
    ("water", &[("w", "W"), ("a", "AO"), ("t", "T"), ("er", "ER")]),
    ("we", &[("w", "W"), ("e", "IY")]),
    ("world", &[("w", "W"), ("or", "ER"), ("l", "L"), ("d", "D")]),
    ("you", &[("y", "Y"), ("ou", "UW")]),
];

/// Two-letter spellings tried before single letters
const DIGRAPHS: &[(&str, &str)] = &[
    ("oy", "OY"),
    ("oi", "OY"),
    ("ea", "IY"),
    ("ee", "IY"),
    ("ie", "IY"),
    ("ai", "EY"),
    ("ay", "EY"),
    ("ey", "EY"),
    ("ou", "AW"),
    ("ow", "OW"),
    ("oa", "OW"),
    ("oo", "UW"),
    ("ue", "UW"),
    ("ew", "UW"),
    ("au", "AO"),
    ("aw", "AO"),
    ("th", "TH"),
    ("sh", "SH"),
    ("ch", "CH"),
    ("ng", "NG"),
    ("ph", "F"),
    ("ck", "K"),
    ("wh", "W"),
    ("qu", "K"),
];

fn single_letter(c: u8, word_start: bool) -> &'static str {
    match c {
        b'a' => "AE",
        b'e' => "EH",
        b'i' => "IH",
        b'o' => "AA",
        b'u' => "AH",
        b'y' if word_start => "Y",
        b'y' => "IY",
        b'b' => "B",
        b'c' | b'k' | b'q' | b'x' => "K",
        b'd' => "D",
        b'f' => "F",
        b'g' => "G",
        b'h' => "HH",
        b'j' => "JH",
        b'l' => "L",
        b'm' => "M",
        b'n' => "N",
        b'p' => "P",
        b'r' => "R",
        b's' => "S",
        b't' => "T",
        b'v' => "V",
        b'w' => "W",
        _ => "Z",
    }
}

fn is_vowel_letter(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Where a pronunciation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PronunciationSource {
    Dictionary,
    Heuristic,
}

/// One grapheme chunk of a word and the phoneme it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemeSpan {
    /// Byte length of the chunk within the word
    pub len: usize,
    pub symbol: &'static str,
}

/// Pronounce an ASCII word.
///
/// Looks the word up case-insensitively in [`PRONUNCIATIONS`] and falls
/// back to [`spell_out`] otherwise. The spans always cover the whole word.
///
/// # Example
/// ```
/// use pianotrainer::phoneme::{pronounce, PronunciationSource};
///
/// let (source, spans) = pronounce("Boy");
/// assert_eq!(source, PronunciationSource::Dictionary);
/// let symbols: Vec<_> = spans.iter().map(|s| s.symbol).collect();
/// assert_eq!(symbols, vec!["B", "OY"]);
/// ```
pub fn pronounce(word: &str) -> (PronunciationSource, Vec<PhonemeSpan>) {
    let lower = word.to_ascii_lowercase();
    match lookup(&lower) {
        Some(chunks) => {
            let spans = chunks
                .iter()
                .map(|(grapheme, symbol)| PhonemeSpan {
                    len: grapheme.len(),
                    symbol: *symbol,
                })
                .collect();
            (PronunciationSource::Dictionary, spans)
        }
        None => (PronunciationSource::Heuristic, spell_out(&lower)),
    }
}

fn lookup(lower: &str) -> Option<&'static [(&'static str, &'static str)]> {
    PRONUNCIATIONS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, chunks)| *chunks)
}

/// Letter-by-letter pronunciation heuristic for unknown words.
///
/// Rules, applied left to right:
/// 1. a two-letter spelling from the digraph table wins over single letters
/// 2. a doubled consonant (`ll`, `ss`, …) is one sound
/// 3. a final `e` after a consonant is silent and joins the previous chunk
/// 4. otherwise each letter is one phoneme
pub fn spell_out(word: &str) -> Vec<PhonemeSpan> {
    let bytes = word.as_bytes();
    let mut spans: Vec<PhonemeSpan> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i].to_ascii_lowercase();
        let next = bytes.get(i + 1).map(|b| b.to_ascii_lowercase());

        // Silent final e
        let is_last = i + 1 == bytes.len();
        if c == b'e' && is_last && i >= 2 && !is_vowel_letter(bytes[i - 1].to_ascii_lowercase()) {
            if let Some(last) = spans.last_mut() {
                last.len += 1;
                i += 1;
                continue;
            }
        }

        if let Some(n) = next {
            let pair = [c, n];
            if let Some((_, symbol)) = DIGRAPHS.iter().find(|(g, _)| g.as_bytes() == pair) {
                spans.push(PhonemeSpan {
                    len: 2,
                    symbol: *symbol,
                });
                i += 2;
                continue;
            }
            if n == c && !is_vowel_letter(c) {
                spans.push(PhonemeSpan {
                    len: 2,
                    symbol: single_letter(c, i == 0),
                });
                i += 2;
                continue;
            }
        }

        spans.push(PhonemeSpan {
            len: 1,
            symbol: single_letter(c, i == 0),
        });
        i += 1;
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(spans: &[PhonemeSpan]) -> Vec<&'static str> {
        spans.iter().map(|s| s.symbol).collect()
    }

    #[test]
    fn test_dictionary_entries_are_aligned() {
        for (word, chunks) in PRONUNCIATIONS {
            let joined: String = chunks.iter().map(|(g, _)| *g).collect();
            assert_eq!(&joined, word, "graphemes of '{}' don't spell the word", word);
            for (_, symbol) in *chunks {
                assert!(classify(symbol).is_some(), "'{}' uses unknown phoneme {}", word, symbol);
            }
        }
    }

    #[test]
    fn test_digraph_symbols_are_in_inventory() {
        for (_, symbol) in DIGRAPHS {
            assert!(classify(symbol).is_some());
        }
        for c in b'a'..=b'z' {
            assert!(classify(single_letter(c, false)).is_some());
            assert!(classify(single_letter(c, true)).is_some());
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("IY"), Some(PhonemeClass::Vowel));
        assert_eq!(classify("OY"), Some(PhonemeClass::Diphthong));
        assert_eq!(classify("NG"), Some(PhonemeClass::Consonant));
        assert_eq!(classify("XX"), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let (source, spans) = pronounce("HeLLo");
        assert_eq!(source, PronunciationSource::Dictionary);
        assert_eq!(symbols(&spans), vec!["HH", "EH", "L", "OW"]);
    }

    #[test]
    fn test_unknown_word_uses_heuristic() {
        // Approximation: "toy" is not in the table, the digraph rule catches "oy"
        let (source, spans) = pronounce("toy");
        assert_eq!(source, PronunciationSource::Heuristic);
        assert_eq!(symbols(&spans), vec!["T", "OY"]);
    }

    #[test]
    fn test_digraphs_before_single_letters() {
        assert_eq!(symbols(&spell_out("seat")), vec!["S", "IY", "T"]);
        assert_eq!(symbols(&spell_out("ship")), vec!["SH", "IH", "P"]);
    }

    #[test]
    fn test_doubled_consonant_and_silent_e() {
        let spans = spell_out("bell");
        assert_eq!(symbols(&spans), vec!["B", "EH", "L"]);
        assert_eq!(spans[2].len, 2);

        let spans = spell_out("make");
        assert_eq!(symbols(&spans), vec!["M", "AE", "K"]);
        assert_eq!(spans[2].len, 2);
    }

    #[test]
    fn test_heuristic_covers_every_letter() {
        for word in ["xylophone", "rhythm", "queueing", "e", "ee", "zz", "strengths"] {
            let total: usize = spell_out(word).iter().map(|s| s.len).sum();
            assert_eq!(total, word.len(), "spans of '{}' don't cover it", word);
        }
    }

    #[test]
    fn test_word_initial_y_is_consonant() {
        assert_eq!(symbols(&spell_out("yes")), vec!["Y", "EH", "S"]);
        assert_eq!(symbols(&spell_out("gym")), vec!["G", "IY", "M"]);
    }
}
