//! # Tokenizer
//!
//! Splits raw input into a flat, ordered token stream that covers every
//! byte of the input exactly once.
//!
//! ## Classification
//! - ASCII letters: one `Letter` token each (or, in phoneme mode, a word
//!   is split into phoneme tokens along its grapheme alignment)
//! - ASCII digits: one `DigitRun` per maximal run (`"123"` is one token)
//! - `/ % + = # @ $ . , - : '`: one `Symbol` token each
//! - whitespace: one `Space` per maximal run
//! - anything else: one `Unsupported` token per maximal run, which maps
//!   to no event and is reported as a diagnostic
//!
//! The tokenizer is total: it never fails, whatever the input.

use log::warn;
use std::ops::Range;

use crate::config::InputMode;
use crate::diagnostics::Diagnostic;
use crate::phoneme::{self, PhonemeClass};

/// Symbols that tokenize individually
pub const SYMBOLS: &[char] = &['/', '%', '+', '=', '#', '@', '$', '.', ',', '-', ':', '\''];

fn is_supported(c: char, digits_enabled: bool) -> bool {
    c.is_ascii_alphabetic()
        || (c.is_ascii_digit() && digits_enabled)
        || SYMBOLS.contains(&c)
        || c.is_whitespace()
}

/// Token types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Letter,
    DigitRun,
    Symbol,
    PhonemeVowel,
    PhonemeDiphthong,
    PhonemeConsonant,
    Space,
    Unsupported,
}

/// A classified slice of the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The original text, `&input[range]`
    pub text: String,
    /// Byte range in the input
    pub range: Range<usize>,
    /// Phoneme symbol for phoneme tokens
    pub phoneme: Option<&'static str>,
}

impl Token {
    fn new(kind: TokenKind, input: &str, range: Range<usize>) -> Self {
        Self {
            kind,
            text: input[range.clone()].to_string(),
            range,
            phoneme: None,
        }
    }
}

/// Tokens plus the diagnostics produced while classifying them
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenizer for one input string in one mode
pub struct Tokenizer<'a> {
    input: &'a str,
    mode: InputMode,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, mode: InputMode) -> Self {
        Self {
            input,
            mode,
            chars: input.char_indices().peekable(),
            position: 0,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consume characters while `pred` holds; returns the consumed range.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> Range<usize> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        start..self.position
    }

    fn digits_enabled(&self) -> bool {
        self.mode != InputMode::Letters
    }

    pub fn tokenize(&mut self) -> TokenStream {
        let mut stream = TokenStream::default();

        while let Some(c) = self.peek() {
            let start = self.position;

            if c.is_whitespace() {
                let range = self.take_while(char::is_whitespace);
                stream.tokens.push(Token::new(TokenKind::Space, self.input, range));
            } else if c.is_ascii_digit() && self.digits_enabled() {
                let range = self.take_while(|c| c.is_ascii_digit());
                stream.tokens.push(Token::new(TokenKind::DigitRun, self.input, range));
            } else if c.is_ascii_alphabetic() {
                if self.mode == InputMode::Phonemes {
                    let range = self.take_while(|c| c.is_ascii_alphabetic());
                    self.push_word(range, &mut stream.tokens);
                } else {
                    self.advance();
                    stream
                        .tokens
                        .push(Token::new(TokenKind::Letter, self.input, start..self.position));
                }
            } else if SYMBOLS.contains(&c) {
                self.advance();
                stream
                    .tokens
                    .push(Token::new(TokenKind::Symbol, self.input, start..self.position));
            } else {
                let digits_enabled = self.digits_enabled();
                let range = self.take_while(|c| !is_supported(c, digits_enabled));
                let token = Token::new(TokenKind::Unsupported, self.input, range.clone());
                warn!(
                    "Dropping unsupported input {:?} at bytes {}..{}",
                    token.text, range.start, range.end
                );
                stream.diagnostics.push(Diagnostic::unsupported(&token.text, range));
                stream.tokens.push(token);
            }
        }

        stream
    }

    /// Split a word into phoneme tokens along its pronunciation.
    fn push_word(&self, range: Range<usize>, tokens: &mut Vec<Token>) {
        let word = &self.input[range.clone()];
        let (_, spans) = phoneme::pronounce(word);

        let mut offset = range.start;
        for span in spans {
            let kind = match phoneme::classify(span.symbol) {
                Some(PhonemeClass::Vowel) => TokenKind::PhonemeVowel,
                Some(PhonemeClass::Diphthong) => TokenKind::PhonemeDiphthong,
                _ => TokenKind::PhonemeConsonant,
            };
            let mut token = Token::new(kind, self.input, offset..offset + span.len);
            token.phoneme = Some(span.symbol);
            tokens.push(token);
            offset += span.len;
        }
    }
}

/// Tokenize `input` in `mode`.
///
/// # Example
/// ```
/// use pianotrainer::{tokenize, InputMode, TokenKind};
///
/// let stream = tokenize("ab 123", InputMode::LettersAndDigits);
/// let kinds: Vec<_> = stream.tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Letter, TokenKind::Letter, TokenKind::Space, TokenKind::DigitRun]
/// );
/// ```
pub fn tokenize(input: &str, mode: InputMode) -> TokenStream {
    Tokenizer::new(input, mode).tokenize()
}

/// Keep the longest token prefix that fits in `max_chars` characters.
///
/// A digit run or whitespace run that crosses the cap is cut at the cap,
/// since any prefix of a run is itself a run; every other token crossing
/// the cap is dropped whole. Everything after the cut is dropped. Returns
/// the diagnostic for the cut, if one happened.
pub fn truncate_tokens(
    tokens: &mut Vec<Token>,
    input: &str,
    max_chars: usize,
) -> Option<Diagnostic> {
    let total_chars = input.chars().count();
    if total_chars <= max_chars {
        return None;
    }

    let mut kept_chars = 0;
    let mut keep = 0;
    for token in tokens.iter() {
        let len = token.text.chars().count();
        if kept_chars + len > max_chars {
            break;
        }
        kept_chars += len;
        keep += 1;
    }

    let mut cut_at = tokens.get(keep).map_or(input.len(), |t| t.range.start);
    if let Some(token) = tokens.get_mut(keep) {
        let room = max_chars - kept_chars;
        if room > 0 && matches!(token.kind, TokenKind::DigitRun | TokenKind::Space) {
            let end = token
                .text
                .char_indices()
                .nth(room)
                .map_or(token.text.len(), |(i, _)| i);
            token.text.truncate(end);
            token.range.end = token.range.start + end;
            cut_at = token.range.end;
            kept_chars += room;
            keep += 1;
        }
    }
    tokens.truncate(keep);
    warn!(
        "Input of {} characters truncated to {} (cap {})",
        total_chars, kept_chars, max_chars
    );
    Some(Diagnostic::truncated(kept_chars, total_chars, cut_at))
}
