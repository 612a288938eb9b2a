//! Pronunciations as ordered sequences of opaque phoneme symbols.
//!
//! Two textual forms are understood:
//!
//! * whitespace-separated symbols, `"a ʁ b a ɡ"`, which is what this crate
//!   writes;
//! * unseparated IPA, `"aʁbaɡ"`, split into extended grapheme clusters so that
//!   a base letter and its combining marks (`ɑ̃`) stay one symbol.
//!
//! Text written by this crate is read back with [`Pronunciation::from_separated`]
//! only: a lone `dʒ` there is one symbol, not two.
use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;
use unic_segment::Graphemes;

use crate::constants::{DISCRETIONARY_PHONEMES, SUFFIX_KEY_LEN};
use crate::types::Phoneme;

/// Whether `phoneme` is elided for matching purposes.
#[inline(always)]
pub fn is_discretionary(phoneme: &str) -> bool {
    DISCRETIONARY_PHONEMES.contains(&phoneme)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pronunciation(Vec<Phoneme>);

impl Pronunciation {
    pub fn new(phonemes: Vec<Phoneme>) -> Pronunciation {
        Pronunciation(phonemes)
    }

    pub fn empty() -> Pronunciation {
        Pronunciation(vec![])
    }

    /// Parses either textual form, see the module documentation.
    pub fn parse(text: &str) -> Pronunciation {
        let text = text.trim();

        if text.chars().any(char::is_whitespace) {
            text.split_whitespace().map(SmolStr::new).collect()
        } else {
            Graphemes::new(text).map(SmolStr::new).collect()
        }
    }

    /// Parses the whitespace-separated form only. Every token is one symbol.
    pub fn from_separated(text: &str) -> Pronunciation {
        text.split_whitespace().map(SmolStr::new).collect()
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Phoneme> {
        self.0
    }

    /// Removes every discretionary phoneme, keeping the order of the rest.
    pub fn strip_discretionary(self) -> Pronunciation {
        self.0.into_iter().filter(|p| !is_discretionary(p)).collect()
    }

    pub fn has_discretionary(&self) -> bool {
        self.0.iter().any(|p| is_discretionary(p))
    }

    /// The last `min(n, len)` phonemes.
    pub fn tail(&self, n: usize) -> &[Phoneme] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    /// Concatenation of all symbols, without separator.
    pub fn joined(&self) -> String {
        join_symbols(&self.0)
    }

    /// Last [`SUFFIX_KEY_LEN`] phonemes (or fewer), joined.
    pub fn suffix_key(&self) -> SmolStr {
        SmolStr::new(join_symbols(self.tail(SUFFIX_KEY_LEN)))
    }

    /// Levenshtein distance counted in phonemes.
    pub fn distance(&self, other: &Pronunciation) -> usize {
        strsim::generic_levenshtein(&self.0, &other.0)
    }

    pub fn concat<'a, I>(parts: I) -> Pronunciation
    where
        I: IntoIterator<Item = &'a Pronunciation>,
    {
        parts
            .into_iter()
            .flat_map(|p| p.0.iter().cloned())
            .collect()
    }
}

#[inline(always)]
pub(crate) fn join_symbols(symbols: &[Phoneme]) -> String {
    symbols.iter().join("")
}

impl Deref for Pronunciation {
    type Target = [Phoneme];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Phoneme>> for Pronunciation {
    fn from(phonemes: Vec<Phoneme>) -> Self {
        Pronunciation(phonemes)
    }
}

impl<'a> From<&'a [&'a str]> for Pronunciation {
    fn from(symbols: &'a [&'a str]) -> Self {
        symbols.iter().map(|s| SmolStr::new(s)).collect()
    }
}

impl FromIterator<Phoneme> for Pronunciation {
    fn from_iter<I: IntoIterator<Item = Phoneme>>(iter: I) -> Self {
        Pronunciation(iter.into_iter().collect())
    }
}

impl std::str::FromStr for Pronunciation {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Pronunciation::parse(s))
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

impl Serialize for Pronunciation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pronunciation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Pronunciation::from_separated(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pronunciation {
        Pronunciation::parse(s)
    }

    #[test]
    fn parse_separated() {
        assert_eq!(p("a ʁ  b a ɡ").len(), 5);
        assert_eq!(p(" ɑ̃ b ").phonemes(), &["ɑ̃", "b"]);
    }

    #[test]
    fn parse_unseparated_keeps_combining_marks() {
        let pron = p("bɔ̃ʒuʁ");
        assert_eq!(pron.phonemes(), &["b", "ɔ̃", "ʒ", "u", "ʁ"]);
        assert_eq!(pron.to_string(), "b ɔ̃ ʒ u ʁ");
    }

    #[test]
    fn parse_empty() {
        assert!(p("").is_empty());
        assert!(p("   ").is_empty());
    }

    #[test]
    fn strip_discretionary_keeps_order() {
        let pron = p("p w a ʁ ə j o").strip_discretionary();
        assert_eq!(pron.phonemes(), &["p", "a", "ʁ", "o"]);
        assert!(!pron.has_discretionary());
    }

    #[test]
    fn suffix_key_is_capped() {
        let pron = p("a b c d e f g h i k l m");
        assert_eq!(pron.len(), 12);
        assert_eq!(pron.suffix_key(), "cdefghiklm");
        assert_eq!(p("ʃ a").suffix_key(), "ʃa");
        assert_eq!(Pronunciation::empty().suffix_key(), "");
    }

    #[test]
    fn tail_clamps() {
        let pron = p("ʃ a");
        assert_eq!(pron.tail(10), &["ʃ", "a"]);
        assert_eq!(pron.tail(1), &["a"]);
        assert!(pron.tail(0).is_empty());
    }

    #[test]
    fn distance_counts_phonemes() {
        assert_eq!(p("ɔ̃ b").distance(&p("ɔ̃ p")), 1);
        assert_eq!(p("ʃ a").distance(&p("ʁ a")), 1);
        assert_eq!(p("ʃ a").distance(&p("p l a")), 2);
        assert_eq!(p("a").distance(&p("a")), 0);
    }

    #[test]
    fn concat_and_serde() {
        let whole = Pronunciation::concat(&[p("a ʁ"), p("b a ɡ")]);
        assert_eq!(whole, p("aʁbaɡ"));

        let json = serde_json::to_string(&whole).unwrap();
        assert_eq!(json, "\"a ʁ b a ɡ\"");
        let back: Pronunciation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, whole);
    }

    #[test]
    fn multi_character_symbol_survives_serde() {
        let affricate = Pronunciation::from(&["dʒ"][..]);
        assert_eq!(affricate.len(), 1);

        let json = serde_json::to_string(&affricate).unwrap();
        assert_eq!(json, "\"dʒ\"");
        let back: Pronunciation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, affricate);

        // Raw IPA still splits into grapheme clusters.
        assert_eq!(p("dʒ").phonemes(), &["d", "ʒ"]);
        assert_eq!(Pronunciation::from_separated("tʃ a").phonemes(), &["tʃ", "a"]);
    }
}
