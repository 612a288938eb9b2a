use std::sync::Arc;

use serde::{Deserialize, Serialize};

use self::cover::CoverWorker;
use self::rhyme::RhymeWorker;
use crate::index::LexiconIndex;
use crate::phonemizer::{self, Phonemizer};
use crate::pronunciation::Pronunciation;
use crate::types::Cover;

pub mod cover;
pub mod rhyme;

pub use self::rhyme::Rhyme;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhymeConfig {
    /// Number of trailing phonemes that must match, capped at the word length
    pub min_syllables: usize,
    pub limit: usize,
    /// Fall back to edit distance when no suffix matches
    pub approximate: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    pub max_branch: usize,
    /// Never offer the query word as a cover of itself
    pub exclude_self: bool,
}

impl RhymeConfig {
    pub const fn default() -> RhymeConfig {
        RhymeConfig {
            min_syllables: 3,
            limit: 20,
            approximate: false,
        }
    }
}

impl Default for RhymeConfig {
    fn default() -> Self {
        RhymeConfig::default()
    }
}

impl CoverConfig {
    pub const fn default() -> CoverConfig {
        CoverConfig {
            max_branch: 5,
            exclude_self: true,
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig::default()
    }
}

pub trait WordplaySearch {
    fn pronounce(&self, word: &str) -> Pronunciation;
    fn rhymes(&self, word: &str) -> Vec<Rhyme>;
    fn rhymes_with_config(&self, word: &str, config: &RhymeConfig) -> Vec<Rhyme>;
    fn cover(&self, word: &str) -> Vec<Cover>;
    fn cover_with_config(&self, word: &str, config: &CoverConfig) -> Vec<Cover>;
}

/// A shared lexicon index paired with the phonemizer used for words it does
/// not know.
pub struct PhoneticEngine<P: Phonemizer> {
    index: Arc<LexiconIndex>,
    phonemizer: P,
}

impl<P: Phonemizer> PhoneticEngine<P> {
    pub fn new(index: Arc<LexiconIndex>, phonemizer: P) -> PhoneticEngine<P> {
        PhoneticEngine { index, phonemizer }
    }

    pub fn index(&self) -> &LexiconIndex {
        &self.index
    }

    pub fn phonemizer(&self) -> &P {
        &self.phonemizer
    }
}

impl<P: Phonemizer> WordplaySearch for PhoneticEngine<P> {
    fn pronounce(&self, word: &str) -> Pronunciation {
        phonemizer::pronounce(&self.index, &self.phonemizer, word)
    }

    #[inline]
    fn rhymes(&self, word: &str) -> Vec<Rhyme> {
        self.rhymes_with_config(word, &RhymeConfig::default())
    }

    fn rhymes_with_config(&self, word: &str, config: &RhymeConfig) -> Vec<Rhyme> {
        let target = self.pronounce(word);
        RhymeWorker::new(&self.index, word, &target, config).rhymes()
    }

    #[inline]
    fn cover(&self, word: &str) -> Vec<Cover> {
        self.cover_with_config(word, &CoverConfig::default())
    }

    fn cover_with_config(&self, word: &str, config: &CoverConfig) -> Vec<Cover> {
        let target = self.pronounce(word);
        CoverWorker::new(&self.index, word, &target, config).covers()
    }
}
