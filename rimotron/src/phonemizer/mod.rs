//! Grapheme-to-phoneme conversion for words missing from the lexicon.
use std::sync::Arc;

use crate::index::LexiconIndex;
use crate::lexicon::Lookup;
use crate::pronunciation::Pronunciation;

pub mod cache;
pub mod espeak;

pub use self::cache::CachedPhonemizer;
pub use self::espeak::{EspeakConfig, EspeakPhonemizer};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PhonemizerError {
    /// The engine could not be started or fed its input
    #[error("Could not run phonemizer `{0}`: {1}")]
    Spawn(String, #[source] std::io::Error),

    /// The engine ran but reported a failure
    #[error("Phonemizer exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The engine produced no phoneme for the given text
    #[error("Phonemizer produced no phonemes for {0:?}")]
    Empty(String),
}

/// Converts arbitrary text into phonemes. Implementations may be slow.
pub trait Phonemizer: Send + Sync {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError>;
}

impl<T: Phonemizer + ?Sized> Phonemizer for Arc<T> {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError> {
        (**self).phonemize(text)
    }
}

impl<T: Phonemizer + ?Sized> Phonemizer for Box<T> {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError> {
        (**self).phonemize(text)
    }
}

impl<T: Phonemizer + ?Sized> Phonemizer for &T {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError> {
        (**self).phonemize(text)
    }
}

/// Phonemizes `text` and removes discretionary phonemes. Failures degrade to
/// an empty pronunciation.
pub fn phonemize_stripped<P: Phonemizer + ?Sized>(phonemizer: &P, text: &str) -> Pronunciation {
    match phonemizer.phonemize(text) {
        Ok(pron) => pron.strip_discretionary(),
        Err(e) => {
            log::warn!("{}", e);
            Pronunciation::empty()
        }
    }
}

/// The pronunciation the searches use for `word`: the lexicon's if it has
/// the word, the phonemizer's otherwise.
pub fn pronounce<P: Phonemizer + ?Sized>(
    index: &LexiconIndex,
    phonemizer: &P,
    word: &str,
) -> Pronunciation {
    match index.lookup(word) {
        Lookup::Found(pron) => pron.clone(),
        Lookup::NotFound => {
            log::trace!("{:?} not in lexicon, phonemizing", word);
            phonemize_stripped(phonemizer, word)
        }
    }
}
