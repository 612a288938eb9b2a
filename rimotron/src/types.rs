use std::fmt::Display;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single phoneme symbol. Opaque: only compared and concatenated.
pub type Phoneme = SmolStr;

/// Usage frequency, used for ranking only.
pub type Frequency = f32;

/// An ordered sequence of orthographic forms whose pronunciations,
/// concatenated, reproduce a target pronunciation.
pub type Cover = Vec<SmolStr>;

/// Position of an entry inside a [`Lexicon`](crate::lexicon::Lexicon).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct EntryId(pub(crate) u32);

impl EntryId {
    #[inline(always)]
    pub(crate) fn new(index: usize) -> Self {
        EntryId(index as u32)
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
