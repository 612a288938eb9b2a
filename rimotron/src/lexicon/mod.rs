//! The deduplicated pronunciation lexicon.
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::pronunciation::Pronunciation;
use crate::types::{EntryId, Frequency};

pub mod error;
pub mod table;

/// A raw record as produced by ingestion, before deduplication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub ortho: SmolStr,
    pub phonemes: Pronunciation,
    pub frequency: Option<Frequency>,
}

impl LexiconRecord {
    pub fn new(
        ortho: impl Into<SmolStr>,
        phonemes: Pronunciation,
        frequency: Option<Frequency>,
    ) -> LexiconRecord {
        LexiconRecord {
            ortho: ortho.into(),
            phonemes,
            frequency,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    ortho: SmolStr,
    phonemes: Pronunciation,
    frequency: Frequency,
}

impl LexiconEntry {
    pub fn ortho(&self) -> &str {
        &self.ortho
    }

    pub fn ortho_smol(&self) -> &SmolStr {
        &self.ortho
    }

    pub fn phonemes(&self) -> &Pronunciation {
        &self.phonemes
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of phonemes.
    #[inline(always)]
    pub fn length(&self) -> usize {
        self.phonemes.len()
    }

    #[inline(always)]
    pub fn suffix_key(&self) -> SmolStr {
        self.phonemes.suffix_key()
    }

    /// Entries without a pronunciation can be looked up but take no part in
    /// length or suffix matching.
    #[inline(always)]
    pub fn is_usable(&self) -> bool {
        !self.phonemes.is_empty()
    }
}

/// Result of looking a word up by its orthographic form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Pronunciation),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Pronunciation> {
        match self {
            Lookup::Found(p) => Some(p),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    by_ortho: HashMap<SmolStr, EntryId>,
}

impl Lexicon {
    /// Builds the lexicon from records given in source-priority order. The
    /// first record for a given orthographic form wins.
    pub fn from_records<I>(records: I) -> Lexicon
    where
        I: IntoIterator<Item = LexiconRecord>,
    {
        let mut lexicon = Lexicon::default();
        let mut duplicates = 0usize;

        for record in records {
            if lexicon.by_ortho.contains_key(&record.ortho) {
                duplicates += 1;
                continue;
            }

            let frequency = match record.frequency {
                Some(f) if f.is_finite() && f > 0.0 => f,
                _ => 0.0,
            };

            let id = EntryId::new(lexicon.entries.len());
            lexicon.by_ortho.insert(record.ortho.clone(), id);
            lexicon.entries.push(LexiconEntry {
                ortho: record.ortho,
                phonemes: record.phonemes.strip_discretionary(),
                frequency,
            });
        }

        log::debug!(
            "Lexicon: {} entries, {} duplicates discarded",
            lexicon.entries.len(),
            duplicates
        );

        lexicon
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn usable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_usable()).count()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &LexiconEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (EntryId::new(i), e))
    }

    #[inline(always)]
    pub fn entry(&self, id: EntryId) -> &LexiconEntry {
        &self.entries[id.index()]
    }

    pub fn get(&self, ortho: &str) -> Option<&LexiconEntry> {
        self.by_ortho.get(ortho).map(|id| self.entry(*id))
    }

    pub fn lookup(&self, ortho: &str) -> Lookup<'_> {
        match self.get(ortho) {
            Some(entry) => Lookup::Found(entry.phonemes()),
            None => Lookup::NotFound,
        }
    }
}
