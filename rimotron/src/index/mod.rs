//! Immutable lexicon plus the two derived indices, built once and shared by
//! every query.
use std::path::Path;

use crate::lexicon::error::TableError;
use crate::lexicon::{table, Lexicon, LexiconRecord, Lookup};

pub mod cover;
pub mod rhyme;

pub use self::cover::CoverIndex;
pub use self::rhyme::{RhymeBucket, RhymeIndex};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    /// No entry has a usable pronunciation, so no search can run
    #[error("Lexicon has no entry with a pronunciation ({0} entries total)")]
    EmptyLexicon(usize),

    /// The persisted table could not be loaded
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug)]
pub struct LexiconIndex {
    lexicon: Lexicon,
    cover: CoverIndex,
    rhyme: RhymeIndex,
}

impl LexiconIndex {
    pub fn new(lexicon: Lexicon) -> Result<LexiconIndex, IndexError> {
        let usable = lexicon.usable_count();
        if usable == 0 {
            return Err(IndexError::EmptyLexicon(lexicon.len()));
        }

        if usable < lexicon.len() {
            log::info!(
                "{} entries without pronunciation left out of the indices",
                lexicon.len() - usable
            );
        }

        let cover = CoverIndex::build(&lexicon);
        let rhyme = RhymeIndex::build(&lexicon);

        log::debug!(
            "Indexed {} entries: {} lengths, {} suffix keys",
            usable,
            cover.lengths(),
            rhyme.len()
        );

        Ok(LexiconIndex {
            lexicon,
            cover,
            rhyme,
        })
    }

    pub fn from_records<I>(records: I) -> Result<LexiconIndex, IndexError>
    where
        I: IntoIterator<Item = LexiconRecord>,
    {
        LexiconIndex::new(Lexicon::from_records(records))
    }

    /// Loads a persisted lexicon table and rebuilds the indices from it.
    pub fn open(path: &Path) -> Result<LexiconIndex, IndexError> {
        LexiconIndex::new(table::read_table(path)?)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn cover_index(&self) -> &CoverIndex {
        &self.cover
    }

    pub fn rhyme_index(&self) -> &RhymeIndex {
        &self.rhyme
    }

    #[inline(always)]
    pub fn lookup(&self, ortho: &str) -> Lookup<'_> {
        self.lexicon.lookup(ortho)
    }
}
