//! Merging raw French dictionaries into lexicon records.
//!
//! Each source has its own reader. [`ingest`] reads every given file and
//! returns the records ordered by [`Source`] priority, so that building a
//! [`Lexicon`] from them keeps the pronunciation of the best source.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, LexiconRecord};
use crate::phonemizer::Phonemizer;

pub mod delaf;
pub mod tsv;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IngestError {
    /// The source file could not be opened or read
    #[error("Could not read {0}: {1}")]
    Io(String, #[source] std::io::Error),

    /// The tabular reader failed below the row level
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A gzip file was given but the crate was built without compression
    #[error("{0} is compressed, rebuild with the `compression` feature")]
    UnsupportedCompressed(String),
}

/// The known dictionaries. Ordering is priority: an earlier source wins
/// when several define the same word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Lexique,
    Glaff,
    Delaf,
    Lefff,
}

impl Source {
    pub fn name(self) -> &'static str {
        match self {
            Source::Lexique => "Lexique",
            Source::Glaff => "GLAFF",
            Source::Delaf => "DELAF",
            Source::Lefff => "Lefff",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub source: Source,
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(source: Source, path: impl Into<PathBuf>) -> SourceFile {
        SourceFile {
            source,
            path: path.into(),
        }
    }
}

/// Opens `path`, transparently decompressing `.gz` files.
pub(crate) fn open(path: &Path) -> Result<Box<dyn Read>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::Io(path.display().to_string(), e))?;
    let reader = BufReader::new(file);

    if path.extension().map_or(false, |ext| ext == "gz") {
        #[cfg(feature = "compression")]
        {
            return Ok(Box::new(flate2::read::GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compression"))]
        {
            return Err(IngestError::UnsupportedCompressed(path.display().to_string()));
        }
    }

    Ok(Box::new(reader))
}

/// Reads one source file into records, in file order.
pub fn read_source<P: Phonemizer + ?Sized>(
    file: &SourceFile,
    phonemizer: &P,
) -> Result<Vec<LexiconRecord>, IngestError> {
    let reader = open(&file.path)?;
    let path = file.path.display().to_string();

    let records = match file.source {
        Source::Lexique => tsv::read_lexique(reader, phonemizer)?,
        Source::Glaff => tsv::read_glaff(reader)?,
        Source::Delaf => delaf::read_delaf(reader, phonemizer)
            .map_err(|e| IngestError::Io(path.clone(), e))?,
        Source::Lefff => tsv::read_lefff(reader, phonemizer)?,
    };

    log::info!(
        "{}: {} records from {}",
        file.source.name(),
        records.len(),
        path
    );
    Ok(records)
}

/// Reads every file and concatenates the records by source priority. Files
/// of the same source keep the order they were given in.
pub fn ingest<P: Phonemizer + ?Sized>(
    files: &[SourceFile],
    phonemizer: &P,
) -> Result<Vec<LexiconRecord>, IngestError> {
    let mut ordered: Vec<&SourceFile> = files.iter().collect();
    ordered.sort_by_key(|f| f.source);

    let mut records = vec![];
    for file in ordered {
        records.extend(read_source(file, phonemizer)?);
    }
    Ok(records)
}

pub fn build_lexicon<P: Phonemizer + ?Sized>(
    files: &[SourceFile],
    phonemizer: &P,
) -> Result<Lexicon, IngestError> {
    let records = ingest(files, phonemizer)?;
    let total = records.len();
    let lexicon = Lexicon::from_records(records);

    log::info!(
        "Merged {} records into {} entries ({} with a pronunciation)",
        total,
        lexicon.len(),
        lexicon.usable_count()
    );
    Ok(lexicon)
}
