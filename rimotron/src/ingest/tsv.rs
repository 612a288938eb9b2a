//! Readers for the tab-separated sources: Lexique, GLAFF and Lefff.
use std::io::Read;

use serde::Deserialize;
use smol_str::SmolStr;

use super::IngestError;
use crate::lexicon::LexiconRecord;
use crate::phonemizer::{phonemize_stripped, Phonemizer};
use crate::pronunciation::Pronunciation;
use crate::types::Frequency;

#[derive(Debug, Deserialize)]
struct LexiqueRow {
    ortho: SmolStr,
    phon: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    freqfilms2: Option<Frequency>,
}

#[derive(Debug, Deserialize)]
struct GlaffRow {
    ortho: SmolStr,
    phon: String,
}

fn reader_builder(has_headers: bool) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false);
    builder
}

/// Runs `f` over each deserialized row, skipping the ones that fail to
/// parse or that `f` rejects.
fn collect_rows<R, T, F>(
    name: &str,
    mut rdr: csv::Reader<R>,
    mut f: F,
) -> Result<Vec<LexiconRecord>, IngestError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
    F: FnMut(T) -> Option<LexiconRecord>,
{
    let mut records = vec![];
    let mut skipped = 0usize;

    for row in rdr.deserialize::<T>() {
        match row {
            Ok(row) => match f(row) {
                Some(record) => records.push(record),
                None => skipped += 1,
            },
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{}: {} malformed rows skipped", name, skipped);
    }
    Ok(records)
}

/// Lexique: `phon` holds Lexique's own phonetic code, converted through the
/// phonemizer.
pub fn read_lexique<R: Read, P: Phonemizer + ?Sized>(
    reader: R,
    phonemizer: &P,
) -> Result<Vec<LexiconRecord>, IngestError> {
    let rdr = reader_builder(true).from_reader(reader);
    collect_rows("Lexique", rdr, |row: LexiqueRow| {
        if row.ortho.is_empty() {
            return None;
        }
        let phonemes = phonemize_stripped(phonemizer, &row.phon);
        Some(LexiconRecord::new(row.ortho, phonemes, row.freqfilms2))
    })
}

/// GLAFF: `phon` is IPA already.
pub fn read_glaff<R: Read>(reader: R) -> Result<Vec<LexiconRecord>, IngestError> {
    let rdr = reader_builder(true).from_reader(reader);
    collect_rows("GLAFF", rdr, |row: GlaffRow| {
        if row.ortho.is_empty() {
            return None;
        }
        Some(LexiconRecord::new(
            row.ortho,
            Pronunciation::parse(&row.phon).strip_discretionary(),
            None,
        ))
    })
}

/// Lefff: no header, columns `ortho, lemma, pos, inflected, sampa`. A
/// missing or empty `sampa` gives an empty pronunciation.
pub fn read_lefff<R: Read, P: Phonemizer + ?Sized>(
    reader: R,
    phonemizer: &P,
) -> Result<Vec<LexiconRecord>, IngestError> {
    let rdr = reader_builder(false).from_reader(reader);
    collect_rows("Lefff", rdr, |row: Vec<String>| {
        let ortho = row.first().filter(|s| !s.is_empty())?;
        let phonemes = match row.get(4).map(|s| s.trim()) {
            Some(sampa) if !sampa.is_empty() => phonemize_stripped(phonemizer, sampa),
            _ => Pronunciation::empty(),
        };
        Some(LexiconRecord::new(ortho.as_str(), phonemes, None))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonemizer::tests::MapPhonemizer;

    #[test]
    fn lexique_rows_are_phonemized() {
        let data = "ortho\tphon\tlemme\tcgram\tfreqfilms2\n\
                    chat\tSa\tchat\tNOM\t40.5\n\
                    poisson\tpwas§\tpoisson\tNOM\t\n";
        let g2p = MapPhonemizer::new(&[("Sa", "ʃ a"), ("pwas§", "p w a s ɔ̃")]);

        let records = read_lexique(data.as_bytes(), &g2p).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ortho, "chat");
        assert_eq!(records[0].phonemes, Pronunciation::parse("ʃ a"));
        assert_eq!(records[0].frequency, Some(40.5));
        assert_eq!(records[1].phonemes, Pronunciation::parse("p a s ɔ̃"));
        assert_eq!(records[1].frequency, None);
        assert_eq!(g2p.calls(), 2);
    }

    #[test]
    fn lexique_phonemizer_failure_keeps_the_word() {
        let data = "ortho\tphon\tfreqfilms2\nxyz\t???\t1\n";
        let g2p = MapPhonemizer::default();

        let records = read_lexique(data.as_bytes(), &g2p).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].phonemes.is_empty());
    }

    #[test]
    fn glaff_rows_are_stripped() {
        let data = "ortho\tphon\nfenêtre\tf ə n ɛ t ʁ\n\tb a\nmoi\tmwa\n";

        let records = read_glaff(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phonemes, Pronunciation::parse("f n ɛ t ʁ"));
        assert_eq!(records[1].phonemes, Pronunciation::parse("m a"));
        assert!(records.iter().all(|r| r.frequency.is_none()));
    }

    #[test]
    fn lefff_rows_without_sampa_are_empty() {
        let data = "chats\tchat\tnc\tchats\tSa\nbof\tbof\tadv\tbof\n\tx\tnc\tx\tx\n";
        let g2p = MapPhonemizer::new(&[("Sa", "ʃ a")]);

        let records = read_lefff(data.as_bytes(), &g2p).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ortho, "chats");
        assert_eq!(records[0].phonemes, Pronunciation::parse("ʃ a"));
        assert_eq!(records[1].ortho, "bof");
        assert!(records[1].phonemes.is_empty());
        assert_eq!(g2p.calls(), 1);
    }
}
