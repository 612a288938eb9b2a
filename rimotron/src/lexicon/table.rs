//! Tab-separated persistence of a [`Lexicon`].
//!
//! Columns: `ortho`, `ipa`, `freqfilms2`, `ipa_suffix`, `len_ph`. The two
//! derived columns are written for the benefit of other consumers and are
//! recomputed, never read back. The `ipa` column is whitespace-separated
//! symbols and is split on whitespace only.
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::error::TableError;
use super::{Lexicon, LexiconRecord};
use crate::pronunciation::Pronunciation;
use crate::types::Frequency;

#[derive(Debug, Deserialize)]
struct TableRow {
    ortho: SmolStr,
    #[serde(alias = "phonemes")]
    ipa: Pronunciation,
    #[serde(
        default,
        alias = "frequency",
        deserialize_with = "csv::invalid_option"
    )]
    freqfilms2: Option<Frequency>,
}

#[derive(Debug, Serialize)]
struct TableRowRef<'a> {
    ortho: &'a str,
    ipa: &'a Pronunciation,
    freqfilms2: Frequency,
    ipa_suffix: SmolStr,
    len_ph: usize,
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false);
    builder
}

/// Reads table rows in file order. Rows that cannot be parsed are skipped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<LexiconRecord>, TableError> {
    let mut rdr = reader_builder().from_reader(reader);
    let mut records = vec![];
    let mut skipped = 0usize;

    for (line, row) in rdr.deserialize::<TableRow>().enumerate() {
        match row {
            Ok(row) => records.push(LexiconRecord::new(row.ortho, row.ipa, row.freqfilms2)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping lexicon row {}: {}", line + 2, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::debug!("{} malformed lexicon rows skipped", skipped);
    }

    Ok(records)
}

pub fn read_table(path: &Path) -> Result<Lexicon, TableError> {
    let file = std::fs::File::open(path)
        .map_err(|e| TableError::Io(path.display().to_string(), e))?;
    let records = read_records(std::io::BufReader::new(file))?;
    Ok(Lexicon::from_records(records))
}

pub fn write_records<W: Write>(lexicon: &Lexicon, writer: W) -> Result<(), TableError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    for entry in lexicon.entries() {
        wtr.serialize(TableRowRef {
            ortho: entry.ortho(),
            ipa: entry.phonemes(),
            freqfilms2: entry.frequency(),
            ipa_suffix: entry.suffix_key(),
            len_ph: entry.length(),
        })?;
    }

    wtr.flush()
        .map_err(|e| TableError::Io("<writer>".to_string(), e))?;
    Ok(())
}

pub fn write_table(lexicon: &Lexicon, path: &Path) -> Result<(), TableError> {
    let file = std::fs::File::create(path)
        .map_err(|e| TableError::Io(path.display().to_string(), e))?;
    write_records(lexicon, std::io::BufWriter::new(file))?;
    log::info!("Wrote {} entries to {}", lexicon.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::tests::record;

    #[test]
    fn write_then_read_keeps_order_and_values() {
        let lexicon = Lexicon::from_records(vec![
            record("rat", "ʁ a", 12.5),
            record("chat", "ʃ a", 40.0),
            record("bonjour", "b ɔ̃ ʒ u ʁ", 0.0),
        ]);

        let mut buf = vec![];
        write_records(&lexicon, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("ortho\tipa\tfreqfilms2\tipa_suffix\tlen_ph\n"));
        assert!(text.contains("bonjour\tb ɔ̃ ʒ u ʁ\t0.0\tbɔ̃ʒuʁ\t5\n"));

        let back = Lexicon::from_records(read_records(&buf[..]).unwrap());
        assert_eq!(back.entries(), lexicon.entries());
    }

    #[test]
    fn derived_columns_are_recomputed() {
        let data = "ortho\tipa\tfreqfilms2\tipa_suffix\tlen_ph\n\
                    chat\tʃ a\t3.5\tbogus\t99\n";
        let records = read_records(data.as_bytes()).unwrap();
        let lexicon = Lexicon::from_records(records);
        let chat = lexicon.get("chat").unwrap();

        assert_eq!(chat.length(), 2);
        assert_eq!(chat.suffix_key(), "ʃa");
        assert_eq!(chat.frequency(), 3.5);
    }

    #[test]
    fn single_multi_character_phoneme_round_trips() {
        let lexicon = Lexicon::from_records(vec![
            LexiconRecord::new("dj", Pronunciation::from(&["dʒ"][..]), Some(1.0)),
            LexiconRecord::new("tcha", Pronunciation::from(&["tʃ", "a"][..]), Some(2.0)),
        ]);

        let mut buf = vec![];
        write_records(&lexicon, &mut buf).unwrap();
        let back = Lexicon::from_records(read_records(&buf[..]).unwrap());

        assert_eq!(back.entries(), lexicon.entries());
        assert_eq!(back.get("dj").unwrap().length(), 1);
        assert_eq!(back.get("tcha").unwrap().length(), 2);
    }

    #[test]
    fn aliases_and_missing_frequency() {
        let data = "ortho\tphonemes\tfrequency\n\
                    plat\tp l a\t\n\
                    rat\tʁ a\tnot-a-number\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frequency, None);
        assert_eq!(records[1].frequency, None);
        assert_eq!(records[0].phonemes.len(), 3);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let data = "ortho\tipa\n\
                    seul\n\
                    chat\tʃ a\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ortho, "chat");
    }

    #[test]
    fn table_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lex.tsv");
        let lexicon = Lexicon::from_records(vec![record("air", "a ʁ", 8.0)]);

        write_table(&lexicon, &path).unwrap();
        let back = read_table(&path).unwrap();
        assert_eq!(back.entries(), lexicon.entries());

        assert!(matches!(
            read_table(&dir.path().join("missing.tsv")),
            Err(TableError::Io(_, _))
        ));
    }
}
