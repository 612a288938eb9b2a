//! Reader for DELAF inflected-form dictionaries.
//!
//! Entries look like `chats,chat.N+z1:mp`: the inflected form, a comma, the
//! lemma (empty when identical to the form), a dot and the grammatical
//! code. `\` escapes a literal `,` or `.` inside a form. Files are UTF-16
//! with a byte order mark.
use std::io::{self, Read};

use crate::lexicon::LexiconRecord;
use crate::phonemizer::{phonemize_stripped, Phonemizer};

/// Decodes UTF-16 text. The byte order mark picks endianness, little-endian
/// when absent. Invalid code units become U+FFFD.
pub(crate) fn decode_utf16(bytes: &[u8]) -> String {
    let (body, big_endian) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        _ => (bytes, false),
    };

    let units = body.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Splits on the first `sep` not preceded by a backslash.
fn split_unescaped(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            c if c == sep && !escaped => return Some((&s[..i], &s[i + c.len_utf8()..])),
            _ => escaped = false,
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// The inflected form of an entry line, or `None` for anything that is not
/// a well-formed entry.
pub(crate) fn parse_line(line: &str) -> Option<String> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let (inflected, rest) = split_unescaped(line, ',')?;
    let (_lemma, codes) = split_unescaped(rest, '.')?;
    let pos = codes.split(|c: char| c == '+' || c == ':').next()?;

    let inflected = unescape(inflected.trim());
    let well_formed = !inflected.is_empty()
        && pos.chars().next().map_or(false, |c| c.is_ascii_uppercase());

    if well_formed {
        Some(inflected)
    } else {
        None
    }
}

pub fn read_delaf<R: Read, P: Phonemizer + ?Sized>(
    mut reader: R,
    phonemizer: &P,
) -> Result<Vec<LexiconRecord>, io::Error> {
    let mut bytes = vec![];
    reader.read_to_end(&mut bytes)?;
    let text = decode_utf16(&bytes);

    let mut records = vec![];
    let mut skipped = 0usize;

    for line in text.lines() {
        match parse_line(line) {
            Some(ortho) => {
                let phonemes = phonemize_stripped(phonemizer, &ortho);
                records.push(LexiconRecord::new(ortho, phonemes, None));
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("DELAF: {} malformed lines skipped", skipped);
    }
    Ok(records)
}
