//! Length-bucketed index used by the cover search.
use hashbrown::HashMap;

use crate::lexicon::Lexicon;
use crate::types::EntryId;

#[derive(Debug, Default)]
pub struct CoverIndex {
    by_length: HashMap<usize, Vec<EntryId>>,
}

impl CoverIndex {
    pub fn build(lexicon: &Lexicon) -> CoverIndex {
        let mut by_length: HashMap<usize, Vec<EntryId>> = HashMap::new();

        for (id, entry) in lexicon.iter().filter(|(_, e)| e.is_usable()) {
            by_length.entry(entry.length()).or_default().push(id);
        }

        CoverIndex { by_length }
    }

    /// Entries with exactly `length` phonemes, in lexicon order.
    #[inline(always)]
    pub fn with_length(&self, length: usize) -> &[EntryId] {
        self.by_length
            .get(&length)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn lengths(&self) -> usize {
        self.by_length.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::tests::record;

    #[test]
    fn groups_by_length_in_lexicon_order() {
        let lexicon = Lexicon::from_records(vec![
            record("rat", "ʁ a", 1.0),
            record("plat", "p l a", 1.0),
            record("chat", "ʃ a", 1.0),
            record("oui", "w i", 1.0),
            record("yeux", "j ə", 1.0),
        ]);
        let index = CoverIndex::build(&lexicon);

        let two: Vec<&str> = index
            .with_length(2)
            .iter()
            .map(|id| lexicon.entry(*id).ortho())
            .collect();
        assert_eq!(two, vec!["rat", "chat"]);
        assert_eq!(index.with_length(3).len(), 1);
        assert_eq!(index.with_length(1).len(), 1);
        // "yeux" is all discretionary phonemes and never indexed.
        assert!(index.with_length(0).is_empty());
        assert!(index.with_length(7).is_empty());
    }
}
