//! Suffix-key index used by the rhyme search.
//!
//! Buckets are kept in the order their key first appears in the lexicon.
//! Besides the buckets, the keys are stored reversed and sorted, so that
//! "key ends with suffix" becomes a prefix range found by binary search.
use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::lexicon::Lexicon;
use crate::types::Frequency;

#[derive(Debug, Clone, PartialEq)]
pub struct RhymeBucket {
    key: SmolStr,
    members: Vec<(SmolStr, Frequency)>,
}

impl RhymeBucket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn members(&self) -> &[(SmolStr, Frequency)] {
        &self.members
    }
}

#[derive(Debug, Default)]
pub struct RhymeIndex {
    buckets: Vec<RhymeBucket>,
    reversed: Vec<(String, usize)>,
}

#[inline(always)]
fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

impl RhymeIndex {
    pub fn build(lexicon: &Lexicon) -> RhymeIndex {
        let mut positions: HashMap<SmolStr, usize> = HashMap::new();
        let mut buckets: Vec<RhymeBucket> = vec![];

        for (_, entry) in lexicon.iter().filter(|(_, e)| e.is_usable()) {
            let key = entry.suffix_key();
            let pos = *positions.entry(key.clone()).or_insert_with(|| {
                buckets.push(RhymeBucket {
                    key,
                    members: vec![],
                });
                buckets.len() - 1
            });

            buckets[pos]
                .members
                .push((entry.ortho_smol().clone(), entry.frequency()));
        }

        let mut reversed: Vec<(String, usize)> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (reverse(&b.key), i))
            .collect();
        reversed.sort_unstable();

        RhymeIndex { buckets, reversed }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn buckets(&self) -> &[RhymeBucket] {
        &self.buckets
    }

    /// Buckets whose key ends with `suffix`, in first-appearance order.
    pub fn ending_with(&self, suffix: &str) -> Vec<&RhymeBucket> {
        let needle = reverse(suffix);
        let start = self
            .reversed
            .partition_point(|(key, _)| key.as_str() < needle.as_str());

        let mut hits: Vec<usize> = self.reversed[start..]
            .iter()
            .take_while(|(key, _)| key.starts_with(needle.as_str()))
            .map(|(_, i)| *i)
            .collect();
        hits.sort_unstable();

        hits.into_iter().map(|i| &self.buckets[i]).collect()
    }
}
