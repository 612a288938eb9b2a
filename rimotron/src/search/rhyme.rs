//! Rhyme lookup by shared trailing phonemes, with an edit-distance fallback.
use std::cmp::Ordering::{self, Equal};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::RhymeConfig;
use crate::constants::MAX_APPROXIMATE_DISTANCE;
use crate::index::LexiconIndex;
use crate::pronunciation::{join_symbols, Pronunciation};
use crate::types::Frequency;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A rhyme candidate
pub struct Rhyme {
    /// the rhyming word-form
    pub value: SmolStr,
    /// usage frequency of the word-form
    pub frequency: Frequency,
    /// phoneme edit distance, only set by the approximate phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

impl Rhyme {
    pub fn new(value: SmolStr, frequency: Frequency, distance: Option<usize>) -> Rhyme {
        Rhyme {
            value,
            frequency,
            distance,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn distance(&self) -> Option<usize> {
        self.distance
    }
}

#[inline(always)]
fn by_frequency_desc(a: &Rhyme, b: &Rhyme) -> Ordering {
    b.frequency.partial_cmp(&a.frequency).unwrap_or(Equal)
}

pub(crate) struct RhymeWorker<'a> {
    index: &'a LexiconIndex,
    word: &'a str,
    target: &'a Pronunciation,
    config: &'a RhymeConfig,
}

impl<'a> RhymeWorker<'a> {
    pub(crate) fn new(
        index: &'a LexiconIndex,
        word: &'a str,
        target: &'a Pronunciation,
        config: &'a RhymeConfig,
    ) -> RhymeWorker<'a> {
        RhymeWorker {
            index,
            word,
            target,
            config,
        }
    }

    pub(crate) fn rhymes(&self) -> Vec<Rhyme> {
        let exact = self.exact();

        if !exact.is_empty() || !self.config.approximate {
            return exact;
        }

        log::debug!("{}: no exact rhyme, trying approximate matches", self.word);
        self.approximate()
    }

    fn exact(&self) -> Vec<Rhyme> {
        let n = self.config.min_syllables.min(self.target.len());
        let suffix = join_symbols(self.target.tail(n));

        if suffix.is_empty() {
            log::debug!("{}: empty rhyme suffix, every bucket matches", self.word);
        }

        let buckets = self.index.rhyme_index().ending_with(&suffix);
        log::trace!("{}: suffix {:?} matched {} buckets", self.word, suffix, buckets.len());

        let mut out: Vec<Rhyme> = buckets
            .into_iter()
            .flat_map(|bucket| bucket.members().iter())
            .filter(|(ortho, _)| ortho != self.word)
            .map(|(ortho, frequency)| Rhyme::new(ortho.clone(), *frequency, None))
            .collect();

        // Stable: equal frequencies keep bucket order.
        out.sort_by(by_frequency_desc);
        out.truncate(self.config.limit);
        out
    }

    fn approximate(&self) -> Vec<Rhyme> {
        let mut out: Vec<Rhyme> = self
            .index
            .lexicon()
            .entries()
            .iter()
            .filter(|entry| entry.is_usable() && entry.ortho() != self.word)
            .filter_map(|entry| {
                let distance = entry.phonemes().distance(self.target);
                if distance <= MAX_APPROXIMATE_DISTANCE {
                    Some(Rhyme::new(
                        entry.ortho_smol().clone(),
                        entry.frequency(),
                        Some(distance),
                    ))
                } else {
                    None
                }
            })
            .collect();

        out.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| by_frequency_desc(a, b)));
        out.truncate(self.config.limit);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::tests::record;

    fn index() -> LexiconIndex {
        LexiconIndex::from_records(vec![
            record("chat", "ʃ a", 40.0),
            record("plat", "p l a", 30.0),
            record("rat", "ʁ a", 55.0),
            record("ras", "ʁ a", 5.0),
            record("bonjour", "b ɔ̃ ʒ u ʁ", 50.0),
            record("toujours", "t u ʒ u ʁ", 45.0),
            record("jour", "ʒ u ʁ", 60.0),
            record("velours", "v l u ʁ", 3.0),
            record("ça", "s a", 100.0),
        ])
        .unwrap()
    }

    fn run(index: &LexiconIndex, word: &str, config: &RhymeConfig) -> Vec<Rhyme> {
        let target = index.lookup(word).found().cloned().unwrap_or_default();
        RhymeWorker::new(index, word, &target, config).rhymes()
    }

    fn values(rhymes: &[Rhyme]) -> Vec<&str> {
        rhymes.iter().map(|r| r.value()).collect()
    }

    fn config(min_syllables: usize, limit: usize, approximate: bool) -> RhymeConfig {
        RhymeConfig {
            min_syllables,
            limit,
            approximate,
        }
    }

    #[test]
    fn query_word_is_excluded() {
        let index = index();
        let rhymes = run(&index, "chat", &config(1, 20, false));

        assert!(!values(&rhymes).contains(&"chat"));
        assert_eq!(values(&rhymes), vec!["ça", "rat", "plat", "ras"]);
    }

    #[test]
    fn whole_word_suffix_only_matches_itself() {
        // "ʃa" is the whole of "chat": the only bucket ending with it is
        // chat's own, so nothing is left once the query word is removed.
        let index = index();
        let rhymes = run(&index, "chat", &config(2, 20, false));
        assert!(rhymes.is_empty());
    }

    #[test]
    fn exact_results_by_non_increasing_frequency() {
        let index = index();
        let rhymes = run(&index, "bonjour", &config(3, 20, false));

        assert_eq!(values(&rhymes), vec!["jour", "toujours"]);
        assert!(rhymes
            .windows(2)
            .all(|w| w[0].frequency() >= w[1].frequency()));
        assert!(rhymes.iter().all(|r| r.distance().is_none()));
    }

    #[test]
    fn suffix_match_is_ends_with_not_equality() {
        let index = index();
        // "uʁ" is shorter than every bucket key it matches.
        let rhymes = run(&index, "jour", &config(2, 20, false));
        assert_eq!(values(&rhymes), vec!["bonjour", "toujours", "velours"]);
    }

    #[test]
    fn min_syllables_is_clamped() {
        let index = index();
        let clamped = run(&index, "rat", &config(10, 20, false));
        let exact = run(&index, "rat", &config(2, 20, false));

        assert_eq!(clamped, exact);
        assert_eq!(values(&clamped), vec!["ras"]);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let index = index();
        let rhymes = run(&index, "chat", &config(1, 2, false));
        assert_eq!(values(&rhymes), vec!["ça", "rat"]);
    }

    #[test]
    fn approximate_only_when_exact_is_empty() {
        let index = index();

        assert!(run(&index, "chat", &config(2, 20, false)).is_empty());

        let rhymes = run(&index, "chat", &config(2, 20, true));
        // distance 1: rat, ras, ça (substitution); plat is 2 away.
        assert_eq!(values(&rhymes), vec!["ça", "rat", "ras"]);
        for r in &rhymes {
            assert!(r.distance().unwrap() <= MAX_APPROXIMATE_DISTANCE);
        }

        let exact = run(&index, "chat", &config(1, 20, true));
        assert!(exact.iter().all(|r| r.distance().is_none()));
    }

    #[test]
    fn approximate_orders_by_distance_then_frequency() {
        let index = LexiconIndex::from_records(vec![
            record("sel", "s ɛ l", 1.0),
            record("selle", "s ɛ l", 9.0),
            record("sept", "s ɛ t", 20.0),
            record("sels", "s ɛ l z", 50.0),
            record("unique", "y n i k", 5.0),
        ])
        .unwrap();

        let target = Pronunciation::parse("s ɛ l");
        let rhymes = RhymeWorker::new(&index, "sel", &target, &config(10, 20, true)).approximate();

        assert_eq!(values(&rhymes), vec!["selle", "sels", "sept"]);
        assert_eq!(
            rhymes.iter().map(|r| r.distance().unwrap()).collect::<Vec<_>>(),
            vec![0, 1, 1]
        );
    }

    fn tied_index() -> LexiconIndex {
        LexiconIndex::from_records(vec![
            record("chat", "ʃ a", 40.0),
            record("za", "z a", 5.0),
            record("ba", "b a", 5.0),
            record("rat", "ʁ a", 5.0),
            record("qua", "k a", 5.0),
            record("ras", "ʁ a", 5.0),
            record("lit", "l i", 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn exact_ties_keep_bucket_order() {
        let index = tied_index();
        let rhymes = run(&index, "chat", &config(1, 20, false));

        // Buckets in first-appearance order; "ʁa" holds rat then ras.
        assert_eq!(values(&rhymes), vec!["za", "ba", "rat", "ras", "qua"]);
    }

    #[test]
    fn approximate_ties_keep_lexicon_order() {
        let index = tied_index();
        let rhymes = run(&index, "chat", &config(2, 20, true));

        assert_eq!(values(&rhymes), vec!["za", "ba", "rat", "qua", "ras"]);
        assert!(rhymes.iter().all(|r| r.distance() == Some(1)));
    }

    #[test]
    fn empty_target_returns_most_frequent() {
        let index = index();
        let target = Pronunciation::empty();
        let rhymes = RhymeWorker::new(&index, "???", &target, &config(3, 3, false)).rhymes();

        assert_eq!(values(&rhymes), vec!["ça", "jour", "rat"]);
    }
}
