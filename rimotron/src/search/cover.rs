//! Exact phonetic segmentation of a pronunciation into lexicon words.
//!
//! At each position the longest span that leads to at least one complete
//! decomposition wins; shorter spans there are not explored. Per span length
//! at most `max_branch` words are tried, in lexicon order.
use smol_str::SmolStr;

use super::CoverConfig;
use crate::index::LexiconIndex;
use crate::pronunciation::Pronunciation;
use crate::types::Cover;

pub(crate) struct CoverWorker<'a> {
    index: &'a LexiconIndex,
    word: &'a str,
    target: &'a Pronunciation,
    config: &'a CoverConfig,
    memo: Vec<Option<Vec<Cover>>>,
}

impl<'a> CoverWorker<'a> {
    pub(crate) fn new(
        index: &'a LexiconIndex,
        word: &'a str,
        target: &'a Pronunciation,
        config: &'a CoverConfig,
    ) -> CoverWorker<'a> {
        CoverWorker {
            index,
            word,
            target,
            config,
            memo: vec![None; target.len()],
        }
    }

    pub(crate) fn covers(mut self) -> Vec<Cover> {
        if self.target.is_empty() {
            log::debug!("{}: no pronunciation, no cover", self.word);
            return vec![];
        }

        if self.config.max_branch == 0 {
            return vec![];
        }

        let covers = self.solve(0);
        log::trace!("{}: {} covers", self.word, covers.len());
        covers
    }

    /// Words whose pronunciation is exactly `target[start..start + len]`.
    fn candidates(&self, start: usize, len: usize) -> Vec<&'a SmolStr> {
        let index: &'a LexiconIndex = self.index;
        let span = &self.target[start..start + len];
        let word = self.word;
        let exclude_self = self.config.exclude_self;

        index
            .cover_index()
            .with_length(len)
            .iter()
            .map(|id| index.lexicon().entry(*id))
            .filter(|entry| entry.phonemes().phonemes() == span)
            .filter(|entry| !(exclude_self && entry.ortho() == word))
            .take(self.config.max_branch)
            .map(|entry| entry.ortho_smol())
            .collect()
    }

    fn solve(&mut self, start: usize) -> Vec<Cover> {
        let total = self.target.len();

        if start == total {
            return vec![vec![]];
        }

        if let Some(covers) = &self.memo[start] {
            return covers.clone();
        }

        let mut out: Vec<Cover> = vec![];

        for len in (1..=total - start).rev() {
            let hits = self.candidates(start, len);
            if hits.is_empty() {
                continue;
            }

            let tails = self.solve(start + len);

            for hit in hits {
                for tail in tails.iter() {
                    let mut cover = Vec::with_capacity(tail.len() + 1);
                    cover.push(hit.clone());
                    cover.extend(tail.iter().cloned());
                    out.push(cover);
                }
            }

            if !out.is_empty() {
                break;
            }
        }

        self.memo[start] = Some(out.clone());
        out
    }
}
