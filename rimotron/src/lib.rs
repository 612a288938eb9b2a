/*! Rhyme and homophone-cover search over a phonetic lexicon.

Words are looked up in a lexicon of pronunciations (sequences of phoneme
symbols). Two searches run on top of it:

* rhymes: lexicon words ending with the same phonemes as the query, with an
  optional edit-distance fallback;
* covers: sequences of lexicon words whose pronunciations, put end to end,
  sound exactly like the query (`airbag` is `air` + `bague`).

Words missing from the lexicon are phonemized through [`espeak-ng`].

[`espeak-ng`]: (https://github.com/espeak-ng/espeak-ng)

# Usage examples

```no_run
use std::path::Path;
use std::sync::Arc;

use rimotron::index::LexiconIndex;
use rimotron::phonemizer::{CachedPhonemizer, EspeakPhonemizer};
use rimotron::search::{PhoneticEngine, WordplaySearch};

let index = Arc::new(LexiconIndex::open(Path::new("lex_master.tsv"))?);
let engine = PhoneticEngine::new(index, CachedPhonemizer::new(EspeakPhonemizer::default()));

for cover in engine.cover("airbag") {
    println!("{}", cover.join(" + "));
}
for rhyme in engine.rhymes("bonjour") {
    println!("{} {}", rhyme.value(), rhyme.frequency());
}
# Ok::<(), Box<dyn std::error::Error>>(())
```

The lexicon table itself is built from raw dictionaries by [`ingest`], and
the `lexicon-tools` binary in the same repository drives that step.
*/

pub mod config;
pub mod dataset;
pub mod index;
pub mod ingest;
pub mod lexicon;
pub mod phonemizer;
pub mod pronunciation;
pub mod search;

pub mod constants;
pub mod types;
