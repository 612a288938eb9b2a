use hashbrown::HashMap;
use parking_lot::Mutex;
use smol_str::SmolStr;

use super::{Phonemizer, PhonemizerError};
use crate::pronunciation::Pronunciation;

/// Remembers every successful conversion for the lifetime of the value.
/// Failures are not remembered.
pub struct CachedPhonemizer<P> {
    inner: P,
    cache: Mutex<HashMap<SmolStr, Pronunciation>>,
}

impl<P: Phonemizer> CachedPhonemizer<P> {
    pub fn new(inner: P) -> CachedPhonemizer<P> {
        CachedPhonemizer {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl<P: Phonemizer> Phonemizer for CachedPhonemizer<P> {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError> {
        if let Some(pron) = self.cache.lock().get(text) {
            return Ok(pron.clone());
        }

        // The lock is released while the engine runs.
        let pron = self.inner.phonemize(text)?;
        self.cache.lock().insert(SmolStr::new(text), pron.clone());
        Ok(pron)
    }
}
