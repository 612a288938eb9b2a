/// Maximum number of trailing phonemes kept in a suffix key.
pub const SUFFIX_KEY_LEN: usize = 10;

/// Phonemes elided from every pronunciation before matching: schwa and the
/// two glides.
pub const DISCRETIONARY_PHONEMES: [&str; 3] = ["ə", "j", "w"];

/// Stress marks emitted by the phonemizer, dropped from its output.
pub const STRESS_MARKS: [char; 2] = ['ˈ', 'ˌ'];

/// Largest phoneme edit distance accepted by the approximate rhyme phase.
pub const MAX_APPROXIMATE_DISTANCE: usize = 1;
