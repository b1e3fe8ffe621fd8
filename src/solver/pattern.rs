use std::collections::HashMap;

/// The canonical letter-repetition shape of a word.
///
/// Each position is assigned the index of its letter's first occurrence, so
/// `deed` and `noon` both become `[0, 1, 1, 0]`. Two words have equal
/// patterns exactly when one can be turned into the other by a bijective
/// renaming of its letters, which makes the pattern the coarsest index a
/// substitution-cipher search can use to shortlist plaintext candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<u8>);

impl Pattern {
    /// Computes the pattern of a nonempty word in a single pass.
    pub fn of(word: &str) -> Pattern {
        debug_assert!(!word.is_empty(), "patterns are defined on nonempty words");
        let mut symbols = Vec::with_capacity(word.len());
        let mut seen: HashMap<char, u8> = HashMap::new();
        for ch in word.chars() {
            let next = seen.len() as u8;
            symbols.push(*seen.entry(ch).or_insert(next));
        }
        Pattern(symbols)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
