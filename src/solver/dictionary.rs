use std::collections::{HashMap, HashSet};

use crate::{
    error::{Result, SolverError},
    solver::{alphabet::Alphabet, pattern::Pattern},
};

/// A numeric identifier for a single word in a [`Dictionary`].
pub type WordId = u32;

#[derive(Debug)]
struct WordEntry {
    text: String,
    letters: Vec<u8>,
    frequency: f64,
}

/// The read-only word index a solve runs against.
///
/// A dictionary owns its words and exposes three things: the alphabet the
/// words are written in, a pattern-to-words index used to shortlist
/// plaintext candidates, and a per-word frequency used only as a ranking
/// key. It is immutable once built and may be shared by reference across
/// concurrent solves.
#[derive(Debug)]
pub struct Dictionary {
    alphabet: Alphabet,
    words: Vec<WordEntry>,
    by_text: HashMap<String, WordId>,
    pattern_words: HashMap<Pattern, Vec<WordId>>,
}

impl Dictionary {
    /// Starts building a dictionary over `alphabet`.
    pub fn builder(alphabet: Alphabet) -> DictionaryBuilder {
        DictionaryBuilder {
            alphabet,
            words: Vec::new(),
            by_text: HashMap::new(),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The frequency recorded for `word`, after case folding.
    pub fn frequency(&self, word: &str) -> Option<f64> {
        self.by_text
            .get(&word.to_lowercase())
            .map(|&id| self.words[id as usize].frequency)
    }

    /// All words sharing `pattern`, ordered by descending frequency with
    /// lexicographic tie-breaks. Empty for an unknown pattern.
    pub fn words_matching(&self, pattern: &Pattern) -> &[WordId] {
        self.pattern_words
            .get(pattern)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn word(&self, id: WordId) -> &str {
        &self.words[id as usize].text
    }

    pub(crate) fn letters(&self, id: WordId) -> &[u8] {
        &self.words[id as usize].letters
    }

    pub(crate) fn word_frequency(&self, id: WordId) -> f64 {
        self.words[id as usize].frequency
    }
}

/// Accumulates words, then freezes them into a [`Dictionary`].
#[derive(Debug)]
pub struct DictionaryBuilder {
    alphabet: Alphabet,
    words: Vec<WordEntry>,
    by_text: HashMap<String, WordId>,
}

impl DictionaryBuilder {
    /// Adds a word with a nonnegative frequency.
    ///
    /// The word is folded to lowercase and every letter must belong to the
    /// alphabet. Re-adding a word keeps the higher of the two frequencies.
    pub fn add_word(&mut self, word: &str, frequency: f64) -> Result<()> {
        let folded = word.to_lowercase();
        if folded.is_empty() {
            return Err(SolverError::InvalidInput("words must be nonempty".to_string()).into());
        }
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(SolverError::InvalidInput(format!(
                "frequency for '{folded}' must be a nonnegative number, got {frequency}"
            ))
            .into());
        }
        let letters = folded
            .chars()
            .map(|ch| {
                self.alphabet.index_of(ch).ok_or_else(|| {
                    SolverError::InvalidInput(format!(
                        "word '{folded}' contains '{ch}', which is outside the alphabet"
                    ))
                    .into()
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        if let Some(&id) = self.by_text.get(&folded) {
            let entry = &mut self.words[id as usize];
            entry.frequency = entry.frequency.max(frequency);
        } else {
            let id = self.words.len() as WordId;
            self.by_text.insert(folded.clone(), id);
            self.words.push(WordEntry {
                text: folded,
                letters,
                frequency,
            });
        }
        Ok(())
    }

    /// Freezes the builder into an immutable [`Dictionary`].
    pub fn build(self) -> Dictionary {
        let mut pattern_words: HashMap<Pattern, Vec<WordId>> = HashMap::new();
        for (id, entry) in self.words.iter().enumerate() {
            pattern_words
                .entry(Pattern::of(&entry.text))
                .or_default()
                .push(id as WordId);
        }
        for bucket in pattern_words.values_mut() {
            bucket.sort_by(|&a, &b| {
                let (wa, wb) = (&self.words[a as usize], &self.words[b as usize]);
                wb.frequency
                    .total_cmp(&wa.frequency)
                    .then_with(|| wa.text.cmp(&wb.text))
            });
        }
        Dictionary {
            alphabet: self.alphabet,
            words: self.words,
            by_text: self.by_text,
            pattern_words,
        }
    }
}

/// Extracts the distinct alphabet-letter words of `text`.
///
/// Characters are folded to lowercase; maximal runs of alphabet letters
/// become words and everything else separates them. The result is
/// deduplicated and ordered by first appearance, so repeated calls over the
/// same input produce the same sequence.
pub fn parse_words(text: &str, alphabet: &Alphabet) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if alphabet.contains(ch) {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            let word = std::mem::take(&mut current);
            if seen.insert(word.clone()) {
                words.push(word);
            }
        }
    }
    if !current.is_empty() && seen.insert(current.clone()) {
        words.push(current);
    }
    words
}
