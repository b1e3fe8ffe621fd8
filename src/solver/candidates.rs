use im::Vector;

use crate::solver::{
    alphabet::{Alphabet, LetterSet},
    dictionary::{Dictionary, WordId},
    pattern::Pattern,
};

/// A ciphertext word in canonical lowercase, with its alphabet-index form
/// and the set of cipher letters it uses.
#[derive(Debug, Clone)]
pub(crate) struct CipherWord {
    pub text: String,
    pub letters: Vec<u8>,
    pub letters_used: LetterSet,
}

/// The fixed context of one solve call: the distinct ciphertext words and
/// the set of cipher letters appearing anywhere in them. Built once, shared
/// by every node on the search stack.
#[derive(Debug)]
pub(crate) struct Puzzle {
    pub words: Vec<CipherWord>,
    pub present: LetterSet,
}

impl Puzzle {
    /// Expects words already tokenized against `alphabet`.
    pub fn new(words: Vec<String>, alphabet: &Alphabet) -> Self {
        let words: Vec<CipherWord> = words
            .into_iter()
            .map(|text| {
                let letters: Vec<u8> = text
                    .chars()
                    .map(|ch| {
                        alphabet
                            .index_of(ch)
                            .expect("tokenized words contain only alphabet letters")
                    })
                    .collect();
                let mut letters_used = LetterSet::EMPTY;
                for &idx in &letters {
                    letters_used.insert(idx);
                }
                CipherWord {
                    text,
                    letters,
                    letters_used,
                }
            })
            .collect();
        let mut present = LetterSet::EMPTY;
        for word in &words {
            present |= word.letters_used;
        }
        Self { words, present }
    }
}

/// One node in the depth-first search: a candidate set per ciphertext word,
/// parallel to [`Puzzle::words`].
///
/// Candidate sets are `im::Vector`s, so a child node created at a branch
/// point shares structure with its parent instead of deep-copying it, and
/// each node still fully owns its own state. Along any search path the sets
/// only ever shrink.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchNode {
    pub candidates: Vector<Vector<WordId>>,
}

impl SearchNode {
    /// The initial node: each ciphertext word starts with every dictionary
    /// word of the same pattern.
    pub fn root(puzzle: &Puzzle, dictionary: &Dictionary) -> Self {
        let candidates = puzzle
            .words
            .iter()
            .map(|word| {
                dictionary
                    .words_matching(&Pattern::of(&word.text))
                    .iter()
                    .copied()
                    .collect()
            })
            .collect();
        Self { candidates }
    }

    pub fn has_empty_set(&self) -> bool {
        self.candidates.iter().any(|set| set.is_empty())
    }

    /// True when every word is down to exactly one candidate.
    pub fn is_solved(&self) -> bool {
        self.candidates.iter().all(|set| set.len() == 1)
    }

    /// Splits this node into children that together cover its candidate
    /// space.
    ///
    /// For each word with more than one candidate (in word order) a child
    /// fixes that word to its first candidate and leaves the rest alone.
    /// A final remainder child removes every such first candidate, covering
    /// the assignments no fixing child reaches. The driver pushes children
    /// in reverse, so popping explores the fix-the-earliest-word branch
    /// first: a left-most greedy dive.
    pub fn partition(&self) -> Vec<SearchNode> {
        let mut children = Vec::new();
        let mut remainder = self.candidates.clone();
        for (idx, set) in self.candidates.iter().enumerate() {
            if set.len() <= 1 {
                continue;
            }
            let first = set[0];
            children.push(SearchNode {
                candidates: self.candidates.update(idx, Vector::unit(first)),
            });
            remainder = remainder.update(idx, set.iter().skip(1).copied().collect());
        }
        children.push(SearchNode {
            candidates: remainder,
        });
        children
    }
}
