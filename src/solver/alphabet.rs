use std::collections::HashMap;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use crate::error::{Result, SolverError};

/// Maximum number of letters an [`Alphabet`] may hold. [`LetterSet`] packs
/// letter indices into a `u32` mask.
pub const MAX_LETTERS: usize = 32;

/// An ordered set of lowercase letters with O(1) lookup in both directions.
///
/// All solver operations are case-insensitive; input characters are folded
/// to lowercase before they are matched against the alphabet.
#[derive(Debug, Clone)]
pub struct Alphabet {
    letters: Vec<char>,
    index: HashMap<char, u8>,
}

impl Alphabet {
    /// Builds an alphabet from an ordered sequence of letters.
    ///
    /// Letters are folded to lowercase. Fails with `InvalidInput` when the
    /// sequence is empty, repeats a letter, or exceeds [`MAX_LETTERS`].
    pub fn new(letters: impl IntoIterator<Item = char>) -> Result<Self> {
        let mut chars = Vec::new();
        let mut index = HashMap::new();
        for ch in letters {
            let folded = ch.to_ascii_lowercase();
            if index.insert(folded, chars.len() as u8).is_some() {
                return Err(SolverError::InvalidInput(format!(
                    "duplicate alphabet letter '{folded}'"
                ))
                .into());
            }
            chars.push(folded);
        }
        if chars.is_empty() {
            return Err(SolverError::InvalidInput("alphabet is empty".to_string()).into());
        }
        if chars.len() > MAX_LETTERS {
            return Err(SolverError::InvalidInput(format!(
                "alphabet has {} letters, the maximum is {MAX_LETTERS}",
                chars.len()
            ))
            .into());
        }
        Ok(Self {
            letters: chars,
            index,
        })
    }

    /// The 26-letter English alphabet, `a` through `z`.
    pub fn latin() -> Self {
        Self::new('a'..='z').expect("a-z is a valid alphabet")
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// The index of `ch` in this alphabet, after case folding.
    pub fn index_of(&self, ch: char) -> Option<u8> {
        self.index.get(&ch.to_ascii_lowercase()).copied()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.index_of(ch).is_some()
    }

    /// The letter at `idx`. Panics when `idx` is out of range.
    pub fn letter(&self, idx: u8) -> char {
        self.letters[idx as usize]
    }

    /// The set of every letter in this alphabet.
    pub fn full_set(&self) -> LetterSet {
        LetterSet::full(self.len())
    }
}

/// A set of alphabet letter indices, packed into a `u32`.
///
/// Letter domains are intersected and differenced constantly during
/// propagation; a mask keeps those operations single instructions. The
/// derived ordering is by raw mask value, which is deterministic and is all
/// the propagator needs to iterate equal domains in a stable order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const EMPTY: LetterSet = LetterSet(0);

    /// The set holding every index below `n`.
    pub fn full(n: usize) -> Self {
        debug_assert!(n <= MAX_LETTERS);
        if n == MAX_LETTERS {
            Self(u32::MAX)
        } else {
            Self((1u32 << n) - 1)
        }
    }

    pub fn singleton(idx: u8) -> Self {
        Self(1u32 << idx)
    }

    pub fn insert(&mut self, idx: u8) {
        self.0 |= 1u32 << idx;
    }

    pub fn remove(&mut self, idx: u8) {
        self.0 &= !(1u32 << idx);
    }

    pub fn contains(self, idx: u8) -> bool {
        self.0 & (1u32 << idx) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_singleton(self) -> bool {
        self.len() == 1
    }

    /// The single member, when there is exactly one.
    pub fn sole(self) -> Option<u8> {
        if self.is_singleton() {
            Some(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    pub fn intersection(self, other: LetterSet) -> LetterSet {
        self & other
    }

    pub fn difference(self, other: LetterSet) -> LetterSet {
        LetterSet(self.0 & !other.0)
    }

    /// Member indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..MAX_LETTERS as u8).filter(move |&i| self.contains(i))
    }
}

impl BitAnd for LetterSet {
    type Output = LetterSet;
    fn bitand(self, rhs: Self) -> Self {
        LetterSet(self.0 & rhs.0)
    }
}

impl BitAndAssign for LetterSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for LetterSet {
    type Output = LetterSet;
    fn bitor(self, rhs: Self) -> Self {
        LetterSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for LetterSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
