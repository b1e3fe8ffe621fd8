use crate::{
    error::{Result, SolverError},
    solver::{
        alphabet::LetterSet,
        candidates::{Puzzle, SearchNode},
        dictionary::Dictionary,
    },
};

/// A decoded cryptogram, ranked by how plausible its words are.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The ciphertext with the cipher applied. Alphabet letters are emitted
    /// in lowercase; every other character is copied verbatim from the
    /// input.
    pub plaintext: String,
    /// The cipher as `(ciphertext letter, plaintext letter)` pairs, sorted
    /// by ciphertext letter ascending.
    pub cipher: Vec<(char, char)>,
    /// Mean dictionary frequency over the distinct words of the plaintext.
    pub mean_frequency: f64,
}

/// Extracts the cipher from a fully solved node and applies it to the
/// original ciphertext.
///
/// Every word must be down to one candidate. Zipping the words letter by
/// letter must produce exactly one plaintext letter per ciphertext letter,
/// and the mapping must be injective; a conflict here means propagation let
/// an inconsistent node through, which is a bug, not a property of the
/// input.
pub(crate) fn assemble(
    puzzle: &Puzzle,
    node: &SearchNode,
    dictionary: &Dictionary,
    ciphertext: &str,
) -> Result<Solution> {
    let alphabet = dictionary.alphabet();
    let mut mapping: Vec<Option<u8>> = vec![None; alphabet.len()];
    let mut claimed = LetterSet::EMPTY;
    let mut frequency_sum = 0.0;

    for (word, candidates) in puzzle.words.iter().zip(node.candidates.iter()) {
        if candidates.len() != 1 {
            return Err(SolverError::Internal(format!(
                "assembling a node where '{}' still has {} candidates",
                word.text,
                candidates.len()
            ))
            .into());
        }
        let id = candidates[0];
        let plain = dictionary.letters(id);
        if plain.len() != word.letters.len() {
            return Err(SolverError::Internal(format!(
                "candidate '{}' does not match the length of '{}'",
                dictionary.word(id),
                word.text
            ))
            .into());
        }
        for (&cipher_letter, &plain_letter) in word.letters.iter().zip(plain) {
            match mapping[cipher_letter as usize] {
                None => {
                    if claimed.contains(plain_letter) {
                        return Err(SolverError::Internal(format!(
                            "cipher is not injective: two letters map to '{}'",
                            alphabet.letter(plain_letter)
                        ))
                        .into());
                    }
                    mapping[cipher_letter as usize] = Some(plain_letter);
                    claimed.insert(plain_letter);
                }
                Some(existing) if existing != plain_letter => {
                    return Err(SolverError::Internal(format!(
                        "'{}' maps to both '{}' and '{}'",
                        alphabet.letter(cipher_letter),
                        alphabet.letter(existing),
                        alphabet.letter(plain_letter)
                    ))
                    .into());
                }
                Some(_) => {}
            }
        }
        frequency_sum += dictionary.word_frequency(id);
    }

    let mut plaintext = String::with_capacity(ciphertext.len());
    for ch in ciphertext.chars() {
        match alphabet.index_of(ch) {
            Some(idx) => {
                let plain = mapping[idx as usize].ok_or_else(|| {
                    SolverError::Internal(format!(
                        "no mapping for ciphertext letter '{}'",
                        alphabet.letter(idx)
                    ))
                })?;
                plaintext.push(alphabet.letter(plain));
            }
            None => plaintext.push(ch),
        }
    }

    let cipher = mapping
        .iter()
        .enumerate()
        .filter_map(|(cipher_letter, plain)| {
            plain.map(|plain| (alphabet.letter(cipher_letter as u8), alphabet.letter(plain)))
        })
        .collect();

    Ok(Solution {
        plaintext,
        cipher,
        mean_frequency: frequency_sum / puzzle.words.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::SolverError,
        solver::{
            alphabet::Alphabet,
            candidates::SearchNode,
            dictionary::{parse_words, Dictionary},
        },
    };

    use super::*;

    fn setup(entries: &[(&str, f64)], ciphertext: &str) -> (Puzzle, SearchNode, Dictionary) {
        let mut builder = Dictionary::builder(Alphabet::latin());
        for &(word, frequency) in entries {
            builder.add_word(word, frequency).unwrap();
        }
        let dictionary = builder.build();
        let alphabet = Alphabet::latin();
        let puzzle = Puzzle::new(parse_words(ciphertext, &alphabet), &alphabet);
        let root = SearchNode::root(&puzzle, &dictionary);
        (puzzle, root, dictionary)
    }

    #[test]
    fn assembles_cipher_and_plaintext() {
        let (puzzle, node, dictionary) =
            setup(&[("hello", 5.0), ("world", 4.0)], "ifmmp xpsme");
        let solution = assemble(&puzzle, &node, &dictionary, "ifmmp xpsme").unwrap();
        assert_eq!(solution.plaintext, "hello world");
        assert_eq!(solution.mean_frequency, 4.5);
        assert_eq!(
            solution.cipher,
            vec![
                ('e', 'd'),
                ('f', 'e'),
                ('i', 'h'),
                ('m', 'l'),
                ('p', 'o'),
                ('s', 'r'),
                ('x', 'w'),
            ]
        );
    }

    #[test]
    fn copies_non_alphabet_characters_verbatim() {
        let (puzzle, node, dictionary) =
            setup(&[("hello", 5.0), ("world", 4.0)], "Ifmmp, xpsme!");
        let solution = assemble(&puzzle, &node, &dictionary, "Ifmmp, xpsme!").unwrap();
        assert_eq!(solution.plaintext, "hello, world!");
    }

    #[test]
    fn rejects_unsolved_nodes() {
        let (puzzle, node, dictionary) = setup(&[("cat", 1.0), ("dog", 1.0)], "xyz");
        let error = assemble(&puzzle, &node, &dictionary, "xyz").unwrap_err();
        assert!(matches!(error.solver_error(), SolverError::Internal(_)));
    }

    #[test]
    fn rejects_non_injective_mappings() {
        // Two single-letter words forced onto the same plaintext letter.
        let (puzzle, node, dictionary) = setup(&[("a", 1.0)], "x y");
        let error = assemble(&puzzle, &node, &dictionary, "x y").unwrap_err();
        assert!(matches!(error.solver_error(), SolverError::Internal(_)));
    }
}
