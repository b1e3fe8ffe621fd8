use std::collections::BTreeMap;

use im::Vector;

use crate::solver::{
    alphabet::{LetterSet, MAX_LETTERS},
    candidates::{Puzzle, SearchNode},
    dictionary::{Dictionary, WordId},
};

/// The result of running a node to its propagation fixpoint.
#[derive(Debug)]
pub(crate) struct Propagated {
    pub node: SearchNode,
    /// Alternations of domain computation and word pruning until stable.
    pub rounds: usize,
    /// Word candidates removed across all rounds.
    pub removed: usize,
}

/// Interleaves letter-domain computation and word pruning until the
/// candidate sets stop changing.
///
/// Pruning a candidate can shrink another letter's domain, which can prune
/// further candidates, so a single pass is not a fixpoint on its own.
/// Running to stability makes propagation idempotent and leaves the node
/// either locally consistent or rejected. Returns `None` when some word
/// loses every candidate or a pigeonhole violation proves the node
/// infeasible.
pub(crate) fn propagate(
    puzzle: &Puzzle,
    mut node: SearchNode,
    dictionary: &Dictionary,
    pinned: &[(u8, u8)],
) -> Option<Propagated> {
    let mut rounds = 0;
    let mut removed_total = 0;
    loop {
        rounds += 1;
        let domains = letter_domains(puzzle, &node, dictionary, pinned)?;
        let (pruned, removed) = prune_words(puzzle, &node, dictionary, &domains)?;
        removed_total += removed;
        if removed == 0 {
            return Some(Propagated {
                node: pruned,
                rounds,
                removed: removed_total,
            });
        }
        node = pruned;
    }
}

/// Computes the candidate plaintext letters for every cipher letter.
///
/// Per word, the letters allowed at a cipher letter's positions are the
/// union over that word's candidates; a letter's domain is the intersection
/// of its allowed sets across all words containing it. Pinned mappings seed
/// their letter with a singleton. The result is then closed under
/// pigeonhole elimination; `None` means the closure proved the node
/// infeasible.
pub(crate) fn letter_domains(
    puzzle: &Puzzle,
    node: &SearchNode,
    dictionary: &Dictionary,
    pinned: &[(u8, u8)],
) -> Option<Vec<LetterSet>> {
    let full = dictionary.alphabet().full_set();
    let mut domains = vec![full; dictionary.alphabet().len()];
    for &(cipher, plain) in pinned {
        domains[cipher as usize] = LetterSet::singleton(plain);
    }

    for (word, candidates) in puzzle.words.iter().zip(node.candidates.iter()) {
        let mut allowed = [LetterSet::EMPTY; MAX_LETTERS];
        for &id in candidates {
            let plain = dictionary.letters(id);
            for (i, &cipher_letter) in word.letters.iter().enumerate() {
                allowed[cipher_letter as usize].insert(plain[i]);
            }
        }
        for cipher_letter in word.letters_used.iter() {
            domains[cipher_letter as usize] &= allowed[cipher_letter as usize];
        }
    }

    if pigeonhole_closure(&mut domains, puzzle.present) {
        Some(domains)
    } else {
        None
    }
}

/// Hall-style elimination, iterated to fixpoint.
///
/// Cipher letters are grouped by their current domain. A group exactly as
/// large as the domain it shares claims those plaintext letters, which are
/// removed from every letter outside the group. A group strictly larger
/// than its domain cannot be mapped injectively at all; that is reported as
/// infeasibility (`false`) here, because word pruning cannot see a
/// collision between words sharing no cipher letters. Each changing sweep
/// strictly shrinks some domain, so this converges in at most one sweep
/// per alphabet letter.
fn pigeonhole_closure(domains: &mut [LetterSet], present: LetterSet) -> bool {
    loop {
        let mut changed = false;
        let mut groups: BTreeMap<LetterSet, Vec<u8>> = BTreeMap::new();
        for letter in present.iter() {
            groups.entry(domains[letter as usize]).or_default().push(letter);
        }
        for (domain, letters) in &groups {
            if domain.len() < letters.len() {
                return false;
            }
            if domain.len() > letters.len() {
                continue;
            }
            for other in present.iter() {
                if letters.contains(&other) {
                    continue;
                }
                let shrunk = domains[other as usize].difference(*domain);
                if shrunk != domains[other as usize] {
                    domains[other as usize] = shrunk;
                    changed = true;
                }
            }
        }
        if !changed {
            return true;
        }
    }
}

/// Removes candidates whose letters fall outside the current domains.
///
/// Returns the surviving node and the number of candidates removed, or
/// `None` when some word is left with none (the node is infeasible).
pub(crate) fn prune_words(
    puzzle: &Puzzle,
    node: &SearchNode,
    dictionary: &Dictionary,
    domains: &[LetterSet],
) -> Option<(SearchNode, usize)> {
    let mut candidates = node.candidates.clone();
    let mut removed = 0;
    for (idx, (word, set)) in puzzle.words.iter().zip(node.candidates.iter()).enumerate() {
        let kept: Vector<WordId> = set
            .iter()
            .copied()
            .filter(|&id| {
                dictionary
                    .letters(id)
                    .iter()
                    .zip(&word.letters)
                    .all(|(&plain, &cipher)| domains[cipher as usize].contains(plain))
            })
            .collect();
        if kept.is_empty() {
            return None;
        }
        if kept.len() < set.len() {
            removed += set.len() - kept.len();
            candidates = candidates.update(idx, kept);
        }
    }
    Some((SearchNode { candidates }, removed))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::solver::{
        alphabet::{Alphabet, LetterSet},
        dictionary::{parse_words, Dictionary},
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

    fn set_of(letters: &str) -> LetterSet {
        let alphabet = Alphabet::latin();
        let mut set = LetterSet::EMPTY;
        for ch in letters.chars() {
            set.insert(alphabet.index_of(ch).unwrap());
        }
        set
    }

    fn domain_of(domains: &[LetterSet], letter: char) -> LetterSet {
        domains[Alphabet::latin().index_of(letter).unwrap() as usize]
    }

    #[test]
    fn domains_intersect_across_words() {
        // "xy" allows x ∈ {t,c}; "xyz" allows x ∈ {t,d}; together x = {t}.
        let (puzzle, root, dictionary) = setup(
            &[("to", 1.0), ("ca", 1.0), ("top", 1.0), ("dog", 1.0)],
            "xy xyz",
        );
        let domains = letter_domains(&puzzle, &root, &dictionary, &[]).unwrap();
        assert_eq!(domain_of(&domains, 'x'), set_of("t"));
        assert_eq!(domain_of(&domains, 'y'), set_of("o"));
    }

    #[test]
    fn pigeonhole_claims_shared_domains() {
        // x and y both end up with {a,b}; the pair claims those letters and
        // z is forced to c, which prunes "xz" down to its "ac" candidate.
        let (puzzle, root, dictionary) = setup(
            &[("ab", 1.0), ("ba", 1.0), ("ac", 1.0)],
            "xy yx xz",
        );
        let domains = letter_domains(&puzzle, &root, &dictionary, &[]).unwrap();
        assert_eq!(domain_of(&domains, 'x'), set_of("ab"));
        assert_eq!(domain_of(&domains, 'y'), set_of("ab"));
        assert_eq!(domain_of(&domains, 'z'), set_of("c"));

        let propagated = propagate(&puzzle, root, &dictionary, &[]).unwrap();
        assert!(propagated.node.is_solved());
        let solved: Vec<&str> = propagated
            .node
            .candidates
            .iter()
            .map(|set| dictionary.word(set[0]))
            .collect();
        assert_eq!(solved, vec!["ab", "ba", "ac"]);
    }

    #[test]
    fn strict_pigeonhole_violation_is_infeasible() {
        // Three letters squeezed into a two-letter domain cannot be mapped
        // injectively, so the closure rejects the node outright.
        let (puzzle, root, dictionary) = setup(&[("ab", 1.0), ("ba", 1.0)], "xy yz zx");
        assert!(letter_domains(&puzzle, &root, &dictionary, &[]).is_none());
        assert!(propagate(&puzzle, root, &dictionary, &[]).is_none());
    }

    #[test]
    fn colliding_domains_across_disjoint_words_are_infeasible() {
        // "ab" and "cd" share no cipher letters, yet both force their
        // second letter to y. Word pruning alone never sees the collision,
        // so the pigeonhole check has to reject the node.
        let (puzzle, root, dictionary) = setup(&[("xy", 1.0), ("zy", 1.0)], "ab cd");
        assert!(letter_domains(&puzzle, &root, &dictionary, &[]).is_none());
        assert!(propagate(&puzzle, root, &dictionary, &[]).is_none());
    }

    #[test]
    fn prune_rejects_wiped_words() {
        let (puzzle, root, dictionary) = setup(&[("ab", 1.0)], "xy");
        let mut domains = vec![Alphabet::latin().full_set(); 26];
        domains[Alphabet::latin().index_of('y').unwrap() as usize] = set_of("z");
        assert!(prune_words(&puzzle, &root, &dictionary, &domains).is_none());
    }

    #[test]
    fn propagation_reaches_a_fixpoint() {
        let (puzzle, root, dictionary) = setup(
            &[("ab", 1.0), ("ba", 1.0), ("ac", 1.0)],
            "xy yx xz",
        );
        let propagated = propagate(&puzzle, root, &dictionary, &[]).unwrap();
        let again = propagate(&puzzle, propagated.node.clone(), &dictionary, &[]).unwrap();
        assert_eq!(propagated.node, again.node);
        assert_eq!(again.removed, 0);
    }

    #[test]
    fn pinned_mappings_seed_singleton_domains() {
        let (puzzle, root, dictionary) = setup(&[("cat", 1.0), ("dog", 1.0)], "xyz");
        let alphabet = Alphabet::latin();
        let pin = (
            alphabet.index_of('x').unwrap(),
            alphabet.index_of('d').unwrap(),
        );
        let propagated = propagate(&puzzle, root, &dictionary, &[pin]).unwrap();
        assert!(propagated.node.is_solved());
        assert_eq!(dictionary.word(propagated.node.candidates[0][0]), "dog");
    }
}
