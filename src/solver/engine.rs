use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    error::{Result, SolverError},
    solver::{
        alphabet::{Alphabet, LetterSet},
        candidates::{Puzzle, SearchNode},
        dictionary::{parse_words, Dictionary},
        propagate::propagate,
        solution::{assemble, Solution},
    },
};

/// Configuration for a single solve call.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    max_solutions: usize,
    timeout: Option<Duration>,
    pinned: Vec<(char, char)>,
}

impl SolverOptions {
    /// Creates options that stop after `max_solutions` distinct plaintexts.
    /// A cap of zero is rejected at solve time.
    pub fn new(max_solutions: usize) -> Self {
        Self {
            max_solutions,
            timeout: None,
            pinned: Vec::new(),
        }
    }

    /// Caps the wall-clock time of the solve. Without a timeout the search
    /// runs until the stack or the solution cap is exhausted.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pins a known `cipher → plain` letter mapping before the search
    /// starts. Pins must name alphabet letters and be pairwise injective.
    pub fn with_pinned(mut self, cipher: char, plain: char) -> Self {
        self.pinned.push((cipher, plain));
        self
    }
}

/// The part of the solve loop a [`PhaseStats`] entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Propagate,
    Partition,
    Assemble,
}

/// Holds performance statistics for a single phase of the solve loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhaseStats {
    /// The number of times the phase ran.
    pub invocations: u64,
    /// The total time spent in the phase, in microseconds.
    pub time_spent_micros: u64,
}

/// Holds statistics for the entire search process.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// The total number of nodes popped off the search stack.
    pub nodes_visited: u64,
    /// Nodes rejected because some word lost every candidate.
    pub infeasible_nodes: u64,
    /// Total alternations of domain computation and pruning.
    pub propagation_rounds: u64,
    /// Word candidates removed by pruning.
    pub candidates_pruned: u64,
    /// Distinct plaintexts recorded.
    pub solutions_found: u64,
    /// Whether the search stopped on its deadline.
    pub timed_out: bool,
    /// A map from [`Phase`] to the performance statistics for that phase.
    pub phase_stats: HashMap<Phase, PhaseStats>,
}

impl SearchStats {
    fn record(&mut self, phase: Phase, started: Instant) {
        let entry = self.phase_stats.entry(phase).or_default();
        entry.invocations += 1;
        entry.time_spent_micros += started.elapsed().as_micros() as u64;
    }
}

/// The engine for solving monoalphabetic substitution cryptograms.
///
/// The engine drives a depth-first search over word-candidate states. Each
/// popped state is propagated to a fixpoint (arc consistency over letter
/// domains plus pigeonhole elimination, then word pruning); consistent
/// states with a branching word left are partitioned into children, and
/// fully determined states are assembled into [`Solution`]s. The search
/// stops when the stack empties, the solution cap is reached, or the
/// deadline passes. A timeout is not an error, it just returns whatever
/// was found.
pub struct SolverEngine {
    options: SolverOptions,
}

impl SolverEngine {
    /// Creates a new `SolverEngine` with the given options.
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Attempts to decode `ciphertext` against `dictionary`.
    ///
    /// # Returns
    ///
    /// * `Ok((solutions, stats))`: solutions sorted by mean word frequency
    ///   descending, ties kept in discovery order. An empty list is a
    ///   normal result: no cipher consistent with the pattern constraints
    ///   was found within the budget.
    /// * `Err(_)`: invalid input (`InvalidInput`). A single branch that
    ///   fails an internal consistency check during assembly is discarded
    ///   as infeasible rather than surfaced, so it cannot swallow solutions
    ///   found elsewhere on the stack.
    pub fn solve(
        &self,
        ciphertext: &str,
        dictionary: &Dictionary,
    ) -> Result<(Vec<Solution>, SearchStats)> {
        let mut stats = SearchStats::default();
        if self.options.max_solutions == 0 {
            return Err(
                SolverError::InvalidInput("max_solutions must be at least 1".to_string()).into(),
            );
        }
        let alphabet = dictionary.alphabet();
        let pinned = resolve_pins(&self.options.pinned, alphabet)?;

        let words = parse_words(ciphertext, alphabet);
        if words.is_empty() {
            return Err(SolverError::InvalidInput(
                "ciphertext contains no alphabet words".to_string(),
            )
            .into());
        }
        let puzzle = Puzzle::new(words, alphabet);

        let root = SearchNode::root(&puzzle, dictionary);
        if root.has_empty_set() {
            debug!("a ciphertext word has no dictionary candidates");
            return Ok((Vec::new(), stats));
        }

        let deadline = self.options.timeout.map(|timeout| Instant::now() + timeout);
        let mut stack = vec![root];
        let mut seen_plaintexts = HashSet::new();
        let mut solutions: Vec<Solution> = Vec::new();

        while solutions.len() < self.options.max_solutions {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stats.timed_out = true;
                debug!(
                    solutions = solutions.len(),
                    "deadline reached, returning what was found"
                );
                break;
            }
            let Some(node) = stack.pop() else {
                break;
            };
            stats.nodes_visited += 1;

            let started = Instant::now();
            let propagated = propagate(&puzzle, node, dictionary, &pinned);
            stats.record(Phase::Propagate, started);
            let Some(propagated) = propagated else {
                stats.infeasible_nodes += 1;
                continue;
            };
            stats.propagation_rounds += propagated.rounds as u64;
            stats.candidates_pruned += propagated.removed as u64;

            if !propagated.node.is_solved() {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    stats.timed_out = true;
                    break;
                }
                let started = Instant::now();
                let children = propagated.node.partition();
                stats.record(Phase::Partition, started);
                for child in children.into_iter().rev() {
                    stack.push(child);
                }
                continue;
            }

            let started = Instant::now();
            let assembled = assemble(&puzzle, &propagated.node, dictionary, ciphertext);
            stats.record(Phase::Assemble, started);
            // A branch that fails assembly is infeasible, not fatal: other
            // branches on the stack may still hold valid solutions.
            let solution = match assembled {
                Ok(solution) => solution,
                Err(error) => {
                    debug!(error = %error.solver_error(), "discarding branch that failed assembly");
                    stats.infeasible_nodes += 1;
                    continue;
                }
            };
            if seen_plaintexts.insert(solution.plaintext.clone()) {
                debug!(plaintext = %solution.plaintext, "recorded solution");
                stats.solutions_found += 1;
                solutions.push(solution);
            }
        }

        solutions.sort_by(|a, b| b.mean_frequency.total_cmp(&a.mean_frequency));
        debug!(
            solutions = solutions.len(),
            nodes = stats.nodes_visited,
            "search finished"
        );
        Ok((solutions, stats))
    }
}

fn resolve_pins(pinned: &[(char, char)], alphabet: &Alphabet) -> Result<Vec<(u8, u8)>> {
    let mut resolved = Vec::with_capacity(pinned.len());
    let mut from = LetterSet::EMPTY;
    let mut to = LetterSet::EMPTY;
    for &(cipher, plain) in pinned {
        let c = alphabet.index_of(cipher).ok_or_else(|| {
            SolverError::InvalidInput(format!("pinned letter '{cipher}' is outside the alphabet"))
        })?;
        let p = alphabet.index_of(plain).ok_or_else(|| {
            SolverError::InvalidInput(format!("pinned letter '{plain}' is outside the alphabet"))
        })?;
        if from.contains(c) || to.contains(p) {
            return Err(SolverError::InvalidInput(format!(
                "pinned mapping '{cipher}' -> '{plain}' conflicts with an earlier pin"
            ))
            .into());
        }
        from.insert(c);
        to.insert(p);
        resolved.push((c, p));
    }
    Ok(resolved)
}
