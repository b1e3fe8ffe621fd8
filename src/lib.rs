//! Quipsolve is a solver for monoalphabetic substitution cryptograms.
//!
//! Given a ciphertext and a dictionary of plausible plaintext words, the
//! solver returns up to *K* candidate plaintexts ranked by mean word
//! frequency. The engine works by constraint propagation rather than by
//! statistical attack: every ciphertext word constrains the letter-to-letter
//! mapping through its repetition pattern, and the search narrows per-letter
//! candidate sets until a consistent cipher emerges.
//!
//! # Core Concepts
//!
//! - **[`Dictionary`]**: the read-only word index. Words are grouped by
//!   their repetition [`Pattern`] and carry a frequency used only for
//!   ranking.
//! - **[`SolverEngine`]**: the search driver. Configure it with
//!   [`SolverOptions`] (solution cap, optional wall-clock budget, optional
//!   pinned letter mappings) and call [`SolverEngine::solve`].
//! - **[`Solution`]**: a decoded plaintext, the cipher that produced it,
//!   and its mean word frequency.
//!
//! # Example: Solving a Shifted Ciphertext
//!
//! `"ifmmp xpsme"` is `"hello world"` with every letter shifted forward by
//! one. Two dictionary words are enough to pin the cipher down:
//!
//! ```
//! use quipsolve::solver::{
//!     alphabet::Alphabet,
//!     dictionary::Dictionary,
//!     engine::{SolverEngine, SolverOptions},
//! };
//!
//! # fn main() -> quipsolve::error::Result<()> {
//! let mut builder = Dictionary::builder(Alphabet::latin());
//! builder.add_word("hello", 5.0)?;
//! builder.add_word("world", 4.0)?;
//! let dictionary = builder.build();
//!
//! let solver = SolverEngine::new(SolverOptions::new(1));
//! let (solutions, _stats) = solver.solve("ifmmp xpsme", &dictionary)?;
//!
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].plaintext, "hello world");
//! assert!(solutions[0].cipher.contains(&('i', 'h')));
//! # Ok(())
//! # }
//! ```
//!
//! [`Dictionary`]: solver::dictionary::Dictionary
//! [`Pattern`]: solver::pattern::Pattern
//! [`SolverEngine`]: solver::engine::SolverEngine
//! [`SolverEngine::solve`]: solver::engine::SolverEngine::solve
//! [`SolverOptions`]: solver::engine::SolverOptions
//! [`Solution`]: solver::solution::Solution

pub mod error;
pub mod solver;
