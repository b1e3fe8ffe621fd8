use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quipsolve::{
    error::{Result, SolverError},
    solver::{
        alphabet::Alphabet,
        dictionary::Dictionary,
        engine::{SolverEngine, SolverOptions},
        stats::render_stats_table,
    },
};

/// Solve a monoalphabetic substitution cryptogram against a word list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The ciphertext to solve.
    ciphertext: String,

    /// Path to a word list: one word per line, optionally followed by a
    /// frequency. Words with characters outside a-z are skipped.
    #[arg(long)]
    dictionary: PathBuf,

    #[arg(long, default_value_t = 5)]
    max_solutions: usize,

    /// Wall-clock budget in milliseconds; 0 means no limit.
    #[arg(long, default_value_t = 0)]
    timeout_ms: u64,

    /// Known cipher=plain letter pairs, e.g. --pin x=e.
    #[arg(long, value_parser = parse_pin)]
    pin: Vec<(char, char)>,

    /// Print search statistics after the solutions.
    #[arg(long)]
    stats: bool,
}

fn parse_pin(raw: &str) -> std::result::Result<(char, char), String> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(cipher), Some('='), Some(plain), None) => Ok((cipher, plain)),
        _ => Err(format!("expected a pair like x=e, got '{raw}'")),
    }
}

fn load_dictionary(path: &PathBuf) -> Result<Dictionary> {
    let alphabet = Alphabet::latin();
    let contents = fs::read_to_string(path)
        .map_err(|err| SolverError::InvalidInput(format!("cannot read {}: {err}", path.display())))?;

    let mut builder = Dictionary::builder(alphabet.clone());
    let mut skipped = 0usize;
    for line in contents.lines() {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else { continue };
        if !word.chars().all(|ch| alphabet.contains(ch)) {
            skipped += 1;
            continue;
        }
        let frequency = match parts.next() {
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                SolverError::InvalidInput(format!("bad frequency '{raw}' for word '{word}'"))
            })?,
            None => 1.0,
        };
        builder.add_word(word, frequency)?;
    }
    if skipped > 0 {
        eprintln!("skipped {skipped} words with characters outside the alphabet");
    }
    Ok(builder.build())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let dictionary = load_dictionary(&args.dictionary)?;
    println!(
        "Loaded {} words, solving \"{}\"",
        dictionary.len(),
        args.ciphertext
    );

    let mut options = SolverOptions::new(args.max_solutions);
    if args.timeout_ms > 0 {
        options = options.with_timeout(Duration::from_millis(args.timeout_ms));
    }
    for (cipher, plain) in args.pin {
        options = options.with_pinned(cipher, plain);
    }

    let solver = SolverEngine::new(options);
    let (solutions, stats) = solver.solve(&args.ciphertext, &dictionary)?;

    if solutions.is_empty() {
        println!("No solution found.");
    }
    for (rank, solution) in solutions.iter().enumerate() {
        let cipher: String = solution
            .cipher
            .iter()
            .map(|(c, p)| format!("{c}->{p}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}. {} (mean frequency {:.2})\n   {}",
            rank + 1,
            solution.plaintext,
            solution.mean_frequency,
            cipher
        );
    }

    if args.stats {
        println!("\n{}", render_stats_table(&stats));
    }
    Ok(())
}
