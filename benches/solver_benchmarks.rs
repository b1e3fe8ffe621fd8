use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quipsolve::solver::{
    alphabet::Alphabet,
    dictionary::Dictionary,
    engine::{SolverEngine, SolverOptions},
};

fn build_dictionary() -> Dictionary {
    let entries: &[(&str, f64)] = &[
        ("the", 100.0),
        ("quick", 8.0),
        ("brown", 12.0),
        ("fox", 6.0),
        ("jumps", 7.0),
        ("over", 30.0),
        ("lazy", 5.0),
        ("dog", 20.0),
        ("and", 90.0),
        ("cat", 18.0),
        ("bird", 9.0),
        ("word", 15.0),
        ("world", 14.0),
        ("hello", 10.0),
        ("there", 40.0),
        ("their", 35.0),
        ("house", 25.0),
        ("mouse", 11.0),
        ("noon", 4.0),
        ("deed", 2.0),
        ("peep", 1.0),
        ("level", 3.0),
        ("stone", 13.0),
        ("store", 16.0),
        ("shore", 5.5),
        ("score", 6.5),
        ("snore", 1.5),
        ("spore", 1.2),
        ("swore", 1.8),
        ("smoke", 7.5),
    ];
    let mut builder = Dictionary::builder(Alphabet::latin());
    for &(word, frequency) in entries {
        builder.add_word(word, frequency).expect("valid word");
    }
    builder.build()
}

fn cryptogram_benchmark(c: &mut Criterion) {
    let dictionary = build_dictionary();
    let cases = [
        ("two-words", "ifmmp xpsme"),
        ("pangram", "the quick brown fox jumps over the lazy dog"),
        ("ambiguous", "score shore snore"),
    ];

    let mut group = c.benchmark_group("Cryptogram");
    for (name, ciphertext) in cases.iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            ciphertext,
            |b, &ciphertext| {
                let solver = SolverEngine::new(SolverOptions::new(5));
                b.iter(|| {
                    solver
                        .solve(black_box(ciphertext), black_box(&dictionary))
                        .unwrap();
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, cryptogram_benchmark);
criterion_main!(benches);
