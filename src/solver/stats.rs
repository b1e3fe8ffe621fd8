use prettytable::{Cell, Row, Table};

use crate::solver::engine::{Phase, PhaseStats, SearchStats};

/// Renders the per-phase timings of a [`SearchStats`] as a text table.
pub fn render_stats_table(stats: &SearchStats) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Phase"),
        Cell::new("Invocations"),
        Cell::new("Time / Call (µs)"),
        Cell::new("Total Time (ms)"),
    ]));

    let mut sorted_stats: Vec<(&Phase, &PhaseStats)> = stats.phase_stats.iter().collect();
    sorted_stats.sort_by_key(|(phase, _)| **phase);

    for (phase, phase_stats) in sorted_stats {
        let avg_time = if phase_stats.invocations > 0 {
            phase_stats.time_spent_micros as f64 / phase_stats.invocations as f64
        } else {
            0.0
        };

        table.add_row(Row::new(vec![
            Cell::new(&format!("{:?}", phase)),
            Cell::new(&phase_stats.invocations.to_string()),
            Cell::new(&format!("{:.2}", avg_time)),
            Cell::new(&format!(
                "{:.2}",
                phase_stats.time_spent_micros as f64 / 1000.0
            )),
        ]));
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use crate::solver::{
        alphabet::Alphabet,
        dictionary::Dictionary,
        engine::{SolverEngine, SolverOptions},
    };

    use super::*;

    #[test]
    fn renders_one_row_per_phase() {
        let mut builder = Dictionary::builder(Alphabet::latin());
        builder.add_word("noon", 10.0).unwrap();
        builder.add_word("peep", 3.0).unwrap();
        let dictionary = builder.build();

        let solver = SolverEngine::new(SolverOptions::new(5));
        let (_, stats) = solver.solve("xyyx", &dictionary).unwrap();

        let rendered = render_stats_table(&stats);
        assert!(rendered.contains("Propagate"));
        assert!(rendered.contains("Assemble"));
    }
}
