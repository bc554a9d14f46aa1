//! End-to-end tests for the parallel search core.

use splitsum::config::SolverConfig;
use splitsum::search::MAX_ELEMENT;
use splitsum::{Error, InputData, Solution, Solver, Sumset};

fn assert_valid(solution: &Solution, d: u32) {
    let first_sum: u32 = solution.first().iter().sum();
    let second_sum: u32 = solution.second().iter().sum();
    assert_eq!(first_sum, solution.sum());
    assert_eq!(second_sum, solution.sum());
    for &value in solution.first().iter().chain(solution.second()) {
        assert!((1..=d).contains(&value), "element {value} outside 1..={d}");
    }
}

#[test]
fn tiny_search_has_a_known_optimum() {
    let input = InputData::read_from("5 1 1\n0\n0\n".as_bytes()).unwrap();
    let solver = Solver::new(input.d, input.threads);
    let (seed_a, seed_b) = input.pairs[0];
    let best = solver.solve(seed_a, seed_b).unwrap();

    assert_eq!(best.sum(), 7);
    assert_valid(&best, 5);
    // Grown from empty seeds, the two sides never share an element.
    for value in best.first() {
        assert!(!best.second().contains(value));
    }
}

#[test]
fn worker_count_does_not_change_the_value() {
    let single = Solver::new(15, 1)
        .solve(Sumset::empty(), Sumset::empty())
        .unwrap();
    let pooled = Solver::new(15, 4)
        .solve(Sumset::empty(), Sumset::empty())
        .unwrap();

    assert_eq!(single.sum(), pooled.sum());
    assert_valid(&single, 15);
    assert_valid(&pooled, 15);
}

#[test]
fn repeated_runs_are_deterministic() {
    let solver = Solver::new(10, 3);
    let first = solver.solve(Sumset::empty(), Sumset::empty()).unwrap();
    let second = solver.solve(Sumset::empty(), Sumset::empty()).unwrap();
    assert_eq!(first.sum(), second.sum());
}

#[test]
fn seeded_search_extends_its_seeds() {
    let input = InputData::read_from("6 2 1\n1 1\n1 2\n".as_bytes()).unwrap();
    let solver = Solver::new(input.d, input.threads);
    let (seed_a, seed_b) = input.pairs[0];
    let best = solver.solve(seed_a, seed_b).unwrap();

    assert!(best.sum() >= 6);
    assert_valid(&best, 6);
    // The canonical swap may flip sides, but each seed survives in one.
    let (first, second) = (best.first(), best.second());
    assert!(
        (first.contains(&1) && second.contains(&2))
            || (first.contains(&2) && second.contains(&1))
    );
}

#[test]
fn every_pair_of_a_multi_pair_input_is_solved() {
    let input = InputData::read_from("5 2 2\n0\n0\n1 1\n1 2\n".as_bytes()).unwrap();
    let solver = Solver::new(input.d, input.threads);

    let solutions: Vec<Solution> = input
        .pairs
        .iter()
        .map(|&(a, b)| solver.solve(a, b).unwrap())
        .collect();

    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0].sum(), 7);
    // With 1 and 2 pinned to different sides, 6 = {1,5} / {2,4} is the
    // best split of {1..5}.
    assert_eq!(solutions[1].sum(), 6);
    for solution in &solutions {
        assert_valid(solution, 5);
    }
}

#[test]
fn rendered_output_matches_the_documented_format() {
    let best = Solver::new(5, 1)
        .solve(Sumset::empty(), Sumset::empty())
        .unwrap();
    let rendered = best.to_string();
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("7"));
    assert_eq!(lines.next().map(str::is_empty), Some(false));
    assert_eq!(lines.next().map(str::is_empty), Some(false));
    assert_eq!(lines.next(), None);
}

#[test]
fn arena_exhaustion_aborts_with_partial_results() {
    let config = SolverConfig { arena_capacity: 4 };
    let incomplete = Solver::with_config(12, 2, config)
        .solve(Sumset::empty(), Sumset::empty())
        .unwrap_err();
    assert!(matches!(
        incomplete.error,
        Error::ArenaExhausted { capacity: 4 }
    ));
    // The partial best is still a well-formed solution value.
    let partial = incomplete.best_so_far;
    let first: u32 = partial.first().iter().sum();
    assert_eq!(first, partial.sum());
}

#[test]
fn oversized_dimensions_are_clamped() {
    let solver = Solver::new(u32::MAX, 2);
    assert_eq!(solver.d(), MAX_ELEMENT);
}
