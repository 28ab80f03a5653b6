//! Two headless players, same seed, same number of runs.
//! They must produce identical histories.

mod common;

use common::build_default;
use phishsim_core::{engine::SimulationStore, rng::AnswerRng, score::ResultRecord};

fn play_seeded(seed: u64, runs: u64, questions: u32, accuracy: f64) -> Vec<ResultRecord> {
    let mut sim: SimulationStore = build_default();
    for run in 0..runs {
        let mut rng = AnswerRng::new(seed, run);
        sim.start_run();
        for _ in 0..questions {
            sim.record_answer(rng.answer(accuracy)).expect("record answer");
        }
        sim.finish_run().expect("finish run");
    }
    sim.get_history().expect("history")
}

#[test]
fn same_seed_produces_identical_histories() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let a = play_seeded(SEED, 25, 10, 0.7);
    let b = play_seeded(SEED, 25, 10, 0.7);

    assert_eq!(a.len(), 25);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(x, y, "History diverged at run {i}");
    }
}

#[test]
fn perfect_player_always_scores_one_hundred() {
    let history = play_seeded(42, 5, 8, 1.0);
    assert!(history.iter().all(|r| r.percentage == 100 && r.score == 8));
}
