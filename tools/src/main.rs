//! sim-runner: headless driver for the phishing-awareness simulation engine.
//!
//! Usage:
//!   sim-runner --seed 12345 --runs 5 --accuracy 0.75 --db history.db
//!   sim-runner --db history.db --ipc-mode

use anyhow::Result;
use phishsim_core::{
    config::SimConfig, engine::SimulationStore, rng::AnswerRng, stats::OverallStats,
    store::HistoryDb,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    StartRun,
    Answer { correct: bool },
    FinishRun,
    RetryPersist,
    GetResults,
    GetStats,
    GetHistory,
    Export,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let runs = parse_arg(&args, "--runs", 3u64);
    let accuracy = parse_arg(&args, "--accuracy", 0.7f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = match SimConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in defaults");
            SimConfig::default_test()
        }
    };
    let questions = parse_arg(&args, "--questions", config.questions_per_run);

    if !ipc_mode {
        println!("Phishing Awareness Simulation: sim-runner");
        println!("  seed:      {seed}");
        println!("  runs:      {runs}");
        println!("  questions: {questions}");
        println!("  accuracy:  {accuracy}");
        println!("  db:        {db}");
        println!("  feature:   {}", config.feature_key);
        println!();
    }

    let store = HistoryDb::open(db)?;
    store.migrate()?;
    let mut sim = SimulationStore::init(&config, Box::new(store))?;

    if ipc_mode {
        run_ipc_loop(&mut sim)?;
    } else {
        run_headless(&mut sim, seed, runs, questions, accuracy)?;
        print_summary(&sim)?;
    }

    Ok(())
}

fn run_headless(
    sim: &mut SimulationStore,
    seed: u64,
    runs: u64,
    questions: u32,
    accuracy: f64,
) -> Result<()> {
    let offset = sim.get_history()?.len() as u64;
    for run in 0..runs {
        let mut rng = AnswerRng::new(seed, offset + run);
        sim.start_run();
        for _ in 0..questions {
            sim.record_answer(rng.answer(accuracy))?;
        }
        sim.finish_run()?;
        let r = sim.get_results()?;
        println!(
            "  run {:>3}: {:>2}/{:<2} = {:>3}%",
            run + 1,
            r.score,
            r.total_answered,
            r.percentage
        );
    }
    Ok(())
}

fn run_ipc_loop(sim: &mut SimulationStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }
        let response = match handle_command(sim, cmd) {
            Ok(value) => value,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(sim: &mut SimulationStore, cmd: IpcCommand) -> Result<serde_json::Value> {
    let value = match cmd {
        IpcCommand::StartRun => {
            sim.start_run();
            serde_json::json!({ "ok": true })
        }
        IpcCommand::Answer { correct } => {
            sim.record_answer(correct)?;
            serde_json::json!({ "ok": true })
        }
        IpcCommand::FinishRun => {
            sim.finish_run()?;
            serde_json::to_value(sim.get_results()?)?
        }
        IpcCommand::RetryPersist => {
            let persisted = sim.retry_persist()?;
            serde_json::json!({ "persisted": persisted })
        }
        IpcCommand::GetResults => serde_json::to_value(sim.get_results()?)?,
        IpcCommand::GetStats => serde_json::to_value(sim.get_overall_stats()?)?,
        IpcCommand::GetHistory => serde_json::to_value(sim.get_history()?)?,
        IpcCommand::Export => serde_json::to_value(sim.snapshot()?)?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn print_summary(sim: &SimulationStore) -> Result<()> {
    let OverallStats {
        total_simulations,
        best_score,
        average_score,
    } = sim.get_overall_stats()?;

    println!();
    println!("=== OVERALL STATS ===");
    println!("  feature:      {}", sim.feature_key());
    println!("  simulations:  {total_simulations}");
    println!("  best score:   {best_score}%");
    println!("  average:      {average_score}%");

    println!();
    println!("=== RECENT RUNS (Last 5) ===");
    let history = sim.get_history()?;
    if history.is_empty() {
        println!("  (No runs completed yet)");
    } else {
        for r in history.iter().rev().take(5).collect::<Vec<_>>().iter().rev() {
            println!(
                "  {} | {}/{} | {}%",
                r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                r.score,
                r.total_answered,
                r.percentage
            );
        }
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
