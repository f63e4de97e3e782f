//! Command line front-end: parse warrior files, fight rounds, report the
//! tally.

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use redcode::{Point, RelaxedWarrior};
use torus_core::{Outcome, Round, RoundConfig};

/// Fight redcode warriors in a 2D MARS
#[derive(Parser, Debug)]
#[command(name = "torus", version, about)]
struct Args {
    /// Warrior source files, in load order
    #[arg(required = true)]
    warriors: Vec<PathBuf>,

    /// Number of rounds to fight
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Load the first round and print its state without executing
    #[arg(long)]
    paused: bool,

    /// Core size, as a width or as WIDTH:HEIGHT
    #[arg(long, default_value = "8000")]
    size: Point,

    /// Cycles before a round is declared a tie
    #[arg(long, default_value_t = 80_000)]
    cycles: u32,

    /// Process queue limit per warrior
    #[arg(long, default_value_t = 8000)]
    processes: usize,

    /// Longest accepted warrior
    #[arg(long, default_value_t = 100)]
    length: usize,

    /// Minimum distance between warrior placements
    #[arg(long, default_value_t = 100)]
    distance: u32,

    /// Placement seed, for reproducible battles
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("torus: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let warriors = load_warriors(args)?;
    let names: Vec<String> = warriors
        .iter()
        .map(|w| w.name.clone().unwrap_or_default())
        .collect();

    let mut wins = vec![0_u32; warriors.len()];
    let mut ties = 0_u32;

    for round_number in 0..args.rounds {
        // Shift the seed so every round sees fresh placements while the
        // whole battle stays reproducible
        let config = RoundConfig {
            core_size_x: u32::try_from(args.size.x)
                .map_err(|_| anyhow!("core size must be positive"))?,
            core_size_y: u32::try_from(args.size.y.max(1))
                .map_err(|_| anyhow!("core size must be positive"))?,
            cycles: args.cycles,
            max_processes: args.processes,
            max_length: args.length,
            min_distance: args.distance,
            rng_seed: args.seed.map(|seed| seed + u64::from(round_number)),
        };

        let mut round = Round::new(config, &warriors)
            .context("could not start the round")?;

        if args.paused {
            print_round(&round);
            return Ok(());
        }

        match round.run() {
            Outcome::Winner(winner) => {
                if let Some(count) = wins.get_mut(winner) {
                    *count += 1;
                }
                println!(
                    "round {}: {} wins after {} cycles",
                    round_number + 1,
                    names.get(winner).map_or("?", String::as_str),
                    round.cycle()
                );
            }
            Outcome::Tie => {
                ties += 1;
                println!(
                    "round {}: tie after {} cycles",
                    round_number + 1,
                    round.cycle()
                );
            }
        }
    }

    println!();
    for (name, count) in names.iter().zip(&wins) {
        println!("{name}: {count} wins");
    }
    println!("ties: {ties}");
    Ok(())
}

/// Parse every warrior file, defaulting names from the file stem
fn load_warriors(args: &Args) -> Result<Vec<RelaxedWarrior>> {
    let mut warriors = Vec::with_capacity(args.warriors.len());
    for path in &args.warriors {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut warrior = redcode_parser::parse(&source)
            .map_err(|err| anyhow!("{}: {err}", path.display()))?;
        if warrior.name.is_none() {
            warrior.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        warriors.push(warrior);
    }
    Ok(warriors)
}

/// Dump the initial state of a paused round
fn print_round(round: &Round) {
    let extent = round.config().extent();
    println!(
        "core {}x{}, {} warriors loaded",
        extent.x,
        extent.y,
        round.names().len()
    );
    for (id, name) in round.names().iter().enumerate() {
        let queue = round.queues().get(id).cloned().unwrap_or_default();
        let origin = round
            .origins()
            .get(id)
            .copied()
            .unwrap_or_default();
        println!("  {id}: {name} at {origin}, queue {queue:?}");
    }
}
