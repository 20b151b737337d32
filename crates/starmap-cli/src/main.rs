//! starmap-replay
//!
//! Replays recorded observations into a fresh engine and prints a summary
//! per system.
//!
//! Usage:
//!   starmap-replay <records.jsonl>
//!   starmap-replay -            (read from stdin)

use std::fs::File;
use std::io::{self, BufReader};

use starmap_cli::{replay, summarize, Error, Result};
use starmap_tree::{Engine, EngineConfig};

fn print_usage() {
    eprintln!("starmap-replay - Rebuild star system trees from recorded observations");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  starmap-replay <records.jsonl>   Replay a JSON-lines file");
    eprintln!("  starmap-replay -                 Replay from stdin");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STARMAP_APPROACH_TOLERANCE   Approach coordinate update tolerance (default: 0.01)");
    eprintln!("  STARMAP_PROXIMITY_TOLERANCE  Surface feature proximity tolerance (default: 0.1)");
    eprintln!("  STARMAP_MIN_CODEX_ADDRESS    Lowest plausible codex system address (default: 1000)");
    eprintln!("  RUST_LOG                     Log filter");
}

fn run(path: &str) -> Result<()> {
    let config = EngineConfig::from_env()?;
    let engine = Engine::new(config);

    let stats = if path == "-" {
        replay(&engine, io::stdin().lock())?
    } else {
        let file = File::open(path)?;
        replay(&engine, BufReader::new(file))?
    };

    tracing::info!(records = stats.records, "replay complete");
    println!("{stats}");
    for summary in summarize(&engine) {
        println!("{summary}");
    }
    Ok(())
}

fn main() {
    let _ = starmap_logging::init(starmap_logging::DEFAULT_DIRECTIVES);

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1).map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            print_usage();
            std::process::exit(1);
        }
        Some(path) if args.len() == 2 => path,
        Some(_) => {
            eprintln!("Error: {}", Error::Usage("expected exactly one input path".into()));
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(path) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
