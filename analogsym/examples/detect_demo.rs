//! Example: run symmetry detection and ERC on a circuit JSON file.
//! Run with: cargo run --example detect_demo [path/to/circuit.json]

use analogsym::{RunOptions, SymmetryCore};
use std::path::Path;

fn main() -> Result<(), analogsym::SymError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/diff_amp.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example detect_demo [path/to/circuit.json]");
        std::process::exit(1);
    }

    let options = RunOptions {
        erc: true,
        ..RunOptions::default()
    };
    let outcome = SymmetryCore::detect_file(path, &options)?;

    println!(
        "{} devices, {} symmetry pairs",
        outcome.stats.device_count,
        outcome.constraint.len()
    );
    for pair in outcome.constraint.iter() {
        println!(
            "  {} / {}  [{}] score={:.2}",
            pair.device1, pair.device2, pair.kind, pair.score
        );
    }

    if let Some(report) = outcome.erc {
        if report.is_clean() {
            println!("ERC: clean ({} warnings)", report.warning_count());
        } else {
            for v in report.errors() {
                println!("ERC error: {}", v.message);
            }
            std::process::exit(1);
        }
    }
    Ok(())
}
