//! AnalogSym CLI - symmetry constraint detection from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use analogsym::{
    DetectionOptions, DetectionOutcome, RunOptions, Severity, SymmetryCore,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "analogsym")]
#[command(about = "Analog IC symmetry constraint detection tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect symmetry constraints in a circuit netlist
    Detect {
        /// Path to the circuit JSON file (device map)
        #[arg(value_name = "CIRCUIT")]
        circuit: PathBuf,

        /// Write the detected constraints to this file (.sym or .json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format for the report
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Sort candidates by device id (order-independent results)
        #[arg(long)]
        sort: bool,

        /// Skip the propagation stage (seed pairs only)
        #[arg(long)]
        no_propagate: bool,

        /// Run the ERC over the detected constraints
        #[arg(long)]
        erc: bool,

        /// Exit with an error code if the ERC reports errors
        #[arg(long, requires = "erc")]
        fail_on_erc: bool,
    },

    /// Validate a constraint file against a circuit (ERC)
    Check {
        /// Path to the circuit JSON file (device map)
        #[arg(value_name = "CIRCUIT")]
        circuit: PathBuf,

        /// Path to the constraints (.sym or .json)
        #[arg(value_name = "CONSTRAINTS")]
        constraints: PathBuf,

        /// Output format for the report
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print circuit statistics and connectivity findings
    Stats {
        /// Path to the circuit JSON file (device map)
        #[arg(value_name = "CIRCUIT")]
        circuit: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Detect {
            circuit,
            out,
            format,
            sort,
            no_propagate,
            erc,
            fail_on_erc,
        } => handle_detect(&circuit, out.as_deref(), format, sort, no_propagate, erc, fail_on_erc),
        Commands::Check {
            circuit,
            constraints,
            format,
        } => handle_check(&circuit, &constraints, format),
        Commands::Stats { circuit, format } => handle_stats(&circuit, format),
    };

    process::exit(exit_code);
}

fn handle_detect(
    circuit: &std::path::Path,
    out: Option<&std::path::Path>,
    format: OutputFormat,
    sort: bool,
    no_propagate: bool,
    erc: bool,
    fail_on_erc: bool,
) -> i32 {
    let options = RunOptions {
        detection: DetectionOptions {
            sort_candidates: sort,
            propagate: !no_propagate,
        },
        erc,
    };

    let outcome = match SymmetryCore::detect_file(circuit, &options) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Some(out_path) = out {
        if let Err(e) = SymmetryCore::save_constraints(&outcome.constraint, out_path) {
            eprintln!("Error writing {}: {}", out_path.display(), e);
            return 1;
        }
    }

    match format {
        OutputFormat::Human => print_detect_human(&outcome),
        OutputFormat::Json => print_detect_json(&outcome),
    }

    if fail_on_erc {
        if let Some(report) = &outcome.erc {
            if !report.is_clean() {
                return 1;
            }
        }
    }
    0
}

fn handle_check(
    circuit: &std::path::Path,
    constraints: &std::path::Path,
    format: OutputFormat,
) -> i32 {
    match SymmetryCore::check_file(circuit, constraints) {
        Ok((report, skipped)) => {
            match format {
                OutputFormat::Human => {
                    print_skipped(&skipped);
                    println!("=== Symmetry ERC Report ===");
                    if report.violations.is_empty() {
                        println!("Status: PASSED (clean)");
                    } else {
                        for v in report.errors() {
                            println!("  [Error] {}", v.message);
                        }
                        for v in report.warnings() {
                            println!("  [Warn]  {}", v.message);
                        }
                        println!(
                            "{} errors, {} warnings",
                            report.error_count(),
                            report.warning_count()
                        );
                    }
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "violations": &report.violations,
                        "is_clean": report.is_clean(),
                        "skipped_devices": &skipped,
                    });
                    print_json(&output);
                }
            }
            if report.is_clean() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_stats(circuit: &std::path::Path, format: OutputFormat) -> i32 {
    match SymmetryCore::circuit_report(circuit) {
        Ok(report) => {
            match format {
                OutputFormat::Human => {
                    print_skipped(&report.skipped);
                    println!("Devices:       {}", report.stats.device_count);
                    println!("  MOS:         {}", report.stats.mos_count);
                    println!("  Passive:     {}", report.stats.passive_count);
                    println!("Nets:          {}", report.stats.net_count);
                    println!("Connections:   {}", report.stats.connection_count);
                    println!("Power nets:    {}", report.stats.power_net_count);
                    println!("Components:    {}", report.stats.graph_components);
                    if !report.connectivity.is_empty() {
                        println!("\nConnectivity findings:");
                        for issue in &report.connectivity {
                            println!("  - {}", issue.message);
                        }
                    }
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "stats": &report.stats,
                        "connectivity": &report.connectivity,
                        "skipped_devices": &report.skipped,
                    });
                    print_json(&output);
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_detect_human(outcome: &DetectionOutcome) {
    print_skipped(&outcome.skipped);

    println!(
        "Detected {} symmetry pairs over {} devices",
        outcome.constraint.len(),
        outcome.stats.device_count
    );
    for pair in outcome.constraint.iter() {
        println!(
            "  {} / {}  [{}] pattern={} score={:.2}",
            pair.device1, pair.device2, pair.kind, pair.pattern, pair.score
        );
    }

    if let Some(report) = &outcome.erc {
        println!();
        if report.violations.is_empty() {
            println!("ERC: clean");
        } else {
            for v in &report.violations {
                let tag = match v.severity {
                    Severity::Error => "Error",
                    Severity::Warning => "Warn",
                };
                println!("  [{}] {}", tag, v.message);
            }
            println!(
                "ERC: {} errors, {} warnings",
                report.error_count(),
                report.warning_count()
            );
        }
    }
}

fn print_detect_json(outcome: &DetectionOutcome) {
    let pairs: Vec<_> = outcome
        .constraint
        .iter()
        .map(|p| {
            serde_json::json!({
                "d1": p.device1,
                "d2": p.device2,
                "type": p.kind.to_string(),
                "pattern": p.pattern.to_string(),
                "score": p.score,
            })
        })
        .collect();
    let output = serde_json::json!({
        "pairs": pairs,
        "stats": &outcome.stats,
        "skipped_devices": &outcome.skipped,
        "erc": outcome.erc.as_ref().map(|r| serde_json::json!({
            "violations": &r.violations,
            "is_clean": r.is_clean(),
        })),
    });
    print_json(&output);
}

fn print_skipped(skipped: &[String]) {
    for reason in skipped {
        eprintln!("Warning: {}", reason);
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error rendering JSON: {}", e),
    }
}
