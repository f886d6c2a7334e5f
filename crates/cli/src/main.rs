//! xif subsystem simulator CLI.
//!
//! This binary runs JSON scenarios on the simulated CPU subsystem. It provides:
//! 1. **Run:** Load a scenario (and optional configuration), run until the subsystem sleeps.
//! 2. **Reporting:** Final registers, extension state and statistics, as text or JSON.
//! 3. **Tracing:** `--trace` or `RUST_LOG` enable per-handshake logging on stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xifsim_core::common::SimError;
use xifsim_core::config::Config;
use xifsim_core::sim::{RunSummary, Scenario, Simulator};
use xifsim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "xifsim",
    author,
    version,
    about = "Cycle-level simulator of a RISC-V CPU subsystem and its extension interface",
    long_about = "Run instruction scenarios through the core, the xif handshake and the reference accelerator.\n\nExamples:\n  xifsim run scenarios/load_accumulate.json\n  xifsim run scenarios/load_accumulate.json --config scenarios/slow_memory.json --stats memory --stats result\n  xifsim run scenarios/kill_mac.json --json --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario until the subsystem drains.
    Run {
        /// Scenario file (JSON).
        scenario: PathBuf,

        /// Configuration file (JSON); defaults apply to anything it omits.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cycle budget, overriding `general.max_cycles`.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Statistics sections to print (repeatable); all when omitted.
        #[arg(long = "stats", value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        sections: Vec<String>,

        /// Print the run summary as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Log every handshake and step.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            max_cycles,
            sections,
            json,
            trace,
        } => {
            init_tracing(trace);
            let run = load_config(config.as_deref(), max_cycles, trace)
                .and_then(|config| cmd_run(&config, &scenario, &sections, json));
            if let Err(e) = run {
                eprintln!("\n[!] {e}");
                process::exit(1);
            }
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--trace`.
fn init_tracing(trace: bool) {
    let default = if trace { "xifsim_core=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Reads the configuration file (or defaults) and applies the command line overrides.
fn load_config(
    config_path: Option<&Path>,
    max_cycles: Option<u64>,
    trace: bool,
) -> Result<Config, SimError> {
    let mut config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    if let Some(budget) = max_cycles {
        config.general.max_cycles = budget;
    }
    config.general.trace_instructions |= trace;
    Ok(config)
}

/// Loads the scenario, runs the simulator and prints the outcome.
fn cmd_run(
    config: &Config,
    scenario_path: &Path,
    sections: &[String],
    json: bool,
) -> Result<(), SimError> {
    let scenario = Scenario::from_file(scenario_path)?;
    let mut sim = Simulator::new(config, &scenario)?;
    let summary = sim.run(None)?;

    if json {
        print_json(&summary)?;
    } else {
        print_text(config, &summary, sections);
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    cycles: u64,
    regs: Vec<(String, String)>,
    extension: Vec<(&'static str, String)>,
    stats: &'a xifsim_core::stats::SimStats,
}

fn print_json(summary: &RunSummary) -> Result<(), SimError> {
    let report = Report {
        name: &summary.name,
        cycles: summary.cycles,
        regs: summary
            .regs
            .iter()
            .map(|(idx, value)| (format!("x{idx}"), format!("{value:#010x}")))
            .collect(),
        extension: summary
            .extension
            .iter()
            .map(|(name, value)| (*name, format!("{value:#010x}")))
            .collect(),
        stats: &summary.stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(config: &Config, summary: &RunSummary, sections: &[String]) {
    let name = if summary.name.is_empty() {
        "<unnamed>"
    } else {
        &summary.name
    };
    println!("[*] Scenario: {name}");
    println!(
        "    Boot: {:#010x}  Tracker: {} slots  Memory: {} KiB @ {:#010x}",
        config.core.boot_addr,
        config.xif.capacity,
        config.memory.size / 1024,
        config.memory.base
    );
    println!("[*] Drained after {} cycles", summary.cycles);
    println!();

    println!("Registers");
    if summary.regs.is_empty() {
        println!("  (all zero)");
    }
    for (idx, value) in &summary.regs {
        println!("  x{idx:<2} = {value:#010x}  ({value})");
    }
    for (name, value) in &summary.extension {
        println!("  {name:<3} = {value:#010x}  ({value})");
    }
    println!();

    if sections.is_empty() {
        summary.stats.print();
    } else {
        summary.stats.print_sections(sections);
    }
}
