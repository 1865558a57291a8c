//! Energy-harvesting microcontroller simulator CLI.
//!
//! This binary is the command-line driver for a complete simulation run. It performs:
//! 1. **Configuration:** Built-in defaults, then an optional JSON file, then flag overrides.
//! 2. **Supply selection:** A voltage trace loaded from disk, or a constant supply.
//! 3. **Simulation:** Loads the program image and runs it to completion under the
//!    configured checkpointing scheme.
//! 4. **Reporting:** Prints the statistics report and optionally writes the full
//!    bundle as JSON.

use clap::Parser;
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use ehsim_core::common::SimError;
use ehsim_core::config::{Config, SchemeKind};
use ehsim_core::power::VoltageTrace;
use ehsim_core::sim::simulate;
use ehsim_core::stats::{STATS_SECTIONS, StatsBundle};

/// Exit code for an unreadable or malformed config file.
const EXIT_CONFIG: i32 = 2;
/// Exit code for a program image that could not be loaded.
const EXIT_IMAGE: i32 = 3;
/// Exit code for a voltage trace that could not be loaded or parsed.
const EXIT_TRACE: i32 = 4;
/// Exit code for a CPU fault during execution.
const EXIT_FAULT: i32 = 5;
/// Exit code for a run aborted by the forward-progress check.
const EXIT_STALLED: i32 = 6;

#[derive(Parser, Debug)]
#[command(
    name = "ehsim",
    author,
    version,
    about = "Energy-harvesting microcontroller simulator",
    long_about = "Simulate a microcontroller program under an intermittent, harvested power\nsupply. The CPU drains a capacitor as it executes; the configured checkpointing\nscheme decides when to back up and restore architectural state across outages.\n\nExamples:\n  ehsim firmware.bin\n  ehsim firmware.bin --voltage-trace bench/solar.txt --scheme periodic\n  ehsim firmware.bin --constant-voltage 2.8 --config boards/lowpower.json\n  ehsim firmware.bin --stats-json out/run.json --stats system,periods"
)]
struct Cli {
    /// Program image to simulate (flat binary, loaded at flash address 0).
    image: String,

    /// Voltage trace file, one sample in volts per line.
    #[arg(short = 't', long)]
    voltage_trace: Option<String>,

    /// Simulate under a constant supply voltage instead of a trace.
    #[arg(long, value_name = "VOLTS", conflicts_with = "voltage_trace")]
    constant_voltage: Option<f64>,

    /// JSON configuration file. Missing fields fall back to built-in defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Checkpointing scheme, overriding the config file.
    #[arg(short, long, value_parser = parse_scheme)]
    scheme: Option<SchemeKind>,

    /// Instructions between periodic backups, overriding the config file.
    #[arg(long, value_name = "INSTRUCTIONS")]
    backup_interval: Option<u64>,

    /// Write the full statistics bundle to this path as JSON.
    #[arg(long, value_name = "PATH")]
    stats_json: Option<String>,

    /// Comma-separated report sections to print (system, cpu, periods).
    #[arg(long, value_delimiter = ',', value_name = "SECTIONS")]
    stats: Option<Vec<String>>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut config = cli.config.as_deref().map_or_else(Config::default, load_config);
    if let Some(kind) = cli.scheme {
        config.scheme.kind = kind;
    }
    if let Some(interval) = cli.backup_interval {
        config.scheme.backup_interval = interval;
    }

    let trace = build_trace(&cli, &config);

    println!("[*] Simulating: {}", cli.image);
    println!(
        "    clock={} Hz  scheme={:?}  capacitance={:.1e} F  rating={} V",
        config.general.clock_frequency,
        config.scheme.kind,
        config.power.capacitance,
        config.power.voltage_rating
    );

    match simulate(&cli.image, trace, &config) {
        Ok(stats) => report(&stats, &cli),
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(exit_code(&e));
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` selects levels; the default
/// shows lifecycle messages only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Parses a scheme name from the command line.
fn parse_scheme(name: &str) -> Result<SchemeKind, String> {
    match name.to_ascii_lowercase().as_str() {
        "baseline" => Ok(SchemeKind::Baseline),
        "periodic" => Ok(SchemeKind::Periodic),
        other => Err(format!(
            "unknown scheme `{other}` (expected `baseline` or `periodic`)"
        )),
    }
}

/// Reads and parses a JSON config file, exiting on failure.
fn load_config(path: &str) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: cannot read config `{path}`: {e}");
        process::exit(EXIT_CONFIG);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: cannot parse config `{path}`: {e}");
        process::exit(EXIT_CONFIG);
    })
}

/// Builds the supply model: a trace file if one was given, otherwise a
/// constant supply at the requested or rated voltage.
fn build_trace(cli: &Cli, config: &Config) -> VoltageTrace {
    let period = config.power.sample_period;
    match (&cli.voltage_trace, cli.constant_voltage) {
        (Some(path), _) => VoltageTrace::from_file(path, period).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: {e}");
            process::exit(EXIT_TRACE);
        }),
        (None, Some(volts)) => VoltageTrace::constant(volts, period),
        (None, None) => VoltageTrace::constant(config.power.voltage_rating, period),
    }
}

/// Prints the selected report sections and optionally writes the JSON bundle.
fn report(stats: &StatsBundle, cli: &Cli) {
    let sections = cli.stats.as_deref().unwrap_or_default();
    for section in sections {
        if !STATS_SECTIONS.contains(&section.as_str()) {
            eprintln!("Warning: unknown stats section `{section}` (expected one of {STATS_SECTIONS:?})");
        }
    }
    stats.print_sections(sections);

    if let Some(path) = &cli.stats_json {
        let json = serde_json::to_string_pretty(stats).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: failed to serialize statistics: {e}");
            process::exit(1);
        });
        fs::write(path, json).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: failed to write `{path}`: {e}");
            process::exit(1);
        });
        println!("\n[*] Statistics written to {path}");
    }
}

/// Maps each failure class to its distinct process exit code.
const fn exit_code(err: &SimError) -> i32 {
    match err {
        SimError::ImageLoad { .. } => EXIT_IMAGE,
        SimError::TraceLoad { .. } => EXIT_TRACE,
        SimError::Fault(_) => EXIT_FAULT,
        SimError::NoForwardProgress { .. } => EXIT_STALLED,
    }
}
