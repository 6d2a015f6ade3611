//! `gempath` command-line validator.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use gempath_eval::SimulationConfig;
use gempath_map::MapOptions;
use gempath_playground::{
    reference, validate_with, Status, ValidationReport, SAMPLE_MAP, SAMPLE_SOLUTION,
};

#[derive(Parser)]
#[command(name = "gempath")]
#[command(version, about = "Validate gem-collecting scripts against grid maps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script against a map and report the outcome.
    Validate {
        /// Tab-delimited map file.
        map: PathBuf,
        /// Script file.
        script: PathBuf,
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
        /// Operation budget for the run.
        #[arg(long, value_name = "N")]
        budget: Option<u32>,
        /// Iteration ceiling for a single while loop.
        #[arg(long = "while-limit", value_name = "N")]
        while_limit: Option<u32>,
        #[arg(long = "allow-missing-start")]
        allow_missing_start: bool,
        #[arg(long = "allow-unpaired-portals")]
        allow_unpaired_portals: bool,
    },
    /// Print the language reference.
    Reference {
        /// Print the command table as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Validate the bundled sample map and solution.
    Sample {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let (report, json) = match cli.command {
        Commands::Validate {
            map,
            script,
            json,
            budget,
            while_limit,
            allow_missing_start,
            allow_unpaired_portals,
        } => {
            let map_text = read(&map)?;
            let script_text = read(&script)?;
            let options = MapOptions {
                allow_missing_start,
                allow_unpaired_portals,
                ..MapOptions::default()
            };
            let mut config = SimulationConfig::default();
            if let Some(budget) = budget {
                config = config.with_operation_budget(budget);
            }
            if let Some(limit) = while_limit {
                config = config.with_while_iteration_limit(limit);
            }
            info!("validating {} against {}", script.display(), map.display());
            (
                validate_with(&map_text, &script_text, &options, &config),
                json,
            )
        }
        Commands::Reference { json } => {
            if json {
                println!("{}", reference::generate_command_table());
            } else {
                print!("{}", reference::generate_reference());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Sample { json } => {
            println!("{SAMPLE_MAP}\n\n{SAMPLE_SOLUTION}\n");
            (
                validate_with(
                    SAMPLE_MAP,
                    SAMPLE_SOLUTION,
                    &MapOptions::default(),
                    &SimulationConfig::default(),
                ),
                json,
            )
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&report).context("while serializing the report")?;
        println!("{out}");
    } else {
        print_report(&report);
    }
    Ok(exit_code(report.status))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("while reading {}", path.display()))
}

fn exit_code(status: Status) -> ExitCode {
    ExitCode::from(status.exit_code())
}

fn print_report(report: &ValidationReport) {
    println!("[{}] {}", report.status, report.summary);
    println!("{}", report.detail);
    if let Some(count) = &report.command_count {
        println!("Commands: {count}");
    }
    let m = &report.metrics;
    println!(
        "Steps: {}  Gems: {}/{}  Switches: {}/{}  Errors: {}",
        m.steps, m.gems_collected, m.total_gems, m.switches_open, m.total_switches, m.error_count
    );
    if !report.logs.is_empty() {
        println!();
        for entry in &report.logs {
            println!("  {}", entry.message);
        }
    }
    if !report.errors.is_empty() {
        println!();
        for error in &report.errors {
            println!("  error: {error}");
        }
    }
    println!("\n{}", report.note);
}
