//! gempath playground: the full validation pipeline.
//!
//! ```text
//! map text    → parse_map ───────┐
//! script text → parse_commands ──┴→ simulate_with_config → ValidationReport
//! ```
//!
//! Parse failures end the run with [`Status::Error`]. Once both inputs
//! parse, the simulation always runs and the report is either
//! [`Status::Failure`] or [`Status::Success`].

pub mod reference;
mod report;
pub mod sample;

pub use report::{Metrics, Status, ValidationReport};
pub use sample::{SAMPLE_MAP, SAMPLE_SOLUTION};

use gempath_eval::{simulate_with_config, SimulationConfig};
use gempath_map::{parse_map, MapOptions};
use gempath_parser::parse_commands;
use gempath_types::GempathError;
use sha2::{Digest, Sha256};

/// Gempath release version.
pub const GEMPATH_VERSION: &str = env!("CARGO_PKG_VERSION");

const NOTE_IDLE: &str = "Load the sample to see the visited path highlighted.";
const NOTE_ERROR: &str = "An error occurred. Fix the input and validate again.";
const NOTE_FAILURE: &str = "Check the visited path and find the failing step in the log.";
const NOTE_DYNAMIC: &str =
    "Condition and loop checks were added to the log. Step through to follow each branch.";
const NOTE_STATIC: &str =
    "The visited path is highlighted. Step through to see each command's movement.";

/// Validate a script against a map with strict map rules and default limits.
pub fn validate(map_text: &str, script_text: &str) -> ValidationReport {
    validate_with(
        map_text,
        script_text,
        &MapOptions::default(),
        &SimulationConfig::default(),
    )
}

/// Validate with explicit map relaxations and simulation limits.
pub fn validate_with(
    map_text: &str,
    script_text: &str,
    options: &MapOptions,
    config: &SimulationConfig,
) -> ValidationReport {
    let fingerprint = fingerprint(map_text, script_text);
    if map_text.trim().is_empty() && script_text.trim().is_empty() {
        return ValidationReport::new(Status::Idle, NOTE_IDLE, fingerprint);
    }

    let map = match parse_map(map_text, options) {
        Ok(map) => map,
        Err(error) => return error_report(error, fingerprint),
    };
    let program = match parse_commands(script_text) {
        Ok(program) => program,
        Err(error) => return error_report(error, fingerprint),
    };

    let simulation = simulate_with_config(&map, &program, config);
    let (status, note) = if !simulation.success() {
        (Status::Failure, NOTE_FAILURE)
    } else if program.metadata.has_dynamic_control_flow {
        (Status::Success, NOTE_DYNAMIC)
    } else {
        (Status::Success, NOTE_STATIC)
    };
    log::debug!("validation finished: {status:?}");

    let mut report = ValidationReport::new(status, note, fingerprint);
    report.metrics = Metrics::from_simulation(&simulation);
    report.command_count = Some(program.metadata.command_count_label());
    report.errors = simulation.diagnostics;
    report.logs = simulation.logs;
    report.frames = simulation.frames;
    report.visited_path = simulation.visited_path;
    report
}

fn error_report(error: GempathError, fingerprint: String) -> ValidationReport {
    log::debug!("validation stopped at parse: {error}");
    let mut report = ValidationReport::new(Status::Error, NOTE_ERROR, fingerprint);
    report.metrics.error_count = 1;
    report.errors.push(error);
    report
}

/// SHA-256 (lowercase hex) of the map and script, NUL-separated.
pub fn fingerprint(map_text: &str, script_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(map_text.as_bytes());
    hasher.update([0u8]);
    hasher.update(script_text.as_bytes());
    format!("{:x}", hasher.finalize())
}
