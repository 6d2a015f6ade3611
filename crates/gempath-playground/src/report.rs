//! The validation report handed to hosts.

use gempath_eval::{Frame, LogEntry, SimulationResult};
use gempath_types::GempathError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// End state of one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing to validate yet.
    Idle,
    /// The map or the script failed to parse; nothing ran.
    Error,
    /// The simulation ran and reported at least one error.
    Failure,
    /// The simulation ran cleanly.
    Success,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Not validated",
            Self::Error => "Error",
            Self::Failure => "Failed",
            Self::Success => "Passed",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::Idle => "Enter a map and code to validate automatically.",
            Self::Error => "An error occurred while parsing. Check your input.",
            Self::Failure => "There is a problem with the solution. Check the details.",
            Self::Success => "The solution ran correctly on the map.",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Self::Idle => "Load the sample data to see how it works.",
            Self::Error => {
                "Check the tab-delimited format and that only valid commands are used."
            }
            Self::Failure => {
                "Look for missing actions or map inconsistencies and adjust the solution."
            }
            Self::Success => {
                "All gems and switches are as expected. Check the log for details."
            }
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Idle | Self::Success => 0,
            Self::Failure => 1,
            Self::Error => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters shown next to the status card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub steps: usize,
    pub gems_collected: usize,
    pub total_gems: usize,
    pub switches_open: usize,
    pub total_switches: usize,
    pub error_count: usize,
}

impl Metrics {
    pub fn from_simulation(result: &SimulationResult) -> Self {
        Self {
            steps: result.steps_executed,
            gems_collected: result.gems_collected,
            total_gems: result.total_gems,
            switches_open: result.switches_open,
            total_switches: result.total_switches,
            error_count: result.errors.len(),
        }
    }
}

/// Everything a host needs to render one validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub status: Status,
    pub summary: String,
    pub detail: String,
    /// Hint for the map preview and stepper.
    pub note: String,
    pub errors: Vec<GempathError>,
    pub metrics: Metrics,
    pub logs: Vec<LogEntry>,
    pub frames: Vec<Frame>,
    pub visited_path: Vec<String>,
    /// `None` when the script did not parse.
    pub command_count: Option<String>,
    /// SHA-256 of the inputs this report was computed from.
    pub fingerprint: String,
}

impl ValidationReport {
    pub(crate) fn new(status: Status, note: &str, fingerprint: String) -> Self {
        Self {
            status,
            summary: status.summary().to_string(),
            detail: status.detail().to_string(),
            note: note.to_string(),
            errors: Vec::new(),
            metrics: Metrics::default(),
            logs: Vec::new(),
            frames: Vec::new(),
            visited_path: Vec::new(),
            command_count: None,
            fingerprint,
        }
    }

    /// Error messages in report order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_str())
    }
}
