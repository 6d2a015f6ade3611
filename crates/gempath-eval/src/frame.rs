//! Trace types: log entries, replay frames, and the simulation result.

use std::fmt;

use gempath_types::ast::Command;
use gempath_types::map::{Direction, Position};
use gempath_types::{GempathError, SourceRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Error,
}

/// One line of the simulation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub kind: LogKind,
    pub position: Position,
    pub facing: Direction,
}

/// What produced a frame. Serialized as `"start"`, `"warp"`, `"end"` or
/// the command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FrameTrigger {
    Start,
    Command(Command),
    Warp,
    End,
}

impl fmt::Display for FrameTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Command(command) => write!(f, "{command}"),
            Self::Warp => f.write_str("warp"),
            Self::End => f.write_str("end"),
        }
    }
}

impl From<FrameTrigger> for String {
    fn from(trigger: FrameTrigger) -> Self {
        trigger.to_string()
    }
}

impl TryFrom<String> for FrameTrigger {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "start" => Ok(Self::Start),
            "warp" => Ok(Self::Warp),
            "end" => Ok(Self::End),
            other => Command::from_name(other)
                .map(Self::Command)
                .ok_or_else(|| format!("unknown frame trigger: {other}")),
        }
    }
}

/// A snapshot taken at an observable event, for step-by-step replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub frame_index: usize,
    /// Index of the command being run when the frame was taken.
    pub step: usize,
    pub row: usize,
    pub col: usize,
    pub facing: Direction,
    /// Visited `"row,col"` keys, in first-visit order.
    pub visited: Vec<String>,
    pub message: String,
    pub kind: LogKind,
    pub label: Option<String>,
    pub command: Option<FrameTrigger>,
    pub source: Option<SourceRef>,
}

impl Frame {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Whether a command (not start, warp or end) produced this frame.
    pub fn is_command(&self) -> bool {
        matches!(self.command, Some(FrameTrigger::Command(_)))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub logs: Vec<LogEntry>,
    /// Runtime fault (if any) followed by postcondition failures.
    pub errors: Vec<String>,
    /// The same failures with codes and script lines.
    pub diagnostics: Vec<GempathError>,
    /// Visited `"row,col"` keys, in first-visit order.
    pub visited_path: Vec<String>,
    pub gems_collected: usize,
    pub total_gems: usize,
    pub switches_open: usize,
    pub total_switches: usize,
    /// Commands that completed without a fault.
    pub steps_executed: usize,
    pub frames: Vec<Frame>,
}

impl SimulationResult {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Frames produced by commands, in order.
    pub fn command_frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| f.is_command())
    }
}
