//! gempath simulator.
//!
//! Walks a parsed [`Program`] against a [`MapModel`], mutating private
//! copies of gem and switch state, and records a log plus a sequence of
//! replay frames. Runtime faults halt the walk and are reported in the
//! result; simulation itself never fails.

mod condition;
mod config;
mod error;
mod frame;
mod simulator;
mod state;

pub use condition::evaluate_condition;
pub use config::SimulationConfig;
pub use error::RuntimeFault;
pub use frame::{Frame, FrameTrigger, LogEntry, LogKind, SimulationResult};
pub use simulator::Simulator;
pub use state::SimulationState;

use gempath_types::ast::Program;
use gempath_types::map::MapModel;

/// Run `program` on `map` with the default limits.
pub fn simulate_program(map: &MapModel, program: &Program) -> SimulationResult {
    simulate_with_config(map, program, &SimulationConfig::default())
}

/// Run `program` on `map` with custom limits.
pub fn simulate_with_config(
    map: &MapModel,
    program: &Program,
    config: &SimulationConfig,
) -> SimulationResult {
    Simulator::new(map, program, *config).run()
}
