use std::collections::{BTreeMap, BTreeSet};

use gempath_types::map::{Cell, Direction, MapModel, Position, SwitchState};

/// Mutable per-run state. Created fresh for each simulation; the map is
/// never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    pub position: Position,
    pub facing: Direction,
    pub remaining_gems: BTreeSet<Position>,
    pub switches: BTreeMap<Position, SwitchState>,
    /// First-visit order.
    visited_order: Vec<Position>,
    visited: BTreeSet<Position>,
    pub halted: bool,
    /// Commands dispatched so far, including one that faulted.
    pub attempted_commands: usize,
    /// Commands that completed.
    pub executed_commands: usize,
    pub gems_collected: usize,
    pub operation_count: u32,
    pub call_stack: Vec<String>,
}

impl SimulationState {
    pub fn new(map: &MapModel, start: &Cell) -> Self {
        Self {
            position: start.position(),
            facing: start.direction.unwrap_or(Direction::Right),
            remaining_gems: map.gems.clone(),
            switches: map.switches.clone(),
            visited_order: Vec::new(),
            visited: BTreeSet::new(),
            halted: false,
            attempted_commands: 0,
            executed_commands: 0,
            gems_collected: 0,
            operation_count: 0,
            call_stack: Vec::new(),
        }
    }

    /// Mark the current cell as visited.
    pub fn visit(&mut self) {
        if self.visited.insert(self.position) {
            self.visited_order.push(self.position);
        }
    }

    pub fn visited_keys(&self) -> Vec<String> {
        self.visited_order.iter().map(|p| p.key()).collect()
    }

    pub fn open_switches(&self) -> usize {
        self.switches
            .values()
            .filter(|&&s| s == SwitchState::Open)
            .count()
    }
}
