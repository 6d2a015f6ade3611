//! The statement walker.

use gempath_types::ast::*;
use gempath_types::map::{Direction, MapModel, SwitchState};
use gempath_types::{ErrorCode, GempathError, SourceRef};

use crate::condition::evaluate_condition;
use crate::config::SimulationConfig;
use crate::error::RuntimeFault;
use crate::frame::{Frame, FrameTrigger, LogEntry, LogKind, SimulationResult};
use crate::state::SimulationState;

/// Marker returned once a fault has been recorded. Propagating it with `?`
/// unwinds the walk without executing anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Halted;

type Step = Result<(), Halted>;

/// Frame annotations for an event.
#[derive(Debug, Clone, Default)]
struct FrameMeta {
    label: Option<String>,
    command: Option<FrameTrigger>,
    source: Option<SourceRef>,
}

impl FrameMeta {
    fn source(source: &SourceRef) -> Self {
        Self {
            source: Some(source.clone()),
            ..Self::default()
        }
    }
}

/// Runs one program against one map.
pub struct Simulator<'a> {
    map: &'a MapModel,
    program: &'a Program,
    config: SimulationConfig,
    logs: Vec<LogEntry>,
    frames: Vec<Frame>,
    errors: Vec<String>,
    diagnostics: Vec<GempathError>,
}

impl<'a> Simulator<'a> {
    pub fn new(map: &'a MapModel, program: &'a Program, config: SimulationConfig) -> Self {
        Self {
            map,
            program,
            config,
            logs: Vec::new(),
            frames: Vec::new(),
            errors: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Execute `main`, then check the postconditions.
    pub fn run(mut self) -> SimulationResult {
        let map = self.map;
        let Some(start) = map.start.as_ref() else {
            let fault = RuntimeFault::MissingStart;
            self.push_error(fault.code(), fault.to_string(), None);
            return self.finish(None);
        };

        let mut state = SimulationState::new(map, start);
        state.visit();
        self.record(
            &state,
            format!("Starting at {} facing {}.", state.position, state.facing),
            LogKind::Success,
            Some(FrameMeta {
                label: Some("Start".to_string()),
                command: Some(FrameTrigger::Start),
                source: None,
            }),
        );

        let program = self.program;
        if self.exec_block(&mut state, &program.main).is_ok() {
            self.record(
                &state,
                "All commands executed.".to_string(),
                LogKind::Success,
                Some(FrameMeta {
                    label: Some("Done".to_string()),
                    command: Some(FrameTrigger::End),
                    source: None,
                }),
            );
        }

        self.finish(Some(state))
    }

    /// Append postcondition failures and assemble the result.
    fn finish(mut self, state: Option<SimulationState>) -> SimulationResult {
        let (remaining, closed) = match &state {
            Some(state) => (
                state.remaining_gems.len(),
                state.switches.len() - state.open_switches(),
            ),
            None => (
                self.map.total_gems(),
                self.map
                    .switches
                    .values()
                    .filter(|&&s| s != SwitchState::Open)
                    .count(),
            ),
        };
        if remaining > 0 {
            let noun = if remaining == 1 { "gem" } else { "gems" };
            self.push_error(
                ErrorCode::GEMS_REMAINING,
                format!("{remaining} {noun} left uncollected."),
                None,
            );
        }
        if closed > 0 {
            let noun = if closed == 1 { "switch" } else { "switches" };
            self.push_error(
                ErrorCode::SWITCHES_NOT_OPEN,
                format!("{closed} {noun} not left open."),
                None,
            );
        }

        let total_switches = self.map.total_switches();
        let result = SimulationResult {
            logs: self.logs,
            errors: self.errors,
            diagnostics: self.diagnostics,
            visited_path: state
                .as_ref()
                .map(SimulationState::visited_keys)
                .unwrap_or_default(),
            gems_collected: state.as_ref().map_or(0, |s| s.gems_collected),
            total_gems: self.map.total_gems(),
            switches_open: total_switches - closed,
            total_switches,
            steps_executed: state.as_ref().map_or(0, |s| s.executed_commands),
            frames: self.frames,
        };
        log::debug!(
            "simulation finished: {} steps, {} frames, {} errors",
            result.steps_executed,
            result.frames.len(),
            result.errors.len()
        );
        result
    }

    // ── Recording ─────────────────────────────────────────────────────────

    /// Log a message; with `meta`, also capture a frame.
    fn record(
        &mut self,
        state: &SimulationState,
        message: String,
        kind: LogKind,
        meta: Option<FrameMeta>,
    ) {
        if let Some(meta) = meta {
            self.frames.push(Frame {
                frame_index: self.frames.len(),
                step: state.attempted_commands,
                row: state.position.row,
                col: state.position.col,
                facing: state.facing,
                visited: state.visited_keys(),
                message: message.clone(),
                kind,
                label: meta.label,
                command: meta.command,
                source: meta.source,
            });
        }
        self.logs.push(LogEntry {
            message,
            kind,
            position: state.position,
            facing: state.facing,
        });
    }

    fn push_error(&mut self, code: ErrorCode, message: String, source: Option<&SourceRef>) {
        let mut diagnostic = GempathError::new(code, message.clone());
        if let Some(source) = source {
            diagnostic = diagnostic.at_line(source.line, source.text.clone());
        }
        self.errors.push(message);
        self.diagnostics.push(diagnostic);
    }

    /// Record a fault as an error log entry and frame, and halt.
    fn fail(
        &mut self,
        state: &mut SimulationState,
        fault: RuntimeFault,
        meta: FrameMeta,
    ) -> Halted {
        log::trace!("halting: {fault}");
        let message = fault.to_string();
        self.push_error(fault.code(), message.clone(), meta.source.as_ref());
        self.record(state, message, LogKind::Error, Some(meta));
        state.halted = true;
        Halted
    }

    /// Charge one operation against the budget.
    fn tick(&mut self, state: &mut SimulationState, meta: impl FnOnce() -> FrameMeta) -> Step {
        if state.halted {
            return Err(Halted);
        }
        state.operation_count = state.operation_count.saturating_add(1);
        if state.operation_count > self.config.operation_budget {
            let fault = RuntimeFault::BudgetExceeded {
                limit: self.config.operation_budget,
            };
            return Err(self.fail(state, fault, meta()));
        }
        Ok(())
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn exec_block(&mut self, state: &mut SimulationState, stmts: &'a [Stmt]) -> Step {
        for stmt in stmts {
            if state.halted {
                return Err(Halted);
            }
            self.exec_stmt(state, stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, state: &mut SimulationState, stmt: &'a Stmt) -> Step {
        log::trace!(
            "dispatch line {}: {}",
            stmt.source().line,
            stmt.source().text
        );
        match stmt {
            Stmt::Command(c) => self.exec_command(state, c),
            Stmt::Loop(l) => {
                for _ in 0..l.count {
                    self.tick(state, || FrameMeta::source(&l.source))?;
                    self.exec_block(state, &l.body)?;
                }
                Ok(())
            }
            Stmt::Call(call) => self.exec_call(state, call),
            Stmt::If(i) => {
                self.tick(state, || FrameMeta::source(&i.source))?;
                let result = self.evaluate(state, &i.condition);
                let verdict = if result { "true" } else { "false" };
                self.record(
                    state,
                    format!("Condition if ({}) is {verdict}.", i.condition),
                    LogKind::Info,
                    None,
                );
                if result {
                    self.exec_block(state, &i.consequent)
                } else if let Some(alternate) = &i.alternate {
                    self.exec_block(state, alternate)
                } else {
                    Ok(())
                }
            }
            Stmt::While(w) => self.exec_while(state, w),
        }
    }

    fn exec_while(&mut self, state: &mut SimulationState, w: &'a WhileStmt) -> Step {
        let mut iterations: u32 = 0;
        loop {
            self.tick(state, || FrameMeta::source(&w.source))?;
            let result = self.evaluate(state, &w.condition);
            let verdict = if result { "continue" } else { "stop" };
            self.record(
                state,
                format!("while ({}) check: {verdict}", w.condition),
                LogKind::Info,
                None,
            );
            if !result {
                return Ok(());
            }
            iterations += 1;
            if iterations > self.config.while_iteration_limit {
                let fault = RuntimeFault::WhileLimitExceeded {
                    limit: self.config.while_iteration_limit,
                };
                return Err(self.fail(state, fault, FrameMeta::source(&w.source)));
            }
            self.exec_block(state, &w.body)?;
        }
    }

    fn exec_call(&mut self, state: &mut SimulationState, call: &'a CallStmt) -> Step {
        self.tick(state, || FrameMeta::source(&call.source))?;
        let program = self.program;
        let Some(body) = program.function(&call.name) else {
            let fault = RuntimeFault::UndefinedFunction {
                name: call.name.clone(),
            };
            return Err(self.fail(state, fault, FrameMeta::source(&call.source)));
        };
        if state.call_stack.contains(&call.name) {
            let fault = RuntimeFault::Recursion {
                name: call.name.clone(),
            };
            return Err(self.fail(state, fault, FrameMeta::source(&call.source)));
        }
        state.call_stack.push(call.name.clone());
        self.exec_block(state, body)?;
        state.call_stack.pop();
        Ok(())
    }

    // ── Commands ──────────────────────────────────────────────────────────

    fn exec_command(&mut self, state: &mut SimulationState, stmt: &'a CommandStmt) -> Step {
        let step = state.attempted_commands + 1;
        let meta = || FrameMeta {
            label: Some(format!("Command {step}")),
            command: Some(FrameTrigger::Command(stmt.command)),
            source: Some(stmt.source.clone()),
        };
        self.tick(state, meta)?;
        state.attempted_commands = step;
        state.visit();

        match stmt.command {
            Command::MoveForward => self.move_forward(state, step, meta)?,
            Command::TurnLeft | Command::TurnRight => {
                let (word, facing) = if stmt.command == Command::TurnLeft {
                    ("left", state.facing.turn_left())
                } else {
                    ("right", state.facing.turn_right())
                };
                state.facing = facing;
                self.record(
                    state,
                    format!("Command {step}: turned {word}, now facing {facing}."),
                    LogKind::Info,
                    Some(meta()),
                );
            }
            Command::CollectGem => {
                if !state.remaining_gems.remove(&state.position) {
                    return Err(self.fail(state, RuntimeFault::NoGem { step }, meta()));
                }
                state.gems_collected += 1;
                self.record(
                    state,
                    format!(
                        "Command {step}: collected a gem (total {}).",
                        state.gems_collected
                    ),
                    LogKind::Success,
                    Some(meta()),
                );
            }
            Command::ToggleSwitch => {
                let Some(switch) = state.switches.get_mut(&state.position) else {
                    return Err(self.fail(state, RuntimeFault::NoSwitch { step }, meta()));
                };
                *switch = switch.toggled();
                let verb = match *switch {
                    SwitchState::Open => "opened",
                    SwitchState::Closed => "closed",
                };
                self.record(
                    state,
                    format!("Command {step}: {verb} the switch."),
                    LogKind::Info,
                    Some(meta()),
                );
            }
        }

        state.executed_commands += 1;
        Ok(())
    }

    /// Move one cell; a portal destination teleports immediately without
    /// charging the budget.
    fn move_forward(
        &mut self,
        state: &mut SimulationState,
        step: usize,
        meta: impl Fn() -> FrameMeta,
    ) -> Step {
        let map = self.map;
        let Some(target) = map.neighbor(state.position, state.facing) else {
            return Err(self.fail(state, RuntimeFault::OffMap { step }, meta()));
        };
        if target.is_wall() {
            return Err(self.fail(state, RuntimeFault::WallCollision { step }, meta()));
        }

        state.position = target.position();
        state.visit();
        self.record(
            state,
            format!("Command {step}: moved to {}.", state.position),
            LogKind::Info,
            Some(meta()),
        );

        let Some(warp_id) = target.warp_id else {
            return Ok(());
        };
        let Some(destination) = map.portal_partner(warp_id, state.position) else {
            return Err(self.fail(
                state,
                RuntimeFault::UnresolvedPortal { step, warp_id },
                meta(),
            ));
        };
        state.position = destination;
        state.visit();
        self.record(
            state,
            format!("Passed through warp W{warp_id} to {destination}."),
            LogKind::Success,
            Some(FrameMeta {
                label: Some(format!("Warp W{warp_id}")),
                command: Some(FrameTrigger::Warp),
                source: meta().source,
            }),
        );
        Ok(())
    }

    // ── Predicates ────────────────────────────────────────────────────────

    fn evaluate(&self, state: &SimulationState, condition: &Condition) -> bool {
        let map = self.map;
        let mut lookup = |predicate: Predicate| predicate_holds(map, state, predicate);
        evaluate_condition(condition, &mut lookup)
    }
}

/// Resolve a predicate against live state. Off-grid counts as blocked.
fn predicate_holds(map: &MapModel, state: &SimulationState, predicate: Predicate) -> bool {
    let here = state.position;
    let blocked = |direction: Direction| map.is_blocked(here, direction);
    match predicate {
        Predicate::IsOnGem => state.remaining_gems.contains(&here),
        Predicate::IsOnOpenSwitch => state.switches.get(&here) == Some(&SwitchState::Open),
        Predicate::IsOnClosedSwitch => state.switches.get(&here) == Some(&SwitchState::Closed),
        Predicate::IsOnSwitch => state.switches.contains_key(&here),
        Predicate::IsBlocked => blocked(state.facing),
        Predicate::IsBlockedLeft => blocked(state.facing.turn_left()),
        Predicate::IsBlockedRight => blocked(state.facing.turn_right()),
    }
}
