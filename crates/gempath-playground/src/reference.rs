//! Machine-generated gempath language reference and command table.
//!
//! Produces two artifacts from the same tables the parser and map reader
//! use ([`Command::ALL`], [`Predicate::ALL`], the legend glyphs):
//! 1. **Compact text reference** for help panels and the CLI
//! 2. **Structured command table** (JSON) for tooling and editors
//!
//! Adding a command or predicate updates both automatically.

use gempath_types::ast::{Command, LogicalOp, Predicate};
use gempath_types::map::{
    GEM_GLYPH, PORTAL_PREFIX, START_ARROWS, SWITCH_CLOSED_GLYPH, SWITCH_OPEN_GLYPH, WALL_GLYPH,
};
use serde_json::json;

use crate::GEMPATH_VERSION;

// ══════════════════════════════════════════════════════════════════════════════
// Legend
// ══════════════════════════════════════════════════════════════════════════════

/// `(token, meaning)` pairs for every map glyph, in display order.
fn legend() -> Vec<(String, &'static str)> {
    vec![
        (WALL_GLYPH.to_string(), "impassable block"),
        (GEM_GLYPH.to_string(), "gem (collect with collectGem)"),
        (SWITCH_OPEN_GLYPH.to_string(), "open switch"),
        (SWITCH_CLOSED_GLYPH.to_string(), "closed switch"),
        (
            START_ARROWS.join(" "),
            "start, facing up / down / left / right",
        ),
        (
            format!("{PORTAL_PREFIX}1 {PORTAL_PREFIX}2 ..."),
            "warp portal, exactly two cells per number",
        ),
        ("(empty)".to_string(), "floor"),
        ("anything else".to_string(), "floor, shown as written"),
    ]
}

fn pad(name: &str, width: usize) -> String {
    format!("{name:<width$}")
}

// ══════════════════════════════════════════════════════════════════════════════
// Text Reference
// ══════════════════════════════════════════════════════════════════════════════

/// Generate the compact text reference.
///
/// The COMMANDS, PREDICATES, OPERATORS and LEGEND sections are generated;
/// the rest is static text.
pub fn generate_reference() -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(REFERENCE_PREAMBLE);

    out.push_str("COMMANDS (one per line, no arguments):\n");
    for command in Command::ALL {
        let call = format!("{}()", command.name());
        out.push_str(&format!("  {} {}\n", pad(&call, 16), command.description()));
    }
    out.push('\n');

    out.push_str(REFERENCE_CONTROL_FLOW);

    out.push_str("PREDICATES (usable in if / while conditions):\n");
    for predicate in Predicate::ALL {
        out.push_str(&format!(
            "  {} {}\n",
            pad(predicate.name(), 16),
            predicate.description()
        ));
    }
    out.push('\n');

    out.push_str("OPERATORS (tightest first):\n");
    out.push_str("  ! (alias: not)    negation\n");
    for op in [LogicalOp::And, LogicalOp::Or] {
        out.push_str(&format!(
            "  {}                left-associative\n",
            pad(op.symbol(), 2)
        ));
    }
    out.push_str("  ( ... )           grouping\n\n");

    out.push_str("MAP LEGEND (one row per line, cells separated by tabs):\n");
    for (token, meaning) in legend() {
        out.push_str(&format!("  {} {}\n", pad(&token, 16), meaning));
    }
    out.push('\n');

    out.push_str(REFERENCE_RULES);
    out
}

const REFERENCE_PREAMBLE: &str = r#"GEMPATH: move an actor around a grid, collect every gem, leave every switch open.
Comments: // line and /* block */

"#;

const REFERENCE_CONTROL_FLOW: &str = r#"CONTROL FLOW:
  for N times { ... }                N >= 1
  for i in a...b { ... }             inclusive range, runs b - a + 1 times
  for i in a..<b { ... }             half-open range, runs b - a times
  if cond { ... } else if cond { ... } else { ... }
  while cond { ... }
  func name() { ... }                top level only, no parameters
  name()                             call a function

"#;

const REFERENCE_RULES: &str = r#"RULES:
  - Moving off the map or into a block stops the run
  - Stepping onto a warp moves you to its partner cell in the same command
  - Functions may not call themselves, directly or through other functions
  - Function names may not reuse a command name
  - A run stops after 10000 operations; a while loop after 10000 iterations
  - Success means every gem collected and every switch open
"#;

// ══════════════════════════════════════════════════════════════════════════════
// Command Table (JSON)
// ══════════════════════════════════════════════════════════════════════════════

/// Generate a structured JSON table of commands, predicates and legend.
///
/// Output format:
/// ```json
/// {
///   "version": "0.1.0",
///   "commands": [ { "name": "moveForward", "syntax": "moveForward()", "description": "..." } ],
///   "predicates": [ { "name": "isOnGem", "description": "..." } ],
///   "legend": [ { "token": "止", "meaning": "impassable block" } ]
/// }
/// ```
pub fn generate_command_table() -> String {
    let commands: Vec<_> = Command::ALL
        .iter()
        .map(|c| {
            json!({
                "name": c.name(),
                "syntax": format!("{}()", c.name()),
                "description": c.description(),
            })
        })
        .collect();
    let predicates: Vec<_> = Predicate::ALL
        .iter()
        .map(|p| json!({ "name": p.name(), "description": p.description() }))
        .collect();
    let legend: Vec<_> = legend()
        .into_iter()
        .map(|(token, meaning)| json!({ "token": token, "meaning": meaning }))
        .collect();

    let table = json!({
        "version": GEMPATH_VERSION,
        "commands": commands,
        "predicates": predicates,
        "legend": legend,
    });
    serde_json::to_string_pretty(&table).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
}
