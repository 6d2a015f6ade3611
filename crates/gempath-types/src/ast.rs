//! AST node types for the gempath scripting language.
//!
//! Every statement carries a [`SourceRef`] so the stepper can highlight the
//! line that produced each frame. Function definitions keep source order;
//! lookups go through [`Program::function`].

use crate::SourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Commands
// ══════════════════════════════════════════════════════════════════════════════

/// The five primitive commands the actor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    MoveForward,
    TurnLeft,
    TurnRight,
    CollectGem,
    ToggleSwitch,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::MoveForward,
        Command::TurnLeft,
        Command::TurnRight,
        Command::CollectGem,
        Command::ToggleSwitch,
    ];

    /// The identifier used in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "moveForward",
            Self::TurnLeft => "turnLeft",
            Self::TurnRight => "turnRight",
            Self::CollectGem => "collectGem",
            Self::ToggleSwitch => "toggleSwitch",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::MoveForward => "Move one cell in the facing direction (portals teleport)",
            Self::TurnLeft => "Rotate facing counter-clockwise",
            Self::TurnRight => "Rotate facing clockwise",
            Self::CollectGem => "Pick up the gem on the current cell",
            Self::ToggleSwitch => "Flip the switch on the current cell open/closed",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditions
// ══════════════════════════════════════════════════════════════════════════════

/// The closed set of sensors a condition may query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    IsOnGem,
    IsOnOpenSwitch,
    IsOnClosedSwitch,
    IsOnSwitch,
    IsBlocked,
    IsBlockedLeft,
    IsBlockedRight,
}

impl Predicate {
    pub const ALL: [Predicate; 7] = [
        Predicate::IsOnGem,
        Predicate::IsOnOpenSwitch,
        Predicate::IsOnClosedSwitch,
        Predicate::IsOnSwitch,
        Predicate::IsBlocked,
        Predicate::IsBlockedLeft,
        Predicate::IsBlockedRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::IsOnGem => "isOnGem",
            Self::IsOnOpenSwitch => "isOnOpenSwitch",
            Self::IsOnClosedSwitch => "isOnClosedSwitch",
            Self::IsOnSwitch => "isOnSwitch",
            Self::IsBlocked => "isBlocked",
            Self::IsBlockedLeft => "isBlockedLeft",
            Self::IsBlockedRight => "isBlockedRight",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::IsOnGem => "The current cell still holds a gem",
            Self::IsOnOpenSwitch => "The current cell is an open switch",
            Self::IsOnClosedSwitch => "The current cell is a closed switch",
            Self::IsOnSwitch => "The current cell is a switch in either state",
            Self::IsBlocked => "The cell ahead is a wall or off the map",
            Self::IsBlockedLeft => "The cell to the left is a wall or off the map",
            Self::IsBlockedRight => "The cell to the right is a wall or off the map",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary logical operators. `&&` binds tighter than `||`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed `if`/`while` guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    Predicate { name: Predicate },
    Not { operand: Box<Condition> },
    Logical {
        operator: LogicalOp,
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub fn predicate(name: Predicate) -> Self {
        Self::Predicate { name }
    }

    pub fn not(operand: Condition) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    pub fn logical(operator: LogicalOp, left: Condition, right: Condition) -> Self {
        Self::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Left operands need parens only under a tighter parent. Right
    /// operands also need them under an equal parent, since the parser
    /// associates to the left.
    fn needs_parens_under(&self, parent: LogicalOp, right_operand: bool) -> bool {
        match self {
            Self::Logical { operator, .. } => {
                operator.precedence() < parent.precedence()
                    || (right_operand && operator.precedence() == parent.precedence())
            }
            _ => false,
        }
    }
}

/// Renders with minimal parentheses: a logical child is wrapped when it
/// binds looser than its parent (or equally, on the right), and `!` wraps
/// only logical operands.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate { name } => write!(f, "{name}"),
            Self::Not { operand } => match operand.as_ref() {
                Self::Logical { .. } => write!(f, "!({operand})"),
                _ => write!(f, "!{operand}"),
            },
            Self::Logical {
                operator,
                left,
                right,
            } => {
                if left.needs_parens_under(*operator, false) {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {operator} ")?;
                if right.needs_parens_under(*operator, true) {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Stmt {
    Command(CommandStmt),
    Loop(LoopStmt),
    If(IfStmt),
    While(WhileStmt),
    Call(CallStmt),
}

impl Stmt {
    pub fn source(&self) -> &SourceRef {
        match self {
            Self::Command(s) => &s.source,
            Self::Loop(s) => &s.source,
            Self::If(s) => &s.source,
            Self::While(s) => &s.source,
            Self::Call(s) => &s.source,
        }
    }
}

/// `moveForward()` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStmt {
    #[serde(rename = "type")]
    pub command: Command,
    pub source: SourceRef,
}

/// `for N times { ... }` or `for i in a...b { ... }`, normalised to a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStmt {
    pub count: u64,
    pub body: Vec<Stmt>,
    pub source: SourceRef,
}

/// `if cond { ... } [else { ... }]`. An `else if` chain nests a single `If`
/// inside `alternate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Condition,
    pub consequent: Vec<Stmt>,
    pub alternate: Option<Vec<Stmt>>,
    pub source: SourceRef,
}

/// `while cond { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Condition,
    pub body: Vec<Stmt>,
    pub source: SourceRef,
}

/// `name()` where `name` is a user function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStmt {
    pub name: String,
    pub source: SourceRef,
}

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

/// `func name() { body }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub body: Vec<Stmt>,
    pub source: SourceRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMetadata {
    /// Exact command count after unrolling loops and inlining calls;
    /// `None` when an `if` or `while` is reachable.
    pub static_command_count: Option<u64>,
    pub has_dynamic_control_flow: bool,
}

impl ProgramMetadata {
    /// Short label for the command-count chip.
    pub fn command_count_label(&self) -> String {
        match self.static_command_count {
            Some(1) => "1 command".to_string(),
            Some(n) => format!("{n} commands"),
            None if self.has_dynamic_control_flow => {
                "variable (conditional branches)".to_string()
            }
            None => "— commands".to_string(),
        }
    }
}

/// A parsed and validated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub main: Vec<Stmt>,
    pub functions: Vec<FunctionDef>,
    pub metadata: ProgramMetadata,
}

impl Program {
    /// Look up a function body by name.
    pub fn function(&self, name: &str) -> Option<&[Stmt]> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.body.as_slice())
    }
}
