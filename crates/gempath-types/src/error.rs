use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Map,
    Syntax,
    Semantic,
    Runtime,
    Postcondition,
}

/// Numeric error code (E100–E599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Map structural errors (E100–E199) ──
    pub const EMPTY_MAP: Self = Self(100);
    pub const MISSING_START: Self = Self(101);
    pub const UNPAIRED_PORTAL: Self = Self(102);
    pub const MULTIPLE_STARTS: Self = Self(103);
    pub const INVALID_PORTAL_ID: Self = Self(104);

    // ── Script syntax errors (E200–E299) ──
    pub const EMPTY_SCRIPT: Self = Self(200);
    pub const UNKNOWN_STATEMENT: Self = Self(201);
    pub const EXPECTED_BLOCK: Self = Self(202);
    pub const UNCLOSED_BLOCK: Self = Self(203);
    pub const MALFORMED_LOOP: Self = Self(204);
    pub const INVALID_LOOP_RANGE: Self = Self(205);
    pub const MALFORMED_CONDITION: Self = Self(206);
    pub const MALFORMED_FUNCTION: Self = Self(207);
    pub const NESTED_FUNCTION: Self = Self(208);
    pub const DUPLICATE_FUNCTION: Self = Self(209);
    pub const RESERVED_FUNCTION_NAME: Self = Self(210);
    pub const DANGLING_ELSE: Self = Self(211);
    pub const NO_MAIN_STATEMENTS: Self = Self(212);

    // ── Script semantic errors (E300–E399) ──
    pub const UNDEFINED_FUNCTION: Self = Self(300);
    pub const RECURSION_NOT_ALLOWED: Self = Self(301);

    // ── Runtime errors (E400–E499) ──
    pub const OUT_OF_BOUNDS: Self = Self(400);
    pub const WALL_COLLISION: Self = Self(401);
    pub const NO_GEM: Self = Self(402);
    pub const NO_SWITCH: Self = Self(403);
    pub const UNRESOLVED_PORTAL: Self = Self(404);
    pub const BUDGET_EXCEEDED: Self = Self(405);
    pub const WHILE_LIMIT_EXCEEDED: Self = Self(406);

    // ── Postcondition errors (E500–E599) ──
    pub const GEMS_REMAINING: Self = Self(500);
    pub const SWITCHES_NOT_OPEN: Self = Self(501);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Map,
            200..=299 => ErrorCategory::Syntax,
            300..=399 => ErrorCategory::Semantic,
            400..=499 => ErrorCategory::Runtime,
            500..=599 => ErrorCategory::Postcondition,
            _ => ErrorCategory::Syntax, // fallback
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => write!(f, "map"),
            Self::Syntax => write!(f, "syntax"),
            Self::Semantic => write!(f, "semantic"),
            Self::Runtime => write!(f, "runtime"),
            Self::Postcondition => write!(f, "postcondition"),
        }
    }
}

/// A structured gempath error.
///
/// The message is the primary payload; code and category let the host
/// group failures without parsing free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{}{} [{}] {}", line_prefix(.line), .code, .category, .message)]
pub struct GempathError {
    /// Error code (e.g., E201).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// 1-based script line, when the error is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// The exact source line for context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl GempathError {
    /// Create a new error with no source location.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            line: None,
            source_line: None,
        }
    }

    /// Attach the script line the error originates from.
    pub fn at_line(mut self, line: u32, source_line: impl Into<String>) -> Self {
        self.line = Some(line);
        self.source_line = Some(source_line.into());
        self
    }
}

fn line_prefix(line: &Option<u32>) -> String {
    line.map(|l| format!("line {l}: ")).unwrap_or_default()
}
