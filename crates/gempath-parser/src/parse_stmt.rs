//! Statement parsing: blocks, `if`/`while`, `for` loops, commands, calls
//! and top-level function definitions.

use std::sync::LazyLock;

use regex::Regex;

use crate::condition::parse_condition;
use crate::parser::Parser;
use gempath_lexer::{Token, TokenKind};
use gempath_types::ast::*;
use gempath_types::{ErrorCode, GempathError, Result};

static IF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^if\s+(.+)$").expect("if header regex must compile"));

static WHILE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^while\s+(.+)$").expect("while header regex must compile"));

static FOR_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^for\s").expect("for keyword regex must compile"));

static FOR_TIMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^for\s+([0-9]+)\s+times$").expect("for-times regex must compile")
});

static FOR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^for\s+(?:[A-Za-z_][A-Za-z0-9_]*|_)\s+in\s+(-?[0-9]+)\s*(\.\.\.|\.\.<)\s*(-?[0-9]+)$",
    )
    .expect("for-range regex must compile")
});

static CALL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)\(\)$").expect("call regex must compile"));

static FUNC_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^func\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*\)$")
        .expect("func header regex must compile")
});

/// The two guarded statement keywords.
#[derive(Clone, Copy)]
enum Guard {
    If,
    While,
}

impl Guard {
    fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::While => "while",
        }
    }

    fn header(self) -> &'static Regex {
        match self {
            Self::If => &*IF_HEADER,
            Self::While => &*WHILE_HEADER,
        }
    }
}

impl<'src> Parser<'src> {
    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        let Some(open) = self.peek().filter(|t| t.kind == TokenKind::LBrace).cloned() else {
            return Err(self.error_at_current(
                ErrorCode::EXPECTED_BLOCK,
                "expected an opening brace {",
            ));
        };
        self.advance();
        let stmts = self.parse_statements_until_close()?;
        if !self.eat(&TokenKind::RBrace) {
            return Err(self.error_on_line(
                open.line,
                GempathError::new(
                    ErrorCode::UNCLOSED_BLOCK,
                    "missing closing brace } for this block",
                ),
            ));
        }
        Ok(stmts)
    }

    /// Parse a single executable statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error_at_current(
                ErrorCode::UNCLOSED_BLOCK,
                "the script ended while a statement was expected",
            ));
        };
        let text = match &token.kind {
            TokenKind::Text(text) => text.clone(),
            TokenKind::Else => {
                return Err(self.error_at_current(
                    ErrorCode::DANGLING_ELSE,
                    "else without a matching if",
                ))
            }
            TokenKind::LBrace | TokenKind::RBrace => {
                return Err(self.error_at_current(
                    ErrorCode::UNKNOWN_STATEMENT,
                    format!("unexpected brace {}", token.kind),
                ))
            }
        };

        if IF_HEADER.is_match(&text) {
            return self.parse_if().map(Stmt::If);
        }
        if WHILE_HEADER.is_match(&text) {
            return self.parse_while().map(Stmt::While);
        }
        if FOR_KEYWORD.is_match(&text) {
            return self.parse_loop().map(Stmt::Loop);
        }
        self.parse_command_or_call()
    }

    /// `if cond { ... } [else { ... } | else if cond { ... }]`
    fn parse_if(&mut self) -> Result<IfStmt> {
        self.has_dynamic_control_flow = true;
        let (header, condition) = self.parse_guard_header(Guard::If)?;
        let consequent = self.parse_block()?;

        let mut alternate = None;
        if self.eat(&TokenKind::Else) {
            if self.check_exact(&TokenKind::LBrace) {
                alternate = Some(self.parse_block()?);
            } else if self.peek_text().is_some_and(|t| IF_HEADER.is_match(t)) {
                alternate = Some(vec![Stmt::If(self.parse_if()?)]);
            } else {
                return Err(self.error_on_line(
                    header.line,
                    GempathError::new(
                        ErrorCode::DANGLING_ELSE,
                        "else must be followed by a block { ... } or an if statement",
                    ),
                ));
            }
        }

        Ok(IfStmt {
            condition,
            consequent,
            alternate,
            source: self.source_ref(&header),
        })
    }

    /// `while cond { ... }`
    fn parse_while(&mut self) -> Result<WhileStmt> {
        self.has_dynamic_control_flow = true;
        let (header, condition) = self.parse_guard_header(Guard::While)?;
        let body = self.parse_block()?;
        Ok(WhileStmt {
            condition,
            body,
            source: self.source_ref(&header),
        })
    }

    /// Consume an `if`/`while` header token and parse its condition.
    fn parse_guard_header(&mut self, guard: Guard) -> Result<(Token, Condition)> {
        let Some(header) = self.advance() else {
            return Err(self.error_at_current(
                ErrorCode::MALFORMED_CONDITION,
                format!("expected a {} statement", guard.keyword()),
            ));
        };
        let text = header.text();
        let raw = guard
            .header()
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        if raw.is_empty() {
            return Err(self.error_on_line(
                header.line,
                GempathError::new(
                    ErrorCode::MALFORMED_CONDITION,
                    format!("the {} statement needs a condition", guard.keyword()),
                ),
            ));
        }
        let condition = parse_condition(raw).map_err(|err| {
            self.error_on_line(
                header.line,
                GempathError::new(
                    ErrorCode::MALFORMED_CONDITION,
                    format!(
                        "cannot parse the {} condition: {}",
                        guard.keyword(),
                        err.message
                    ),
                ),
            )
        })?;
        Ok((header, condition))
    }

    /// `for N times { ... }` or `for x in a...b { ... }` / `a..<b`
    fn parse_loop(&mut self) -> Result<LoopStmt> {
        let Some(header) = self.advance() else {
            return Err(self.error_at_current(ErrorCode::MALFORMED_LOOP, "expected a for loop"));
        };
        let text = header.text();
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let count = loop_count(&normalized, &text)
            .map_err(|err| self.error_on_line(header.line, err))?;
        let body = self.parse_block()?;
        Ok(LoopStmt {
            count,
            body,
            source: self.source_ref(&header),
        })
    }

    /// `name()`: a command when `name` is one, otherwise a call.
    fn parse_command_or_call(&mut self) -> Result<Stmt> {
        let Some(token) = self.advance() else {
            return Err(self.error_at_current(ErrorCode::UNKNOWN_STATEMENT, "expected a statement"));
        };
        let text = token.text();
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let Some(name) = CALL_SHAPE
            .captures(&compact)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return Err(self.error_on_line(
                token.line,
                GempathError::new(
                    ErrorCode::UNKNOWN_STATEMENT,
                    format!("unknown statement: {text}"),
                ),
            ));
        };

        let source = self.source_ref(&token);
        Ok(match Command::from_name(&name) {
            Some(command) => Stmt::Command(CommandStmt { command, source }),
            None => Stmt::Call(CallStmt { name, source }),
        })
    }

    /// `func name() { ... }` at top level.
    pub(crate) fn parse_function_def(&mut self) -> Result<FunctionDef> {
        let Some(header) = self.advance() else {
            return Err(self.error_at_current(
                ErrorCode::MALFORMED_FUNCTION,
                "expected a function definition",
            ));
        };
        let text = header.text();
        let Some(name) = FUNC_HEADER
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return Err(self.error_on_line(
                header.line,
                GempathError::new(
                    ErrorCode::MALFORMED_FUNCTION,
                    format!("cannot parse the function definition: {text}"),
                ),
            ));
        };

        if Command::from_name(&name).is_some() {
            return Err(self.error_on_line(
                header.line,
                GempathError::new(
                    ErrorCode::RESERVED_FUNCTION_NAME,
                    format!("a function cannot share a command's name: {name}"),
                ),
            ));
        }
        if self.functions.iter().any(|f| f.name == name) {
            return Err(self.error_on_line(
                header.line,
                GempathError::new(
                    ErrorCode::DUPLICATE_FUNCTION,
                    format!("function {name} is already defined"),
                ),
            ));
        }

        let body = self.parse_block()?;
        Ok(FunctionDef {
            name,
            body,
            source: self.source_ref(&header),
        })
    }
}

/// Iteration count of a whitespace-normalized `for` header.
fn loop_count(normalized: &str, original: &str) -> Result<u64> {
    if let Some(caps) = FOR_TIMES.captures(normalized) {
        let digits = &caps[1];
        let count: u64 = digits.parse().map_err(|_| {
            GempathError::new(
                ErrorCode::INVALID_LOOP_RANGE,
                format!("the loop count is too large: {digits}"),
            )
        })?;
        if count == 0 {
            return Err(GempathError::new(
                ErrorCode::INVALID_LOOP_RANGE,
                format!("the loop count must be a positive integer (got {digits})"),
            ));
        }
        return Ok(count);
    }

    let Some(caps) = FOR_RANGE.captures(normalized) else {
        return Err(GempathError::new(
            ErrorCode::MALFORMED_LOOP,
            format!("cannot parse the for loop: {original}"),
        ));
    };
    let bound = |s: &str| -> Result<i64> {
        s.parse().map_err(|_| {
            GempathError::new(
                ErrorCode::INVALID_LOOP_RANGE,
                format!("loop range bounds must be integers: {original}"),
            )
        })
    };
    let start = bound(&caps[1])?;
    let end = bound(&caps[3])?;
    let inclusive = &caps[2] == "...";

    let span = end.checked_sub(start).and_then(|d| {
        if inclusive {
            d.checked_add(1)
        } else {
            Some(d)
        }
    });
    match span {
        Some(n) if n > 0 => Ok(n as u64),
        Some(_) => Err(GempathError::new(
            ErrorCode::INVALID_LOOP_RANGE,
            format!("the loop range is empty (start: {start}, end: {end})"),
        )),
        None => Err(GempathError::new(
            ErrorCode::INVALID_LOOP_RANGE,
            format!("the loop range is too large: {original}"),
        )),
    }
}
