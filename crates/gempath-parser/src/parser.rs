//! Core parser infrastructure: token cursor, error reporting, top level.

use gempath_lexer::{Token, TokenKind};
use gempath_types::ast::{FunctionDef, Program, ProgramMetadata, Stmt};
use gempath_types::{ErrorCode, GempathError, Result, SourceFile, SourceRef};

use crate::{count, validate};

/// The gempath script parser.
///
/// Consumes the flat token list produced by the script lexer and builds a
/// [`Program`]. Parsing is fail-fast: the first error aborts.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Top-level function definitions, in source order.
    pub(crate) functions: Vec<FunctionDef>,
    /// Set once any `if` or `while` has been parsed, anywhere.
    pub(crate) has_dynamic_control_flow: bool,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            functions: Vec::new(),
            has_dynamic_control_flow: false,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token, or `None` past the end.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    /// Returns the current token's text, if it is a text token.
    pub(crate) fn peek_text(&self) -> Option<&str> {
        match self.peek_kind() {
            Some(TokenKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ── Error Helpers ─────────────────────────────────────────────────────────

    /// Line of the current token, falling back to the last token at EOF.
    fn current_line(&self) -> Option<u32> {
        self.peek().or_else(|| self.tokens.last()).map(|t| t.line)
    }

    /// Attach a source line to an error.
    pub(crate) fn error_on_line(&self, line: u32, error: GempathError) -> GempathError {
        let text = self.source_file.line(line).unwrap_or_default().trim();
        error.at_line(line, text)
    }

    /// Build an error located at the current token.
    pub(crate) fn error_at_current(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> GempathError {
        let error = GempathError::new(code, message);
        match self.current_line() {
            Some(line) => self.error_on_line(line, error),
            None => error,
        }
    }

    /// A [`SourceRef`] for a header token.
    pub(crate) fn source_ref(&self, token: &Token) -> SourceRef {
        SourceRef::new(token.line, token.text())
    }

    // ── Top Level ─────────────────────────────────────────────────────────────

    /// Parse the whole script, validate calls and compute the static count.
    pub fn parse(mut self) -> Result<Program> {
        if self.tokens.is_empty() {
            return Err(GempathError::new(ErrorCode::EMPTY_SCRIPT, "the script is empty"));
        }

        let mut main = Vec::new();
        while !self.at_end() {
            if self.peek_text().is_some_and(is_function_header) {
                let function = self.parse_function_def()?;
                self.functions.push(function);
                continue;
            }
            main.push(self.parse_statement()?);
        }

        if main.is_empty() {
            return Err(GempathError::new(
                ErrorCode::NO_MAIN_STATEMENTS,
                "no statements to run outside function definitions",
            ));
        }

        validate::validate_calls(&main, &self.functions)?;

        // Unreachable conditionals leave the count exact.
        let static_command_count = count::static_command_count(&main, &self.functions)?;

        Ok(Program {
            main,
            functions: self.functions,
            metadata: ProgramMetadata {
                static_command_count,
                has_dynamic_control_flow: self.has_dynamic_control_flow
                    || static_command_count.is_none(),
            },
        })
    }

    /// Parse statements until the cursor reaches a closing brace or EOF.
    pub(crate) fn parse_statements_until_close(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.at_end() && !self.check_exact(&TokenKind::RBrace) {
            if self.peek_text().is_some_and(is_function_header) {
                return Err(self.error_at_current(
                    ErrorCode::NESTED_FUNCTION,
                    "functions cannot be defined inside another block",
                ));
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }
}

/// `func` followed by whitespace starts a function definition.
pub(crate) fn is_function_header(text: &str) -> bool {
    text.strip_prefix("func")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}
