//! Condition parsing with `||` / `&&` precedence.
//!
//! Precedence (lowest → highest):
//! 3. `||`
//! 2. `&&`
//! 1. `!`, `( ... )`, predicate
//!
//! Both binary operators are left-associative.

use gempath_lexer::{tokenize_condition, ConditionToken};
use gempath_types::ast::{Condition, LogicalOp, Predicate};
use gempath_types::{ErrorCode, GempathError, Result};

struct ConditionParser<'t> {
    tokens: &'t [ConditionToken],
    pos: usize,
}

impl<'t> ConditionParser<'t> {
    fn peek(&self) -> Option<&'t ConditionToken> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, expected: &ConditionToken) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `Or = And { "||" And }`
    fn parse_or(&mut self) -> Result<Condition> {
        let mut left = self.parse_and()?;
        while self.eat(&ConditionToken::Or) {
            let right = self.parse_and()?;
            left = Condition::logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    /// `And = Unary { "&&" Unary }`
    fn parse_and(&mut self) -> Result<Condition> {
        let mut left = self.parse_unary()?;
        while self.eat(&ConditionToken::And) {
            let right = self.parse_unary()?;
            left = Condition::logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    /// `Unary = "!" Unary | "(" Or ")" | Predicate`
    fn parse_unary(&mut self) -> Result<Condition> {
        let Some(token) = self.peek() else {
            return Err(malformed("the condition ended unexpectedly"));
        };
        self.pos += 1;
        match token {
            ConditionToken::Not => Ok(Condition::not(self.parse_unary()?)),
            ConditionToken::LParen => {
                let inner = self.parse_or()?;
                if !self.eat(&ConditionToken::RParen) {
                    return Err(malformed("unclosed parenthesis in condition"));
                }
                Ok(inner)
            }
            ConditionToken::Ident(name) => Predicate::from_name(name)
                .map(Condition::predicate)
                .ok_or_else(|| malformed(format!("unsupported condition: {name}"))),
            other => Err(malformed(format!("unsupported condition: {other}"))),
        }
    }
}

fn malformed(message: impl Into<String>) -> GempathError {
    GempathError::new(ErrorCode::MALFORMED_CONDITION, message)
}

/// Parse an already-tokenized condition. Every token must be consumed.
pub fn parse_condition_tokens(tokens: &[ConditionToken]) -> Result<Condition> {
    let mut parser = ConditionParser { tokens, pos: 0 };
    let condition = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(malformed(format!("unexpected token in condition: {extra}")));
    }
    Ok(condition)
}

/// Tokenize and parse a condition.
pub fn parse_condition(source: &str) -> Result<Condition> {
    parse_condition_tokens(&tokenize_condition(source)?)
}

/// Render a condition with minimal parentheses.
///
/// `parse_condition(&format_condition(c))` yields `c` again.
pub fn format_condition(condition: &Condition) -> String {
    condition.to_string()
}
