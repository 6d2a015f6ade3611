//! Condition lexer: splits a guard such as `!isBlocked && (isOnGem || isOnSwitch)`
//! into tokens.
//!
//! Whitespace is skipped. The identifier `not` (any case) is folded to `!`.

use gempath_types::{ErrorCode, GempathError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionToken {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!` or `not`
    Not,
    LParen,
    RParen,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Ident(String),
}

impl fmt::Display for ConditionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("&&"),
            Self::Or => f.write_str("||"),
            Self::Not => f.write_str("!"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Ident(name) => f.write_str(name),
        }
    }
}

struct ConditionLexer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> ConditionLexer<'src> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn scan(&mut self) -> Result<Option<ConditionToken>> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let rest = self.rest();
        let token = if rest.starts_with("&&") {
            self.pos += 2;
            ConditionToken::And
        } else if rest.starts_with("||") {
            self.pos += 2;
            ConditionToken::Or
        } else if ch == '!' {
            self.pos += 1;
            ConditionToken::Not
        } else if ch == '(' {
            self.pos += 1;
            ConditionToken::LParen
        } else if ch == ')' {
            self.pos += 1;
            ConditionToken::RParen
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let ident = &rest[..len];
            self.pos += len;
            if ident.eq_ignore_ascii_case("not") {
                ConditionToken::Not
            } else {
                ConditionToken::Ident(ident.to_string())
            }
        } else {
            return Err(GempathError::new(
                ErrorCode::MALFORMED_CONDITION,
                format!("unsupported character in condition: {ch}"),
            ));
        };
        Ok(Some(token))
    }
}

/// Tokenize a condition. Fails on any character outside the grammar and
/// on input that is empty after trimming.
pub fn tokenize_condition(source: &str) -> Result<Vec<ConditionToken>> {
    let mut lexer = ConditionLexer {
        source: source.trim(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.scan()? {
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Err(GempathError::new(ErrorCode::MALFORMED_CONDITION, "a condition is required"));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_and_idents() {
        let tokens = tokenize_condition("!isBlocked && (isOnGem || isOnSwitch)").unwrap();
        assert_eq!(
            tokens,
            vec![
                ConditionToken::Not,
                ConditionToken::Ident("isBlocked".into()),
                ConditionToken::And,
                ConditionToken::LParen,
                ConditionToken::Ident("isOnGem".into()),
                ConditionToken::Or,
                ConditionToken::Ident("isOnSwitch".into()),
                ConditionToken::RParen,
            ]
        );
    }

    #[test]
    fn test_not_keyword_any_case() {
        for src in ["not isBlocked", "NOT isBlocked", "Not isBlocked"] {
            let tokens = tokenize_condition(src).unwrap();
            assert_eq!(tokens[0], ConditionToken::Not, "{src}");
        }
    }

    #[test]
    fn test_not_prefix_of_identifier_is_not_folded() {
        let tokens = tokenize_condition("nothing").unwrap();
        assert_eq!(tokens, vec![ConditionToken::Ident("nothing".into())]);
    }

    #[test]
    fn test_no_whitespace_needed() {
        let tokens = tokenize_condition("isOnGem&&!isBlocked").unwrap();
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_single_ampersand_is_error() {
        let err = tokenize_condition("isOnGem & isBlocked").unwrap_err();
        assert_eq!(err.code, ErrorCode::MALFORMED_CONDITION);
        assert!(err.message.contains('&'));
    }

    #[test]
    fn test_empty_is_error() {
        assert!(tokenize_condition("   ").is_err());
        assert!(tokenize_condition("").is_err());
    }

    #[test]
    fn test_non_ascii_is_error() {
        let err = tokenize_condition("isOnGem ♦").unwrap_err();
        assert!(err.message.contains('♦'));
    }

    #[test]
    fn test_token_display() {
        let rendered: Vec<String> = tokenize_condition("not (a || b) && c")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["!", "(", "a", "||", "b", ")", "&&", "c"]);
    }
}
