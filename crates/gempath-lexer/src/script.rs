//! Script lexer: converts script text into a flat list of statement tokens.
//!
//! Features:
//! - `//` line comments and `/* */` block comments are removed; a block
//!   comment may span lines and an unterminated one runs to end of input
//! - each `{` and `}` becomes its own token
//! - `else if cond` is split into an `else` token and an `if cond` token
//! - every token remembers its 1-based source line

use gempath_types::SourceFile;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// A bare `else` (any case).
    Else,
    /// Any other trimmed, non-empty text: a command, call, header, etc.
    Text(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::Else => f.write_str("else"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A single token with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Self { kind, line }
    }

    /// The token's text as written (braces and `else` normalised).
    pub fn text(&self) -> String {
        self.kind.to_string()
    }
}

/// The script lexer.
pub struct ScriptLexer<'src> {
    source_file: &'src SourceFile,
    /// Whether the previous line ended inside a `/* ... */` comment.
    in_block_comment: bool,
}

impl<'src> ScriptLexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            in_block_comment: false,
        }
    }

    /// Lex the whole file. Never fails; malformed statements are reported
    /// by the parser.
    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (line_number, line) in self.source_file.lines() {
            let code = self.strip_comments(line);
            if code.trim().is_empty() {
                continue;
            }
            for part in split_braces(&code) {
                push_part(&mut tokens, part, line_number);
            }
        }
        tokens
    }

    /// Remove comments from one line, carrying block-comment state across
    /// lines.
    fn strip_comments(&mut self, line: &str) -> String {
        let mut buffer = String::new();
        let mut cursor = 0;

        while cursor < line.len() {
            if self.in_block_comment {
                match line[cursor..].find("*/") {
                    Some(end) => {
                        self.in_block_comment = false;
                        cursor += end + 2;
                        continue;
                    }
                    None => break,
                }
            }

            let rest = &line[cursor..];
            let block_start = rest.find("/*");
            let line_comment = rest.find("//");

            if let Some(lc) = line_comment {
                if block_start.is_none_or(|bs| lc < bs) {
                    buffer.push_str(&rest[..lc]);
                    break;
                }
            }

            if let Some(bs) = block_start {
                buffer.push_str(&rest[..bs]);
                match rest[bs + 2..].find("*/") {
                    Some(end) => {
                        cursor += bs + 2 + end + 2;
                        continue;
                    }
                    None => {
                        self.in_block_comment = true;
                        break;
                    }
                }
            }

            buffer.push_str(rest);
            break;
        }
        buffer
    }
}

/// Split on braces, keeping each brace as its own part.
fn split_braces(code: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, ch) in code.char_indices() {
        if ch == '{' || ch == '}' {
            parts.push(&code[start..i]);
            parts.push(&code[i..i + 1]);
            start = i + 1;
        }
    }
    parts.push(&code[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn push_part(tokens: &mut Vec<Token>, part: &str, line: u32) {
    match part {
        "{" => tokens.push(Token::new(TokenKind::LBrace, line)),
        "}" => tokens.push(Token::new(TokenKind::RBrace, line)),
        _ if part.eq_ignore_ascii_case("else") => tokens.push(Token::new(TokenKind::Else, line)),
        _ => match split_else_if(part) {
            Some(remainder) => {
                tokens.push(Token::new(TokenKind::Else, line));
                if !remainder.is_empty() {
                    tokens.push(Token::new(TokenKind::Text(remainder.to_string()), line));
                }
            }
            None => tokens.push(Token::new(TokenKind::Text(part.to_string()), line)),
        },
    }
}

/// For `else if ...` (any case, optional space) return the `if ...` part.
fn split_else_if(part: &str) -> Option<&str> {
    let head = part.get(..4)?;
    if !head.eq_ignore_ascii_case("else") {
        return None;
    }
    let remainder = part[4..].trim_start();
    let keyword = remainder.get(..2)?;
    if !keyword.eq_ignore_ascii_case("if") {
        return None;
    }
    let boundary = remainder[2..]
        .chars()
        .next()
        .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
    boundary.then(|| remainder.trim())
}
