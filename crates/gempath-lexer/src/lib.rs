//! gempath lexers.
//!
//! - [`ScriptLexer`] strips comments and splits a script into line/brace
//!   tokens tagged with their 1-based source line.
//! - [`tokenize_condition`] splits an `if`/`while` guard into operator and
//!   identifier tokens.

pub mod condition;
pub mod script;

pub use condition::{tokenize_condition, ConditionToken};
pub use script::{ScriptLexer, Token, TokenKind};
