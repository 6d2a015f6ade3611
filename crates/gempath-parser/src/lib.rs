//! gempath parser: converts script text into a validated [`Program`].
//!
//! ```text
//! script text → ScriptLexer → Parser (conditions via parse_condition)
//!             → call validation → static command count → Program
//! ```

mod condition;
mod count;
mod parse_stmt;
mod parser;
mod validate;

pub use condition::{format_condition, parse_condition, parse_condition_tokens};
pub use count::static_command_count;
pub use parser::Parser;
pub use validate::validate_calls;

use gempath_lexer::ScriptLexer;
use gempath_types::ast::Program;
use gempath_types::{Result, SourceFile};

/// Parse and validate a script.
///
/// Fails fast with the first syntax or semantic error.
pub fn parse_commands(source: &str) -> Result<Program> {
    let sf = SourceFile::new(source);
    let tokens = ScriptLexer::new(&sf).lex();
    let program = Parser::new(tokens, &sf).parse()?;
    log::debug!(
        "parsed script: {} top-level statements, {} functions, count {:?}",
        program.main.len(),
        program.functions.len(),
        program.metadata.static_command_count
    );
    Ok(program)
}
