//! Whole-program call validation.
//!
//! Every call must name a defined function, and no function may reach
//! itself through calls. The call graph is walked depth-first with each
//! function marked while its body is on the stack and once it is finished,
//! so every body is walked at most once no matter how often it is called.

use std::collections::HashMap;

use gempath_types::ast::{CallStmt, FunctionDef, Stmt};
use gempath_types::{ErrorCode, GempathError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct CallWalker<'a> {
    functions: &'a [FunctionDef],
    marks: HashMap<&'a str, Mark>,
}

/// Reject undefined and recursive calls.
///
/// Main is checked first, then every function body, so recursion in a
/// function that is never called is still rejected.
pub fn validate_calls(main: &[Stmt], functions: &[FunctionDef]) -> Result<()> {
    let mut walker = CallWalker {
        functions,
        marks: HashMap::new(),
    };
    walker.walk(main)?;
    for function in functions {
        walker.visit(&function.name, &function.body)?;
    }
    Ok(())
}

impl<'a> CallWalker<'a> {
    fn visit(&mut self, name: &'a str, body: &'a [Stmt]) -> Result<()> {
        if self.marks.contains_key(name) {
            return Ok(());
        }
        self.marks.insert(name, Mark::InProgress);
        self.walk(body)?;
        self.marks.insert(name, Mark::Done);
        Ok(())
    }

    fn walk(&mut self, stmts: &'a [Stmt]) -> Result<()> {
        for stmt in stmts {
            match stmt {
                Stmt::Command(_) => {}
                Stmt::Loop(l) => self.walk(&l.body)?,
                Stmt::While(w) => self.walk(&w.body)?,
                Stmt::If(i) => {
                    self.walk(&i.consequent)?;
                    if let Some(alternate) = &i.alternate {
                        self.walk(alternate)?;
                    }
                }
                Stmt::Call(call) => {
                    let body = lookup(call, self.functions)?;
                    match self.marks.get(call.name.as_str()).copied() {
                        Some(Mark::InProgress) => return Err(recursion_error(call)),
                        Some(Mark::Done) => {}
                        None => self.visit(&call.name, body)?,
                    }
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn lookup<'a>(call: &CallStmt, functions: &'a [FunctionDef]) -> Result<&'a [Stmt]> {
    functions
        .iter()
        .find(|f| f.name == call.name)
        .map(|f| f.body.as_slice())
        .ok_or_else(|| {
            GempathError::new(
                ErrorCode::UNDEFINED_FUNCTION,
                format!("call to undefined function: {}()", call.name),
            )
            .at_line(call.source.line, call.source.text.clone())
        })
}

pub(crate) fn recursion_error(call: &CallStmt) -> GempathError {
    GempathError::new(
        ErrorCode::RECURSION_NOT_ALLOWED,
        format!(
            "recursive function calls are not supported: {}()",
            call.name
        ),
    )
    .at_line(call.source.line, call.source.text.clone())
}
