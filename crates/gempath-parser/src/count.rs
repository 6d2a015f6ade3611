//! Static command counting.
//!
//! A program without `if`/`while` runs the same commands every time, so the
//! total can be computed by unrolling loops and inlining calls.

use std::collections::HashMap;

use crate::validate::{lookup, recursion_error};
use gempath_types::ast::{CallStmt, FunctionDef, Stmt};
use gempath_types::Result;

/// Exact number of commands `main` executes, or `None` when a conditional
/// or `while` is reachable.
///
/// Each function body is counted once and reused for later calls.
/// Saturates instead of overflowing for absurd loop nests.
pub fn static_command_count(main: &[Stmt], functions: &[FunctionDef]) -> Result<Option<u64>> {
    let mut counter = Counter {
        functions,
        memo: HashMap::new(),
        active: Vec::new(),
    };
    counter.count(main)
}

struct Counter<'a> {
    functions: &'a [FunctionDef],
    memo: HashMap<&'a str, Option<u64>>,
    active: Vec<&'a str>,
}

impl<'a> Counter<'a> {
    fn count(&mut self, stmts: &'a [Stmt]) -> Result<Option<u64>> {
        let mut total: u64 = 0;
        for stmt in stmts {
            let n = match stmt {
                Stmt::Command(_) => 1,
                Stmt::Loop(l) => match self.count(&l.body)? {
                    Some(inner) => inner.saturating_mul(l.count),
                    None => return Ok(None),
                },
                Stmt::Call(call) => match self.call(call)? {
                    Some(inner) => inner,
                    None => return Ok(None),
                },
                Stmt::If(_) | Stmt::While(_) => return Ok(None),
            };
            total = total.saturating_add(n);
        }
        Ok(Some(total))
    }

    fn call(&mut self, call: &'a CallStmt) -> Result<Option<u64>> {
        if let Some(&known) = self.memo.get(call.name.as_str()) {
            return Ok(known);
        }
        let body = lookup(call, self.functions)?;
        if self.active.contains(&call.name.as_str()) {
            return Err(recursion_error(call));
        }
        self.active.push(&call.name);
        let inner = self.count(body)?;
        self.active.pop();
        self.memo.insert(&call.name, inner);
        Ok(inner)
    }
}
