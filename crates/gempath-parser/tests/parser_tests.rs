//! Script parser tests.
//!
//! Covers: commands and calls, loops (times and ranges), if/else chains,
//! while, function definitions, call validation, static counting, error
//! codes and lines, serialization shape, and determinism.

use gempath_parser::{format_condition, parse_commands};
use gempath_types::ast::*;
use gempath_types::{ErrorCode, GempathError};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse_ok(source: &str) -> Program {
    match parse_commands(source) {
        Ok(program) => program,
        Err(e) => panic!("unexpected parse error: {e}"),
    }
}

fn parse_err(source: &str) -> GempathError {
    match parse_commands(source) {
        Ok(program) => panic!("expected an error, got {program:?}"),
        Err(e) => e,
    }
}

fn command_of(stmt: &Stmt) -> Command {
    match stmt {
        Stmt::Command(c) => c.command,
        other => panic!("expected a command, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Commands and calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_commands() {
    let src = "moveForward()\nturnLeft()\nturnRight()\ncollectGem()\ntoggleSwitch()";
    let prog = parse_ok(src);
    let commands: Vec<Command> = prog.main.iter().map(command_of).collect();
    assert_eq!(commands, Command::ALL.to_vec());
    assert_eq!(prog.metadata.static_command_count, Some(5));
    assert!(!prog.metadata.has_dynamic_control_flow);
}

#[test]
fn test_inner_whitespace_is_ignored() {
    let prog = parse_ok("moveForward ( )");
    assert_eq!(command_of(&prog.main[0]), Command::MoveForward);
    assert_eq!(prog.main[0].source().text, "moveForward ( )");
}

#[test]
fn test_source_lines_are_recorded() {
    let prog = parse_ok("// intro\n\nmoveForward()\n  turnLeft()");
    assert_eq!(prog.main[0].source().line, 3);
    assert_eq!(prog.main[1].source().line, 4);
    assert_eq!(prog.main[1].source().text, "turnLeft()");
}

#[test]
fn test_call_to_function_defined_later() {
    let prog = parse_ok("hop()\nfunc hop() {\n  moveForward()\n}");
    match &prog.main[0] {
        Stmt::Call(c) => assert_eq!(c.name, "hop"),
        other => panic!("expected call, got {other:?}"),
    }
    assert_eq!(prog.functions.len(), 1);
    assert_eq!(prog.function("hop").map(<[Stmt]>::len), Some(1));
}

#[test]
fn test_unknown_statement() {
    let err = parse_err("jump()x");
    assert_eq!(err.code, ErrorCode::UNKNOWN_STATEMENT);
    assert_eq!(err.message, "unknown statement: jump()x");
    assert_eq!(err.line, Some(1));
    assert_eq!(err.source_line.as_deref(), Some("jump()x"));
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_err("moveForward()\n}");
    assert_eq!(err.code, ErrorCode::UNKNOWN_STATEMENT);
    assert_eq!(err.line, Some(2));
}

// ─────────────────────────────────────────────────────────────────────
// Loops
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_for_times() {
    let prog = parse_ok("for 3 times {\n  moveForward()\n  turnLeft()\n}");
    match &prog.main[0] {
        Stmt::Loop(l) => {
            assert_eq!(l.count, 3);
            assert_eq!(l.body.len(), 2);
            assert_eq!(l.source.line, 1);
            assert_eq!(l.source.text, "for 3 times");
        }
        other => panic!("expected loop, got {other:?}"),
    }
    assert_eq!(prog.metadata.static_command_count, Some(6));
}

#[test]
fn test_for_ranges() {
    let count = |src: &str| match &parse_ok(src).main[0] {
        Stmt::Loop(l) => l.count,
        other => panic!("expected loop, got {other:?}"),
    };
    assert_eq!(count("for i in 1...5 { moveForward() }"), 5);
    assert_eq!(count("for i in 0..<5 { moveForward() }"), 5);
    assert_eq!(count("for _ in -1...1 { moveForward() }"), 3);
    assert_eq!(count("for   step   in 2 ..< 4 { moveForward() }"), 2);
}

#[test]
fn test_for_zero_and_empty_ranges() {
    for src in [
        "for 0 times { moveForward() }",
        "for i in 5...1 { moveForward() }",
        "for i in 2..<2 { moveForward() }",
    ] {
        assert_eq!(parse_err(src).code, ErrorCode::INVALID_LOOP_RANGE, "{src}");
    }
}

#[test]
fn test_malformed_for() {
    let err = parse_err("for ever {\n moveForward()\n}");
    assert_eq!(err.code, ErrorCode::MALFORMED_LOOP);
    assert_eq!(err.message, "cannot parse the for loop: for ever");
}

#[test]
fn test_loop_requires_block() {
    let err = parse_err("for 2 times\nmoveForward()");
    assert_eq!(err.code, ErrorCode::EXPECTED_BLOCK);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_unclosed_block() {
    let err = parse_err("for 2 times {\n  moveForward()\n");
    assert_eq!(err.code, ErrorCode::UNCLOSED_BLOCK);
    assert_eq!(err.line, Some(1));
}

// ─────────────────────────────────────────────────────────────────────
// if / else / while
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_if_without_else() {
    let prog = parse_ok("if isOnGem {\n  collectGem()\n}");
    match &prog.main[0] {
        Stmt::If(i) => {
            assert_eq!(i.condition, Condition::predicate(Predicate::IsOnGem));
            assert_eq!(i.consequent.len(), 1);
            assert!(i.alternate.is_none());
        }
        other => panic!("expected if, got {other:?}"),
    }
    assert!(prog.metadata.has_dynamic_control_flow);
    assert_eq!(prog.metadata.static_command_count, None);
}

#[test]
fn test_if_else() {
    let prog = parse_ok("if isBlocked {\n  turnLeft()\n} else {\n  moveForward()\n}");
    match &prog.main[0] {
        Stmt::If(i) => {
            let alternate = i.alternate.as_ref().expect("else branch");
            assert_eq!(command_of(&alternate[0]), Command::MoveForward);
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_else_if_chain_nests() {
    let src = "if isOnGem {\n collectGem()\n} else if isOnClosedSwitch {\n toggleSwitch()\n} else {\n moveForward()\n}";
    let prog = parse_ok(src);
    let Stmt::If(outer) = &prog.main[0] else {
        panic!("expected if");
    };
    let alternate = outer.alternate.as_ref().expect("else branch");
    assert_eq!(alternate.len(), 1);
    let Stmt::If(inner) = &alternate[0] else {
        panic!("expected nested if");
    };
    let expected = Condition::predicate(Predicate::IsOnClosedSwitch);
    assert_eq!(inner.condition, expected);
    assert_eq!(inner.source.line, 3);
    assert!(inner.alternate.is_some());
}

#[test]
fn test_keywords_are_case_insensitive() {
    let src = "IF isOnGem {\n collectGem()\n} ELSE {\n turnLeft()\n}\nWhile isOnGem { collectGem() }";
    let prog = parse_ok(src);
    assert_eq!(prog.main.len(), 2);
}

#[test]
fn test_else_without_block() {
    let err = parse_err("if isOnGem {\n collectGem()\n} else\nmoveForward()");
    assert_eq!(err.code, ErrorCode::DANGLING_ELSE);
    assert_eq!(err.line, Some(1));
}

#[test]
fn test_bare_else() {
    let err = parse_err("moveForward()\nelse {\n turnLeft()\n}");
    assert_eq!(err.code, ErrorCode::DANGLING_ELSE);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_bad_condition_is_wrapped() {
    let err = parse_err("if isHappy {\n moveForward()\n}");
    assert_eq!(err.code, ErrorCode::MALFORMED_CONDITION);
    assert_eq!(
        err.message,
        "cannot parse the if condition: unsupported condition: isHappy"
    );
    let err = parse_err("while isOnGem & isBlocked {\n moveForward()\n}");
    assert!(err.message.starts_with("cannot parse the while condition:"));
}

#[test]
fn test_while_condition_precedence() {
    let src = "while !isBlocked && (isOnGem || isOnSwitch) {\n moveForward()\n}";
    let prog = parse_ok(src);
    let Stmt::While(w) = &prog.main[0] else {
        panic!("expected while");
    };
    assert_eq!(
        format_condition(&w.condition),
        "!isBlocked && (isOnGem || isOnSwitch)"
    );
}

// ─────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_function_inlined_in_count() {
    let src = "func step() {\n moveForward()\n collectGem()\n}\nfor 3 times {\n step()\n}";
    let prog = parse_ok(src);
    assert_eq!(prog.metadata.static_command_count, Some(6));
    assert_eq!(prog.functions[0].source.text, "func step()");
}

#[test]
fn test_function_name_may_not_be_a_command() {
    let err = parse_err("func moveForward() {\n turnLeft()\n}\nmoveForward()");
    assert_eq!(err.code, ErrorCode::RESERVED_FUNCTION_NAME);
}

#[test]
fn test_duplicate_function() {
    let err = parse_err("func a() { turnLeft() }\nfunc a() { turnRight() }\na()");
    assert_eq!(err.code, ErrorCode::DUPLICATE_FUNCTION);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_nested_function() {
    let err = parse_err("for 2 times {\n func inner() { turnLeft() }\n}");
    assert_eq!(err.code, ErrorCode::NESTED_FUNCTION);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_malformed_function_header() {
    let err = parse_err("func hop(x) {\n moveForward()\n}\nhop()");
    assert_eq!(err.code, ErrorCode::MALFORMED_FUNCTION);
}

#[test]
fn test_only_functions_is_an_error() {
    let err = parse_err("func a() {\n moveForward()\n}");
    assert_eq!(err.code, ErrorCode::NO_MAIN_STATEMENTS);
}

#[test]
fn test_empty_script() {
    assert_eq!(parse_err("").code, ErrorCode::EMPTY_SCRIPT);
    let comments_only = parse_err("// nothing\n/* here */");
    assert_eq!(comments_only.code, ErrorCode::EMPTY_SCRIPT);
}

// ─────────────────────────────────────────────────────────────────────
// Call validation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_undefined_function() {
    let err = parse_err("moveForward()\nwander()");
    assert_eq!(err.code, ErrorCode::UNDEFINED_FUNCTION);
    assert_eq!(err.message, "call to undefined function: wander()");
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_direct_recursion_rejected() {
    let err = parse_err("func spin() {\n turnLeft()\n spin()\n}\nspin()");
    assert_eq!(err.code, ErrorCode::RECURSION_NOT_ALLOWED);
    assert_eq!(
        err.message,
        "recursive function calls are not supported: spin()"
    );
}

#[test]
fn test_indirect_recursion_rejected() {
    let src = "func a() { b() }\nfunc b() { c() }\nfunc c() { a() }\nturnLeft()";
    let err = parse_err(src);
    assert_eq!(err.code, ErrorCode::RECURSION_NOT_ALLOWED);
}

#[test]
fn test_recursion_through_conditional_rejected() {
    let err = parse_err("func a() {\n if isBlocked {\n  a()\n }\n}\na()");
    assert_eq!(err.code, ErrorCode::RECURSION_NOT_ALLOWED);
}

/// `f0` calls `f1` twice, `f1` calls `f2` twice, and so on down to a
/// function whose body is `leaf`.
fn doubling_chain(depth: u32, leaf: &str) -> String {
    let mut source = String::new();
    for i in 0..depth {
        let next = i + 1;
        source.push_str(&format!("func f{i}() {{\n f{next}()\n f{next}()\n}}\n"));
    }
    source.push_str(&format!("func f{depth}() {{\n {leaf}\n}}\nf0()"));
    source
}

#[test]
fn test_deep_doubling_call_chain_parses() {
    let prog = parse_ok(&doubling_chain(30, "moveForward()"));
    assert_eq!(prog.functions.len(), 31);
    assert_eq!(prog.metadata.static_command_count, Some(1 << 30));
    assert!(!prog.metadata.has_dynamic_control_flow);
}

#[test]
fn test_deep_doubling_call_chain_still_finds_recursion() {
    let err = parse_err(&doubling_chain(30, "f0()"));
    assert_eq!(err.code, ErrorCode::RECURSION_NOT_ALLOWED);
    assert_eq!(
        err.message,
        "recursive function calls are not supported: f0()"
    );
}

#[test]
fn test_deep_doubling_call_chain_with_conditional_leaf() {
    let prog = parse_ok(&doubling_chain(30, "if isOnGem {\n collectGem()\n }"));
    assert_eq!(prog.metadata.static_command_count, None);
    assert!(prog.metadata.has_dynamic_control_flow);
}

// ─────────────────────────────────────────────────────────────────────
// Metadata
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unreachable_conditional_keeps_static_count() {
    let src = "func unused() {\n if isOnGem {\n  collectGem()\n }\n}\nmoveForward()\nmoveForward()";
    let prog = parse_ok(src);
    assert_eq!(prog.metadata.static_command_count, Some(2));
    assert!(prog.metadata.has_dynamic_control_flow);
    assert_eq!(prog.metadata.command_count_label(), "2 commands");
}

#[test]
fn test_called_conditional_function_makes_count_variable() {
    let src = "func maybe() {\n if isOnGem { collectGem() }\n}\nmoveForward()\nmaybe()";
    let prog = parse_ok(src);
    assert_eq!(prog.metadata.static_command_count, None);
    assert!(prog.metadata.has_dynamic_control_flow);
    assert_eq!(
        prog.metadata.command_count_label(),
        "variable (conditional branches)"
    );
}

#[test]
fn test_command_count_label() {
    let one = parse_ok("moveForward()");
    assert_eq!(one.metadata.command_count_label(), "1 command");
    assert_eq!(
        parse_ok("for 4 times { turnLeft() }").metadata.command_count_label(),
        "4 commands"
    );
}

#[test]
fn test_program_serializes_with_kind_tags() {
    let src = "for 2 times {\n moveForward()\n}\nif !isBlocked {\n moveForward()\n}";
    let prog = parse_ok(src);
    let json = serde_json::to_value(&prog).unwrap();
    assert_eq!(json["main"][0]["kind"], "loop");
    assert_eq!(json["main"][0]["count"], 2);
    assert_eq!(json["main"][0]["body"][0]["type"], "moveForward");
    assert_eq!(json["main"][1]["kind"], "if");
    assert_eq!(json["main"][1]["condition"]["type"], "not");
    assert_eq!(json["metadata"]["hasDynamicControlFlow"], true);
    assert!(json["metadata"]["staticCommandCount"].is_null());
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let src = "func side() {\n for i in 1...3 { moveForward() }\n turnRight()\n}\nfor 4 times { side() }\nif isOnGem { collectGem() } else if isBlocked { turnLeft() }";
    let first = parse_commands(src).unwrap();
    for i in 0..100 {
        assert_eq!(
            first,
            parse_commands(src).unwrap(),
            "Determinism failure at iteration {i}"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────
// Condition round-trip
// ─────────────────────────────────────────────────────────────────────

/// Every condition tree up to `depth` over three predicates.
fn conditions(depth: u32) -> Vec<Condition> {
    let leaves = vec![
        Condition::predicate(Predicate::IsOnGem),
        Condition::predicate(Predicate::IsBlocked),
        Condition::predicate(Predicate::IsOnSwitch),
    ];
    if depth == 0 {
        return leaves;
    }
    let smaller = conditions(depth - 1);
    let mut out = leaves;
    for c in &smaller {
        out.push(Condition::not(c.clone()));
    }
    for left in &smaller {
        for right in &smaller {
            for op in [LogicalOp::And, LogicalOp::Or] {
                out.push(Condition::logical(op, left.clone(), right.clone()));
            }
        }
    }
    out
}

#[test]
fn test_condition_format_round_trip() {
    for condition in conditions(2) {
        let text = format_condition(&condition);
        let reparsed = gempath_parser::parse_condition(&text)
            .unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(reparsed, condition, "round trip failed for {text}");
    }
}
