//! Error code coverage tests: every defined error code (E100–E501) has at
//! least one input that produces it through the full pipeline.

use gempath_eval::SimulationConfig;
use gempath_map::MapOptions;
use gempath_playground::{validate, validate_with, ValidationReport};
use gempath_types::ErrorCode;

fn assert_code(report: &ValidationReport, expected: ErrorCode) {
    assert!(
        report.errors.iter().any(|e| e.code == expected),
        "expected error code {}, got: {:?}",
        expected,
        report
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
    );
}

fn assert_error(map: &str, script: &str, expected: ErrorCode) {
    assert_code(&validate(map, script), expected);
}

// ══════════════════════════════════════════════════════════════════════════════
// E1xx: map structure
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e100_empty_map() {
    assert_error("\n\n", "moveForward()", ErrorCode::EMPTY_MAP);
}

#[test]
fn e101_missing_start() {
    assert_error("止\t♦", "moveForward()", ErrorCode::MISSING_START);
}

#[test]
fn e102_unpaired_portal() {
    assert_error("→\tW3", "moveForward()", ErrorCode::UNPAIRED_PORTAL);
}

#[test]
fn e103_multiple_starts() {
    assert_error("→\t←", "moveForward()", ErrorCode::MULTIPLE_STARTS);
}

#[test]
fn e104_invalid_portal_id() {
    assert_error(
        "→\tW5000000000\tW5000000000",
        "moveForward()",
        ErrorCode::INVALID_PORTAL_ID,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// E2xx: script syntax
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e200_empty_script() {
    // comments only
    assert_error(
        "→",
        "// nothing yet\n/* still nothing */",
        ErrorCode::EMPTY_SCRIPT,
    );
}

#[test]
fn e201_unknown_statement() {
    assert_error("→", "jump", ErrorCode::UNKNOWN_STATEMENT);
}

#[test]
fn e202_expected_block() {
    assert_error("→", "for 3 times\nmoveForward()", ErrorCode::EXPECTED_BLOCK);
}

#[test]
fn e203_unclosed_block() {
    assert_error(
        "→",
        "for 3 times {\nmoveForward()",
        ErrorCode::UNCLOSED_BLOCK,
    );
}

#[test]
fn e204_malformed_loop() {
    assert_error("→", "for ever {\n}", ErrorCode::MALFORMED_LOOP);
}

#[test]
fn e205_invalid_loop_range() {
    assert_error(
        "→",
        "for 0 times {\n turnLeft()\n}",
        ErrorCode::INVALID_LOOP_RANGE,
    );
    assert_error(
        "→",
        "for i in 3..<3 {\n turnLeft()\n}",
        ErrorCode::INVALID_LOOP_RANGE,
    );
}

#[test]
fn e206_malformed_condition() {
    assert_error("→", "if isHappy {\n}", ErrorCode::MALFORMED_CONDITION);
}

#[test]
fn e207_malformed_function() {
    assert_error(
        "→",
        "func 1bad() {\n}\nturnLeft()",
        ErrorCode::MALFORMED_FUNCTION,
    );
}

#[test]
fn e208_nested_function() {
    assert_error(
        "→",
        "for 2 times {\n func a() {\n }\n}",
        ErrorCode::NESTED_FUNCTION,
    );
}

#[test]
fn e209_duplicate_function() {
    assert_error(
        "→",
        "func a() {\n}\nfunc a() {\n}\na()",
        ErrorCode::DUPLICATE_FUNCTION,
    );
}

#[test]
fn e210_reserved_function_name() {
    assert_error(
        "→",
        "func turnLeft() {\n}\nturnLeft()",
        ErrorCode::RESERVED_FUNCTION_NAME,
    );
}

#[test]
fn e211_dangling_else() {
    assert_error("→", "else {\n}", ErrorCode::DANGLING_ELSE);
}

#[test]
fn e212_no_main_statements() {
    assert_error(
        "→",
        "func a() {\n turnLeft()\n}",
        ErrorCode::NO_MAIN_STATEMENTS,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// E3xx: script semantics
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e300_undefined_function() {
    assert_error("→", "jump()", ErrorCode::UNDEFINED_FUNCTION);
}

#[test]
fn e301_recursion_not_allowed() {
    assert_error(
        "→",
        "func a() {\n a()\n}\na()",
        ErrorCode::RECURSION_NOT_ALLOWED,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// E4xx: runtime
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e400_out_of_bounds() {
    assert_error("→", "moveForward()", ErrorCode::OUT_OF_BOUNDS);
}

#[test]
fn e401_wall_collision() {
    assert_error("止\t←", "moveForward()", ErrorCode::WALL_COLLISION);
}

#[test]
fn e402_no_gem() {
    assert_error("→", "collectGem()", ErrorCode::NO_GEM);
}

#[test]
fn e403_no_switch() {
    assert_error("→", "toggleSwitch()", ErrorCode::NO_SWITCH);
}

#[test]
fn e404_unresolved_portal() {
    let options = MapOptions {
        allow_unpaired_portals: true,
        ..MapOptions::default()
    };
    let report = validate_with(
        "→\tW3",
        "moveForward()",
        &options,
        &SimulationConfig::default(),
    );
    assert_code(&report, ErrorCode::UNRESOLVED_PORTAL);
}

#[test]
fn e405_budget_exceeded() {
    assert_error("→", "while !isOnGem {\n}", ErrorCode::BUDGET_EXCEEDED);
}

#[test]
fn e406_while_limit_exceeded() {
    let config = SimulationConfig::default().with_while_iteration_limit(3);
    let report = validate_with(
        "→",
        "while !isOnGem {\n turnLeft()\n}",
        &MapOptions::default(),
        &config,
    );
    assert_code(&report, ErrorCode::WHILE_LIMIT_EXCEEDED);
}

// ══════════════════════════════════════════════════════════════════════════════
// E5xx: postconditions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e500_gems_remaining() {
    assert_error("→\t♦", "turnLeft()", ErrorCode::GEMS_REMAINING);
}

#[test]
fn e501_switches_not_open() {
    assert_error("→\t●", "turnLeft()", ErrorCode::SWITCHES_NOT_OPEN);
}
