use gempath_types::ast::{Condition, LogicalOp, Predicate};

/// Evaluate a condition, resolving predicates through `lookup`.
///
/// `&&` and `||` short-circuit: the right operand's predicates are not
/// looked up when the left operand decides the result.
pub fn evaluate_condition<F>(condition: &Condition, lookup: &mut F) -> bool
where
    F: FnMut(Predicate) -> bool,
{
    match condition {
        Condition::Predicate { name } => lookup(*name),
        Condition::Not { operand } => !evaluate_condition(operand, lookup),
        Condition::Logical {
            operator: LogicalOp::And,
            left,
            right,
        } => evaluate_condition(left, lookup) && evaluate_condition(right, lookup),
        Condition::Logical {
            operator: LogicalOp::Or,
            left,
            right,
        } => evaluate_condition(left, lookup) || evaluate_condition(right, lookup),
    }
}
