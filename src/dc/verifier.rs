//! Denial-constraint verification (C6): shape classification plus three
//! strategies ranging from O(R) (all-equality / UCC) to O(R) with grouped
//! min/max tracking (one inequality) to O(R^2) pairwise scanning (general).
//!
//! Grounded on `DCVerification::{CheckAllEquality, CheckOneInequality,
//! VerifyAllEquality, VerifyOneInequality, VerifyDC}` in
//! `examples/original_source/src/core/algorithms/dc/dc_verification.cpp`.
//! The original's `VerifyDC` (general case) is a `return true;` stub; this
//! implements the real O(R^2) pairwise scan instead, per the design doc's
//! open-question resolution.

use super::model::{ColumnOperand, DenialConstraint, Operator, Predicate, Tuple};
use crate::column::{TypedRelation, Value};
use crate::errors::{MiningError, Result};
use ahash::AHasher;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    AllEquality,
    OneInequality,
    General,
}

fn classify(dc: &DenialConstraint) -> Shape {
    if dc.predicates.iter().all(Predicate::is_same_column_equality) {
        return Shape::AllEquality;
    }

    let mut equality_count = 0usize;
    let mut inequality_count = 0usize;
    for predicate in &dc.predicates {
        if predicate.is_same_column_equality() {
            equality_count += 1;
        } else if !matches!(predicate.operator, Operator::Eq | Operator::Neq) {
            inequality_count += 1;
        }
    }

    if equality_count + inequality_count == dc.predicates.len() && inequality_count == 1 {
        Shape::OneInequality
    } else {
        Shape::General
    }
}

/// Whether `relation` satisfies `dc`: no pair of distinct tuples makes every
/// predicate hold simultaneously. `should_stop` is polled once per row (or,
/// for the general shape, once per outer-loop row) and aborts the scan with
/// [`MiningError::Cancelled`].
pub fn verify(dc: &DenialConstraint, relation: &TypedRelation, should_stop: &dyn Fn() -> bool) -> Result<bool> {
    match classify(dc) {
        Shape::AllEquality => verify_all_equality(dc, relation, should_stop),
        Shape::OneInequality => verify_one_inequality(dc, relation, should_stop),
        Shape::General => verify_general(dc, relation, should_stop),
    }
}

fn composite_key(relation: &TypedRelation, columns: &[usize], row: usize) -> Result<u64> {
    let mut hasher = AHasher::default();
    for &col in columns {
        relation.column(col).unwrap().value_at(row)?.hash_into(&mut hasher);
    }
    Ok(hasher.finish())
}

fn values_equal(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => matches!(a.compare(b), Ok(Ordering::Equal)),
    }
}

fn composite_equal(relation: &TypedRelation, columns: &[usize], a: usize, b: usize) -> Result<bool> {
    for &col in columns {
        let col = relation.column(col).unwrap();
        if !values_equal(&col.value_at(a)?, &col.value_at(b)?) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Unique-column-combination check: the constrained columns must not repeat
/// across any two rows.
fn verify_all_equality(
    dc: &DenialConstraint,
    relation: &TypedRelation,
    should_stop: &dyn Fn() -> bool,
) -> Result<bool> {
    let columns = dc.column_indices_with_operator(Operator::Eq);
    let mut seen: HashMap<u64, Vec<usize>> = HashMap::new();

    for row in 0..relation.num_rows() {
        if should_stop() {
            return Err(MiningError::Cancelled);
        }
        let key = composite_key(relation, &columns, row)?;
        if let Some(bucket) = seen.get(&key) {
            for &other in bucket {
                if composite_equal(relation, &columns, row, other)? {
                    return Ok(false);
                }
            }
        }
        seen.entry(key).or_default().push(row);
    }

    Ok(true)
}

fn operand_value<'r>(relation: &'r TypedRelation, operand: &ColumnOperand, t_row: usize, s_row: usize) -> Result<Value<'r>> {
    let row = match operand.tuple {
        Tuple::T => t_row,
        Tuple::S => s_row,
    };
    relation.column(operand.column).unwrap().value_at(row)
}

/// Whether every predicate in `dc` holds for tuple pair `(t_row, s_row)`.
/// A predicate touching a null cell, or comparing incompatible column
/// types, is treated as not holding (three-valued-logic "unknown" collapses
/// to false for this existential check).
fn predicate_set_holds(dc: &DenialConstraint, relation: &TypedRelation, t_row: usize, s_row: usize) -> Result<bool> {
    for predicate in &dc.predicates {
        let left = operand_value(relation, &predicate.left, t_row, s_row)?;
        let right = operand_value(relation, &predicate.right, t_row, s_row)?;
        let holds = match left.compare(&right) {
            Ok(ordering) => predicate.operator.holds(ordering),
            Err(_) => false,
        };
        if !holds {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Pairwise O(R^2) scan: a constraint is violated the moment some ordered
/// pair of distinct tuples satisfies every predicate.
fn verify_general(
    dc: &DenialConstraint,
    relation: &TypedRelation,
    should_stop: &dyn Fn() -> bool,
) -> Result<bool> {
    let n = relation.num_rows();
    for t_row in 0..n {
        if should_stop() {
            return Err(MiningError::Cancelled);
        }
        for s_row in 0..n {
            if t_row == s_row {
                continue;
            }
            if predicate_set_holds(dc, relation, t_row, s_row)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Groups rows by their same-column-equality key, then tracks the running
/// min/max of the single inequality predicate's two operand columns within
/// each group; a new row violates the constraint if it falls within the
/// inequality's range against the group's existing extremes, or vice versa.
fn verify_one_inequality(
    dc: &DenialConstraint,
    relation: &TypedRelation,
    should_stop: &dyn Fn() -> bool,
) -> Result<bool> {
    let equality_columns = dc.column_indices_with_operator(Operator::Eq);
    let inequality_predicate = dc
        .predicates
        .iter()
        .find(|p| !p.is_same_column_equality() && !matches!(p.operator, Operator::Eq | Operator::Neq))
        .expect("OneInequality shape guarantees exactly one such predicate");

    let col_a = inequality_predicate.left.column;
    let col_b = inequality_predicate.right.column;
    let operator = inequality_predicate.operator;

    struct GroupExtrema<'r> {
        min_a: Value<'r>,
        max_a: Value<'r>,
        min_b: Value<'r>,
        max_b: Value<'r>,
    }

    let mut groups: HashMap<u64, GroupExtrema<'_>> = HashMap::new();

    for row in 0..relation.num_rows() {
        if should_stop() {
            return Err(MiningError::Cancelled);
        }
        let key = composite_key(relation, &equality_columns, row)?;
        let value_a = relation.column(col_a).unwrap().value_at(row)?;
        let value_b = relation.column(col_b).unwrap().value_at(row)?;

        if let Some(extrema) = groups.get(&key) {
            let violated = match operator {
                Operator::Lt | Operator::Le => {
                    less_than_or_eq(&extrema.min_a, &value_b, operator)
                        || less_than_or_eq(&value_a, &extrema.max_b, operator)
                }
                Operator::Gt | Operator::Ge => {
                    greater_than_or_eq(&extrema.max_a, &value_b, operator)
                        || greater_than_or_eq(&value_a, &extrema.min_b, operator)
                }
                Operator::Eq | Operator::Neq => unreachable!("excluded by shape classification"),
            };
            if violated {
                return Ok(false);
            }

            let min_a = min_value(extrema.min_a.clone(), value_a.clone());
            let max_a = max_value(extrema.max_a.clone(), value_a.clone());
            let min_b = min_value(extrema.min_b.clone(), value_b.clone());
            let max_b = max_value(extrema.max_b.clone(), value_b.clone());
            groups.insert(
                key,
                GroupExtrema { min_a, max_a, min_b, max_b },
            );
        } else {
            groups.insert(
                key,
                GroupExtrema {
                    min_a: value_a.clone(),
                    max_a: value_a,
                    min_b: value_b.clone(),
                    max_b: value_b,
                },
            );
        }
    }

    Ok(true)
}

fn less_than_or_eq(a: &Value<'_>, b: &Value<'_>, operator: Operator) -> bool {
    match a.compare(b) {
        Ok(ordering) => operator.holds(ordering),
        Err(_) => false,
    }
}

fn greater_than_or_eq(a: &Value<'_>, b: &Value<'_>, operator: Operator) -> bool {
    match a.compare(b) {
        Ok(ordering) => operator.holds(ordering),
        Err(_) => false,
    }
}

fn min_value<'r>(a: Value<'r>, b: Value<'r>) -> Value<'r> {
    match a.compare(&b) {
        Ok(Ordering::Greater) => b,
        _ => a,
    }
}

fn max_value<'r>(a: Value<'r>, b: Value<'r>) -> Value<'r> {
    match a.compare(&b) {
        Ok(Ordering::Less) => b,
        _ => a,
    }
}
