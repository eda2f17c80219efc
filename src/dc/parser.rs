//! Denial-constraint string grammar (C5).
//!
//! Grounded on `DCVerification::ParseDCString` in
//! `examples/original_source/src/core/algorithms/dc/dc_verification.cpp`,
//! which the project's own test suite exercises with strings like
//! `"!(t.Col0 == s.Col0 and t.Col1 == s.Col1)"`
//! (`examples/original_source/src/tests/test_dc_verification.cpp`). The
//! original tokenizes with `boost::split`; this ports the same two-level
//! split (predicates on `"and"`, each predicate on whitespace) without
//! pulling in a parser-combinator crate the teacher doesn't use.

use super::model::{ColumnOperand, DenialConstraint, Operator, Predicate, Tuple};
use crate::column::ColumnType;
use crate::errors::{MiningError, Result};

/// Parse a denial constraint of the form
/// `!(t.Col0 == s.Col0 and t.Col1 != s.Col1 and ...)`, resolving column
/// names against `schema`.
///
/// Fails with [`MiningError::ParseError`] on malformed syntax, or
/// [`MiningError::UnknownColumn`] if a referenced column isn't in `schema`.
pub fn parse(input: &str, schema: &[(String, ColumnType)]) -> Result<DenialConstraint> {
    let body = strip_outer_negation(input)?;

    let predicates = body
        .split(" and ")
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| parse_predicate(clause, schema))
        .collect::<Result<Vec<_>>>()?;

    if predicates.is_empty() {
        return Err(MiningError::ParseError(
            "denial constraint has no predicates".to_string(),
        ));
    }

    Ok(DenialConstraint { predicates })
}

fn strip_outer_negation(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    let without_bang = trimmed
        .strip_prefix('!')
        .ok_or_else(|| MiningError::ParseError(format!("expected a leading '!', got {input:?}")))?
        .trim();
    let inner = without_bang
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            MiningError::ParseError(format!("expected parentheses around predicates, got {input:?}"))
        })?;
    Ok(inner)
}

fn parse_predicate(clause: &str, schema: &[(String, ColumnType)]) -> Result<Predicate> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    let [left_ref, op_sym, right_ref] = tokens[..] else {
        return Err(MiningError::ParseError(format!(
            "expected '<tuple>.<column> <op> <tuple>.<column>', got {clause:?}"
        )));
    };

    let operator = Operator::from_symbol(op_sym)
        .ok_or_else(|| MiningError::ParseError(format!("unknown operator {op_sym:?}")))?;
    let left = parse_operand(left_ref, schema)?;
    let right = parse_operand(right_ref, schema)?;

    Ok(Predicate { operator, left, right })
}

fn parse_operand(reference: &str, schema: &[(String, ColumnType)]) -> Result<ColumnOperand> {
    let (prefix, column_name) = reference.split_once('.').ok_or_else(|| {
        MiningError::ParseError(format!(
            "expected '<tuple>.<column>', got {reference:?}"
        ))
    })?;

    let tuple = match prefix {
        "t" => Tuple::T,
        "s" => Tuple::S,
        other => {
            return Err(MiningError::ParseError(format!(
                "expected tuple reference 't' or 's', got {other:?}"
            )))
        }
    };

    let column = schema
        .iter()
        .position(|(name, _)| name == column_name)
        .ok_or_else(|| MiningError::UnknownColumn(column_name.to_string()))?;

    Ok(ColumnOperand { tuple, column })
}
