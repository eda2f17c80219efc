//! Denial-constraint predicate model (C5).
//!
//! Grounded on `model::Predicate` / `model::ColumnOperand` / `model::DC` in
//! `examples/original_source/src/core/algorithms/dc/dc.{h,cpp}`. The
//! original ties an operand to one of two tuples (`t`/`s`) drawn from a
//! pairwise self-join; [`Tuple`] names that role directly instead of the
//! original's free-standing `t.`/`s.` string prefixes.

use crate::column::ColumnType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "==" => Operator::Eq,
            "!=" => Operator::Neq,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            _ => return None,
        })
    }

    /// Evaluate `lhs OP rhs` given a pre-computed ordering between them.
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match (self, ordering) {
            (Operator::Eq, Equal) => true,
            (Operator::Neq, Equal) => false,
            (Operator::Neq, _) => true,
            (Operator::Lt, Less) => true,
            (Operator::Le, Less | Equal) => true,
            (Operator::Gt, Greater) => true,
            (Operator::Ge, Greater | Equal) => true,
            _ => false,
        }
    }
}

/// Which tuple of the pairwise self-join a [`ColumnOperand`] draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tuple {
    T,
    S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOperand {
    pub tuple: Tuple,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub operator: Operator,
    pub left: ColumnOperand,
    pub right: ColumnOperand,
}

impl Predicate {
    /// Whether this predicate is a same-column equality between `t` and `s`
    /// (the shape a unique-column-combination check is built from).
    pub fn is_same_column_equality(&self) -> bool {
        self.operator == Operator::Eq && self.left.column == self.right.column
    }
}

/// A denial constraint: `!(p1 and p2 and ... and pn)`, read over every
/// ordered pair of distinct tuples `(t, s)` in a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenialConstraint {
    pub predicates: Vec<Predicate>,
}

impl DenialConstraint {
    /// Column indices appearing in a predicate with the given operator, on
    /// either side, deduplicated and ascending.
    pub fn column_indices_with_operator(&self, operator: Operator) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .predicates
            .iter()
            .filter(|p| p.operator == operator)
            .flat_map(|p| [p.left.column, p.right.column])
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Render as `"!(t.Col OP s.Col and ...)"`, resolving each operand's
    /// column index back to its name via `schema`. Round-trips with
    /// [`super::parser::parse`]: for canonically spaced input `s`,
    /// `parse(s, schema).render(schema) == s`.
    pub fn render(&self, schema: &[(String, ColumnType)]) -> String {
        let rendered: Vec<String> = self
            .predicates
            .iter()
            .map(|p| {
                format!(
                    "{}.{} {} {}.{}",
                    tuple_prefix(p.left.tuple),
                    schema[p.left.column].0,
                    p.operator.symbol(),
                    tuple_prefix(p.right.tuple),
                    schema[p.right.column].0
                )
            })
            .collect();
        format!("!({})", rendered.join(" and "))
    }
}

fn tuple_prefix(tuple: Tuple) -> &'static str {
    match tuple {
        Tuple::T => "t",
        Tuple::S => "s",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_holds() {
        use std::cmp::Ordering::*;
        assert!(Operator::Eq.holds(Equal));
        assert!(!Operator::Eq.holds(Less));
        assert!(Operator::Lt.holds(Less));
        assert!(Operator::Le.holds(Equal));
        assert!(Operator::Ge.holds(Greater));
        assert!(Operator::Neq.holds(Greater));
    }

    #[test]
    fn test_same_column_equality_shape() {
        let p = Predicate {
            operator: Operator::Eq,
            left: ColumnOperand { tuple: Tuple::T, column: 0 },
            right: ColumnOperand { tuple: Tuple::S, column: 0 },
        };
        assert!(p.is_same_column_equality());

        let q = Predicate {
            operator: Operator::Eq,
            left: ColumnOperand { tuple: Tuple::T, column: 0 },
            right: ColumnOperand { tuple: Tuple::S, column: 1 },
        };
        assert!(!q.is_same_column_equality());
    }

    #[test]
    fn test_column_indices_with_operator() {
        let dc = DenialConstraint {
            predicates: vec![
                Predicate {
                    operator: Operator::Eq,
                    left: ColumnOperand { tuple: Tuple::T, column: 1 },
                    right: ColumnOperand { tuple: Tuple::S, column: 1 },
                },
                Predicate {
                    operator: Operator::Eq,
                    left: ColumnOperand { tuple: Tuple::T, column: 0 },
                    right: ColumnOperand { tuple: Tuple::S, column: 0 },
                },
            ],
        };
        assert_eq!(dc.column_indices_with_operator(Operator::Eq), vec![0, 1]);
        assert!(dc.column_indices_with_operator(Operator::Lt).is_empty());
    }
}
