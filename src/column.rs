//! The typed column store (C4): schema-tagged, nullable columns with exact
//! comparison and hashing, feeding the denial-constraint verifier.
//!
//! Grounded on `model::TypedColumnData` / `model::Type` in
//! `examples/original_source/src/core/algorithms/dc/dc_verification.{h,cpp}`
//! (`GetValue`, `GetComparator`, `GetHasher`, `IsNumeric`). The original
//! exposes `std::byte const*` handles into untyped column storage; this
//! reinterprets the same contract in safe Rust by keeping the handle opaque
//! through the API (`Value`) rather than through pointer erasure.

use crate::errors::{MiningError, Result};
use ahash::AHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Double,
    Str,
}

/// A single cell's value, already parsed to its column's declared type.
/// `Null` represents an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Double(f64),
    Str(&'a str),
    Null,
}

impl Value<'_> {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Three-way comparison with numeric promotion (int widens to double);
    /// strings compare lexicographically. Fails with
    /// [`MiningError::UnsupportedTypes`] comparing a string to a number, or
    /// either side being null.
    pub fn compare(&self, other: &Value<'_>) -> Result<std::cmp::Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_f64().unwrap(), b.as_f64().unwrap());
                x.partial_cmp(&y).ok_or_else(|| {
                    MiningError::UnsupportedTypes("NaN is not orderable".to_string())
                })
            }
            (Value::Null, _) | (_, Value::Null) => Err(MiningError::UnsupportedTypes(
                "cannot compare a null value".to_string(),
            )),
            _ => Err(MiningError::UnsupportedTypes(
                "cannot compare values of incompatible column types".to_string(),
            )),
        }
    }

    /// Hash the value for composite-key grouping. Int and Double that
    /// represent the same number hash identically, matching `compare`'s
    /// numeric-promotion equality.
    pub fn hash_into(&self, hasher: &mut AHasher) {
        match self {
            Value::Int(i) => (*i as f64).to_bits().hash(hasher),
            Value::Double(d) => d.to_bits().hash(hasher),
            Value::Str(s) => s.hash(hasher),
            Value::Null => 0u8.hash(hasher),
        }
    }
}

/// One schema-tagged column: a name, a declared type, and one optional raw
/// cell string per row (parsed lazily on read, matching the original's
/// opaque-handle-per-row layout).
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    ty: ColumnType,
    cells: Vec<Option<String>>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ColumnType {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The value at `row`, parsed to this column's type. An empty cell
    /// yields [`Value::Null`].
    pub fn value_at(&self, row: usize) -> Result<Value<'_>> {
        match &self.cells[row] {
            None => Ok(Value::Null),
            Some(raw) => parse_value(raw, self.ty),
        }
    }
}

fn parse_value(raw: &str, ty: ColumnType) -> Result<Value<'_>> {
    match ty {
        ColumnType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| {
            MiningError::InvalidConfig(format!("expected an integer, got {raw:?}"))
        }),
        ColumnType::Double => raw.parse::<f64>().map(Value::Double).map_err(|_| {
            MiningError::InvalidConfig(format!("expected a floating-point number, got {raw:?}"))
        }),
        ColumnType::Str => Ok(Value::Str(raw)),
    }
}

/// An in-memory, column-major relation built from pre-tokenized rows and an
/// explicit schema (tabular ingestion is out of scope for this crate).
#[derive(Debug, Clone)]
pub struct TypedRelation {
    columns: Vec<Column>,
    num_rows: usize,
}

impl TypedRelation {
    /// Build a relation from `rows` (each the same width as `schema`) and
    /// `schema` (column name, declared type), parsing eagerly so malformed
    /// cells are reported at load time rather than at verification time.
    ///
    /// Fails with [`MiningError::EmptyInput`] if `schema` is empty, or
    /// [`MiningError::InvalidConfig`] if a row's width disagrees with the
    /// schema or a cell cannot be parsed as its column's declared type.
    pub fn from_rows<R, T>(rows: R, schema: &[(String, ColumnType)]) -> Result<Self>
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        if schema.is_empty() {
            return Err(MiningError::EmptyInput("schema has no columns".to_string()));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); schema.len()];
        let mut num_rows = 0usize;

        for row in rows {
            let row: Vec<String> = row.into_iter().collect();
            if row.len() != schema.len() {
                return Err(MiningError::InvalidConfig(format!(
                    "row has {} cells, schema declares {}",
                    row.len(),
                    schema.len()
                )));
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                let value = if cell.is_empty() { None } else { Some(cell) };
                // Validate eagerly; parsed value itself is recomputed on read.
                if let Some(raw) = &value {
                    parse_value(raw, schema[col_idx].1)?;
                }
                cells[col_idx].push(value);
            }
            num_rows += 1;
        }

        let columns = schema
            .iter()
            .zip(cells)
            .map(|((name, ty), cells)| Column {
                name: name.clone(),
                ty: *ty,
                cells,
            })
            .collect();

        Ok(Self { columns, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<(String, ColumnType)> {
        vec![
            ("Col0".to_string(), ColumnType::Int),
            ("Col1".to_string(), ColumnType::Str),
        ]
    }

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_schema_fails() {
        let rows: Vec<Vec<String>> = vec![vec!["1".to_string()]];
        let err = TypedRelation::from_rows(rows, &[]).unwrap_err();
        assert!(matches!(err, MiningError::EmptyInput(_)));
    }

    #[test]
    fn test_row_width_mismatch_fails() {
        let rows = vec![vec!["1".to_string()]];
        let err = TypedRelation::from_rows(rows, &schema()).unwrap_err();
        assert!(matches!(err, MiningError::InvalidConfig(_)));
    }

    #[test]
    fn test_parses_typed_cells_and_nulls() {
        let relation = TypedRelation::from_rows(rows(&[&["1", "a"], &["", "b"]]), &schema()).unwrap();
        assert_eq!(relation.num_rows(), 2);
        let col0 = relation.column(0).unwrap();
        assert_eq!(col0.value_at(0).unwrap(), Value::Int(1));
        assert_eq!(col0.value_at(1).unwrap(), Value::Null);
    }

    #[test]
    fn test_malformed_cell_fails_at_load() {
        let rows = vec![vec!["not-an-int".to_string(), "a".to_string()]];
        let err = TypedRelation::from_rows(rows, &schema()).unwrap_err();
        assert!(matches!(err, MiningError::InvalidConfig(_)));
    }

    #[test]
    fn test_numeric_promotion_compares_equal() {
        let a = Value::Int(3);
        let b = Value::Double(3.0);
        assert_eq!(a.compare(&b).unwrap(), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_string_vs_numeric_is_unsupported() {
        let a = Value::Int(3);
        let b = Value::Str("3");
        assert!(matches!(a.compare(&b), Err(MiningError::UnsupportedTypes(_))));
    }

    #[test]
    fn test_column_index_lookup() {
        let relation = TypedRelation::from_rows(rows(&[&["1", "a"]]), &schema()).unwrap();
        assert_eq!(relation.column_index("Col1"), Some(1));
        assert_eq!(relation.column_index("Nope"), None);
    }
}
