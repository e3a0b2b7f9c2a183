//! Row-major value matrices used by verification data.
//!
//! Decoded from the ndarray-like form `{ shape: [rows, cols], data: [...] }`.
//! A one-dimensional shape `[n]` is read as an `n × 1` column vector.

use crate::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("Matrix of shape {rows}x{columns} needs {expected} cells, got {actual}")]
    DataLength {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Matrix shape {rows}x{columns} is too large")]
    ShapeOverflow { rows: usize, columns: usize },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported matrix rank {0}, expected 1 or 2")]
    UnsupportedRank(usize),
}

/// Dense matrix of nullable cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct ValueMatrix {
    rows: usize,
    columns: usize,
    data: Vec<Option<Value>>,
}

impl ValueMatrix {
    pub fn new(rows: usize, columns: usize, data: Vec<Option<Value>>) -> Result<Self, MatrixError> {
        let expected = rows
            .checked_mul(columns)
            .ok_or(MatrixError::ShapeOverflow { rows, columns })?;
        if data.len() != expected {
            return Err(MatrixError::DataLength {
                rows,
                columns,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Build from nested rows; every row must have the width of the first one.
    pub fn from_rows(rows: Vec<Vec<Option<Value>>>) -> Result<Self, MatrixError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        let row_count = rows.len();
        let mut data = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(MatrixError::RaggedRow {
                    row: i,
                    expected: columns,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Self::new(row_count, columns, data)
    }

    /// Column vector from a flat list of cells.
    pub fn column_vector(cells: Vec<Option<Value>>) -> Self {
        Self {
            rows: cells.len(),
            columns: 1,
            data: cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Cell at `(row, column)`; `None` when null or out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.data[row * self.columns + column].as_ref()
    }
}

// ── Serde representation ──

#[derive(Serialize, Deserialize)]
struct RawMatrix {
    shape: Vec<usize>,
    data: Vec<Option<Value>>,
}

impl TryFrom<RawMatrix> for ValueMatrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        match raw.shape.as_slice() {
            [rows] => ValueMatrix::new(*rows, 1, raw.data),
            [rows, columns] => ValueMatrix::new(*rows, *columns, raw.data),
            other => Err(MatrixError::UnsupportedRank(other.len())),
        }
    }
}

impl From<ValueMatrix> for RawMatrix {
    fn from(matrix: ValueMatrix) -> Self {
        RawMatrix {
            shape: vec![matrix.rows, matrix.columns],
            data: matrix.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[i64]) -> Vec<Option<Value>> {
        values.iter().map(|v| Some(Value::Int(*v))).collect()
    }

    #[test]
    fn test_row_major_access() {
        let m = ValueMatrix::new(2, 3, cells(&[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(0, 2), Some(&Value::Int(3)));
        assert_eq!(m.get(1, 0), Some(&Value::Int(4)));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_rejects_wrong_data_length() {
        let err = ValueMatrix::new(2, 2, cells(&[1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DataLength {
                rows: 2,
                columns: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = ValueMatrix::from_rows(vec![cells(&[1, 2]), cells(&[3])]).unwrap_err();
        assert!(matches!(err, MatrixError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn test_deserialize_with_nulls_and_vector_shape() {
        let m: ValueMatrix =
            serde_json::from_str(r#"{"shape": [2, 2], "data": [1.5, null, 3, "a"]}"#).unwrap();
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 1), Some(&Value::from("a")));

        let v: ValueMatrix = serde_json::from_str(r#"{"shape": [3], "data": [0, 1, 0]}"#).unwrap();
        assert_eq!(v.shape(), (3, 1));

        let bad = serde_json::from_str::<ValueMatrix>(r#"{"shape": [2, 2], "data": [1]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_oversized_shape_is_an_error() {
        let err = ValueMatrix::new(usize::MAX, 2, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            MatrixError::ShapeOverflow {
                rows: usize::MAX,
                columns: 2
            }
        );

        let json = format!(r#"{{"shape": [{0}, {0}], "data": []}}"#, 1u64 << 32);
        let err = serde_json::from_str::<ValueMatrix>(&json).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
