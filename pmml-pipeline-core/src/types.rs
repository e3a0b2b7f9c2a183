//! PMML vocabulary shared by descriptors, schema resolution and export.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Field typing ──

/// Operational type of a field (`optype` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Categorical,
    Ordinal,
    Continuous,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Categorical => "categorical",
            OpType::Ordinal => "ordinal",
            OpType::Continuous => "continuous",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data type of a field (`dataType` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Float,
    Double,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
        }
    }

    /// `true` for the data types whose values are compared with a tolerance.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model function (`functionName` attribute of a model element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiningFunction {
    Classification,
    Regression,
    Clustering,
    AssociationRules,
    Sequences,
    TimeSeries,
    Mixed,
}

impl MiningFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MiningFunction::Classification => "classification",
            MiningFunction::Regression => "regression",
            MiningFunction::Clustering => "clustering",
            MiningFunction::AssociationRules => "associationRules",
            MiningFunction::Sequences => "sequences",
            MiningFunction::TimeSeries => "timeSeries",
            MiningFunction::Mixed => "mixed",
        }
    }
}

impl fmt::Display for MiningFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Scalar values ──

/// A scalar as it appears in class lists and verification matrices.
///
/// Deserialization tries the variants in order, so `1` is an integer,
/// `1.5` a float and `"1"` a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Boolean,
            Value::Int(_) => DataType::Integer,
            Value::Float(_) => DataType::Double,
            Value::Str(_) => DataType::String,
        }
    }

    /// Render the value the way PMML expects it in `Value` elements and table cells.
    ///
    /// Whole floats drop their fractional part (`1.0` → `"1"`), non-finite floats
    /// use the PMML spellings `NaN`, `INF` and `-INF`.
    pub fn format(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => format_float(*x),
            Value::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

fn format_float(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x == f64::INFINITY {
        "INF".to_string()
    } else if x == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        // f64's Display never prints a trailing ".0"
        x.to_string()
    }
}

/// Infer the narrowest data type shared by all `values`.
///
/// Integers widen to double when mixed with floats. Any other mix, and an
/// empty slice, falls back to `default`.
pub fn common_data_type(values: &[Value], default: DataType) -> DataType {
    let mut result: Option<DataType> = None;
    for value in values {
        let data_type = value.data_type();
        result = match (result, data_type) {
            (None, dt) => Some(dt),
            (Some(a), b) if a == b => Some(a),
            (Some(DataType::Integer), DataType::Double)
            | (Some(DataType::Double), DataType::Integer) => Some(DataType::Double),
            _ => return default,
        };
    }
    result.unwrap_or(default)
}

/// Format class values into display category strings, preserving order.
pub fn format_categories(values: &[Value]) -> Vec<String> {
    values.iter().map(Value::format).collect()
}
