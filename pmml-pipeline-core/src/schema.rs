//! Resolved model inputs (features) and target (label).

use crate::pmml::DataField;
use crate::types::{DataType, OpType};

/// How a feature came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureOrigin {
    /// Placeholder bound directly to a data field.
    Wildcard,
    /// Produced by a transformer's encoding.
    Derived,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub op_type: OpType,
    pub data_type: DataType,
    pub origin: FeatureOrigin,
}

impl Feature {
    pub fn wildcard(field: &DataField) -> Self {
        Self {
            name: field.name.clone(),
            op_type: field.op_type,
            data_type: field.data_type,
            origin: FeatureOrigin::Wildcard,
        }
    }

    pub fn derived(name: impl Into<String>, op_type: OpType, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            op_type,
            data_type,
            origin: FeatureOrigin::Derived,
        }
    }
}

/// Supervised target description.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Categorical {
        field: String,
        data_type: DataType,
        values: Vec<String>,
    },
    Continuous {
        field: String,
        data_type: DataType,
    },
}

impl Label {
    pub fn categorical(field: &DataField) -> Self {
        Label::Categorical {
            field: field.name.clone(),
            data_type: field.data_type,
            values: field.values.clone(),
        }
    }

    pub fn continuous(field: &DataField) -> Self {
        Label::Continuous {
            field: field.name.clone(),
            data_type: field.data_type,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Label::Categorical { field, .. } | Label::Continuous { field, .. } => field,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Label::Categorical { data_type, .. } | Label::Continuous { data_type, .. } => {
                *data_type
            }
        }
    }

    /// Category values in model order; `None` for continuous labels.
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Label::Categorical { values, .. } => Some(values),
            Label::Continuous { .. } => None,
        }
    }
}

/// What a model encoder receives: the optional label and ordered features.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub label: Option<Label>,
    pub features: Vec<Feature>,
}

impl Schema {
    pub fn new(label: Option<Label>, features: Vec<Feature>) -> Self {
        Self { label, features }
    }
}
