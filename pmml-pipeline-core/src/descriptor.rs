//! Typed pipeline descriptors: transformer steps, the final estimator and verification data.

use crate::matrix::ValueMatrix;
use crate::types::{DataType, MiningFunction, OpType, Value};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ── Helper defaults for serde ──

fn default_op_type() -> OpType {
    OpType::Continuous
}

fn default_data_type() -> DataType {
    DataType::Double
}

fn default_tolerance() -> f64 {
    1e-13
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Input arity as declared by the fitted object; negative means unknown.
fn de_arity<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<i64> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|n| usize::try_from(n).ok()))
}

// ── Top-level descriptor ──

/// A trained pipeline: transformers in application order, then one estimator.
///
/// Recognized pipeline attributes are `active_fields`, `target_fields`
/// (or the legacy `target_field`), `repr_` and `verification`; unknown keys
/// are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformers: Vec<TransformerDescriptor>,
    pub estimator: EstimatorDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fields: Option<Vec<String>>,
    /// Single-name form written by older exporters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field: Option<String>,
    #[serde(default, rename = "repr_", skip_serializing_if = "Option::is_none")]
    pub repr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

impl PipelineDescriptor {
    pub fn new(estimator: EstimatorDescriptor) -> Self {
        Self {
            transformers: Vec::new(),
            estimator,
            active_fields: None,
            target_fields: None,
            target_field: None,
            repr: None,
            verification: None,
        }
    }

    pub fn with_transformer(mut self, transformer: TransformerDescriptor) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn with_active_fields(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.active_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_target_fields(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.repr = Some(repr.into());
        self
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = Some(verification);
        self
    }

    /// Target field names in effect.
    ///
    /// The legacy singular `target_field` wins over `target_fields`; `None`
    /// when neither is set.
    pub fn resolved_target_fields(&self) -> Option<Vec<String>> {
        if let Some(name) = &self.target_field {
            return Some(vec![name.clone()]);
        }
        self.target_fields.clone()
    }

    /// The step that receives raw input: the first transformer, or the
    /// estimator when there are none.
    pub fn head(&self) -> StepRef<'_> {
        match self.transformers.first() {
            Some(t) => StepRef::Transformer(t),
            None => StepRef::Estimator(&self.estimator),
        }
    }
}

/// Borrowed view of either kind of pipeline step.
#[derive(Debug, Clone, Copy)]
pub enum StepRef<'a> {
    Transformer(&'a TransformerDescriptor),
    Estimator(&'a EstimatorDescriptor),
}

impl StepRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            StepRef::Transformer(t) => &t.name,
            StepRef::Estimator(e) => &e.name,
        }
    }

    pub fn n_features(&self) -> Option<usize> {
        match self {
            StepRef::Transformer(t) => t.n_features,
            StepRef::Estimator(e) => e.n_features,
        }
    }
}

// ── Transformer ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerDescriptor {
    pub name: String,
    /// Encoder registry key, e.g. `sklearn.preprocessing.StandardScaler`.
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "de_arity",
        skip_serializing_if = "Option::is_none"
    )]
    pub n_features: Option<usize>,
    #[serde(default = "default_op_type")]
    pub op_type: OpType,
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    /// Creates its own input fields instead of consuming active fields.
    #[serde(default, skip_serializing_if = "is_false")]
    pub initializer: bool,
    /// Fitted state, interpreted only by the step's encoder.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl TransformerDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            n_features: None,
            op_type: default_op_type(),
            data_type: default_data_type(),
            initializer: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_n_features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }

    pub fn with_types(mut self, op_type: OpType, data_type: DataType) -> Self {
        self.op_type = op_type;
        self.data_type = data_type;
        self
    }

    pub fn as_initializer(mut self) -> Self {
        self.initializer = true;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

// ── Estimator ──

/// What the final step can do, fixed when the descriptor is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorKind {
    Regressor,
    Classifier {
        classes: Vec<Value>,
        /// Exposes a class probability distribution.
        #[serde(default)]
        probability: bool,
    },
    Clusterer,
    Custom {
        mining_function: MiningFunction,
        #[serde(default)]
        supervised: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorDescriptor {
    pub name: String,
    pub kind: String,
    /// Declared input arity, also the required resolved feature count.
    #[serde(
        default,
        deserialize_with = "de_arity",
        skip_serializing_if = "Option::is_none"
    )]
    pub n_features: Option<usize>,
    #[serde(default = "default_op_type")]
    pub op_type: OpType,
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    pub capability: EstimatorKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl EstimatorDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, capability: EstimatorKind) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            n_features: None,
            op_type: default_op_type(),
            data_type: default_data_type(),
            capability,
            attributes: BTreeMap::new(),
        }
    }

    pub fn regressor(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(name, kind, EstimatorKind::Regressor)
    }

    pub fn classifier(
        name: impl Into<String>,
        kind: impl Into<String>,
        classes: impl IntoIterator<Item = impl Into<Value>>,
        probability: bool,
    ) -> Self {
        let classes = classes.into_iter().map(Into::into).collect();
        Self::new(
            name,
            kind,
            EstimatorKind::Classifier {
                classes,
                probability,
            },
        )
    }

    pub fn with_n_features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }

    pub fn with_types(mut self, op_type: OpType, data_type: DataType) -> Self {
        self.op_type = op_type;
        self.data_type = data_type;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn mining_function(&self) -> MiningFunction {
        match &self.capability {
            EstimatorKind::Regressor => MiningFunction::Regression,
            EstimatorKind::Classifier { .. } => MiningFunction::Classification,
            EstimatorKind::Clusterer => MiningFunction::Clustering,
            EstimatorKind::Custom {
                mining_function, ..
            } => *mining_function,
        }
    }

    pub fn is_supervised(&self) -> bool {
        match &self.capability {
            EstimatorKind::Regressor | EstimatorKind::Classifier { .. } => true,
            EstimatorKind::Clusterer => false,
            EstimatorKind::Custom { supervised, .. } => *supervised,
        }
    }

    /// Class values in model order; `None` unless this is a classifier.
    pub fn classes(&self) -> Option<&[Value]> {
        match &self.capability {
            EstimatorKind::Classifier { classes, .. } => Some(classes),
            _ => None,
        }
    }

    pub fn has_probability_distribution(&self) -> bool {
        matches!(
            self.capability,
            EstimatorKind::Classifier {
                probability: true,
                ..
            }
        )
    }
}

// ── Verification data ──

/// Golden records supplied by the caller: inputs, expected outputs and tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub active_values: ValueMatrix,
    pub target_values: ValueMatrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_values: Option<ValueMatrix>,
    #[serde(default = "default_tolerance")]
    pub precision: f64,
    #[serde(default = "default_tolerance")]
    pub zero_threshold: f64,
}

impl Verification {
    pub fn new(active_values: ValueMatrix, target_values: ValueMatrix) -> Self {
        Self {
            active_values,
            target_values,
            probability_values: None,
            precision: default_tolerance(),
            zero_threshold: default_tolerance(),
        }
    }

    pub fn with_probability_values(mut self, values: ValueMatrix) -> Self {
        self.probability_values = Some(values);
        self
    }

    pub fn with_tolerances(mut self, precision: f64, zero_threshold: f64) -> Self {
        self.precision = precision;
        self.zero_threshold = zero_threshold;
        self
    }
}
