//! Typed compilation errors.
//!
//! Every failure aborts the compilation; no partial document is produced.
//! Variants carry enough context (step name, expected vs. actual shape) to
//! diagnose the descriptor without re-running.

use crate::types::MiningFunction;
use std::fmt;

/// Which matrix dimension a shape check looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Columns => f.write_str("columns"),
        }
    }
}

/// Role of a pipeline step when looking up its encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    Transformer,
    Estimator,
}

impl fmt::Display for StepRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRole::Transformer => f.write_str("transformer"),
            StepRole::Estimator => f.write_str("estimator"),
        }
    }
}

/// Configuration errors raised while compiling a pipeline descriptor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Estimator '{estimator}' has unsupported mining function '{mining_function}'")]
    UnsupportedMiningFunction {
        estimator: String,
        mining_function: MiningFunction,
    },

    #[error("Expected exactly one target field, got {}: {fields:?}", .fields.len())]
    TargetFieldCount { fields: Vec<String> },

    #[error("Estimator '{estimator}' expects {expected} input feature(s), got {actual}")]
    FeatureCountMismatch {
        estimator: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "The first transformer or estimator object ('{step}') does not specify the number of input features"
    )]
    UnknownInputArity { step: String },

    #[error("Model verification requires the 'active_fields' attribute to be set")]
    ActiveFieldsRequired,

    #[error("Verification shape mismatch: '{matrix}' has {actual} {axis}, expected {expected}")]
    ShapeMismatch {
        matrix: &'static str,
        axis: Axis,
        expected: usize,
        actual: usize,
    },

    #[error("No {role} encoder registered for step '{step}' (kind '{kind}')")]
    MissingEncoder {
        role: StepRole,
        step: String,
        kind: String,
    },

    #[error("Failed to encode step '{step}': {message}")]
    Encoding { step: String, message: String },

    #[error("Classifier '{estimator}' does not declare its classes")]
    MissingClasses { estimator: String },

    #[error("Probability verification requires a categorical label")]
    NonCategoricalLabel,
}

impl CompileError {
    /// Shorthand for encoder implementations reporting a failure.
    pub fn encoding(step: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::Encoding {
            step: step.into(),
            message: message.into(),
        }
    }
}
