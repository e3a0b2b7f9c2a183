//! Step encoders and the registry that resolves them by descriptor `kind`.

use crate::descriptor::{EstimatorDescriptor, TransformerDescriptor};
use crate::encoder::PmmlEncoder;
use crate::error::{CompileError, StepRole};
use crate::pmml::Model;
use crate::schema::{Feature, Schema};
use std::collections::HashMap;
use std::fmt;

/// Turns the features entering a transformer into the features it emits.
pub trait TransformerEncoder: Send + Sync {
    fn encode_features(
        &self,
        transformer: &TransformerDescriptor,
        features: Vec<Feature>,
        encoder: &mut PmmlEncoder,
    ) -> Result<Vec<Feature>, CompileError>;
}

/// Turns a resolved schema into the estimator's model element.
pub trait ModelEncoder: Send + Sync {
    fn encode_model(
        &self,
        estimator: &EstimatorDescriptor,
        schema: &Schema,
        encoder: &mut PmmlEncoder,
    ) -> Result<Model, CompileError>;
}

/// `passthrough` step: emits its input features unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl TransformerEncoder for PassThrough {
    fn encode_features(
        &self,
        _transformer: &TransformerDescriptor,
        features: Vec<Feature>,
        _encoder: &mut PmmlEncoder,
    ) -> Result<Vec<Feature>, CompileError> {
        Ok(features)
    }
}

pub const PASSTHROUGH_KIND: &str = "passthrough";

/// Registry of step encoders keyed by descriptor `kind`.
///
/// Read-only while compiling, so one registry can serve any number of
/// concurrent compilations.
pub struct EncoderRegistry {
    transformers: HashMap<String, Box<dyn TransformerEncoder>>,
    estimators: HashMap<String, Box<dyn ModelEncoder>>,
}

impl EncoderRegistry {
    /// Registry with the built-in `passthrough` transformer.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_transformer(PASSTHROUGH_KIND, PassThrough);
        registry
    }

    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
            estimators: HashMap::new(),
        }
    }

    /// Register a transformer encoder. Replaces any existing one for `kind`.
    pub fn register_transformer(
        &mut self,
        kind: impl Into<String>,
        encoder: impl TransformerEncoder + 'static,
    ) {
        self.transformers.insert(kind.into(), Box::new(encoder));
    }

    /// Register a model encoder. Replaces any existing one for `kind`.
    pub fn register_estimator(&mut self, kind: impl Into<String>, encoder: impl ModelEncoder + 'static) {
        self.estimators.insert(kind.into(), Box::new(encoder));
    }

    /// Builder form of [`register_transformer`](Self::register_transformer).
    pub fn with_transformer(
        mut self,
        kind: impl Into<String>,
        encoder: impl TransformerEncoder + 'static,
    ) -> Self {
        self.register_transformer(kind, encoder);
        self
    }

    /// Builder form of [`register_estimator`](Self::register_estimator).
    pub fn with_estimator(mut self, kind: impl Into<String>, encoder: impl ModelEncoder + 'static) -> Self {
        self.register_estimator(kind, encoder);
        self
    }

    pub fn has_transformer(&self, kind: &str) -> bool {
        self.transformers.contains_key(kind)
    }

    pub fn has_estimator(&self, kind: &str) -> bool {
        self.estimators.contains_key(kind)
    }

    pub fn transformer_for(
        &self,
        transformer: &TransformerDescriptor,
    ) -> Result<&dyn TransformerEncoder, CompileError> {
        self.transformers
            .get(&transformer.kind)
            .map(|e| e.as_ref())
            .ok_or_else(|| CompileError::MissingEncoder {
                role: StepRole::Transformer,
                step: transformer.name.clone(),
                kind: transformer.kind.clone(),
            })
    }

    pub fn estimator_for(
        &self,
        estimator: &EstimatorDescriptor,
    ) -> Result<&dyn ModelEncoder, CompileError> {
        self.estimators
            .get(&estimator.kind)
            .map(|e| e.as_ref())
            .ok_or_else(|| CompileError::MissingEncoder {
                role: StepRole::Estimator,
                step: estimator.name.clone(),
                kind: estimator.kind.clone(),
            })
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut transformers: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        let mut estimators: Vec<&str> = self.estimators.keys().map(String::as_str).collect();
        transformers.sort_unstable();
        estimators.sort_unstable();
        f.debug_struct("EncoderRegistry")
            .field("transformers", &transformers)
            .field("estimators", &estimators)
            .finish()
    }
}
