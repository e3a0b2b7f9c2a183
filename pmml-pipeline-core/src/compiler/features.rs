//! Input field resolution: active field names, placeholder features and the
//! transformer chain.

use crate::descriptor::{EstimatorDescriptor, PipelineDescriptor, StepRef};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::encoder::PmmlEncoder;
use crate::error::CompileError;
use crate::registry::EncoderRegistry;
use crate::schema::Feature;
use crate::types::{DataType, OpType};

/// Resolve the ordered features the estimator consumes.
///
/// Declares a data field for every active field, threads the placeholders
/// through each transformer's encoder and checks the result against the
/// estimator's declared feature count.
pub fn resolve_features(
    descriptor: &PipelineDescriptor,
    registry: &EncoderRegistry,
    encoder: &mut PmmlEncoder,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Feature>, CompileError> {
    let features = match descriptor.transformers.first() {
        Some(head) => {
            let mut features = if head.initializer {
                Vec::new()
            } else {
                init_features(
                    descriptor,
                    StepRef::Transformer(head),
                    head.op_type,
                    head.data_type,
                    encoder,
                    diagnostics,
                )?
            };
            for transformer in &descriptor.transformers {
                let step_encoder = registry.transformer_for(transformer)?;
                features = step_encoder.encode_features(transformer, features, encoder)?;
                tracing::debug!(
                    step = %transformer.name,
                    features = features.len(),
                    "encoded transformer"
                );
            }
            features
        }
        None => {
            let estimator = &descriptor.estimator;
            init_features(
                descriptor,
                StepRef::Estimator(estimator),
                estimator.op_type,
                estimator.data_type,
                encoder,
                diagnostics,
            )?
        }
    };

    check_feature_count(&descriptor.estimator, &features)?;
    Ok(features)
}

/// Active field names: explicit when given, else `x1..xN` from the head step's arity.
pub fn active_field_names(
    descriptor: &PipelineDescriptor,
    head: StepRef<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<String>, CompileError> {
    if let Some(names) = &descriptor.active_fields {
        return Ok(names.clone());
    }

    let n = head.n_features().ok_or_else(|| CompileError::UnknownInputArity {
        step: head.name().to_string(),
    })?;
    let names: Vec<String> = (1..=n).map(|i| format!("x{}", i)).collect();
    diagnostics.warn(
        DiagnosticCode::ActiveFieldsAssumed,
        format!(
            "The 'active_fields' attribute is not set. Assuming {:?} as the names of active fields",
            names
        ),
    );
    Ok(names)
}

fn init_features(
    descriptor: &PipelineDescriptor,
    head: StepRef<'_>,
    op_type: OpType,
    data_type: DataType,
    encoder: &mut PmmlEncoder,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Feature>, CompileError> {
    let names = active_field_names(descriptor, head, diagnostics)?;
    Ok(names
        .into_iter()
        .map(|name| {
            let field = encoder.create_data_field(name, op_type, data_type);
            Feature::wildcard(&field)
        })
        .collect())
}

/// The estimator's declared feature count, when known, must match exactly.
pub fn check_feature_count(
    estimator: &EstimatorDescriptor,
    features: &[Feature],
) -> Result<(), CompileError> {
    match estimator.n_features {
        Some(expected) if expected != features.len() => Err(CompileError::FeatureCountMismatch {
            estimator: estimator.name.clone(),
            expected,
            actual: features.len(),
        }),
        _ => Ok(()),
    }
}
