//! Target field resolution for supervised estimators.

use crate::descriptor::PipelineDescriptor;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::encoder::PmmlEncoder;
use crate::error::CompileError;
use crate::schema::Label;
use crate::types::{common_data_type, format_categories, DataType, MiningFunction, OpType};

pub const DEFAULT_TARGET_FIELD: &str = "y";

/// Name of the single target field, or the default with a warning.
pub fn target_field_name(
    descriptor: &PipelineDescriptor,
    diagnostics: &mut Diagnostics,
) -> Result<String, CompileError> {
    match descriptor.resolved_target_fields() {
        Some(mut fields) if fields.len() == 1 => Ok(fields.remove(0)),
        Some(fields) => Err(CompileError::TargetFieldCount { fields }),
        None => {
            diagnostics.warn(
                DiagnosticCode::TargetFieldAssumed,
                format!(
                    "The 'target_fields' attribute is not set. Assuming '{}' as the name of the target field",
                    DEFAULT_TARGET_FIELD
                ),
            );
            Ok(DEFAULT_TARGET_FIELD.to_string())
        }
    }
}

/// Declare the target data field and build the label.
///
/// Returns `None` for unsupervised estimators.
pub fn resolve_label(
    descriptor: &PipelineDescriptor,
    encoder: &mut PmmlEncoder,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Label>, CompileError> {
    let estimator = &descriptor.estimator;
    if !estimator.is_supervised() {
        return Ok(None);
    }

    let target_field = target_field_name(descriptor, diagnostics)?;

    let label = match estimator.mining_function() {
        MiningFunction::Classification => {
            let classes = estimator
                .classes()
                .ok_or_else(|| CompileError::MissingClasses {
                    estimator: estimator.name.clone(),
                })?;
            let data_type = common_data_type(classes, DataType::String);
            let categories = format_categories(classes);
            let field = encoder.create_categorical_field(target_field, data_type, categories);
            Label::categorical(&field)
        }
        MiningFunction::Regression => {
            let field = encoder.create_data_field(target_field, OpType::Continuous, DataType::Double);
            Label::continuous(&field)
        }
        other => {
            return Err(CompileError::UnsupportedMiningFunction {
                estimator: estimator.name.clone(),
                mining_function: other,
            })
        }
    };
    Ok(Some(label))
}
