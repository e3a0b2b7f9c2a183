//! Step encoders shared by the integration tests.
#![allow(dead_code)]

use pmml_pipeline_core::descriptor::{EstimatorDescriptor, TransformerDescriptor};
use pmml_pipeline_core::pmml::{DerivedField, Model, XmlElement};
use pmml_pipeline_core::types::{DataType, MiningFunction, OpType};
use pmml_pipeline_core::{
    CompileError, EncoderRegistry, Feature, ModelEncoder, PmmlEncoder, Schema, TransformerEncoder,
};

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn numbers(
    step: &str,
    attributes: &std::collections::BTreeMap<String, serde_json::Value>,
    key: &str,
) -> Result<Vec<f64>, CompileError> {
    let values = attributes
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| CompileError::encoding(step, format!("missing numeric array '{}'", key)))?;
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| CompileError::encoding(step, format!("non-numeric entry in '{}'", key)))
        })
        .collect()
}

/// `(x - mean) / scale` per feature.
pub struct StandardScaler;

impl TransformerEncoder for StandardScaler {
    fn encode_features(
        &self,
        transformer: &TransformerDescriptor,
        features: Vec<Feature>,
        encoder: &mut PmmlEncoder,
    ) -> Result<Vec<Feature>, CompileError> {
        let mean = numbers(&transformer.name, &transformer.attributes, "mean")?;
        let scale = numbers(&transformer.name, &transformer.attributes, "scale")?;
        if mean.len() != features.len() || scale.len() != features.len() {
            return Err(CompileError::encoding(
                &transformer.name,
                format!("expected {} mean/scale entries", features.len()),
            ));
        }

        Ok(features
            .iter()
            .zip(mean.iter().zip(&scale))
            .map(|(feature, (m, s))| {
                let expression = XmlElement::new("Apply")
                    .with_attribute("function", "/")
                    .with_child(
                        XmlElement::new("Apply")
                            .with_attribute("function", "-")
                            .with_child(XmlElement::new("FieldRef").with_attribute("field", &feature.name))
                            .with_child(XmlElement::new("Constant").with_text(m.to_string())),
                    )
                    .with_child(XmlElement::new("Constant").with_text(s.to_string()));
                encoder.add_derived_field(DerivedField {
                    name: format!("standardScaler({})", feature.name),
                    op_type: OpType::Continuous,
                    data_type: DataType::Double,
                    expression,
                })
            })
            .collect())
    }
}

/// Linear model over the resolved features: `RegressionModel` with one
/// table for regression, one per class for classification.
pub struct LinearModel;

impl ModelEncoder for LinearModel {
    fn encode_model(
        &self,
        estimator: &EstimatorDescriptor,
        schema: &Schema,
        encoder: &mut PmmlEncoder,
    ) -> Result<Model, CompileError> {
        let coefficients = numbers(&estimator.name, &estimator.attributes, "coef")?;
        let intercept = numbers(&estimator.name, &estimator.attributes, "intercept")?;
        if coefficients.len() != schema.features.len() {
            return Err(CompileError::encoding(
                &estimator.name,
                format!("expected {} coefficients", schema.features.len()),
            ));
        }

        let table = |intercept: f64, category: Option<&str>| {
            let mut table = XmlElement::new("RegressionTable").with_attribute("intercept", intercept.to_string());
            if let Some(category) = category {
                table = table.with_attribute("targetCategory", category);
            }
            for (feature, coefficient) in schema.features.iter().zip(&coefficients) {
                table = table.with_child(
                    XmlElement::new("NumericPredictor")
                        .with_attribute("name", &feature.name)
                        .with_attribute("coefficient", coefficient.to_string()),
                );
            }
            table
        };

        let mut model = Model::new(
            "RegressionModel",
            estimator.mining_function(),
            encoder.mining_schema(schema),
        )
        .with_model_name(&estimator.name);

        match (estimator.mining_function(), schema.label.as_ref().and_then(|l| l.values())) {
            (MiningFunction::Classification, Some(categories)) if categories.len() == 2 => {
                model = model
                    .with_content(table(intercept.first().copied().unwrap_or(0.0), Some(categories[1].as_str())))
                    .with_content(XmlElement::new("RegressionTable")
                        .with_attribute("intercept", "0")
                        .with_attribute("targetCategory", &categories[0]));
            }
            (MiningFunction::Regression, _) => {
                model = model.with_content(table(intercept.first().copied().unwrap_or(0.0), None));
            }
            (other, _) => {
                return Err(CompileError::encoding(
                    &estimator.name,
                    format!("unsupported mining function {}", other),
                ))
            }
        }
        Ok(model)
    }
}

/// Emits only a mining schema; stands in for clustering models.
pub struct SchemaOnly;

impl ModelEncoder for SchemaOnly {
    fn encode_model(
        &self,
        estimator: &EstimatorDescriptor,
        schema: &Schema,
        encoder: &mut PmmlEncoder,
    ) -> Result<Model, CompileError> {
        Ok(Model::new(
            "ClusteringModel",
            estimator.mining_function(),
            encoder.mining_schema(schema),
        ))
    }
}

pub fn registry() -> EncoderRegistry {
    EncoderRegistry::new()
        .with_transformer("StandardScaler", StandardScaler)
        .with_estimator("LinearRegression", LinearModel)
        .with_estimator("LogisticRegression", LinearModel)
        .with_estimator("KMeans", SchemaOnly)
}
