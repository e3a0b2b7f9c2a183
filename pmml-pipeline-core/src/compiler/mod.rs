//! Pipeline compiler: descriptor in, PMML document out.
//!
//! ```text
//! label (supervised only) → features → feature count check
//!   → model encoder → verification (supervised + data) → document
//! ```
//!
//! Compilation is synchronous and performs no I/O. A document is returned only
//! when every step succeeds.

pub mod features;
pub mod label;
pub mod tag_name;
pub mod verification;

use crate::descriptor::PipelineDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::encoder::PmmlEncoder;
use crate::error::CompileError;
use crate::pmml::{Extension, MiningBuildTask, Pmml};
use crate::registry::EncoderRegistry;
use crate::schema::Schema;

pub use tag_name::sanitize;

/// Result of a successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub pmml: Pmml,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Compiles descriptors against a fixed set of step encoders.
#[derive(Debug, Clone, Copy)]
pub struct PipelineCompiler<'r> {
    registry: &'r EncoderRegistry,
}

impl<'r> PipelineCompiler<'r> {
    pub fn new(registry: &'r EncoderRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, descriptor: &PipelineDescriptor) -> Result<Compilation, CompileError> {
        let estimator = &descriptor.estimator;
        let mut encoder = PmmlEncoder::new();
        let mut diagnostics = Diagnostics::new();

        // 1. Label
        let label = label::resolve_label(descriptor, &mut encoder, &mut diagnostics)?;

        // 2. Features
        let features =
            features::resolve_features(descriptor, self.registry, &mut encoder, &mut diagnostics)?;

        // 3. Model
        let schema = Schema::new(label, features);
        let mut model = self
            .registry
            .estimator_for(estimator)?
            .encode_model(estimator, &schema, &mut encoder)?;

        // 4. Verification
        match (&descriptor.verification, &schema.label) {
            (Some(data), Some(label)) => {
                let block = verification::build_verification(descriptor, data, label)?;
                tracing::debug!(records = block.record_count, "attached model verification");
                model.model_verification = Some(block);
            }
            (Some(_), None) => diagnostics.info(
                DiagnosticCode::VerificationIgnored,
                format!(
                    "Estimator '{}' is unsupervised; ignoring the 'verification' attribute",
                    estimator.name
                ),
            ),
            (None, _) => {}
        }

        // 5 + 6. Document with optional build provenance
        let mining_build_task = descriptor.repr.as_ref().map(|repr| MiningBuildTask {
            extensions: vec![Extension {
                content: repr.clone(),
            }],
        });
        let pmml = encoder.encode_pmml(model, mining_build_task);

        tracing::debug!(
            estimator = %estimator.name,
            fields = pmml.data_dictionary.fields.len(),
            "compiled pipeline"
        );

        Ok(Compilation {
            pmml,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

/// Compile `descriptor` with `registry`.
pub fn compile(
    descriptor: &PipelineDescriptor,
    registry: &EncoderRegistry,
) -> Result<Compilation, CompileError> {
    PipelineCompiler::new(registry).compile(descriptor)
}
