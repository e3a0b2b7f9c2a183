//! pmml-pipeline-core: compiles trained pipeline descriptors into PMML
//!
//! This crate contains the pipeline-to-document logic with NO model math:
//! - Descriptor types for transformers, estimators and verification data
//! - Label and active field resolution with synthesized defaults
//! - Model verification blocks with XML-safe column tags
//! - Encoder registry for per-kind transformer and model encoders
//! - PMML 4.3 document tree and XML export
//! - YAML/JSON descriptor loader
//!
//! Model-specific PMML content comes from [`registry::ModelEncoder`]
//! implementations registered by the caller.

pub mod compiler;
pub mod descriptor;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod export;
pub mod loader;
pub mod matrix;
pub mod pmml;
pub mod registry;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use compiler::{compile, sanitize, Compilation, PipelineCompiler};
pub use descriptor::{
    EstimatorDescriptor, EstimatorKind, PipelineDescriptor, TransformerDescriptor, Verification,
};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use encoder::PmmlEncoder;
pub use error::CompileError;
pub use export::{to_pmml_xml, ExportError};
pub use loader::{load_pipeline_file, parse_pipeline_json, parse_pipeline_yaml};
pub use matrix::{MatrixError, ValueMatrix};
pub use pmml::Pmml;
pub use registry::{EncoderRegistry, ModelEncoder, TransformerEncoder};
pub use schema::{Feature, Label, Schema};
pub use types::{DataType, MiningFunction, OpType, Value};
