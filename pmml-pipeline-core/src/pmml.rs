//! Typed PMML document tree produced by the compiler.
//!
//! Only the elements the compiler itself writes are modelled; model-specific
//! content produced by external encoders is carried as opaque [`XmlElement`]s.

use crate::export::{to_pmml_xml, ExportError};
use crate::types::{DataType, MiningFunction, OpType};

pub const PMML_VERSION: &str = "4.3";
pub const PMML_NAMESPACE: &str = "http://www.dmg.org/PMML-4_3";

// ── Document ──

#[derive(Debug, Clone, PartialEq)]
pub struct Pmml {
    pub version: String,
    pub header: Header,
    /// Build provenance; present only when the pipeline carried a `repr_`.
    pub mining_build_task: Option<MiningBuildTask>,
    pub data_dictionary: DataDictionary,
    pub transformation_dictionary: Option<TransformationDictionary>,
    pub model: Model,
}

impl Pmml {
    pub fn to_xml(&self) -> Result<String, ExportError> {
        to_pmml_xml(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub application_name: String,
    pub application_version: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            application_name: env!("CARGO_PKG_NAME").to_string(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiningBuildTask {
    pub extensions: Vec<Extension>,
}

/// Free-text extension content.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub content: String,
}

// ── Dictionaries ──

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataDictionary {
    pub fields: Vec<DataField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    pub name: String,
    pub op_type: OpType,
    pub data_type: DataType,
    /// Valid values, in declaration order (categorical fields).
    pub values: Vec<String>,
}

impl DataField {
    pub fn new(name: impl Into<String>, op_type: OpType, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            op_type,
            data_type,
            values: Vec::new(),
        }
    }

    pub fn with_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformationDictionary {
    pub derived_fields: Vec<DerivedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedField {
    pub name: String,
    pub op_type: OpType,
    pub data_type: DataType,
    pub expression: XmlElement,
}

// ── Model ──

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Element name, e.g. `RegressionModel` or `TreeModel`.
    pub element: String,
    pub function_name: MiningFunction,
    pub model_name: Option<String>,
    pub mining_schema: MiningSchema,
    /// Encoder-specific children, written after the mining schema.
    pub content: Vec<XmlElement>,
    pub model_verification: Option<ModelVerification>,
}

impl Model {
    pub fn new(
        element: impl Into<String>,
        function_name: MiningFunction,
        mining_schema: MiningSchema,
    ) -> Self {
        Self {
            element: element.into(),
            function_name,
            model_name: None,
            mining_schema,
            content: Vec::new(),
            model_verification: None,
        }
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn with_content(mut self, element: XmlElement) -> Self {
        self.content.push(element);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiningSchema {
    pub fields: Vec<MiningField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUsage {
    Active,
    Target,
}

impl FieldUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldUsage::Active => "active",
            FieldUsage::Target => "target",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiningField {
    pub name: String,
    pub usage: FieldUsage,
}

impl MiningField {
    pub fn new(name: impl Into<String>, usage: FieldUsage) -> Self {
        Self {
            name: name.into(),
            usage,
        }
    }
}

// ── Model verification ──

#[derive(Debug, Clone, PartialEq)]
pub struct ModelVerification {
    pub record_count: usize,
    pub fields: Vec<VerificationField>,
    pub inline_table: InlineTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationField {
    /// Source field name.
    pub field: String,
    /// Tag name of the field's cells in the inline table.
    pub column: String,
    pub precision: Option<f64>,
    pub zero_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineTable {
    pub rows: Vec<Row>,
}

/// One record; null source values have no cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<RowCell>,
}

impl Row {
    pub fn cell(&self, tag: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.tag == tag)
            .map(|c| c.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowCell {
    pub tag: String,
    pub value: String,
}

// ── Opaque content ──

/// Generic element for content the compiler does not interpret.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
