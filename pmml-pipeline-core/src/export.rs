//! PMML 4.3 XML serialization.

use crate::pmml::*;
use crate::types::Value;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("XML write failed: {0}")]
    Xml(String),

    #[error("Serialized document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize a document to indented PMML XML.
///
/// Element order follows the PMML schema: header, build task, dictionaries,
/// then the model with its mining schema first and verification last.
pub fn to_pmml_xml(pmml: &Pmml) -> Result<String, ExportError> {
    let mut out = XmlOut::new();

    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    out.start(
        "PMML",
        &[("xmlns", PMML_NAMESPACE), ("version", pmml.version.as_str())],
    )?;

    // ── Header ──
    out.start("Header", &[])?;
    out.empty(
        "Application",
        &[
            ("name", pmml.header.application_name.as_str()),
            ("version", pmml.header.application_version.as_str()),
        ],
    )?;
    out.end("Header")?;

    // ── Build provenance ──
    if let Some(task) = &pmml.mining_build_task {
        out.start("MiningBuildTask", &[])?;
        for extension in &task.extensions {
            out.text_element("Extension", &[], &extension.content)?;
        }
        out.end("MiningBuildTask")?;
    }

    // ── Dictionaries ──
    let field_count = pmml.data_dictionary.fields.len().to_string();
    out.start("DataDictionary", &[("numberOfFields", field_count.as_str())])?;
    for field in &pmml.data_dictionary.fields {
        let attrs = [
            ("name", field.name.as_str()),
            ("optype", field.op_type.as_str()),
            ("dataType", field.data_type.as_str()),
        ];
        if field.values.is_empty() {
            out.empty("DataField", &attrs)?;
        } else {
            out.start("DataField", &attrs)?;
            for value in &field.values {
                out.empty("Value", &[("value", value.as_str())])?;
            }
            out.end("DataField")?;
        }
    }
    out.end("DataDictionary")?;

    if let Some(dictionary) = &pmml.transformation_dictionary {
        out.start("TransformationDictionary", &[])?;
        for field in &dictionary.derived_fields {
            out.start(
                "DerivedField",
                &[
                    ("name", field.name.as_str()),
                    ("optype", field.op_type.as_str()),
                    ("dataType", field.data_type.as_str()),
                ],
            )?;
            out.element(&field.expression)?;
            out.end("DerivedField")?;
        }
        out.end("TransformationDictionary")?;
    }

    write_model(&mut out, &pmml.model)?;

    out.end("PMML")?;
    out.finish()
}

fn write_model(out: &mut XmlOut, model: &Model) -> Result<(), ExportError> {
    let mut attrs = vec![("functionName", model.function_name.as_str())];
    if let Some(name) = &model.model_name {
        attrs.push(("modelName", name.as_str()));
    }
    out.start(&model.element, &attrs)?;

    out.start("MiningSchema", &[])?;
    for field in &model.mining_schema.fields {
        match field.usage {
            FieldUsage::Active => out.empty("MiningField", &[("name", field.name.as_str())])?,
            usage => out.empty(
                "MiningField",
                &[("name", field.name.as_str()), ("usageType", usage.as_str())],
            )?,
        }
    }
    out.end("MiningSchema")?;

    for element in &model.content {
        out.element(element)?;
    }

    if let Some(verification) = &model.model_verification {
        write_verification(out, verification)?;
    }

    out.end(&model.element)
}

fn write_verification(out: &mut XmlOut, verification: &ModelVerification) -> Result<(), ExportError> {
    let record_count = verification.record_count.to_string();
    let field_count = verification.fields.len().to_string();
    out.start(
        "ModelVerification",
        &[
            ("recordCount", record_count.as_str()),
            ("fieldCount", field_count.as_str()),
        ],
    )?;

    out.start("VerificationFields", &[])?;
    for field in &verification.fields {
        let precision = field.precision.map(|p| Value::Float(p).format());
        let zero_threshold = field.zero_threshold.map(|z| Value::Float(z).format());
        let mut attrs = vec![
            ("field", field.field.as_str()),
            ("column", field.column.as_str()),
        ];
        if let Some(p) = &precision {
            attrs.push(("precision", p.as_str()));
        }
        if let Some(z) = &zero_threshold {
            attrs.push(("zeroThreshold", z.as_str()));
        }
        out.empty("VerificationField", &attrs)?;
    }
    out.end("VerificationFields")?;

    out.start("InlineTable", &[])?;
    for row in &verification.inline_table.rows {
        if row.cells.is_empty() {
            out.empty("row", &[])?;
            continue;
        }
        out.start("row", &[])?;
        for cell in &row.cells {
            out.text_element(&cell.tag, &[], &cell.value)?;
        }
        out.end("row")?;
    }
    out.end("InlineTable")?;

    out.end("ModelVerification")
}

// ── Writer wrapper ──

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(tag))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(tag))
    }

    fn end(&mut self, name: &str) -> Result<(), ExportError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), ExportError> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn element(&mut self, element: &XmlElement) -> Result<(), ExportError> {
        let attrs: Vec<(&str, &str)> = element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        match (&element.text, element.children.is_empty()) {
            (None, true) => self.empty(&element.name, &attrs),
            (Some(text), true) => self.text_element(&element.name, &attrs, text),
            (text, false) => {
                self.start(&element.name, &attrs)?;
                if let Some(text) = text {
                    self.event(Event::Text(BytesText::new(text)))?;
                }
                for child in &element.children {
                    self.element(child)?;
                }
                self.end(&element.name)
            }
        }
    }

    fn finish(self) -> Result<String, ExportError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
