//! Field bookkeeping shared by the compiler and the step encoders.

use crate::pmml::{
    DataDictionary, DataField, DerivedField, FieldUsage, Header, MiningBuildTask, MiningField,
    MiningSchema, Model, Pmml, TransformationDictionary, PMML_VERSION,
};
use crate::schema::{Feature, Schema};
use crate::types::{DataType, OpType};
use std::collections::HashMap;

/// Accumulates the data and derived fields declared during one compilation.
///
/// Fields keep their first-declaration order; redeclaring a name replaces the
/// definition in place.
#[derive(Debug, Default)]
pub struct PmmlEncoder {
    data_fields: Vec<DataField>,
    data_index: HashMap<String, usize>,
    derived_fields: Vec<DerivedField>,
    derived_index: HashMap<String, usize>,
}

impl PmmlEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_data_field(
        &mut self,
        name: impl Into<String>,
        op_type: OpType,
        data_type: DataType,
    ) -> DataField {
        self.put_data_field(DataField::new(name, op_type, data_type))
    }

    /// Declare a field with an ordered list of valid values.
    pub fn create_categorical_field(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        values: Vec<String>,
    ) -> DataField {
        self.put_data_field(DataField::new(name, OpType::Categorical, data_type).with_values(values))
    }

    fn put_data_field(&mut self, field: DataField) -> DataField {
        let existing = self.data_index.get(&field.name).copied();
        match existing {
            Some(i) => self.data_fields[i] = field.clone(),
            None => {
                self.data_index
                    .insert(field.name.clone(), self.data_fields.len());
                self.data_fields.push(field.clone());
            }
        }
        field
    }

    pub fn data_field(&self, name: &str) -> Option<&DataField> {
        self.data_index.get(name).map(|&i| &self.data_fields[i])
    }

    pub fn data_fields(&self) -> &[DataField] {
        &self.data_fields
    }

    /// Register a derived field and return the feature that refers to it.
    pub fn add_derived_field(&mut self, field: DerivedField) -> Feature {
        let feature = Feature::derived(&field.name, field.op_type, field.data_type);
        let existing = self.derived_index.get(&field.name).copied();
        match existing {
            Some(i) => self.derived_fields[i] = field,
            None => {
                self.derived_index
                    .insert(field.name.clone(), self.derived_fields.len());
                self.derived_fields.push(field);
            }
        }
        feature
    }

    pub fn derived_field(&self, name: &str) -> Option<&DerivedField> {
        self.derived_index.get(name).map(|&i| &self.derived_fields[i])
    }

    /// Mining schema for `schema`: the label as target, then every other
    /// declared data field as active, in declaration order.
    pub fn mining_schema(&self, schema: &Schema) -> MiningSchema {
        let target = schema.label.as_ref().map(|l| l.field());
        let mut fields = Vec::with_capacity(self.data_fields.len());
        if let Some(name) = target {
            fields.push(MiningField::new(name, FieldUsage::Target));
        }
        for field in &self.data_fields {
            if Some(field.name.as_str()) != target {
                fields.push(MiningField::new(&field.name, FieldUsage::Active));
            }
        }
        MiningSchema { fields }
    }

    /// Wrap `model` into a document together with the declared fields.
    pub fn encode_pmml(self, model: Model, mining_build_task: Option<MiningBuildTask>) -> Pmml {
        let transformation_dictionary = if self.derived_fields.is_empty() {
            None
        } else {
            Some(TransformationDictionary {
                derived_fields: self.derived_fields,
            })
        };
        Pmml {
            version: PMML_VERSION.to_string(),
            header: Header::default(),
            mining_build_task,
            data_dictionary: DataDictionary {
                fields: self.data_fields,
            },
            transformation_dictionary,
            model,
        }
    }
}
