//! Model verification block: shape checks and the golden-record table.
//!
//! Columns are the active fields followed by the output fields. Outputs are
//! the `probability(<category>)` columns when the classifier exposes
//! probabilities and the caller supplied them, otherwise the target fields.
//! Probability columns replace target columns; the two are never combined.

use super::tag_name::sanitize;
use crate::descriptor::{PipelineDescriptor, Verification};
use crate::error::{Axis, CompileError};
use crate::matrix::ValueMatrix;
use crate::pmml::{InlineTable, ModelVerification, Row, RowCell, VerificationField};
use crate::schema::Label;

/// Build the verification block for a supervised pipeline.
pub fn build_verification(
    descriptor: &PipelineDescriptor,
    verification: &Verification,
    label: &Label,
) -> Result<ModelVerification, CompileError> {
    let active_fields = descriptor
        .active_fields
        .as_ref()
        .ok_or(CompileError::ActiveFieldsRequired)?;

    let active_values = &verification.active_values;
    let target_values = &verification.target_values;
    let rows = active_values.rows();

    check_dim("target_values", Axis::Rows, rows, target_values.rows())?;
    check_dim(
        "active_values",
        Axis::Columns,
        active_fields.len(),
        active_values.columns(),
    )?;

    let tolerances = (verification.precision, verification.zero_threshold);
    let mut table = TableBuilder::new(rows);

    for (i, name) in active_fields.iter().enumerate() {
        table.add_column(name, None, active_values, i);
    }

    let probability_values = verification
        .probability_values
        .as_ref()
        .filter(|_| descriptor.estimator.has_probability_distribution());

    match probability_values {
        Some(probability_values) => {
            let categories = label.values().ok_or(CompileError::NonCategoricalLabel)?;
            check_dim("probability_values", Axis::Rows, rows, probability_values.rows())?;
            check_dim(
                "probability_values",
                Axis::Columns,
                categories.len(),
                probability_values.columns(),
            )?;
            for (i, category) in categories.iter().enumerate() {
                let name = probability_field_name(category);
                table.add_column(&name, Some(tolerances), probability_values, i);
            }
        }
        None => {
            let target_fields = descriptor
                .resolved_target_fields()
                .unwrap_or_else(|| vec![label.field().to_string()]);
            check_dim(
                "target_values",
                Axis::Columns,
                target_fields.len(),
                target_values.columns(),
            )?;
            let target_tolerances = label
                .data_type()
                .is_floating_point()
                .then_some(tolerances);
            for (i, name) in target_fields.iter().enumerate() {
                table.add_column(name, target_tolerances, target_values, i);
            }
        }
    }

    Ok(table.finish())
}

/// Output field name of one class probability.
pub fn probability_field_name(category: &str) -> String {
    format!("probability({})", category)
}

fn check_dim(
    matrix: &'static str,
    axis: Axis,
    expected: usize,
    actual: usize,
) -> Result<(), CompileError> {
    if expected != actual {
        return Err(CompileError::ShapeMismatch {
            matrix,
            axis,
            expected,
            actual,
        });
    }
    Ok(())
}

// ── Table assembly ──

struct Column<'a> {
    tag: String,
    source: &'a ValueMatrix,
    index: usize,
}

struct TableBuilder<'a> {
    rows: usize,
    fields: Vec<VerificationField>,
    columns: Vec<Column<'a>>,
}

impl<'a> TableBuilder<'a> {
    fn new(rows: usize) -> Self {
        Self {
            rows,
            fields: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Declare a column backed by column `index` of `source`.
    fn add_column(
        &mut self,
        field: &str,
        tolerances: Option<(f64, f64)>,
        source: &'a ValueMatrix,
        index: usize,
    ) {
        let tag = sanitize(field);
        self.fields.push(VerificationField {
            field: field.to_string(),
            column: tag.clone(),
            precision: tolerances.map(|(p, _)| p),
            zero_threshold: tolerances.map(|(_, z)| z),
        });
        self.columns.push(Column { tag, source, index });
    }

    fn finish(self) -> ModelVerification {
        let rows = (0..self.rows)
            .map(|i| Row {
                cells: self
                    .columns
                    .iter()
                    .filter_map(|column| {
                        column.source.get(i, column.index).map(|value| RowCell {
                            tag: column.tag.clone(),
                            value: value.format(),
                        })
                    })
                    .collect(),
            })
            .collect();

        ModelVerification {
            record_count: self.rows,
            fields: self.fields,
            inline_table: InlineTable { rows },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EstimatorDescriptor;
    use crate::pmml::DataField;
    use crate::types::{DataType, OpType, Value};

    fn f(x: f64) -> Option<Value> {
        Some(Value::Float(x))
    }

    fn s(x: &str) -> Option<Value> {
        Some(Value::from(x))
    }

    fn regression_label() -> Label {
        Label::continuous(&DataField::new("y", OpType::Continuous, DataType::Double))
    }

    fn iris_label() -> Label {
        Label::categorical(
            &DataField::new("species", OpType::Categorical, DataType::String)
                .with_values(["setosa", "versicolor"]),
        )
    }

    fn regression_pipeline() -> PipelineDescriptor {
        PipelineDescriptor::new(EstimatorDescriptor::regressor("lr", "LinearRegression"))
            .with_active_fields(["a", "b"])
            .with_target_fields(["y"])
    }

    #[test]
    fn test_row_count_mismatch_fails_before_rows() {
        let verification = Verification::new(
            ValueMatrix::new(3, 2, vec![f(1.0); 6]).unwrap(),
            ValueMatrix::column_vector(vec![f(1.0); 2]),
        );
        let err =
            build_verification(&regression_pipeline(), &verification, &regression_label()).unwrap_err();
        assert_eq!(
            err,
            CompileError::ShapeMismatch {
                matrix: "target_values",
                axis: Axis::Rows,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_active_column_count_mismatch() {
        let verification = Verification::new(
            ValueMatrix::new(1, 3, vec![f(1.0); 3]).unwrap(),
            ValueMatrix::column_vector(vec![f(1.0)]),
        );
        let err =
            build_verification(&regression_pipeline(), &verification, &regression_label()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ShapeMismatch {
                matrix: "active_values",
                axis: Axis::Columns,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_requires_explicit_active_fields() {
        let descriptor =
            PipelineDescriptor::new(EstimatorDescriptor::regressor("lr", "LinearRegression"));
        let verification = Verification::new(
            ValueMatrix::new(1, 1, vec![f(1.0)]).unwrap(),
            ValueMatrix::column_vector(vec![f(1.0)]),
        );
        let err = build_verification(&descriptor, &verification, &regression_label()).unwrap_err();
        assert_eq!(err, CompileError::ActiveFieldsRequired);
    }

    #[test]
    fn test_null_cells_are_omitted() {
        let verification = Verification::new(
            ValueMatrix::from_rows(vec![vec![f(1.5), None], vec![f(2.0), f(3.0)]]).unwrap(),
            ValueMatrix::column_vector(vec![f(10.0), f(20.5)]),
        );
        let mv = build_verification(&regression_pipeline(), &verification, &regression_label())
            .unwrap();

        assert_eq!(mv.record_count, 2);
        let first = &mv.inline_table.rows[0];
        assert_eq!(
            first.cells,
            vec![
                RowCell {
                    tag: "a".to_string(),
                    value: "1.5".to_string()
                },
                RowCell {
                    tag: "y".to_string(),
                    value: "10".to_string()
                },
            ]
        );
        assert_eq!(first.cell("b"), None);

        let second = &mv.inline_table.rows[1];
        assert_eq!(second.cells.len(), 3);
        assert_eq!(second.cell("b"), Some("3"));
        assert_eq!(second.cell("y"), Some("20.5"));
    }

    #[test]
    fn test_double_target_carries_tolerances() {
        let verification = Verification::new(
            ValueMatrix::new(1, 2, vec![f(1.0), f(2.0)]).unwrap(),
            ValueMatrix::column_vector(vec![f(3.0)]),
        )
        .with_tolerances(1e-6, 1e-9);
        let mv = build_verification(&regression_pipeline(), &verification, &regression_label())
            .unwrap();

        let fields: Vec<(&str, Option<f64>, Option<f64>)> = mv
            .fields
            .iter()
            .map(|f| (f.field.as_str(), f.precision, f.zero_threshold))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("a", None, None),
                ("b", None, None),
                ("y", Some(1e-6), Some(1e-9)),
            ]
        );
    }

    #[test]
    fn test_probability_columns_replace_targets() {
        let clf =
            EstimatorDescriptor::classifier("clf", "LogisticRegression", ["setosa", "versicolor"], true);
        let descriptor = PipelineDescriptor::new(clf)
            .with_active_fields(["sepal length"])
            .with_target_fields(["species"]);
        let verification = Verification::new(
            ValueMatrix::column_vector(vec![f(5.1), f(7.0)]),
            ValueMatrix::column_vector(vec![s("setosa"), s("versicolor")]),
        )
        .with_probability_values(
            ValueMatrix::new(2, 2, vec![f(0.9), f(0.1), f(0.2), f(0.8)]).unwrap(),
        );

        let mv = build_verification(&descriptor, &verification, &iris_label()).unwrap();
        let columns: Vec<(&str, &str)> = mv
            .fields
            .iter()
            .map(|f| (f.field.as_str(), f.column.as_str()))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("sepal length", "sepal_x0020_length"),
                ("probability(setosa)", "probability_setosa"),
                ("probability(versicolor)", "probability_versicolor"),
            ]
        );
        assert!(mv.fields[1].precision.is_some());
        assert!(mv.fields[2].zero_threshold.is_some());
        assert_eq!(mv.inline_table.rows[1].cell("probability_versicolor"), Some("0.8"));
        assert_eq!(mv.inline_table.rows[0].cell("species"), None);
    }

    #[test]
    fn test_probability_values_ignored_without_distribution() {
        let clf = EstimatorDescriptor::classifier("clf", "SVC", ["setosa", "versicolor"], false);
        let descriptor = PipelineDescriptor::new(clf)
            .with_active_fields(["x"])
            .with_target_fields(["species"]);
        let verification = Verification::new(
            ValueMatrix::column_vector(vec![f(1.0)]),
            ValueMatrix::column_vector(vec![s("setosa")]),
        )
        .with_probability_values(ValueMatrix::new(1, 2, vec![f(1.0), f(0.0)]).unwrap());

        let mv = build_verification(&descriptor, &verification, &iris_label()).unwrap();
        assert_eq!(mv.fields.len(), 2);
        assert_eq!(mv.fields[1].field, "species");
        // String target: exact comparison
        assert_eq!(mv.fields[1].precision, None);
        assert_eq!(mv.inline_table.rows[0].cell("species"), Some("setosa"));
    }

    #[test]
    fn test_probability_shape_mismatch() {
        let clf = EstimatorDescriptor::classifier("clf", "LogisticRegression", ["setosa", "versicolor"], true);
        let descriptor = PipelineDescriptor::new(clf).with_active_fields(["x"]);
        let verification = Verification::new(
            ValueMatrix::column_vector(vec![f(1.0)]),
            ValueMatrix::column_vector(vec![s("setosa")]),
        )
        .with_probability_values(ValueMatrix::new(1, 3, vec![f(1.0), f(0.0), f(0.0)]).unwrap());

        let err = build_verification(&descriptor, &verification, &iris_label()).unwrap_err();
        assert_eq!(
            err,
            CompileError::ShapeMismatch {
                matrix: "probability_values",
                axis: Axis::Columns,
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_label_field_used_when_targets_undeclared() {
        let descriptor = PipelineDescriptor::new(EstimatorDescriptor::regressor("lr", "LinearRegression"))
            .with_active_fields(["a"]);
        let verification = Verification::new(
            ValueMatrix::column_vector(vec![f(1.0)]),
            ValueMatrix::column_vector(vec![f(2.0)]),
        );
        let mv = build_verification(&descriptor, &verification, &regression_label()).unwrap();
        assert_eq!(mv.fields[1].field, "y");
    }

    #[test]
    fn test_target_column_count_mismatch() {
        let verification = Verification::new(
            ValueMatrix::new(1, 2, vec![f(1.0), f(2.0)]).unwrap(),
            ValueMatrix::new(1, 2, vec![f(1.0), f(2.0)]).unwrap(),
        );
        let err =
            build_verification(&regression_pipeline(), &verification, &regression_label()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ShapeMismatch {
                matrix: "target_values",
                axis: Axis::Columns,
                ..
            }
        ));
    }
}
