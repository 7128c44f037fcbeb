use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use triplens_common::{Result, TripLensError};

use crate::histogram::{build_histogram_with, HistogramOptions, HistogramTable};

/// A validated numeric column: non-empty, every value finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    name: String,
    values: Vec<f64>,
}

impl Sample {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(TripLensError::EmptyInput(format!("column `{name}` has no values")));
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(TripLensError::NonFiniteInput { index, value });
        }
        Ok(Self { name, values })
    }

    /// Reads `column` from `batch` as f64, dropping nulls.
    pub fn from_batch(batch: &RecordBatch, column: &str) -> Result<Self> {
        let values = numeric_column(batch, column)?
            .iter()
            .flatten()
            .collect();
        Self::new(column, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn histogram(&self, opts: &HistogramOptions) -> Result<HistogramTable> {
        build_histogram_with(&self.values, opts)
    }
}

/// Looks up `column` and casts it to a `Float64Array`, keeping nulls in place.
pub fn numeric_column(batch: &RecordBatch, column: &str) -> Result<Float64Array> {
    let idx = batch
        .schema()
        .index_of(column)
        .map_err(|_| TripLensError::ColumnNotFound(column.to_string()))?;
    let array = batch.column(idx);
    if !array.data_type().is_numeric() {
        return Err(TripLensError::ColumnType {
            column: column.to_string(),
            data_type: array.data_type().to_string(),
        });
    }
    let casted = cast(array, &DataType::Float64)?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| TripLensError::Other(format!("column `{column}` did not cast to Float64")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("distance", DataType::Int64, true),
            Field::new("mode", DataType::Utf8, false),
            Field::new("empty", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![Some(10), None, Some(30)])),
                Arc::new(StringArray::from(vec!["car", "walk", "pt"])),
                Arc::new(Float64Array::from(vec![None::<f64>, None, None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn reads_ints_as_floats_without_nulls() {
        let s = Sample::from_batch(&batch(), "distance").unwrap();
        assert_eq!(s.values(), &[10.0, 30.0]);
        assert_eq!(s.name(), "distance");
        assert_eq!(s.min(), 10.0);
        assert_eq!(s.max(), 30.0);
    }

    #[test]
    fn missing_column() {
        let err = Sample::from_batch(&batch(), "nope").unwrap_err();
        assert!(matches!(err, TripLensError::ColumnNotFound(c) if c == "nope"));
    }

    #[test]
    fn string_column_rejected() {
        let err = Sample::from_batch(&batch(), "mode").unwrap_err();
        assert!(matches!(err, TripLensError::ColumnType { .. }));
    }

    #[test]
    fn all_null_column_is_empty() {
        assert!(matches!(Sample::from_batch(&batch(), "empty"), Err(TripLensError::EmptyInput(_))));
    }

    #[test]
    fn nan_rejected() {
        let err = Sample::new("x", vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, TripLensError::NonFiniteInput { index: 1, .. }));
    }

    #[test]
    fn histogram_from_sample() {
        let s = Sample::new("x", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let t = s.histogram(&HistogramOptions::new(2)).unwrap();
        assert_eq!(t.total(), 4);
    }
}
