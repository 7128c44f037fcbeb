use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use triplens_common::{Result, TripColumnsConfig, TripLensError};

use crate::describe::{describe, Describe};
use crate::reader::read_tables_parallel;
use crate::sample::{numeric_column, Sample};
use crate::scanner::resolve_paths;

pub const DURATION: &str = "duration";
pub const CLOCK_TIME_HOURS: &str = "clock_time_hours";
pub const CLOCK_TIME_MINUTES: &str = "clock_time_minutes";

/// Resolves `input`, reads every trip log it names and appends the derived columns.
pub fn load_trips(input: &str, cols: &TripColumnsConfig) -> Result<RecordBatch> {
    let paths = resolve_paths(input)?;
    if paths.is_empty() {
        return Err(TripLensError::EmptyInput(format!("no trip logs found: {input}")));
    }
    let batch = read_tables_parallel(&paths)?;
    derive_trip_columns(&batch, cols)
}

/// Appends `duration`, `clock_time_hours` and `clock_time_minutes`; start and finish are seconds past midnight.
pub fn derive_trip_columns(batch: &RecordBatch, cols: &TripColumnsConfig) -> Result<RecordBatch> {
    let start = numeric_column(batch, &cols.start)?;
    let finish = numeric_column(batch, &cols.finish)?;
    let duration: Float64Array = start
        .iter()
        .zip(finish.iter())
        .map(|(s, f)| Some(f? - s?))
        .collect();
    let hours: Float64Array = start.iter().map(|s| s.map(|s| s / 3600.0)).collect();
    let minutes: Int64Array = start
        .iter()
        .map(|s| s.map(|s| (s / 60.0).trunc() as i64))
        .collect();
    let batch = with_column(batch, DURATION, Arc::new(duration))?;
    let batch = with_column(&batch, CLOCK_TIME_HOURS, Arc::new(hours))?;
    with_column(&batch, CLOCK_TIME_MINUTES, Arc::new(minutes))
}

/// Adds `array` under `name`, replacing a column of the same name.
pub fn with_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns = batch.columns().to_vec();
    let field = Arc::new(Field::new(name, array.data_type().clone(), true));
    match fields.iter().position(|f| f.name() == name) {
        Some(i) => {
            fields[i] = field;
            columns[i] = array;
        }
        None => {
            fields.push(field);
            columns.push(array);
        }
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Distinct non-null values of `column`, compared as strings.
pub fn distinct_count(batch: &RecordBatch, column: &str) -> Result<usize> {
    let array = batch
        .column_by_name(column)
        .ok_or_else(|| TripLensError::ColumnNotFound(column.to_string()))?;
    let as_str = cast(array, &DataType::Utf8)?;
    let strings = as_str
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| TripLensError::Other(format!("column `{column}` did not cast to Utf8")))?;
    Ok(strings.iter().flatten().collect::<HashSet<&str>>().len())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    pub activities: usize,
    pub people: usize,
    pub duration: Describe,
}

/// Expects a batch that already carries the derived `duration` column.
pub fn summarize_trips(batch: &RecordBatch, cols: &TripColumnsConfig) -> Result<TripSummary> {
    let people = distinct_count(batch, &cols.person)?;
    let duration = describe(&Sample::from_batch(batch, DURATION)?);
    Ok(TripSummary {
        activities: batch.num_rows(),
        people,
        duration,
    })
}

/// `(clock_time_hours, distance)` for every row where both are present.
pub fn time_of_day_points(batch: &RecordBatch, cols: &TripColumnsConfig) -> Result<Vec<(f64, f64)>> {
    let hours = numeric_column(batch, CLOCK_TIME_HOURS)?;
    let distance = numeric_column(batch, &cols.distance)?;
    Ok(hours
        .iter()
        .zip(distance.iter())
        .filter_map(|(h, d)| Some((h?, d?)))
        .collect())
}
