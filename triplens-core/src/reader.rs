use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use triplens_common::{Result, TripLensError};

use crate::scanner::{LogFormat, TripLogPath};

const SCHEMA_INFER_RECORDS: usize = 1000;
const BATCH_SIZE: usize = 65536;

pub fn read_table(log: &TripLogPath) -> Result<RecordBatch> {
    let batch = match log.format {
        LogFormat::Csv => read_csv(&log.path)?,
        LogFormat::Parquet => read_parquet(&log.path)?,
    };
    tracing::debug!(path = %log.path.display(), rows = batch.num_rows(), "loaded trip log");
    Ok(batch)
}

/// CSV with a header row; lines starting with `#` are skipped.
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = std::fs::File::open(path)?;
    let format = Format::default().with_header(true).with_comment(b'#');
    let (schema, _) = format.infer_schema(&mut file, Some(SCHEMA_INFER_RECORDS))?;
    file.rewind()?;
    let schema: SchemaRef = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(TripLensError::Parquet)?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(BATCH_SIZE)
        .build()
        .map_err(TripLensError::Parquet)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Loads every log in parallel and stacks them in input order. All logs must share one schema.
pub fn read_tables_parallel(paths: &[TripLogPath]) -> Result<RecordBatch> {
    let Some(first) = paths.first() else {
        return Err(TripLensError::EmptyInput("no trip logs to read".into()));
    };
    let tables = paths
        .par_iter()
        .map(read_table)
        .collect::<Result<Vec<RecordBatch>>>()?;
    let schema = tables[0].schema();
    for (log, table) in paths.iter().zip(&tables).skip(1) {
        if table.schema() != schema {
            return Err(TripLensError::SchemaMismatch {
                first: first.path.display().to_string(),
                other: log.path.display().to_string(),
            });
        }
    }
    tracing::info!(files = tables.len(), "read trip logs");
    Ok(concat_batches(&schema, &tables)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use arrow::datatypes::DataType;

    fn write(dir: &Path, name: &str, body: &str) -> TripLogPath {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        TripLogPath::new(path).unwrap()
    }

    #[test]
    fn csv_skips_comments_and_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let log = write(
            dir.path(),
            "trips.csv",
            "# written by trips processor\npersonId,time,distance\np1,28800,1.5\n#mid comment\np2,30000,\n",
        );
        let batch = read_table(&log).unwrap();
        assert_eq!(batch.num_rows(), 2);
        let schema = batch.schema();
        assert_eq!(schema.field_with_name("time").unwrap().data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("distance").unwrap().data_type(), &DataType::Float64);
        assert_eq!(batch.column(2).null_count(), 1);
    }

    #[test]
    fn parallel_read_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "time,distance\n1,1.5\n2,2.5\n");
        let b = write(dir.path(), "b.csv", "time,distance\n3,3.5\n");
        let batch = read_tables_parallel(&[a, b]).unwrap();
        assert_eq!(batch.num_rows(), 3);
        let time = crate::sample::numeric_column(&batch, "time").unwrap();
        assert_eq!(time.values().to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn parallel_read_rejects_mismatched_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "time,distance\n1,1.5\n");
        let b = write(dir.path(), "b.csv", "time,mode\n3,car\n");
        assert!(matches!(read_tables_parallel(&[a, b]), Err(TripLensError::SchemaMismatch { .. })));
    }

    #[test]
    fn no_paths_is_empty_input() {
        assert!(matches!(read_tables_parallel(&[]), Err(TripLensError::EmptyInput(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let log = TripLogPath::new(std::path::PathBuf::from("/definitely/not/here.csv")).unwrap();
        assert!(matches!(read_table(&log), Err(TripLensError::Io(_))));
    }
}
