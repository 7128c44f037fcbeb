use arrow::record_batch::RecordBatch;
use triplens_common::{Config, Result, TripLensError};

use crate::hexbin::hexbin;
use crate::histogram::HistogramOptions;
use crate::plot::{hist_hover, trips_by_time_of_day, HexTilePlot, HistogramPlot, HistogramStyle, LinePlot, Plot};
use crate::sample::{numeric_column, Sample};
use crate::timeseries::{random_walk, RandomWalkConfig};
use crate::trips::time_of_day_points;

pub fn histogram_plot(batch: &RecordBatch, column: &str, opts: &HistogramOptions, style: &HistogramStyle) -> Result<HistogramPlot> {
    let sample = Sample::from_batch(batch, column)?;
    let table = sample.histogram(opts)?;
    Ok(hist_hover(table, column, style))
}

pub fn time_of_day_plot(batch: &RecordBatch, config: &Config) -> Result<Plot> {
    let points = time_of_day_points(batch, &config.trips)?;
    Ok(Plot::Scatter(trips_by_time_of_day(points)))
}

/// Hex tiles of trip start locations; rows missing either coordinate are skipped.
pub fn start_location_plot(batch: &RecordBatch, config: &Config, size: f64) -> Result<Plot> {
    let xs = numeric_column(batch, &config.trips.x)?;
    let ys = numeric_column(batch, &config.trips.y)?;
    let (x, y): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some((x?, y?)))
        .unzip();
    if x.is_empty() {
        return Err(TripLensError::EmptyInput("no trips with start coordinates".into()));
    }
    let tiles = hexbin(&x, &y, size)?;
    Ok(Plot::HexTiles(HexTilePlot {
        title: "Start location of trips".into(),
        size,
        tiles,
    }))
}

pub fn random_walk_plot(config: &Config) -> Result<Plot> {
    let cfg = RandomWalkConfig::from_config(&config.timeseries)?;
    let frame = random_walk(&cfg)?;
    Ok(Plot::Lines(LinePlot {
        title: format!("Random walk ({} series)", frame.series.len()),
        frame,
    }))
}

/// Every trip-log plot: time of day, start locations, then a histogram of `column`.
pub fn trip_plots(batch: &RecordBatch, config: &Config, column: &str) -> Result<Vec<Plot>> {
    let opts = HistogramOptions::new(config.histogram.bins).log_scale(config.histogram.log_scale);
    let style = HistogramStyle::from(&config.histogram);
    let mut plots = vec![time_of_day_plot(batch, config)?];
    match start_location_plot(batch, config, config.hexbin.size) {
        Ok(p) => plots.push(p),
        // start coordinates are optional in trip logs
        Err(TripLensError::ColumnNotFound(c)) => tracing::warn!(column = %c, "skipping start location plot"),
        Err(e) => return Err(e),
    }
    plots.push(Plot::Histogram(histogram_plot(batch, column, &opts, &style)?));
    Ok(plots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::derive_trip_columns;
    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn batch(with_xy: bool) -> RecordBatch {
        let mut fields = vec![
            Field::new("time", DataType::Int64, false),
            Field::new("finishTime", DataType::Int64, false),
            Field::new("distance", DataType::Float64, false),
        ];
        let mut cols: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![28800, 32400, 61200])),
            Arc::new(Int64Array::from(vec![29400, 33000, 63000])),
            Arc::new(Float64Array::from(vec![1.0, 4.0, 9.0])),
        ];
        if with_xy {
            fields.push(Field::new("x", DataType::Float64, true));
            fields.push(Field::new("y", DataType::Float64, true));
            cols.push(Arc::new(Float64Array::from(vec![Some(0.0), Some(0.001), None])));
            cols.push(Arc::new(Float64Array::from(vec![0.0, 0.0, 0.5])));
        }
        let b = RecordBatch::try_new(Arc::new(Schema::new(fields)), cols).unwrap();
        derive_trip_columns(&b, &Config::default().trips).unwrap()
    }

    #[test]
    fn full_dashboard() {
        let plots = trip_plots(&batch(true), &Config::default(), "distance").unwrap();
        assert_eq!(plots.len(), 3);
        let Plot::HexTiles(hex) = &plots[1] else { panic!("expected hex tiles") };
        assert_eq!(hex.tiles.iter().map(|t| t.count).sum::<u64>(), 2);
        let Plot::Histogram(h) = &plots[2] else { panic!("expected histogram") };
        assert_eq!(h.table.len(), 30);
        assert_eq!(h.table.total(), 3);
    }

    #[test]
    fn dashboard_without_coordinates_skips_hex() {
        let plots = trip_plots(&batch(false), &Config::default(), "duration").unwrap();
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[1].title(), "Histogram of Duration");
    }

    #[test]
    fn random_walk_from_config() {
        let mut config = Config::default();
        config.timeseries.periods = 10;
        config.timeseries.seed = Some(9);
        let Plot::Lines(l) = random_walk_plot(&config).unwrap() else { panic!("expected lines") };
        assert_eq!(l.frame.len(), 10);
    }
}
