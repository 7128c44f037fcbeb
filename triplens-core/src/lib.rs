pub mod dashboard;
pub mod describe;
pub mod export;
pub mod hexbin;
pub mod histogram;
pub mod plot;
pub mod reader;
pub mod render;
pub mod sample;
pub mod scanner;
pub mod timeseries;
pub mod trips;

pub use dashboard::{histogram_plot, random_walk_plot, start_location_plot, time_of_day_plot, trip_plots};
pub use describe::{describe, Describe};
pub use export::{export_histogram_csv, export_histogram_json, print_summary, write_histogram_csv, write_summary};
pub use hexbin::{cartesian_to_axial, hex_center, hexbin, HexBin};
pub use histogram::{
    build_histogram, build_histogram_with, interval_label, HistogramBin, HistogramOptions, HistogramTable,
    DEFAULT_BINS,
};
pub use plot::{
    capitalize, hist_hover, trips_by_time_of_day, HexTilePlot, HistogramPlot, HistogramStyle, LinePlot, Plot,
    ScatterPlot,
};
pub use reader::{read_csv, read_parquet, read_table, read_tables_parallel};
pub use render::{plot_document, render_all, JsonRenderer, Renderer, TextRenderer};
pub use sample::{numeric_column, Sample};
pub use scanner::{resolve_paths, LogFormat, TripLogPath};
pub use timeseries::{random_walk, RandomWalkConfig, Series, TimeSeriesFrame};
pub use trips::{derive_trip_columns, load_trips, summarize_trips, time_of_day_points, TripSummary};
pub use triplens_common::{Config, Result, TripLensError};
