use serde::{Deserialize, Serialize};
use triplens_common::HistogramConfig;

use crate::hexbin::HexBin;
use crate::histogram::HistogramTable;
use crate::timeseries::TimeSeriesFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramStyle {
    pub fill_color: String,
    pub hover_color: String,
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self {
            fill_color: "SteelBlue".into(),
            hover_color: "Tan".into(),
        }
    }
}

impl From<&HistogramConfig> for HistogramStyle {
    fn from(cfg: &HistogramConfig) -> Self {
        Self {
            fill_color: cfg.fill_color.clone(),
            hover_color: cfg.hover_color.clone(),
        }
    }
}

/// Quad histogram with a hover tooltip per bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramPlot {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    /// Name the counts are published under; tooltips refer to it as `@{column}`.
    pub column: String,
    pub table: HistogramTable,
    pub style: HistogramStyle,
    pub tooltips: Vec<(String, String)>,
}

impl HistogramPlot {
    /// Tooltip lines for one bin, with `@field` references resolved.
    pub fn tooltip_for(&self, index: usize) -> Vec<(String, String)> {
        let Some(bin) = self.table.bins.get(index) else {
            return Vec::new();
        };
        self.tooltips
            .iter()
            .map(|(label, field)| {
                let value = match field.trim_start_matches('@') {
                    "interval" => bin.interval.clone(),
                    "left" => bin.left.to_string(),
                    "right" => bin.right.to_string(),
                    "log" => bin.log_count.map_or("undefined".into(), |l| format!("{l:.3}")),
                    f if f == self.column => bin.count.to_string(),
                    other => format!("@{other}"),
                };
                (label.clone(), value)
            })
            .collect()
    }
}

pub fn hist_hover(table: HistogramTable, column: &str, style: &HistogramStyle) -> HistogramPlot {
    let name = capitalize(column);
    let y_axis_label = if table.log_scale { "Log Count" } else { "Count" };
    HistogramPlot {
        title: format!("Histogram of {name}"),
        x_axis_label: name,
        y_axis_label: y_axis_label.into(),
        column: column.to_string(),
        table,
        style: style.clone(),
        tooltips: vec![
            ("Interval".into(), "@interval".into()),
            ("Count".into(), format!("@{column}")),
        ],
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub points: Vec<(f64, f64)>,
}

pub fn trips_by_time_of_day(points: Vec<(f64, f64)>) -> ScatterPlot {
    ScatterPlot {
        title: "Trips by Time of Day".into(),
        x_axis_label: "Time".into(),
        y_axis_label: "Distance".into(),
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexTilePlot {
    pub title: String,
    pub size: f64,
    pub tiles: Vec<HexBin>,
}

impl HexTilePlot {
    pub fn max_count(&self) -> u64 {
        self.tiles.iter().map(|t| t.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlot {
    pub title: String,
    pub frame: TimeSeriesFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    Histogram(HistogramPlot),
    Scatter(ScatterPlot),
    HexTiles(HexTilePlot),
    Lines(LinePlot),
}

impl Plot {
    pub fn title(&self) -> &str {
        match self {
            Plot::Histogram(p) => &p.title,
            Plot::Scatter(p) => &p.title,
            Plot::HexTiles(p) => &p.title,
            Plot::Lines(p) => &p.title,
        }
    }
}
