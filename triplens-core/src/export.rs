use std::io::Write;
use std::path::Path;
use triplens_common::{Result, TripLensError};

use crate::histogram::HistogramTable;
use crate::plot::{HistogramPlot, Plot};
use crate::render::plot_document;
use crate::trips::TripSummary;

// --- headless summary output ---

pub fn print_summary(summary: &TripSummary) {
    let mut out = std::io::stdout().lock();
    // stdout closing early (e.g. piped into head) is not worth an error
    let _ = write_summary(&mut out, summary);
}

pub fn write_summary<W: Write>(out: &mut W, summary: &TripSummary) -> std::io::Result<()> {
    writeln!(out, "{:<24} {}", "Number of activities:", summary.activities)?;
    writeln!(out, "{:<24} {}", "Number of people:", summary.people)?;
    writeln!(out)?;
    writeln!(out, "Duration metrics:")?;
    for (name, value) in summary.duration.rows() {
        writeln!(out, "{:<8} {:>16}", name, value)?;
    }
    Ok(())
}

// --- JSON export ---

pub fn export_histogram_json(output_path: &Path, plot: &HistogramPlot) -> Result<()> {
    let doc = plot_document(&Plot::Histogram(plot.clone()));
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &doc).map_err(|e| TripLensError::Other(e.to_string()))?;
    Ok(())
}

// --- CSV export ---

fn csv_escape(raw: &str) -> String {
    // wrap in quotes if contains comma, quote, or newline
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// One row per bin: count under `column`, then left, right, interval, and log when present.
pub fn export_histogram_csv(output_path: &Path, table: &HistogramTable, column: &str) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    write_histogram_csv(&mut file, table, column)?;
    Ok(())
}

pub fn write_histogram_csv<W: Write>(out: &mut W, table: &HistogramTable, column: &str) -> std::io::Result<()> {
    let log_header = if table.log_scale { ",log" } else { "" };
    writeln!(out, "{},left,right,interval{log_header}", csv_escape(column))?;
    for bin in table {
        write!(out, "{},{},{},{}", bin.count, bin.left, bin.right, csv_escape(&bin.interval))?;
        if table.log_scale {
            // empty field for an undefined log count
            match bin.log_count {
                Some(l) => write!(out, ",{l}")?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::describe;
    use crate::histogram::build_histogram;
    use crate::plot::{hist_hover, HistogramStyle};
    use crate::sample::Sample;

    #[test]
    fn csv_rows_per_bin() {
        let t = build_histogram(&[0.0, 1.0, 2.0, 3.0], 2, true).unwrap();
        let mut buf = Vec::new();
        write_histogram_csv(&mut buf, &t, "trip, distance").unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "\"trip, distance\",left,right,interval,log");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2,0,1.5,0 to 1,"));
    }

    #[test]
    fn csv_leaves_undefined_log_empty() {
        let t = build_histogram(&[0.0, 0.0, 9.0], 3, true).unwrap();
        let mut buf = Vec::new();
        write_histogram_csv(&mut buf, &t, "d").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().nth(2), Some("0,3,6,3 to 6,"));
    }

    #[test]
    fn json_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.json");
        let t = build_histogram(&[1.0, 2.0], 2, false).unwrap();
        export_histogram_json(&path, &hist_hover(t, "distance", &HistogramStyle::default())).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["data"]["distance"], serde_json::json!([1, 1]));
    }

    #[test]
    fn summary_block() {
        let summary = TripSummary {
            activities: 3,
            people: 2,
            duration: describe(&Sample::new("duration", vec![60.0, 120.0, 180.0]).unwrap()),
        };
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Number of activities:    3"));
        assert!(out.contains("Number of people:        2"));
        assert!(out.contains("mean           120.000000"));
    }
}
