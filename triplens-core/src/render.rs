use serde_json::{json, Map, Value};
use std::io::Write;
use triplens_common::{Result, TripLensError};

use crate::hexbin::hex_center;
use crate::histogram::HistogramTable;
use crate::plot::{HexTilePlot, HistogramPlot, LinePlot, Plot, ScatterPlot};

/// Output sink for plots. Callers pass one in explicitly; nothing renders to a global display.
pub trait Renderer {
    fn render(&mut self, plot: &Plot) -> Result<()>;

    /// Called once after the last plot.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

pub fn render_all<R: Renderer + ?Sized>(renderer: &mut R, plots: &[Plot]) -> Result<()> {
    for plot in plots {
        renderer.render(plot)?;
    }
    renderer.finish()
}

// --- plain text ---

pub struct TextRenderer<W: Write> {
    out: W,
    bar_width: usize,
    bar_char: String,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: 40,
            bar_char: "█".into(),
        }
    }

    pub fn with_bar(mut self, width: usize, bar_char: &str) -> Self {
        self.bar_width = width.max(1);
        self.bar_char = bar_char.to_string();
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn histogram(&mut self, p: &HistogramPlot) -> Result<()> {
        writeln!(self.out, "{}", p.title)?;
        writeln!(self.out, "{:>20}  {} ({})", p.x_axis_label, p.y_axis_label, p.column)?;
        let t = &p.table;
        let max_h = t.iter().map(|b| t.height(b)).fold(0.0, f64::max);
        for bin in t {
            let h = t.height(bin);
            let blen = if max_h > 0.0 { (h / max_h * self.bar_width as f64).round() as usize } else { 0 };
            let bar = self.bar_char.repeat(blen);
            let pad = " ".repeat(self.bar_width - blen.min(self.bar_width));
            let log = match (t.log_scale, bin.log_count) {
                (false, _) => String::new(),
                (true, Some(l)) => format!("  ln={l:.3}"),
                (true, None) => "  ln=undefined".into(),
            };
            writeln!(self.out, "{:>20} |{bar}{pad}| {}{log}", bin.interval, bin.count)?;
        }
        writeln!(self.out, "{:>20}  {} values in {} bins", "", t.total(), t.len())?;
        Ok(())
    }

    fn scatter(&mut self, p: &ScatterPlot) -> Result<()> {
        const COLS: usize = 60;
        const ROWS: usize = 16;
        writeln!(self.out, "{}", p.title)?;
        if p.points.is_empty() {
            writeln!(self.out, "  (no points)")?;
            return Ok(());
        }
        let (xlo, xhi, ylo, yhi) = bounds(&p.points);
        let mut grid = vec![vec![' '; COLS]; ROWS];
        for &(x, y) in &p.points {
            let c = scale(x, xlo, xhi, COLS);
            let r = ROWS - 1 - scale(y, ylo, yhi, ROWS);
            grid[r][c] = '•';
        }
        writeln!(self.out, "{:>10.2} ┐", yhi)?;
        for row in grid {
            writeln!(self.out, "{:>10} │{}", "", row.into_iter().collect::<String>())?;
        }
        writeln!(self.out, "{:>10.2} └{}", ylo, "─".repeat(COLS))?;
        writeln!(self.out, "{:>12}{:<.2}{:>w$.2}", "", xlo, xhi, w = COLS - 4)?;
        writeln!(self.out, "  x: {}  y: {}  n={}", p.x_axis_label, p.y_axis_label, p.points.len())?;
        Ok(())
    }

    fn hex_tiles(&mut self, p: &HexTilePlot) -> Result<()> {
        writeln!(self.out, "{}", p.title)?;
        let max = p.max_count();
        let mut tiles = p.tiles.clone();
        tiles.sort_by(|a, b| b.count.cmp(&a.count).then((a.q, a.r).cmp(&(b.q, b.r))));
        writeln!(self.out, "{:>6} {:>6} {:>12} {:>12} {:>8} {:>5}", "q", "r", "x", "y", "count", "shade")?;
        for t in tiles.iter().take(20) {
            let (x, y) = hex_center(t.q, t.r, p.size);
            writeln!(self.out, "{:>6} {:>6} {:>12.4} {:>12.4} {:>8} {:>5}", t.q, t.r, x, y, t.count, t.shade(max, 256))?;
        }
        if tiles.len() > 20 {
            writeln!(self.out, "  ... {} more tiles", tiles.len() - 20)?;
        }
        Ok(())
    }

    fn lines(&mut self, p: &LinePlot) -> Result<()> {
        writeln!(self.out, "{}", p.title)?;
        let f = &p.frame;
        if let (Some(first), Some(last)) = (f.index.first(), f.index.last()) {
            writeln!(self.out, "  {} .. {} ({} periods)", first, last, f.len())?;
        }
        writeln!(self.out, "{:>8} {:>12} {:>12} {:>12} {:>12}", "series", "first", "last", "min", "max")?;
        for s in &f.series {
            let (Some(&first), Some(&last)) = (s.values.first(), s.values.last()) else { continue };
            let min = s.values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = s.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            writeln!(self.out, "{:>8} {:>12.3} {:>12.3} {:>12.3} {:>12.3}", s.name, first, last, min, max)?;
        }
        Ok(())
    }
}

fn bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(xlo, xhi, ylo, yhi), &(x, y)| (xlo.min(x), xhi.max(x), ylo.min(y), yhi.max(y)),
    )
}

/// Cell index of `v` in `0..cells` over `[lo, hi]`.
fn scale(v: f64, lo: f64, hi: f64, cells: usize) -> usize {
    if hi <= lo {
        return 0;
    }
    (((v - lo) / (hi - lo)) * (cells - 1) as f64).round().clamp(0.0, (cells - 1) as f64) as usize
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, plot: &Plot) -> Result<()> {
        match plot {
            Plot::Histogram(p) => self.histogram(p)?,
            Plot::Scatter(p) => self.scatter(p)?,
            Plot::HexTiles(p) => self.hex_tiles(p)?,
            Plot::Lines(p) => self.lines(p)?,
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

// --- JSON data sources ---

/// Writes each plot as one line of JSON holding a column-oriented data source.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Column-oriented view of a histogram: counts under `column`, then edges, labels and log counts.
pub fn histogram_source(table: &HistogramTable, column: &str) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(column.to_string(), json!(table.iter().map(|b| b.count).collect::<Vec<_>>()));
    data.insert("left".into(), json!(table.iter().map(|b| b.left).collect::<Vec<_>>()));
    data.insert("right".into(), json!(table.iter().map(|b| b.right).collect::<Vec<_>>()));
    data.insert("interval".into(), json!(table.iter().map(|b| b.interval.as_str()).collect::<Vec<_>>()));
    if table.log_scale {
        data.insert("log".into(), json!(table.iter().map(|b| b.log_count).collect::<Vec<_>>()));
    }
    data
}

pub fn plot_document(plot: &Plot) -> Value {
    match plot {
        Plot::Histogram(p) => {
            let top = if p.table.log_scale { "log".to_string() } else { p.column.clone() };
            json!({
                "kind": "histogram",
                "title": p.title,
                "x_axis_label": p.x_axis_label,
                "y_axis_label": p.y_axis_label,
                "top": top,
                "fill_color": p.style.fill_color,
                "hover_fill_color": p.style.hover_color,
                "tooltips": p.tooltips,
                "data": histogram_source(&p.table, &p.column),
            })
        }
        Plot::Scatter(p) => json!({
            "kind": "scatter",
            "title": p.title,
            "x_axis_label": p.x_axis_label,
            "y_axis_label": p.y_axis_label,
            "data": {
                "x": p.points.iter().map(|pt| pt.0).collect::<Vec<_>>(),
                "y": p.points.iter().map(|pt| pt.1).collect::<Vec<_>>(),
            },
        }),
        Plot::HexTiles(p) => json!({
            "kind": "hex_tiles",
            "title": p.title,
            "size": p.size,
            "data": {
                "q": p.tiles.iter().map(|t| t.q).collect::<Vec<_>>(),
                "r": p.tiles.iter().map(|t| t.r).collect::<Vec<_>>(),
                "counts": p.tiles.iter().map(|t| t.count).collect::<Vec<_>>(),
            },
        }),
        Plot::Lines(p) => {
            let mut data = Map::new();
            data.insert(
                "index".into(),
                json!(p.frame.index.iter().map(|d| d.to_string()).collect::<Vec<_>>()),
            );
            for s in &p.frame.series {
                data.insert(s.name.clone(), json!(s.values));
            }
            json!({ "kind": "lines", "title": p.title, "data": data })
        }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, plot: &Plot) -> Result<()> {
        serde_json::to_writer(&mut self.out, &plot_document(plot))
            .map_err(|e| TripLensError::Other(e.to_string()))?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hexbin::HexBin;
    use crate::histogram::build_histogram;
    use crate::plot::{hist_hover, trips_by_time_of_day, HistogramStyle};

    fn hist_plot(log: bool) -> Plot {
        let t = build_histogram(&[0.0, 0.0, 0.0, 10.0], 3, log).unwrap();
        Plot::Histogram(hist_hover(t, "distance", &HistogramStyle::default()))
    }

    #[test]
    fn text_histogram_lists_every_bin() {
        let mut r = TextRenderer::new(Vec::new()).with_bar(10, "#");
        r.render(&hist_plot(false)).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.starts_with("Histogram of Distance\n"));
        assert!(out.contains("0 to 3 |##########| 3"));
        assert!(out.contains("3 to 6 |          | 0"));
        assert!(out.contains("4 values in 3 bins"));
    }

    #[test]
    fn text_histogram_flags_undefined_log() {
        let mut r = TextRenderer::new(Vec::new());
        r.render(&hist_plot(true)).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.contains("ln=undefined"));
        assert!(out.contains("Log Count"));
    }

    #[test]
    fn text_scatter_and_hex() {
        let mut r = TextRenderer::new(Vec::new());
        let plots = vec![
            Plot::Scatter(trips_by_time_of_day(vec![(8.0, 1.0), (17.5, 12.0)])),
            Plot::HexTiles(HexTilePlot {
                title: "Start location of trips".into(),
                size: 0.01,
                tiles: vec![HexBin { q: 0, r: 0, count: 4 }, HexBin { q: 1, r: 0, count: 2 }],
            }),
        ];
        render_all(&mut r, &plots).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.contains("Trips by Time of Day"));
        assert!(out.contains("n=2"));
        assert!(out.contains("Start location of trips"));
    }

    #[test]
    fn json_histogram_is_column_oriented() {
        let mut r = JsonRenderer::new(Vec::new());
        r.render(&hist_plot(true)).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        let v: Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(v["kind"], "histogram");
        assert_eq!(v["top"], "log");
        assert_eq!(v["data"]["distance"], json!([3, 0, 1]));
        assert_eq!(v["data"]["interval"][2], "6 to 10");
        assert!(v["data"]["log"][1].is_null());
        assert_eq!(v["tooltips"][0], json!(["Interval", "@interval"]));
    }

    #[test]
    fn json_writes_one_line_per_plot() {
        let mut r = JsonRenderer::new(Vec::new());
        render_all(&mut r, &[hist_plot(false), hist_plot(false)]).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }
}
