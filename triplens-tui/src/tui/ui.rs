use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Tabs,
    },
};
use triplens_core::{hex_center, HexTilePlot, HistogramPlot, LinePlot, Plot, ScatterPlot};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_tabs(frame, app, chunks[0], theme);
    app.hist_area.set(None);
    match app.current().map(|t| &t.plot) {
        Some(Plot::Histogram(p)) => render_histogram(frame, app, p, chunks[1]),
        Some(Plot::Scatter(p)) => render_scatter(frame, p, chunks[1], theme),
        Some(Plot::HexTiles(p)) => render_hex(frame, p, chunks[1], theme),
        Some(Plot::Lines(p)) => render_lines(frame, p, chunks[1], theme),
        None => frame.render_widget(Paragraph::new("no plots").block(Block::default().borders(Borders::ALL)), chunks[1]),
    }
    render_bottombar(frame, app, chunks[2], theme);
    if app.show_help { render_help(frame, area); }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let tabs = Tabs::new(app.titles())
        .select(app.selected)
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn render_histogram(frame: &mut Frame, app: &App, p: &HistogramPlot, area: Rect) {
    let theme = &app.theme;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);
    let block = Block::default().borders(Borders::ALL).title(format!("{} ({} vs {})", p.title, p.y_axis_label, p.x_axis_label));
    let inner = block.inner(parts[0]);
    let t = &p.table;
    let n = t.len().max(1);
    let bar_w = (inner.width as usize / n).max(1) as u16;
    // log heights are fractional; scale so the bar chart keeps two decimals
    let scale = if t.log_scale { 100.0 } else { 1.0 };
    let bars: Vec<Bar> = t.iter().enumerate().map(|(i, bin)| {
        let color = if i == app.hover { app.hover_fill } else { app.fill };
        let text = match (t.log_scale, bin.log_count) {
            (true, Some(l)) => format!("{l:.1}"),
            (true, None) => "-".into(),
            (false, _) => bin.count.to_string(),
        };
        Bar::default()
            .value((t.height(bin) * scale).round() as u64)
            .text_value(text)
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(theme.bg).bg(color))
    }).collect();
    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_w)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, parts[0]);
    app.hist_area.set(Some(inner));

    let mut lines: Vec<Line> = p.tooltip_for(app.hover).into_iter().map(|(label, value)| {
        Line::from(vec![Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)), Span::raw(value)])
    }).collect();
    if t.log_scale {
        let log = t.bins.get(app.hover).and_then(|b| b.log_count).map_or("undefined".into(), |l| format!("{l:.3}"));
        lines.push(Line::from(format!("Log: {log}")));
    }
    let tip = Block::default().borders(Borders::ALL).title(format!("Bin {}/{}", app.hover + 1, t.len()))
        .border_style(Style::default().fg(app.hover_fill));
    frame.render_widget(Paragraph::new(lines).block(tip), parts[1]);
}

fn render_scatter(frame: &mut Frame, p: &ScatterPlot, area: Rect, theme: &Theme) {
    let (xb, yb) = bounds(p.points.iter().copied());
    let data = Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(theme.points))
        .data(&p.points);
    let chart = Chart::new(vec![data])
        .block(Block::default().borders(Borders::ALL).title(p.title.clone()))
        .x_axis(axis(&p.x_axis_label, xb, theme))
        .y_axis(axis(&p.y_axis_label, yb, theme));
    frame.render_widget(chart, area);
}

fn render_hex(frame: &mut Frame, p: &HexTilePlot, area: Rect, theme: &Theme) {
    let levels = theme.shades.len();
    let max = p.max_count();
    let mut layers: Vec<Vec<(f64, f64)>> = vec![Vec::new(); levels];
    for tile in &p.tiles {
        layers[tile.shade(max, levels)].push(hex_center(tile.q, tile.r, p.size));
    }
    let (xb, yb) = bounds(layers.iter().flatten().copied());
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(format!("{} ({} tiles, max {})", p.title, p.tiles.len(), max)))
        .marker(Marker::Braille)
        .x_bounds([xb[0] - p.size, xb[1] + p.size])
        .y_bounds([yb[0] - p.size, yb[1] + p.size])
        .paint(|ctx| {
            for (level, coords) in layers.iter().enumerate() {
                ctx.draw(&Points { coords: coords.as_slice(), color: theme.shade(level) });
            }
        });
    frame.render_widget(canvas, area);
}

fn render_lines(frame: &mut Frame, p: &LinePlot, area: Rect, theme: &Theme) {
    let f = &p.frame;
    let points: Vec<Vec<(f64, f64)>> = f.series.iter()
        .map(|s| s.values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect())
        .collect();
    let datasets: Vec<Dataset> = f.series.iter().zip(&points).enumerate().map(|(i, (s, pts))| {
        Dataset::default()
            .name(s.name.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.series[i % theme.series.len()]))
            .data(pts)
    }).collect();
    let (lo, hi) = f.value_bounds().unwrap_or((0.0, 1.0));
    let first = f.index.first().map(|d| d.to_string()).unwrap_or_default();
    let last = f.index.last().map(|d| d.to_string()).unwrap_or_default();
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(p.title.clone()))
        .x_axis(Axis::default().style(Style::default().fg(theme.axis))
            .bounds([0.0, f.len().saturating_sub(1).max(1) as f64])
            .labels(vec![Span::raw(first), Span::raw(last)]))
        .y_axis(axis("Value", pad([lo, hi]), theme));
    frame.render_widget(chart, area);
}

fn axis<'a>(title: &str, b: [f64; 2], theme: &Theme) -> Axis<'a> {
    Axis::default()
        .title(title.to_string())
        .style(Style::default().fg(theme.axis))
        .bounds(b)
        .labels(vec![Span::raw(fmt_tick(b[0])), Span::raw(fmt_tick((b[0] + b[1]) / 2.0)), Span::raw(fmt_tick(b[1]))])
}

/// Axis bounds of a point cloud, widened when a dimension has no extent.
fn bounds(points: impl Iterator<Item = (f64, f64)>) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = x;
    for (px, py) in points {
        x = [x[0].min(px), x[1].max(px)];
        y = [y[0].min(py), y[1].max(py)];
    }
    if !x[0].is_finite() { return ([0.0, 1.0], [0.0, 1.0]); }
    (pad(x), pad(y))
}

fn pad(b: [f64; 2]) -> [f64; 2] {
    if b[1] > b[0] { b } else { [b[0] - 0.5, b[1] + 0.5] }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q/Esc    Quit"),
        Line::from("  ?        Toggle help"),
        Line::from("  Tab      Next plot"),
        Line::from("  S-Tab    Previous plot"),
        Line::from("  ←/→      Move hovered bin"),
        Line::from("  Home     First bin"),
        Line::from("  mouse    Hover bin under cursor"),
        Line::from("  l        Toggle log scale"),
        Line::from("  +/-      More/fewer bins"),
    ];
    let popup = centered_rect(50, 50, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help (?)")), popup);
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    frame.render_widget(Paragraph::new(format!(" {}", app.status_msg)).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

fn fmt_tick(v: f64) -> String {
    if v.abs() >= 1000.0 || v == v.trunc() { format!("{v:.0}") } else { format!("{v:.2}") }
}
