use crate::tui::theme::{parse_color, Theme};
use ratatui::layout::Rect;
use ratatui::style::Color;
use std::cell::Cell;
use triplens_common::Config;
use triplens_core::{hist_hover, HistogramOptions, HistogramStyle, Plot, Sample};

/// One plot plus, for histograms, the sample it can be rebuilt from.
pub struct Tab {
    pub plot: Plot,
    pub source: Option<(Sample, HistogramOptions)>,
}

pub struct App {
    pub tabs: Vec<Tab>,
    pub selected: usize,
    pub hover: usize, // hovered bin of the current histogram
    pub show_help: bool,
    pub status_msg: String,
    pub should_quit: bool,
    pub theme: Theme,
    pub fill: Color,
    pub hover_fill: Color,
    /// Histogram drawing area from the last frame, for mouse hit-testing.
    pub hist_area: Cell<Option<Rect>>,
}

impl App {
    pub fn new(tabs: Vec<Tab>, config: &Config) -> Self {
        let theme = Theme::from_name(&config.display.theme);
        Self {
            tabs,
            selected: 0,
            hover: 0,
            show_help: false,
            status_msg: "Tab:next plot  ←/→:hover  l:log  +/-:bins  ?:help  q:quit".into(),
            should_quit: false,
            fill: parse_color(&config.histogram.fill_color, theme.points),
            hover_fill: parse_color(&config.histogram.hover_color, theme.highlight),
            theme,
            hist_area: Cell::new(None),
        }
    }

    pub fn current(&self) -> Option<&Tab> {
        self.tabs.get(self.selected)
    }

    pub fn titles(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.plot.title().to_string()).collect()
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.selected = (self.selected + 1) % self.tabs.len();
            self.hover = 0;
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.selected = (self.selected + self.tabs.len() - 1) % self.tabs.len();
            self.hover = 0;
        }
    }

    fn bin_count(&self) -> usize {
        match self.current().map(|t| &t.plot) {
            Some(Plot::Histogram(h)) => h.table.len(),
            _ => 0,
        }
    }

    pub fn hover_right(&mut self) {
        if self.hover + 1 < self.bin_count() {
            self.hover += 1;
        }
    }

    pub fn hover_left(&mut self) {
        self.hover = self.hover.saturating_sub(1);
    }

    /// Moves the hover to the bin under terminal column `x`, if the cursor is over the bars.
    pub fn hover_at(&mut self, x: u16, y: u16) {
        let Some(area) = self.hist_area.get() else { return };
        let n = self.bin_count();
        if n == 0 || x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
            return;
        }
        let bar_w = (area.width as usize / n).max(1);
        let idx = (x - area.x) as usize / bar_w;
        if idx < n {
            self.hover = idx;
        }
    }

    pub fn toggle_log(&mut self) {
        let log = match self.current().map(|t| &t.plot) {
            Some(Plot::Histogram(h)) => !h.table.log_scale,
            _ => return,
        };
        self.rebuild(|opts| opts.log_scale = log);
    }

    pub fn change_bins(&mut self, delta: isize) {
        self.rebuild(|opts| {
            let bins = opts.bins as isize + delta;
            opts.bins = bins.clamp(1, 500) as usize;
        });
    }

    fn rebuild(&mut self, update: impl FnOnce(&mut HistogramOptions)) {
        let Some(tab) = self.tabs.get_mut(self.selected) else { return };
        let (column, style): (String, HistogramStyle) = match &tab.plot {
            Plot::Histogram(plot) => (plot.column.clone(), plot.style.clone()),
            _ => return,
        };
        let Some((sample, opts)) = tab.source.as_mut() else {
            self.status_msg = "this histogram has no sample attached".into();
            return;
        };
        update(opts);
        match sample.histogram(opts) {
            Ok(table) => {
                self.status_msg = format!("{} bins{}", opts.bins, if opts.log_scale { ", log scale" } else { "" });
                tab.plot = Plot::Histogram(hist_hover(table, &column, &style));
                self.hover = self.hover.min(opts.bins - 1);
            }
            Err(e) => self.status_msg = format!("rebuild failed: {e}"),
        }
    }
}
