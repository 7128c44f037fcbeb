use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use triplens_common::{Config, Result};
use triplens_core::{HistogramOptions, Plot, Renderer, Sample};

use crate::tui::app::{App, Tab};
use crate::tui::events::{handle_key, handle_mouse};
use crate::tui::ui::render;

/// Collects plots as tabs and shows them in an interactive viewer on `finish`.
pub struct TuiRenderer {
    config: Config,
    tabs: Vec<Tab>,
    samples: Vec<(String, Sample, HistogramOptions)>,
}

impl TuiRenderer {
    pub fn new(config: Config) -> Self {
        Self { config, tabs: Vec::new(), samples: Vec::new() }
    }

    /// Lets histograms of `column` be rebuilt in the viewer (bin count, log toggle).
    pub fn register_sample(&mut self, column: &str, sample: Sample, opts: HistogramOptions) {
        self.samples.push((column.to_string(), sample, opts));
    }

    pub fn into_app(mut self) -> App {
        for tab in &mut self.tabs {
            if let Plot::Histogram(h) = &tab.plot {
                if let Some(i) = self.samples.iter().position(|(c, _, _)| *c == h.column) {
                    let (_, sample, opts) = self.samples.swap_remove(i);
                    tab.source = Some((sample, opts));
                }
            }
        }
        App::new(self.tabs, &self.config)
    }
}

impl Renderer for TuiRenderer {
    fn render(&mut self, plot: &Plot) -> Result<()> {
        tracing::debug!(title = plot.title(), "queued plot for viewer");
        self.tabs.push(Tab { plot: plot.clone(), source: None });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.tabs.is_empty() {
            tracing::warn!("nothing to show");
            return Ok(());
        }
        let taken = TuiRenderer {
            config: self.config.clone(),
            tabs: std::mem::take(&mut self.tabs),
            samples: std::mem::take(&mut self.samples),
        };
        let mut app = taken.into_app();
        run(&mut app)
    }
}

fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick = Duration::from_millis(66); // 15Hz
    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|f| render(f, &*app))?;
            if event::poll(tick)? {
                match event::read()? {
                    Event::Key(key) => handle_key(app, key),
                    Event::Mouse(mouse) => handle_mouse(app, mouse),
                    _ => {}
                }
            }
            if app.should_quit { return Ok(()); }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}
