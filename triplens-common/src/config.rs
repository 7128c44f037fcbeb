use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_bar_char")]
    pub bar_char: String,
}

fn default_theme() -> String {
    "dark".into()
}
fn default_bar_char() -> String {
    "█".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            bar_char: default_bar_char(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default)]
    pub log_scale: bool,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_hover_color")]
    pub hover_color: String,
}

fn default_bins() -> usize {
    30
}
fn default_fill_color() -> String {
    "SteelBlue".into()
}
fn default_hover_color() -> String {
    "Tan".into()
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            log_scale: false,
            fill_color: default_fill_color(),
            hover_color: default_hover_color(),
        }
    }
}

/// Column names of the trip log, as written by the trips processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripColumnsConfig {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_finish")]
    pub finish: String,
    #[serde(default = "default_person")]
    pub person: String,
    #[serde(default = "default_distance")]
    pub distance: String,
    #[serde(default = "default_x")]
    pub x: String,
    #[serde(default = "default_y")]
    pub y: String,
}

fn default_start() -> String {
    "time".into()
}
fn default_finish() -> String {
    "finishTime".into()
}
fn default_person() -> String {
    "personId".into()
}
fn default_distance() -> String {
    "distance".into()
}
fn default_x() -> String {
    "x".into()
}
fn default_y() -> String {
    "y".into()
}

impl Default for TripColumnsConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            finish: default_finish(),
            person: default_person(),
            distance: default_distance(),
            x: default_x(),
            y: default_y(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexbinConfig {
    #[serde(default = "default_hex_size")]
    pub size: f64,
}

fn default_hex_size() -> f64 {
    0.01
}

impl Default for HexbinConfig {
    fn default() -> Self {
        Self { size: default_hex_size() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesConfig {
    #[serde(default = "default_periods")]
    pub periods: usize,
    #[serde(default = "default_start_date")]
    pub start_date: String, // YYYY-MM-DD
    #[serde(default = "default_series_columns")]
    pub columns: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_periods() -> usize {
    1000
}
fn default_start_date() -> String {
    "2000-01-01".into()
}
fn default_series_columns() -> Vec<String> {
    ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect()
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            start_date: default_start_date(),
            columns: default_series_columns(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_format() -> String {
    "json".into()
}
fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub trips: TripColumnsConfig,
    #[serde(default)]
    pub hexbin: HexbinConfig,
    #[serde(default)]
    pub timeseries: TimeSeriesConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("triplens")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("TRIPLENS_CONFIG") {
            PathBuf::from(env_path) // $TRIPLENS_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let cfg: Self =
            toml::from_str(&content).map_err(|e| crate::TripLensError::Config(e.to_string()))?;
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::TripLensError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
