use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use triplens_common::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Csv,
    Parquet,
}

impl LogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Some(Self::Parquet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLogPath {
    pub path: PathBuf,
    pub format: LogFormat,
}

impl TripLogPath {
    pub fn new(path: PathBuf) -> Option<Self> {
        LogFormat::from_path(&path).map(|format| Self { path, format })
    }
}

pub fn scan_directory(base: &Path) -> Result<Vec<TripLogPath>> {
    let mut results = Vec::new();
    scan_recursive(base, &mut results)?;
    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}

fn scan_recursive(dir: &Path, out: &mut Vec<TripLogPath>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_recursive(&path, out)?;
        } else if let Some(tp) = TripLogPath::new(path) {
            out.push(tp);
        }
    }
    Ok(())
}

/// resolve a path string: single file, directory, or glob pattern
pub fn resolve_paths(input: &str) -> Result<Vec<TripLogPath>> {
    let path = Path::new(input);
    if path.is_file() {
        // an explicit file with an unknown extension is read as CSV
        let format = LogFormat::from_path(path).unwrap_or(LogFormat::Csv);
        return Ok(vec![TripLogPath { path: path.to_path_buf(), format }]);
    }
    if path.is_dir() {
        return scan_directory(path);
    }
    let mut results = Vec::new();
    match glob::glob(input) {
        Ok(entries) => {
            for entry in entries.flatten() {
                if entry.is_file() {
                    if let Some(tp) = TripLogPath::new(entry) {
                        results.push(tp);
                    }
                }
            }
        }
        Err(e) => tracing::warn!(pattern = input, error = %e, "invalid glob pattern"),
    }
    Ok(results)
}
