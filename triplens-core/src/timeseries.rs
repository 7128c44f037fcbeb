use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use triplens_common::{Result, TimeSeriesConfig, TripLensError};

#[derive(Debug, Clone, PartialEq)]
pub struct RandomWalkConfig {
    pub periods: usize,
    pub start: NaiveDate,
    pub columns: Vec<String>,
    pub seed: Option<u64>,
}

impl RandomWalkConfig {
    pub fn from_config(cfg: &TimeSeriesConfig) -> Result<Self> {
        let start = NaiveDate::parse_from_str(&cfg.start_date, "%Y-%m-%d").map_err(|e| {
            TripLensError::invalid("start_date", format!("`{}`: {e}", cfg.start_date))
        })?;
        Ok(Self {
            periods: cfg.periods,
            start,
            columns: cfg.columns.clone(),
            seed: cfg.seed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Daily-indexed frame of equally long series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesFrame {
    pub index: Vec<NaiveDate>,
    pub series: Vec<Series>,
}

impl TimeSeriesFrame {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `(min, max)` over every series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut it = self.series.iter().flat_map(|s| s.values.iter().copied());
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Cumulative sums of standard normal draws, one column per name.
pub fn random_walk(cfg: &RandomWalkConfig) -> Result<TimeSeriesFrame> {
    if cfg.periods == 0 {
        return Err(TripLensError::invalid("periods", "must be at least 1"));
    }
    if cfg.columns.is_empty() {
        return Err(TripLensError::invalid("columns", "need at least one series name"));
    }
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let index = (0..cfg.periods as u64)
        .map(|d| {
            cfg.start
                .checked_add_days(Days::new(d))
                .ok_or_else(|| TripLensError::invalid("periods", "date index runs past the calendar"))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut acc = vec![0.0f64; cfg.columns.len()];
    let mut values: Vec<Vec<f64>> = (0..cfg.columns.len()).map(|_| Vec::with_capacity(cfg.periods)).collect();
    // row-major draws, like filling a periods x columns matrix
    for _ in 0..cfg.periods {
        for (c, col) in values.iter_mut().enumerate() {
            let step: f64 = StandardNormal.sample(&mut rng);
            acc[c] += step;
            col.push(acc[c]);
        }
    }
    let series = cfg
        .columns
        .iter()
        .cloned()
        .zip(values)
        .map(|(name, values)| Series { name, values })
        .collect();
    Ok(TimeSeriesFrame { index, series })
}
