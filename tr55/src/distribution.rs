//! Temporal rainfall distributions and the sources that supply them.
//!
//! A temporal distribution is the standardized cumulative-rainfall-fraction
//! curve for one storm duration category. Distributions are parsed from CSV
//! (`time_fraction,cumulative_fraction` with a header row) and validated on
//! construction so downstream consumers never see a malformed table.

use crate::error::{Result, Tr55Error};
use crate::storm::StormDuration;
use itertools::Itertools;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Embedded cumulative distribution tables, used by the offline source
static TD_6H_CSV: &str = include_str!("../fixtures/td_6h.csv");
static TD_24H_CSV: &str = include_str!("../fixtures/td_24h.csv");

/// The final cumulative fraction must reach one within this tolerance
const CLOSURE_TOLERANCE: f64 = 1e-6;
/// Tabulated time fractions must be uniformly spaced within this tolerance
const SPACING_TOLERANCE: f64 = 1e-4;

/// Default deadline for one HTTP fetch
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One tabulated point of a temporal distribution
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DistributionPoint {
    /// Elapsed time as a fraction of the storm duration
    pub time_fraction: f64,
    /// Rainfall accumulated so far as a fraction of the storm total
    pub cumulative_fraction: f64,
}

/// Cumulative-rainfall-fraction curve for one storm duration category.
/// Immutable once constructed; shared read-only across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalDistribution {
    duration: StormDuration,
    points: Vec<DistributionPoint>,
}

impl TemporalDistribution {
    /// Parses `time_fraction,cumulative_fraction` CSV with a header row.
    pub fn from_csv(duration: StormDuration, data: &str) -> Result<TemporalDistribution> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes());
        let points = reader
            .deserialize()
            .collect::<std::result::Result<Vec<DistributionPoint>, csv::Error>>()?;
        TemporalDistribution::new(duration, points)
    }

    /// Validates and wraps an ordered point sequence.
    ///
    /// Requirements: at least two points, both fractions within [0, 1], time
    /// fractions strictly increasing and uniformly spaced, cumulative
    /// fractions non-decreasing, and the final cumulative fraction equal to
    /// one within a small tolerance.
    pub fn new(duration: StormDuration, points: Vec<DistributionPoint>) -> Result<TemporalDistribution> {
        if points.len() < 2 {
            return Err(Tr55Error::InvalidDistribution(format!(
                "{} points, at least two required",
                points.len()
            )));
        }
        for point in &points {
            if !(point.time_fraction >= 0.0 && point.time_fraction <= 1.0)
                || !(point.cumulative_fraction >= 0.0 && point.cumulative_fraction <= 1.0)
            {
                return Err(Tr55Error::InvalidDistribution(format!(
                    "fraction out of [0, 1] at t={}: {}",
                    point.time_fraction, point.cumulative_fraction
                )));
            }
        }
        let spacing = points[1].time_fraction - points[0].time_fraction;
        for (previous, current) in points.iter().tuple_windows() {
            let step = current.time_fraction - previous.time_fraction;
            if step <= 0.0 {
                return Err(Tr55Error::InvalidDistribution(format!(
                    "time fractions must increase, got {} after {}",
                    current.time_fraction, previous.time_fraction
                )));
            }
            if (step - spacing).abs() > SPACING_TOLERANCE {
                return Err(Tr55Error::InvalidDistribution(format!(
                    "uneven time step {} near t={}, expected {}",
                    step, current.time_fraction, spacing
                )));
            }
            if current.cumulative_fraction < previous.cumulative_fraction {
                return Err(Tr55Error::InvalidDistribution(format!(
                    "cumulative fraction decreases at t={}",
                    current.time_fraction
                )));
            }
        }
        let closure = points[points.len() - 1].cumulative_fraction;
        if (closure - 1.0).abs() > CLOSURE_TOLERANCE {
            return Err(Tr55Error::InvalidDistribution(format!(
                "final cumulative fraction is {closure}, expected 1"
            )));
        }
        Ok(TemporalDistribution { duration, points })
    }

    pub fn duration(&self) -> StormDuration {
        self.duration
    }

    pub fn points(&self) -> &[DistributionPoint] {
        &self.points
    }

    /// Fraction of the storm duration between tabulated points
    pub fn step_fraction(&self) -> f64 {
        self.points[1].time_fraction - self.points[0].time_fraction
    }
}

/// Supplier of temporal distribution data for one duration category.
/// Implementations decide where the data lives; callers go through
/// [`crate::store::DistributionStore`] for caching and fetch coalescing.
pub trait DistributionSource {
    fn fetch(
        &self,
        duration: StormDuration,
    ) -> impl Future<Output = Result<TemporalDistribution>> + Send;
}

/// Serves the compiled-in distribution tables. The offline default.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DistributionSource for EmbeddedSource {
    async fn fetch(&self, duration: StormDuration) -> Result<TemporalDistribution> {
        let data = match duration {
            StormDuration::SixHour => TD_6H_CSV,
            StormDuration::TwentyFourHour => TD_24H_CSV,
        };
        TemporalDistribution::from_csv(duration, data)
    }
}

/// Fetches distribution CSVs from a remote service, one file per duration
/// category at `{base_url}/td_{hours}h.csv`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<HttpSource> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(HttpSource {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, duration: StormDuration) -> String {
        format!(
            "{}/td_{}h.csv",
            self.base_url.trim_end_matches('/'),
            duration.hours() as u32
        )
    }
}

impl DistributionSource for HttpSource {
    async fn fetch(&self, duration: StormDuration) -> Result<TemporalDistribution> {
        let url = self.url_for(duration);
        log::info!("fetching temporal distribution from {}", url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Tr55Error::SourceUnavailable(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let body = response.text().await?;
        TemporalDistribution::from_csv(duration, &body)
    }
}
