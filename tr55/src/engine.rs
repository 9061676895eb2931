//! Top-level runoff operations called by the request layer.

use crate::distribution::TemporalDistribution;
use crate::error::{Result, Tr55Error};
use crate::hydrograph::{Hydrograph, UnitHydrograph};
use crate::hyetograph::Hyetograph;
use crate::peak::{peak_discharge, PeakDischarge, WatershedTiming};
use crate::runoff::excess_rainfall;
use crate::storm::{StormDuration, StormInput};
use log::debug;

/// Orchestrates the TR-55 computations for one watershed.
///
/// The engine is stateless per call; watershed timing is fixed at
/// construction. Distribution resolution happens upstream (see
/// [`crate::store::DistributionStore`]) so both operations are pure,
/// synchronous computation.
#[derive(Debug, Clone, Copy)]
pub struct RunoffEngine {
    timing: WatershedTiming,
}

impl RunoffEngine {
    pub fn new(timing: WatershedTiming) -> RunoffEngine {
        RunoffEngine { timing }
    }

    /// Peak discharge for one square mile of drainage area.
    ///
    /// Accepts any positive storm duration; the unit-peak table for the
    /// nearest supported category is used. Rainfall outside [0, 100] inches
    /// is rejected with `InvalidParameter`.
    pub fn compute_peak(
        &self,
        precip: f64,
        curve_number: f64,
        duration_hours: f64,
    ) -> Result<PeakDischarge> {
        let storm = StormInput::new(precip, curve_number, duration_hours)?;
        let runoff = excess_rainfall(storm.rainfall_depth, storm.curve_number)?;
        debug!(
            "P={} CN={} -> S={:.3} Ia={:.3} Pe={:.3}",
            storm.rainfall_depth,
            storm.curve_number,
            runoff.retention,
            runoff.initial_abstraction,
            runoff.excess
        );
        peak_discharge(
            &runoff,
            storm.rainfall_depth,
            storm.curve_number,
            1.0,
            storm.duration_hours,
            self.timing,
        )
    }

    /// Full discharge series for a storm over `area_sq_mi` square miles.
    ///
    /// The duration must be a supported distribution category and the
    /// supplied distribution must be for exactly that category; a mismatch
    /// is rejected rather than silently substituting another table.
    pub fn compute_hydrograph(
        &self,
        area_sq_mi: f64,
        precip: f64,
        curve_number: f64,
        duration_hours: f64,
        distribution: &TemporalDistribution,
    ) -> Result<Hydrograph> {
        let storm = StormInput::new(precip, curve_number, duration_hours)?;
        if !(area_sq_mi > 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "area_sq_mi",
                value: area_sq_mi,
            });
        }
        let duration = StormDuration::from_hours(duration_hours)
            .ok_or(Tr55Error::UnsupportedDuration(duration_hours))?;
        if distribution.duration() != duration {
            return Err(Tr55Error::InvalidDistribution(format!(
                "distribution is for the {}-hour storm, request was {}-hour",
                distribution.duration().hours(),
                duration.hours()
            )));
        }

        let runoff = excess_rainfall(storm.rainfall_depth, storm.curve_number)?;
        let hyetograph = Hyetograph::build(&storm, distribution)?;
        let unit =
            UnitHydrograph::scs_triangular(area_sq_mi, self.timing, hyetograph.time_step_hours())?;
        debug!(
            "convolving {} rainfall steps with {} unit ordinates, Pe={:.3}",
            hyetograph.len(),
            unit.len(),
            runoff.excess
        );
        Hydrograph::convolve(&hyetograph, &unit, runoff.excess)
    }
}
