//! Unit hydrograph derivation and discharge convolution.

use crate::error::{Result, Tr55Error};
use crate::hyetograph::Hyetograph;
use crate::peak::{WatershedTiming, CFS_HOURS_PER_INCH_SQ_MI};
use serde::Serialize;

/// SCS unit hydrograph peak factor
const PEAK_FACTOR: f64 = 484.0;
/// Base time of the triangular unit hydrograph, in multiples of time to peak
const BASE_TIME_RATIO: f64 = 2.67;

/// Discharge response to one inch of excess rainfall, sampled at a uniform
/// time step. Derived per request from drainage area and watershed timing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitHydrograph {
    /// cfs per inch of excess rainfall
    ordinates: Vec<f64>,
    time_step_hours: f64,
}

impl UnitHydrograph {
    /// SCS triangular unit hydrograph: rises to qp = 484 A / Tp at
    /// Tp = dt/2 + lag and recedes to zero at 2.67 Tp. Sampling at `dt`
    /// loses a little volume to discretization, so the ordinates are
    /// rescaled to carry exactly one inch of excess over the area.
    pub fn scs_triangular(
        area_sq_mi: f64,
        timing: WatershedTiming,
        time_step_hours: f64,
    ) -> Result<UnitHydrograph> {
        if !(area_sq_mi > 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "area_sq_mi",
                value: area_sq_mi,
            });
        }
        if !(time_step_hours > 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "time_step_hours",
                value: time_step_hours,
            });
        }

        // Tp includes half the sampling step, so the base time always spans
        // several steps and the sampled volume is never zero.
        let time_to_peak = time_step_hours / 2.0 + timing.lag();
        let base_time = BASE_TIME_RATIO * time_to_peak;
        let peak = PEAK_FACTOR * area_sq_mi / time_to_peak;

        let count = (base_time / time_step_hours).ceil() as usize + 1;
        let mut ordinates = Vec::with_capacity(count);
        for index in 0..count {
            let time = index as f64 * time_step_hours;
            let ordinate = if time <= time_to_peak {
                peak * time / time_to_peak
            } else if time < base_time {
                peak * (base_time - time) / (base_time - time_to_peak)
            } else {
                0.0
            };
            ordinates.push(ordinate);
        }

        let sampled_volume: f64 = ordinates.iter().sum::<f64>() * time_step_hours;
        let target_volume = CFS_HOURS_PER_INCH_SQ_MI * area_sq_mi;
        let scale = target_volume / sampled_volume;
        for ordinate in &mut ordinates {
            *ordinate *= scale;
        }

        Ok(UnitHydrograph {
            ordinates,
            time_step_hours,
        })
    }

    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    pub fn time_step_hours(&self) -> f64 {
        self.time_step_hours
    }

    /// cfs-hours carried by one inch of excess rainfall
    pub fn volume(&self) -> f64 {
        self.ordinates.iter().sum::<f64>() * self.time_step_hours
    }

    pub fn len(&self) -> usize {
        self.ordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinates.is_empty()
    }
}

/// One point of a computed discharge series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydrographPoint {
    pub time_hours: f64,
    pub discharge_cfs: f64,
}

/// Discharge time series for one storm, the convolution output
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrograph {
    points: Vec<HydrographPoint>,
    time_step_hours: f64,
}

impl Hydrograph {
    /// Discrete convolution of per-step excess rainfall with the unit
    /// hydrograph. Output length is `steps + ordinates - 1`.
    ///
    /// Only the storm-total excess is known upstream, so it is spread over
    /// the steps in proportion to each step's share of total rainfall.
    /// Swapping in per-step infiltration changes the volume properties and
    /// must be revisited together with the convolution tests.
    pub fn convolve(
        hyetograph: &Hyetograph,
        unit: &UnitHydrograph,
        excess_depth: f64,
    ) -> Result<Hydrograph> {
        if hyetograph.is_empty() {
            return Err(Tr55Error::EmptyInput("hyetograph"));
        }
        if unit.is_empty() {
            return Err(Tr55Error::EmptyInput("unit hydrograph"));
        }
        if !(excess_depth >= 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "excess_depth",
                value: excess_depth,
            });
        }

        let steps = hyetograph.steps();
        let ordinates = unit.ordinates();
        let total_rainfall = hyetograph.total_depth();
        let mut discharges = vec![0.0; steps.len() + ordinates.len() - 1];

        if total_rainfall > 0.0 && excess_depth > 0.0 {
            for (i, step) in steps.iter().enumerate() {
                let step_excess = excess_depth * step.depth / total_rainfall;
                if step_excess == 0.0 {
                    continue;
                }
                for (j, ordinate) in ordinates.iter().enumerate() {
                    discharges[i + j] += step_excess * ordinate;
                }
            }
        }

        let time_step_hours = unit.time_step_hours();
        let points = discharges
            .into_iter()
            .enumerate()
            .map(|(index, discharge_cfs)| HydrographPoint {
                time_hours: index as f64 * time_step_hours,
                discharge_cfs,
            })
            .collect();

        Ok(Hydrograph {
            points,
            time_step_hours,
        })
    }

    pub fn points(&self) -> &[HydrographPoint] {
        &self.points
    }

    pub fn time_step_hours(&self) -> f64 {
        self.time_step_hours
    }

    /// Highest-discharge point of the series
    pub fn peak(&self) -> Option<HydrographPoint> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.discharge_cfs.total_cmp(&b.discharge_cfs))
    }

    /// Total volume in cfs-hours
    pub fn volume(&self) -> f64 {
        self.points.iter().map(|p| p.discharge_cfs).sum::<f64>() * self.time_step_hours
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
