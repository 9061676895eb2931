//! Hyetograph construction: incremental rainfall depths for one storm.

use crate::distribution::TemporalDistribution;
use crate::error::{Result, Tr55Error};
use crate::storm::StormInput;
use serde::Serialize;

/// One time step of incremental rainfall
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HyetographStep {
    /// Elapsed time from the start of the storm, in hours
    pub time_hours: f64,
    /// Rainfall depth falling during this step, in inches
    pub depth: f64,
}

/// Incremental rainfall depths at the distribution's tabulated times.
/// Built per request; increments sum to the storm's total rainfall depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyetograph {
    steps: Vec<HyetographStep>,
    time_step_hours: f64,
}

impl Hyetograph {
    /// Scales the cumulative curve by the storm's total depth and takes
    /// successive differences. The first step's increment equals its
    /// cumulative depth, there is no prior point to difference against.
    pub fn build(storm: &StormInput, distribution: &TemporalDistribution) -> Result<Hyetograph> {
        let points = distribution.points();
        if points.len() < 2 {
            return Err(Tr55Error::InvalidDistribution(
                "fewer than two distribution points".to_string(),
            ));
        }

        let mut steps = Vec::with_capacity(points.len());
        let mut previous_cumulative = 0.0;
        for point in points {
            let cumulative = point.cumulative_fraction * storm.rainfall_depth;
            steps.push(HyetographStep {
                time_hours: point.time_fraction * storm.duration_hours,
                depth: cumulative - previous_cumulative,
            });
            previous_cumulative = cumulative;
        }

        Ok(Hyetograph {
            steps,
            time_step_hours: distribution.step_fraction() * storm.duration_hours,
        })
    }

    pub fn steps(&self) -> &[HyetographStep] {
        &self.steps
    }

    /// Spacing between steps in hours
    pub fn time_step_hours(&self) -> f64 {
        self.time_step_hours
    }

    /// Total depth across all steps, in inches
    pub fn total_depth(&self) -> f64 {
        self.steps.iter().map(|step| step.depth).sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
