//! Unit peak discharge lookup and the graphical peak-discharge method.
//!
//! Unit peak rates are tabulated as sorted Ia/P breakpoints carrying
//! log-quadratic regression coefficients in time of concentration. Lookups
//! interpolate linearly between bracketing rows and clamp at the table
//! extremes rather than extrapolate; clamped results are flagged.

use crate::error::{Result, Tr55Error};
use crate::runoff::RunoffDepth;
use crate::storm::StormDuration;
use serde::Serialize;

/// cfs-hours produced by one inch of runoff over one square mile
pub const CFS_HOURS_PER_INCH_SQ_MI: f64 = 5280.0 * 5280.0 / 12.0 / 3600.0;

/// Regression validity bounds on time of concentration, in hours
const TC_MIN_HOURS: f64 = 0.1;
const TC_MAX_HOURS: f64 = 10.0;

/// Watershed timing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatershedTiming {
    /// Time of concentration in hours
    pub time_of_concentration: f64,
}

impl WatershedTiming {
    pub fn new(time_of_concentration: f64) -> Result<WatershedTiming> {
        if !(time_of_concentration > 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "time_of_concentration",
                value: time_of_concentration,
            });
        }
        Ok(WatershedTiming {
            time_of_concentration,
        })
    }

    /// SCS watershed lag, 0.6 Tc
    pub fn lag(&self) -> f64 {
        0.6 * self.time_of_concentration
    }
}

/// One tabulated Ia/P breakpoint with unit-peak regression coefficients
#[derive(Debug, Clone, Copy)]
struct PeakRateRow {
    ia_over_p: f64,
    c0: f64,
    c1: f64,
    c2: f64,
}

impl PeakRateRow {
    /// Unit peak discharge in csm per inch of runoff at time of concentration `tc`
    fn unit_peak(&self, tc: f64) -> f64 {
        let log_tc = tc.log10();
        10f64.powf(self.c0 + self.c1 * log_tc + self.c2 * log_tc * log_tc)
    }
}

/// Sorted Ia/P breakpoint table for one storm duration category
pub struct PeakRateTable {
    rows: &'static [PeakRateRow],
}

static PEAK_RATES_6H: PeakRateTable = PeakRateTable {
    rows: &[
        PeakRateRow { ia_over_p: 0.10, c0: 2.77820, c1: -0.58920, c2: -0.15307 },
        PeakRateRow { ia_over_p: 0.30, c0: 2.68443, c1: -0.59660, c2: -0.10836 },
        PeakRateRow { ia_over_p: 0.35, c0: 2.63722, c1: -0.58850, c2: -0.08203 },
        PeakRateRow { ia_over_p: 0.40, c0: 2.57744, c1: -0.56917, c2: -0.05231 },
        PeakRateRow { ia_over_p: 0.45, c0: 2.49925, c1: -0.54161, c2: -0.02118 },
        PeakRateRow { ia_over_p: 0.50, c0: 2.40172, c1: -0.49018, c2: -0.01174 },
    ],
};

static PEAK_RATES_24H: PeakRateTable = PeakRateTable {
    rows: &[
        PeakRateRow { ia_over_p: 0.10, c0: 2.55323, c1: -0.61512, c2: -0.16403 },
        PeakRateRow { ia_over_p: 0.30, c0: 2.46532, c1: -0.62257, c2: -0.11657 },
        PeakRateRow { ia_over_p: 0.35, c0: 2.41896, c1: -0.61594, c2: -0.08820 },
        PeakRateRow { ia_over_p: 0.40, c0: 2.36409, c1: -0.59857, c2: -0.05621 },
        PeakRateRow { ia_over_p: 0.45, c0: 2.29238, c1: -0.57005, c2: -0.02281 },
        PeakRateRow { ia_over_p: 0.50, c0: 2.20282, c1: -0.51599, c2: -0.01259 },
    ],
};

/// Interpolated unit peak discharge plus a boundary flag
#[derive(Debug, Clone, Copy)]
pub struct UnitPeak {
    /// csm per inch of runoff
    pub csm_per_inch: f64,
    /// Ia/P or Tc fell outside the tabulated range and was clamped
    pub clamped: bool,
}

impl PeakRateTable {
    pub fn for_duration(duration: StormDuration) -> &'static PeakRateTable {
        match duration {
            StormDuration::SixHour => &PEAK_RATES_6H,
            StormDuration::TwentyFourHour => &PEAK_RATES_24H,
        }
    }

    /// Unit peak discharge at `ia_over_p`, linearly interpolated between the
    /// bracketing breakpoints. Values outside the tabulated Ia/P or Tc range
    /// clamp to the nearest bound and set the `clamped` flag.
    pub fn unit_peak(&self, ia_over_p: f64, tc_hours: f64) -> UnitPeak {
        let mut clamped = false;
        let tc = if tc_hours < TC_MIN_HOURS {
            clamped = true;
            TC_MIN_HOURS
        } else if tc_hours > TC_MAX_HOURS {
            clamped = true;
            TC_MAX_HOURS
        } else {
            tc_hours
        };

        let first = &self.rows[0];
        let last = &self.rows[self.rows.len() - 1];
        if ia_over_p <= first.ia_over_p {
            return UnitPeak {
                csm_per_inch: first.unit_peak(tc),
                clamped: clamped || ia_over_p < first.ia_over_p,
            };
        }
        if ia_over_p >= last.ia_over_p {
            return UnitPeak {
                csm_per_inch: last.unit_peak(tc),
                clamped: clamped || ia_over_p > last.ia_over_p,
            };
        }

        for pair in self.rows.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if ia_over_p <= upper.ia_over_p {
                let weight = (ia_over_p - lower.ia_over_p) / (upper.ia_over_p - lower.ia_over_p);
                let csm_per_inch =
                    lower.unit_peak(tc) + weight * (upper.unit_peak(tc) - lower.unit_peak(tc));
                return UnitPeak {
                    csm_per_inch,
                    clamped,
                };
            }
        }

        // the bracketing loop above is exhaustive for in-range ratios
        UnitPeak {
            csm_per_inch: last.unit_peak(tc),
            clamped,
        }
    }
}

/// Peak discharge result with echoed inputs
#[derive(Debug, Clone, Serialize)]
pub struct PeakDischarge {
    pub rainfall_depth: f64,
    pub curve_number: f64,
    pub duration_hours: f64,
    pub area_sq_mi: f64,
    pub retention: f64,
    pub initial_abstraction: f64,
    pub excess_depth: f64,
    pub ia_over_p: f64,
    /// Unit peak discharge in csm per inch of runoff
    pub unit_peak_csm: f64,
    /// Peak discharge in cfs for the given drainage area
    pub discharge_cfs: f64,
    /// Set when the unit-peak lookup clamped at a table bound
    pub boundary_clamped: bool,
}

/// Graphical-method peak discharge: qp = qu * A * Pe.
///
/// Zero excess rainfall yields zero discharge without consulting the table.
/// The unit-peak table is chosen by the nearest supported duration category.
pub fn peak_discharge(
    runoff: &RunoffDepth,
    rainfall_depth: f64,
    curve_number: f64,
    area_sq_mi: f64,
    duration_hours: f64,
    timing: WatershedTiming,
) -> Result<PeakDischarge> {
    if !(area_sq_mi > 0.0) {
        return Err(Tr55Error::InvalidParameter {
            name: "area_sq_mi",
            value: area_sq_mi,
        });
    }
    if !(duration_hours > 0.0) {
        return Err(Tr55Error::InvalidParameter {
            name: "duration_hours",
            value: duration_hours,
        });
    }

    if runoff.excess <= 0.0 {
        let ia_over_p = if rainfall_depth > 0.0 {
            runoff.initial_abstraction / rainfall_depth
        } else {
            0.0
        };
        return Ok(PeakDischarge {
            rainfall_depth,
            curve_number,
            duration_hours,
            area_sq_mi,
            retention: runoff.retention,
            initial_abstraction: runoff.initial_abstraction,
            excess_depth: 0.0,
            ia_over_p,
            unit_peak_csm: 0.0,
            discharge_cfs: 0.0,
            boundary_clamped: false,
        });
    }

    let ia_over_p = runoff.initial_abstraction / rainfall_depth;
    let table = PeakRateTable::for_duration(StormDuration::nearest(duration_hours));
    let unit_peak = table.unit_peak(ia_over_p, timing.time_of_concentration);

    Ok(PeakDischarge {
        rainfall_depth,
        curve_number,
        duration_hours,
        area_sq_mi,
        retention: runoff.retention,
        initial_abstraction: runoff.initial_abstraction,
        excess_depth: runoff.excess,
        ia_over_p,
        unit_peak_csm: unit_peak.csm_per_inch,
        discharge_cfs: unit_peak.csm_per_inch * area_sq_mi * runoff.excess,
        boundary_clamped: unit_peak.clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::{peak_discharge, PeakRateTable, WatershedTiming};
    use crate::error::Tr55Error;
    use crate::runoff::excess_rainfall;
    use crate::storm::StormDuration;
    use approx::assert_relative_eq;

    fn table_24h() -> &'static PeakRateTable {
        PeakRateTable::for_duration(StormDuration::TwentyFourHour)
    }

    #[test]
    fn unit_peak_at_breakpoint_matches_row() {
        // Ia/P = 0.10, Tc = 1 h: log terms vanish, qu = 10^c0
        let up = table_24h().unit_peak(0.10, 1.0);
        assert_relative_eq!(up.csm_per_inch, 10f64.powf(2.55323), max_relative = 1e-12);
        assert!(!up.clamped);
    }

    #[test]
    fn unit_peak_interpolates_between_breakpoints() {
        let tc = 1.0;
        let low = table_24h().unit_peak(0.10, tc).csm_per_inch;
        let high = table_24h().unit_peak(0.30, tc).csm_per_inch;
        let mid = table_24h().unit_peak(0.20, tc);
        assert!(!mid.clamped);
        assert!(mid.csm_per_inch < low && mid.csm_per_inch > high);
        assert_relative_eq!(
            mid.csm_per_inch,
            (low + high) / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn unit_peak_clamps_below_table() {
        let at_bound = table_24h().unit_peak(0.10, 1.0);
        let below = table_24h().unit_peak(0.02, 1.0);
        assert!(below.clamped);
        assert_relative_eq!(below.csm_per_inch, at_bound.csm_per_inch);
    }

    #[test]
    fn unit_peak_clamps_above_table() {
        let at_bound = table_24h().unit_peak(0.50, 1.0);
        let above = table_24h().unit_peak(0.80, 1.0);
        assert!(above.clamped);
        assert_relative_eq!(above.csm_per_inch, at_bound.csm_per_inch);
    }

    #[test]
    fn unit_peak_clamps_time_of_concentration() {
        let fast = table_24h().unit_peak(0.30, 0.01);
        let at_min = table_24h().unit_peak(0.30, 0.1);
        assert!(fast.clamped);
        assert_relative_eq!(fast.csm_per_inch, at_min.csm_per_inch);

        let slow = table_24h().unit_peak(0.30, 50.0);
        let at_max = table_24h().unit_peak(0.30, 10.0);
        assert!(slow.clamped);
        assert_relative_eq!(slow.csm_per_inch, at_max.csm_per_inch);
    }

    #[test]
    fn unit_peak_decreases_with_ratio() {
        let table = table_24h();
        let ratios = [0.10, 0.20, 0.30, 0.40, 0.50];
        let peaks: Vec<f64> = ratios
            .iter()
            .map(|&r| table.unit_peak(r, 1.0).csm_per_inch)
            .collect();
        for pair in peaks.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn shorter_storms_peak_higher() {
        let six = PeakRateTable::for_duration(StormDuration::SixHour)
            .unit_peak(0.30, 1.0)
            .csm_per_inch;
        let day = table_24h().unit_peak(0.30, 1.0).csm_per_inch;
        assert!(six > day);
    }

    #[test]
    fn zero_excess_yields_zero_discharge() {
        let timing = WatershedTiming::new(1.0).unwrap();
        let runoff = excess_rainfall(0.0, 70.0).unwrap();
        let peak = peak_discharge(&runoff, 0.0, 70.0, 1.0, 6.0, timing).unwrap();
        assert_eq!(peak.discharge_cfs, 0.0);
        assert_eq!(peak.unit_peak_csm, 0.0);
        assert!(!peak.boundary_clamped);
    }

    #[test]
    fn peak_scales_with_area_and_excess() {
        let timing = WatershedTiming::new(1.0).unwrap();
        let runoff = excess_rainfall(5.0, 80.0).unwrap();
        let one = peak_discharge(&runoff, 5.0, 80.0, 1.0, 24.0, timing).unwrap();
        let hundred = peak_discharge(&runoff, 5.0, 80.0, 100.0, 24.0, timing).unwrap();
        assert_relative_eq!(
            hundred.discharge_cfs,
            one.discharge_cfs * 100.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            one.discharge_cfs,
            one.unit_peak_csm * runoff.excess,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_nonpositive_area() {
        let timing = WatershedTiming::new(1.0).unwrap();
        let runoff = excess_rainfall(5.0, 80.0).unwrap();
        let result = peak_discharge(&runoff, 5.0, 80.0, 0.0, 24.0, timing);
        assert!(matches!(
            result,
            Err(Tr55Error::InvalidParameter {
                name: "area_sq_mi",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nonpositive_timing() {
        assert!(WatershedTiming::new(0.0).is_err());
        assert!(WatershedTiming::new(-1.0).is_err());
    }
}
