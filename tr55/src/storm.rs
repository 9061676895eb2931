//! Storm input parameters and supported duration categories.

use crate::error::{Result, Tr55Error};

/// Storm duration categories with published temporal distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StormDuration {
    /// 6-hour design storm
    SixHour,
    /// 24-hour design storm
    TwentyFourHour,
}

impl StormDuration {
    pub const ALL: [StormDuration; 2] = [StormDuration::SixHour, StormDuration::TwentyFourHour];

    /// Matches an exact hour count against the supported categories.
    pub fn from_hours(hours: f64) -> Option<StormDuration> {
        if hours == 6.0 {
            Some(StormDuration::SixHour)
        } else if hours == 24.0 {
            Some(StormDuration::TwentyFourHour)
        } else {
            None
        }
    }

    /// Nearest category for unit-peak table selection. Peak-only requests
    /// accept any positive duration, so every duration maps to a table.
    pub fn nearest(hours: f64) -> StormDuration {
        if hours <= 12.0 {
            StormDuration::SixHour
        } else {
            StormDuration::TwentyFourHour
        }
    }

    pub fn hours(&self) -> f64 {
        match self {
            StormDuration::SixHour => 6.0,
            StormDuration::TwentyFourHour => 24.0,
        }
    }
}

/// Validated storm parameters for one request. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormInput {
    /// Total rainfall depth in inches
    pub rainfall_depth: f64,
    /// NRCS runoff curve number
    pub curve_number: f64,
    /// Storm duration in hours
    pub duration_hours: f64,
}

impl StormInput {
    /// Validates rainfall depth in [0, 100] inches, curve number in (0, 100),
    /// and a positive duration.
    pub fn new(rainfall_depth: f64, curve_number: f64, duration_hours: f64) -> Result<StormInput> {
        if !(rainfall_depth >= 0.0 && rainfall_depth <= 100.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "rainfall_depth",
                value: rainfall_depth,
            });
        }
        if !(curve_number > 0.0 && curve_number < 100.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "curve_number",
                value: curve_number,
            });
        }
        if !(duration_hours > 0.0) {
            return Err(Tr55Error::InvalidParameter {
                name: "duration_hours",
                value: duration_hours,
            });
        }
        Ok(StormInput {
            rainfall_depth,
            curve_number,
            duration_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{StormDuration, StormInput};
    use crate::error::Tr55Error;

    #[test]
    fn duration_from_supported_hours() {
        assert_eq!(StormDuration::from_hours(6.0), Some(StormDuration::SixHour));
        assert_eq!(
            StormDuration::from_hours(24.0),
            Some(StormDuration::TwentyFourHour)
        );
    }

    #[test]
    fn duration_from_unsupported_hours() {
        assert_eq!(StormDuration::from_hours(12.0), None);
        assert_eq!(StormDuration::from_hours(0.0), None);
    }

    #[test]
    fn nearest_splits_at_twelve_hours() {
        assert_eq!(StormDuration::nearest(2.0), StormDuration::SixHour);
        assert_eq!(StormDuration::nearest(12.0), StormDuration::SixHour);
        assert_eq!(StormDuration::nearest(12.5), StormDuration::TwentyFourHour);
        assert_eq!(StormDuration::nearest(48.0), StormDuration::TwentyFourHour);
    }

    #[test]
    fn storm_input_accepts_valid_parameters() {
        let storm = StormInput::new(5.0, 80.0, 24.0).unwrap();
        assert_eq!(storm.rainfall_depth, 5.0);
        assert_eq!(storm.curve_number, 80.0);
        assert_eq!(storm.duration_hours, 24.0);
    }

    #[test]
    fn storm_input_rejects_negative_rainfall() {
        let result = StormInput::new(-1.0, 70.0, 6.0);
        assert!(matches!(
            result,
            Err(Tr55Error::InvalidParameter {
                name: "rainfall_depth",
                ..
            })
        ));
    }

    #[test]
    fn storm_input_rejects_excessive_rainfall() {
        assert!(StormInput::new(100.5, 70.0, 6.0).is_err());
    }

    #[test]
    fn storm_input_rejects_out_of_range_curve_number() {
        assert!(StormInput::new(5.0, 0.0, 6.0).is_err());
        assert!(StormInput::new(5.0, 100.0, 6.0).is_err());
        assert!(StormInput::new(5.0, -10.0, 6.0).is_err());
        assert!(StormInput::new(5.0, f64::NAN, 6.0).is_err());
    }

    #[test]
    fn storm_input_rejects_nonpositive_duration() {
        assert!(StormInput::new(5.0, 70.0, 0.0).is_err());
        assert!(StormInput::new(5.0, 70.0, -6.0).is_err());
    }
}
