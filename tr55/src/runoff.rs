//! Curve-number runoff: retention, initial abstraction, excess rainfall.

use crate::error::{Result, Tr55Error};
use serde::Serialize;

/// Derived runoff depths for one storm, all in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunoffDepth {
    /// Potential maximum retention S = 1000/CN - 10
    pub retention: f64,
    /// Initial abstraction Ia = 0.2 S
    pub initial_abstraction: f64,
    /// Excess rainfall Pe, the depth that becomes direct runoff
    pub excess: f64,
}

/// Computes excess rainfall from total depth and curve number.
///
/// Uses the standard curve-number relation Pe = (P - Ia)^2 / (P - Ia + S)
/// once rainfall exceeds the initial abstraction; below that threshold the
/// storm produces no runoff and Pe is zero.
///
/// # Errors
///
/// Returns `Tr55Error::InvalidParameter` when the curve number is outside
/// (0, 100) or the rainfall depth is negative.
pub fn excess_rainfall(rainfall_depth: f64, curve_number: f64) -> Result<RunoffDepth> {
    if !(curve_number > 0.0 && curve_number < 100.0) {
        return Err(Tr55Error::InvalidParameter {
            name: "curve_number",
            value: curve_number,
        });
    }
    if !(rainfall_depth >= 0.0) {
        return Err(Tr55Error::InvalidParameter {
            name: "rainfall_depth",
            value: rainfall_depth,
        });
    }

    let retention = 1000.0 / curve_number - 10.0;
    let initial_abstraction = 0.2 * retention;
    let excess = if rainfall_depth <= initial_abstraction {
        0.0
    } else {
        (rainfall_depth - initial_abstraction).powi(2)
            / (rainfall_depth - initial_abstraction + retention)
    };

    Ok(RunoffDepth {
        retention,
        initial_abstraction,
        excess,
    })
}
