//! Peak discharge command.

use crate::token::decode_duration_token;
use log::{info, warn};
use tr55::engine::RunoffEngine;
use tr55::peak::WatershedTiming;

/// Computes peak discharge per square mile and prints it as text or JSON.
pub fn run_peak(
    precip: f64,
    curve_number: f64,
    duration_token: &str,
    tc: f64,
    json: bool,
) -> anyhow::Result<()> {
    let duration_hours = decode_duration_token(duration_token)?;
    let engine = RunoffEngine::new(WatershedTiming::new(tc)?);

    info!(
        "computing peak discharge for P={} in, CN={}, {} h storm",
        precip, curve_number, duration_hours
    );
    let peak = engine.compute_peak(precip, curve_number, duration_hours)?;
    if peak.boundary_clamped {
        warn!("unit peak lookup clamped at a table bound, result is a boundary estimate");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&peak)?);
    } else {
        println!("Rainfall depth:      {:.3} in", peak.rainfall_depth);
        println!("Curve number:        {:.1}", peak.curve_number);
        println!("Retention S:         {:.3} in", peak.retention);
        println!("Initial abstraction: {:.3} in", peak.initial_abstraction);
        println!("Excess rainfall:     {:.3} in", peak.excess_depth);
        println!("Unit peak:           {:.1} csm/in", peak.unit_peak_csm);
        println!("Peak discharge:      {:.1} cfs per sq mi", peak.discharge_cfs);
    }
    Ok(())
}
