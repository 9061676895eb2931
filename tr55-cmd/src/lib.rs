//! Command implementations for the TR-55 runoff CLI.
//!
//! Decodes request parameters (duration tokens like "6H"/"24H"), resolves
//! temporal distributions through the cached store, and maps engine
//! failures to user-facing rejections.

use clap::Subcommand;

pub mod hydrograph;
pub mod peak;
pub mod token;

#[derive(Subcommand)]
pub enum Command {
    /// Compute TR-55 peak discharge per square mile of drainage area
    Peak {
        /// Rainfall depth in inches
        #[arg(short, long)]
        precip: f64,

        /// Runoff curve number (30-98 typical)
        #[arg(short, long)]
        curve_number: f64,

        /// Storm duration token, e.g. "6H" or "24H"
        #[arg(short, long, default_value = "24H")]
        duration: String,

        /// Time of concentration in hours
        #[arg(long, default_value_t = 1.0)]
        tc: f64,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the full storm hydrograph as CSV
    Hydrograph {
        /// Drainage area in square miles
        #[arg(short, long)]
        area: f64,

        /// Rainfall depth in inches
        #[arg(short, long)]
        precip: f64,

        /// Runoff curve number (30-98 typical)
        #[arg(short, long)]
        curve_number: f64,

        /// Storm duration token, e.g. "6H" or "24H"
        #[arg(short, long, default_value = "24H")]
        duration: String,

        /// Time of concentration in hours
        #[arg(long, default_value_t = 1.0)]
        tc: f64,

        /// Base URL of a temporal distribution service (embedded tables when absent)
        #[arg(long)]
        base_url: Option<String>,

        /// Storm start time for absolute timestamps, e.g. "2017-02-07T06:00"
        #[arg(long)]
        start: Option<String>,

        /// Output CSV path (stdout when absent)
        #[arg(short, long)]
        output: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Peak {
            precip,
            curve_number,
            duration,
            tc,
            json,
        } => peak::run_peak(precip, curve_number, &duration, tc, json),
        Command::Hydrograph {
            area,
            precip,
            curve_number,
            duration,
            tc,
            base_url,
            start,
            output,
        } => {
            hydrograph::run_hydrograph(
                area,
                precip,
                curve_number,
                &duration,
                tc,
                base_url.as_deref(),
                start.as_deref(),
                output.as_deref(),
            )
            .await
        }
    }
}
