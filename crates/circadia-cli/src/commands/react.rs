//! State-reactive suggestions command.

use chrono::Timelike;
use clap::Args;

use circadia_core::{get_state_reactive_recommendations, PhysiologicalState};

use super::CommandResult;

#[derive(Args)]
pub struct ReactArgs {
    /// Readiness score 0-100
    #[arg(long)]
    readiness: f64,
    /// Stress level 0-10
    #[arg(long)]
    stress: f64,
    /// Recovery score 0-100
    #[arg(long)]
    recovery: f64,
    /// Hour of day 0-23 (default current hour)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReactArgs) -> CommandResult {
    let state = PhysiologicalState {
        readiness_score: args.readiness,
        stress_level: args.stress,
        recovery_score: args.recovery,
    };
    let hour = args
        .hour
        .unwrap_or_else(|| chrono::Local::now().hour());
    let recommendations = get_state_reactive_recommendations(&state, hour);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No suggestions right now.");
    }
    for rec in recommendations {
        println!("[{:>3}] {}: {}", rec.urgency, rec.action.as_str(), rec.reason);
    }
    Ok(())
}
