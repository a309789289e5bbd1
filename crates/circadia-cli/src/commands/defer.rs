//! Deferral check command.

use std::path::Path;

use chrono::Timelike;
use clap::Args;

use circadia_core::{should_defer_action, ActionCategory, MinuteOfDay, SleepPatterns};

use super::{load_config, parse_time, CommandResult};

#[derive(Args)]
pub struct DeferArgs {
    /// Action category (sauna, cold_exposure, training, high_intensity, heavy_training, ...)
    category: String,
    /// Hour of day 0-23 (default current hour)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,
    /// Average bedtime (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    bed: Option<MinuteOfDay>,
    /// Average wake time (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    wake: Option<MinuteOfDay>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: DeferArgs, config_path: Option<&Path>) -> CommandResult {
    let category: ActionCategory = args.category.parse()?;
    let config = load_config(config_path)?;
    let defaults = config.sleep_patterns();
    let patterns = SleepPatterns::new(
        args.bed.unwrap_or(defaults.avg_bedtime),
        args.wake.unwrap_or(defaults.avg_wake_time),
    );
    let hour = args
        .hour
        .unwrap_or_else(|| chrono::Local::now().hour());

    let decision = should_defer_action(category, hour, &patterns);
    tracing::debug!(%category, hour, defer = decision.should_defer, "deferral check");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else if decision.should_defer {
        println!("defer {category} at {hour:02}:00");
        if let Some(reason) = &decision.reason {
            println!("  reason: {reason}");
        }
        if let Some(time) = decision.suggested_time {
            println!("  retry at: {time}");
        }
    } else {
        println!("ok: {category} at {hour:02}:00");
    }
    Ok(())
}
