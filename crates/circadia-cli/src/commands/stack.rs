//! Session stack command.

use std::path::Path;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use circadia_core::{
    calculate_protocol_timings, generate_session_protocol_stack, MinuteOfDay, ProtocolTimings,
    StackDependency, StackedProtocol, TrainingSession,
};

use super::{load_config, parse_date, parse_time, CommandResult};

#[derive(Args)]
pub struct StackArgs {
    /// Session start time (HH:MM)
    #[arg(value_parser = parse_time)]
    session: MinuteOfDay,
    /// Session date (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Target sleep in hours (default from config)
    #[arg(long)]
    sleep_hours: Option<f64>,
    /// Hours between waking and the session (default from config)
    #[arg(long)]
    wake_buffer: Option<f64>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StackOutput {
    timings: ProtocolTimings,
    stack: Vec<StackedProtocol>,
}

pub fn run(args: StackArgs, config_path: Option<&Path>) -> CommandResult {
    let config = load_config(config_path)?;
    let mut patterns = config.session_stack;
    if let Some(hours) = args.sleep_hours {
        patterns.target_sleep_hours = hours;
    }
    if let Some(hours) = args.wake_buffer {
        patterns.wake_buffer_hours = hours;
    }
    patterns.validate()?;

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let session = TrainingSession::new("session", "Session").at(args.session);
    let output = StackOutput {
        timings: calculate_protocol_timings(args.session, &patterns),
        stack: generate_session_protocol_stack(&session, date, &patterns),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let t = &output.timings;
    println!("\nSession at {} ({} h sleep, wake {} h before)", t.session, patterns.target_sleep_hours, patterns.wake_buffer_hours);
    println!("{}", "─".repeat(50));
    println!("  Bedtime        {}", t.bedtime);
    println!("  Wind down      {}", t.wind_down);
    println!("  Wake           {}", t.wake_time);
    println!("  Morning light  {}", t.morning_light);
    println!("  Pre-fuel       {}", t.pre_fuel);
    println!("  Neural prep    {}", t.neural_prep);
    println!("  Session        {}", t.session);
    println!("  Post-session   {}", t.post_session);
    println!("{}", "─".repeat(50));
    for p in &output.stack {
        let depends = match p.depends_on {
            StackDependency::Bedtime => "bedtime",
            StackDependency::Session => "session",
        };
        println!(
            "  {} {:<20} {:>+5} min from {depends}",
            p.scheduled_time.format("%m-%d %H:%M"),
            p.name,
            p.offset_minutes
        );
    }
    Ok(())
}
