//! Timeline command: generate and print today's plan.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;

use circadia_core::{
    Config, DaySegment, MinuteOfDay, Protocol, ProtocolCatalog, ScheduledAction, Timeline,
    TimelineGenerator, TimelineRequest, TrainingSession,
};

use super::{load_config, parse_date, parse_time, resolve_now, CommandResult};

#[derive(Args)]
pub struct TimelineArgs {
    /// Full request as JSON (anchors, sessions, extras, statuses); overrides other inputs
    #[arg(long)]
    request: Option<PathBuf>,
    /// Reference date (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Time to evaluate against (HH:MM, default now)
    #[arg(long, value_parser = parse_time)]
    now: Option<MinuteOfDay>,
    /// Actual wake time today (HH:MM)
    #[arg(long, value_parser = parse_time)]
    wake: Option<MinuteOfDay>,
    /// Typical wake time (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    typical_wake: Option<MinuteOfDay>,
    /// Target bedtime (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    bed: Option<MinuteOfDay>,
    /// Training time today (HH:MM); marks today as a training day
    #[arg(long, value_parser = parse_time)]
    training: Option<MinuteOfDay>,
    /// Recovery score 0-100 (default from config)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    recovery: Option<u8>,
    /// Training sessions as a JSON array
    #[arg(long)]
    sessions: Option<PathBuf>,
    /// Extra protocols as a JSON array
    #[arg(long)]
    extra: Option<PathBuf>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

fn build_request(
    args: &TimelineArgs,
    config: &Config,
) -> Result<TimelineRequest, Box<dyn std::error::Error>> {
    if let Some(path) = &args.request {
        return read_json(path);
    }

    let mut config = config.clone();
    if let Some(typical_wake) = args.typical_wake {
        config.patterns.typical_wake_time = typical_wake;
    }
    if let Some(bed) = args.bed {
        config.patterns.typical_bed_time = bed;
    }
    if args.training.is_some() {
        config.patterns.training_time = args.training;
    }

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut anchors = config.anchors_for(date);
    if let Some(wake) = args.wake {
        anchors = anchors.with_wake_today(wake.on(date));
    }

    let sessions: Vec<TrainingSession> = match &args.sessions {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let extra: Vec<Protocol> = match &args.extra {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    Ok(TimelineRequest::new(anchors)
        .with_recovery_score(args.recovery.unwrap_or(config.generation.default_recovery_score))
        .with_sessions(sessions)
        .with_extra_protocols(extra))
}

pub fn run(args: TimelineArgs, config_path: Option<&Path>) -> CommandResult {
    let config = load_config(config_path)?;
    let request = build_request(&args, &config)?;
    let now = resolve_now(Some(args.date.unwrap_or(request.anchors.date)), args.now);

    let catalog = ProtocolCatalog::builtin();
    let generator = TimelineGenerator::with_config(&catalog, config.generator_config());
    let timeline = generator.generate(&request, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    } else {
        print_timeline(&timeline, MinuteOfDay::of(now));
    }
    Ok(())
}

fn status_marker(action: &ScheduledAction) -> &'static str {
    if action.is_completed {
        "done"
    } else if action.is_skipped {
        "skipped"
    } else if action.is_active {
        "active"
    } else {
        ""
    }
}

fn print_timeline(timeline: &Timeline, now: MinuteOfDay) {
    println!("\nTimeline for {} (catalog v{})", timeline.date, timeline.catalog_version);
    println!("{}", "─".repeat(72));
    println!("Now: {now}");
    if let Some(current) = &timeline.current_action {
        println!("Current: {} (until {})", current.protocol.name, current.window_end.format("%H:%M"));
    }
    if let Some(next) = &timeline.next_action {
        println!("Next: {} at {}", next.protocol.name, next.scheduled_time.format("%H:%M"));
    }

    for segment in DaySegment::ALL {
        let actions = timeline.segments.get(segment);
        if actions.is_empty() {
            continue;
        }
        println!("\n{}", segment_title(segment));
        for action in actions {
            let window = if action.window_end == action.scheduled_time {
                format!("{}      ", action.scheduled_time.format("%H:%M"))
            } else {
                format!(
                    "{}-{}",
                    action.scheduled_time.format("%H:%M"),
                    action.window_end.format("%H:%M")
                )
            };
            println!(
                "  {window}  {:<24} {:<16} [{}] {}",
                action.protocol.name,
                action.relative_label,
                action.protocol.priority.as_str(),
                status_marker(action)
            );
        }
    }

    let unresolved = timeline.unresolved_actions().count();
    if unresolved > 0 {
        println!(
            "\n⚠ {unresolved} action(s) anchored on training have no training time; scheduled around now."
        );
    }
    println!("{}", "─".repeat(72));
}

fn segment_title(segment: DaySegment) -> &'static str {
    match segment {
        DaySegment::Morning => "Morning",
        DaySegment::Midday => "Midday",
        DaySegment::Evening => "Evening",
        DaySegment::WindDown => "Wind-down",
    }
}
