//! Chronotype detection command.

use std::path::Path;

use clap::Args;

use circadia_core::{detect_chronotype, MinuteOfDay};

use super::{load_config, parse_time, CommandResult};

#[derive(Args)]
pub struct ChronotypeArgs {
    /// Average wake time (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    wake: Option<MinuteOfDay>,
    /// Average sleep time (HH:MM, default from config)
    #[arg(long, value_parser = parse_time)]
    sleep: Option<MinuteOfDay>,
    /// Average minutes to fall asleep
    #[arg(long, default_value_t = 15)]
    onset: u32,
    /// Store the result in the config file
    #[arg(long)]
    save: bool,
}

pub fn run(args: ChronotypeArgs, config_path: Option<&Path>) -> CommandResult {
    let mut config = load_config(config_path)?;
    let wake = args.wake.unwrap_or(config.patterns.typical_wake_time);
    let sleep = args.sleep.unwrap_or(config.patterns.typical_bed_time);

    let chronotype = detect_chronotype(wake, sleep, args.onset);
    println!("{}", chronotype.as_str());

    if args.save {
        config.patterns.chronotype = chronotype;
        match config_path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
    }
    Ok(())
}
