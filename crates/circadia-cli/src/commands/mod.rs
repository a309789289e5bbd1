pub mod catalog;
pub mod chronotype;
pub mod config;
pub mod defer;
pub mod react;
pub mod stack;
pub mod timeline;

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use circadia_core::{Config, MinuteOfDay};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// clap value parser for `HH:MM` arguments.
pub fn parse_time(value: &str) -> Result<MinuteOfDay, String> {
    MinuteOfDay::parse(value).map_err(|e| e.to_string())
}

/// clap value parser for `YYYY-MM-DD` arguments.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("invalid date '{value}': {e}"))
}

/// Config from an explicit path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::load_or_default()),
    }
}

/// The single "now" a command works against.
///
/// Sampled once from the local clock unless a date and/or time is given.
pub fn resolve_now(date: Option<NaiveDate>, time: Option<MinuteOfDay>) -> NaiveDateTime {
    let local = chrono::Local::now().naive_local();
    let date = date.unwrap_or_else(|| local.date());
    let time = time.unwrap_or_else(|| MinuteOfDay::of(local));
    time.on(date)
}
