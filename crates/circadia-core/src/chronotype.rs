//! Chronotype classification from averaged sleep timing.

use serde::{Deserialize, Serialize};

use crate::clock::{MinuteOfDay, MINUTES_PER_DAY};

/// Natural sleep/wake tendency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    /// Early riser.
    Lion,
    /// Follows the solar day.
    #[default]
    Bear,
    /// Late sleeper, late riser.
    Wolf,
    /// Light, fragmented sleeper.
    Dolphin,
}

impl Chronotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lion => "lion",
            Self::Bear => "bear",
            Self::Wolf => "wolf",
            Self::Dolphin => "dolphin",
        }
    }
}

/// Sleep-onset latency above which a sleeper is classed as a dolphin.
const DOLPHIN_ONSET_MINUTES: u32 = 30;
/// Waking before this is a lion.
const LION_WAKE_BEFORE: i64 = 6 * 60;
/// Waking at or after this is a wolf.
const WOLF_WAKE_FROM: i64 = 8 * 60 + 30;
/// Falling asleep at or after this (past midnight) is a wolf.
const WOLF_SLEEP_FROM: i64 = MINUTES_PER_DAY + 30;

/// Classify a chronotype from 7-day averages.
///
/// Sleep times before noon are read as past midnight, so `00:45` sorts after
/// `23:30`.
pub fn detect_chronotype(
    avg_wake_time: MinuteOfDay,
    avg_sleep_time: MinuteOfDay,
    sleep_onset_minutes: u32,
) -> Chronotype {
    if sleep_onset_minutes > DOLPHIN_ONSET_MINUTES {
        return Chronotype::Dolphin;
    }

    let wake = avg_wake_time.minutes();
    let sleep = if avg_sleep_time.minutes() < 12 * 60 {
        avg_sleep_time.minutes() + MINUTES_PER_DAY
    } else {
        avg_sleep_time.minutes()
    };

    if wake < LION_WAKE_BEFORE {
        Chronotype::Lion
    } else if wake >= WOLF_WAKE_FROM || sleep >= WOLF_SLEEP_FROM {
        Chronotype::Wolf
    } else {
        Chronotype::Bear
    }
}
