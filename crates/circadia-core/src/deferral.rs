//! Contraindication guard for actions proposed at the wrong time of day.
//!
//! The guard only decides; callers act on the veto.

use serde::{Deserialize, Serialize};

use crate::clock::MinuteOfDay;
use crate::protocol::ActionCategory;

/// Typical sleep pattern the guard checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPatterns {
    pub avg_bedtime: MinuteOfDay,
    pub avg_wake_time: MinuteOfDay,
}

impl SleepPatterns {
    pub fn new(avg_bedtime: MinuteOfDay, avg_wake_time: MinuteOfDay) -> Self {
        Self {
            avg_bedtime,
            avg_wake_time,
        }
    }

    /// Whether `hour` falls in the sleep window, which may wrap midnight.
    pub fn is_sleep_hour(&self, hour: u32) -> bool {
        let bed = self.avg_bedtime.hour();
        let wake = self.avg_wake_time.hour();
        if bed > wake {
            hour >= bed || hour < wake
        } else {
            // Bedtime after midnight, e.g. 01:00 to 09:00.
            hour >= bed && hour < wake
        }
    }

    /// Whether `hour` is within two hours after the typical wake hour,
    /// wrapping past midnight for late risers.
    pub fn is_early_morning_hour(&self, hour: u32) -> bool {
        let wake = self.avg_wake_time.hour();
        (hour % 24 + 24 - wake) % 24 < 2
    }
}

/// Outcome of a deferral check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferralDecision {
    pub should_defer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_time: Option<MinuteOfDay>,
}

impl DeferralDecision {
    pub fn proceed() -> Self {
        Self {
            should_defer: false,
            reason: None,
            suggested_time: None,
        }
    }

    pub fn defer(reason: impl Into<String>, suggested_time: MinuteOfDay) -> Self {
        Self {
            should_defer: true,
            reason: Some(reason.into()),
            suggested_time: Some(suggested_time),
        }
    }
}

fn blocked_during_sleep(category: ActionCategory) -> bool {
    matches!(
        category,
        ActionCategory::Sauna
            | ActionCategory::ColdExposure
            | ActionCategory::Training
            | ActionCategory::HighIntensity
    )
}

/// Decide whether an action of `category` proposed at `current_hour` should wait.
pub fn should_defer_action(
    category: ActionCategory,
    current_hour: u32,
    patterns: &SleepPatterns,
) -> DeferralDecision {
    if patterns.is_sleep_hour(current_hour) && blocked_during_sleep(category) {
        return DeferralDecision::defer(
            format!("{category} during the sleep window disrupts sleep"),
            patterns.avg_wake_time.add_minutes(2 * 60),
        );
    }

    if category == ActionCategory::HeavyTraining && patterns.is_early_morning_hour(current_hour) {
        return DeferralDecision::defer(
            "core body temperature is still low within two hours of waking",
            patterns.avg_wake_time.add_minutes(3 * 60),
        );
    }

    DeferralDecision::proceed()
}
