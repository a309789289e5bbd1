//! Merging externally tracked training sessions into the timeline.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::action::{ActionSource, ScheduledAction};
use crate::clock::MinuteOfDay;
use crate::protocol::{ActionCategory, Anchor, Protocol, ProtocolDomain, ProtocolPriority};

/// Session length used when a record carries no duration.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// A training session as supplied by an external tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub title: String,
    /// Sessions without a time of day are left out of the timeline.
    #[serde(default)]
    pub time_of_day: Option<MinuteOfDay>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub sport: Option<String>,
}

impl TrainingSession {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time_of_day: None,
            duration_minutes: None,
            mandatory: false,
            completed: false,
            sport: None,
        }
    }

    pub fn at(mut self, time: MinuteOfDay) -> Self {
        self.time_of_day = Some(time);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Transient protocol standing in for this session on the timeline.
    pub fn to_protocol(&self, default_minutes: u32) -> Protocol {
        let duration = self.duration_minutes.unwrap_or(default_minutes);
        let priority = if self.mandatory {
            ProtocolPriority::Critical
        } else {
            ProtocolPriority::High
        };
        let mut protocol = Protocol::new(
            self.id.clone(),
            self.title.clone(),
            ProtocolDomain::Training,
            Anchor::Training,
            0,
            duration,
        )
        .with_priority(priority)
        .with_duration(duration)
        .with_category(ActionCategory::Training);
        if let Some(sport) = &self.sport {
            protocol = protocol.with_description(sport.clone());
        }
        protocol.skippable = !self.mandatory;
        protocol
    }

    /// Scheduled action for this session on `date`, or `None` without a time of day.
    pub fn to_action(
        &self,
        date: NaiveDate,
        default_minutes: u32,
        now: NaiveDateTime,
    ) -> Option<ScheduledAction> {
        let time = self.time_of_day?;
        let protocol = self.to_protocol(default_minutes);
        let scheduled_time = time.on(date);
        let window_end = scheduled_time + Duration::minutes(i64::from(protocol.duration_minutes));
        Some(ScheduledAction {
            id: ScheduledAction::action_id(&self.id, date),
            protocol,
            source: ActionSource::Session,
            scheduled_time,
            window_end,
            is_active: scheduled_time <= now && now <= window_end,
            is_completed: self.completed,
            is_skipped: false,
            relative_label: "Scheduled".to_string(),
            anchor_unresolved: false,
        })
    }
}

/// Convert every timed session into a scheduled action, in input order.
pub fn merge_sessions(
    sessions: &[TrainingSession],
    date: NaiveDate,
    default_minutes: u32,
    now: NaiveDateTime,
) -> Vec<ScheduledAction> {
    sessions
        .iter()
        .filter_map(|s| {
            let action = s.to_action(date, default_minutes, now);
            if action.is_none() {
                tracing::trace!(session = %s.id, "session has no time of day, not merged");
            }
            action
        })
        .collect()
}
