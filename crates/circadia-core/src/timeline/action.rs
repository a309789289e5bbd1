//! Scheduled action types.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::anchors::ResolvedAnchor;
use crate::clock::format_offset;
use crate::protocol::{Anchor, Protocol};

/// Where a scheduled action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionSource {
    Catalog,
    Session,
}

/// Completion state persisted by the caller and fed back on regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub action_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub skipped: bool,
}

impl ActionStatus {
    pub fn completed(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            completed: true,
            skipped: false,
        }
    }

    pub fn skipped(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            completed: false,
            skipped: true,
        }
    }
}

/// One resolved, dated instance of a protocol or training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    /// `<protocol or session id>-<YYYY-MM-DD>`, unique per calendar day.
    pub id: String,
    pub protocol: Protocol,
    pub source: ActionSource,
    pub scheduled_time: NaiveDateTime,
    /// Always at or after `scheduled_time`.
    pub window_end: NaiveDateTime,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_skipped: bool,
    pub relative_label: String,
    /// Set when the anchor had no value and "now" stood in for it.
    #[serde(default)]
    pub anchor_unresolved: bool,
}

impl ScheduledAction {
    /// Identity of an action instance on a given date.
    pub fn action_id(key: &str, date: NaiveDate) -> String {
        format!("{key}-{}", date.format("%Y-%m-%d"))
    }

    /// Instance of a catalog protocol at an already resolved time.
    pub fn from_catalog(
        protocol: &Protocol,
        resolved: ResolvedAnchor,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Self {
        let scheduled_time = resolved.time;
        let window_end = scheduled_time + Duration::minutes(i64::from(protocol.window_minutes));
        Self {
            id: Self::action_id(&protocol.id, date),
            protocol: protocol.clone(),
            source: ActionSource::Catalog,
            scheduled_time,
            window_end,
            is_active: scheduled_time <= now && now <= window_end,
            is_completed: false,
            is_skipped: false,
            relative_label: relative_label(protocol.anchor, i64::from(protocol.offset_minutes)),
            anchor_unresolved: resolved.is_unresolved(),
        }
    }

    /// Whether `instant` falls inside `[scheduled_time, window_end]`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.scheduled_time <= instant && instant <= self.window_end
    }

    /// Still to come and neither completed nor skipped.
    pub fn is_pending(&self, now: NaiveDateTime) -> bool {
        self.scheduled_time > now && !self.is_completed && !self.is_skipped
    }

    pub fn window_minutes(&self) -> i64 {
        (self.window_end - self.scheduled_time).num_minutes()
    }

    /// Overlay externally persisted completion/skip flags.
    ///
    /// Flags only ever get set: a status record cannot clear completion
    /// already reported by a session tracker.
    pub fn apply_status(&mut self, status: &ActionStatus) {
        self.is_completed |= status.completed;
        self.is_skipped |= status.skipped;
    }
}

/// Label such as `"Wake +2h"` or `"Sleep -10h"`; a zero offset is just the anchor.
pub fn relative_label(anchor: Anchor, offset_minutes: i64) -> String {
    if offset_minutes == 0 {
        anchor.label().to_string()
    } else {
        format!("{} {}", anchor.label(), format_offset(offset_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtocolDomain;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn labels_read_naturally() {
        assert_eq!(relative_label(Anchor::Wake, 120), "Wake +2h");
        assert_eq!(relative_label(Anchor::Sleep, -600), "Sleep -10h");
        assert_eq!(relative_label(Anchor::Training, -45), "Training -45m");
        assert_eq!(relative_label(Anchor::Wake, 0), "Wake");
    }

    #[test]
    fn zero_window_is_active_only_at_its_instant() {
        let p = Protocol::new("cutoff", "Cutoff", ProtocolDomain::Fuel, Anchor::Sleep, -600, 0);
        let resolved = ResolvedAnchor {
            time: at(13, 0),
            fallback: None,
        };
        let action = ScheduledAction::from_catalog(&p, resolved, date(), at(13, 0));
        assert_eq!(action.window_end, action.scheduled_time);
        assert!(action.is_active);
        assert_eq!(action.id, "cutoff-2026-06-01");

        let later = ScheduledAction::from_catalog(&p, resolved, date(), at(13, 1));
        assert!(!later.is_active);
    }

    #[test]
    fn status_overrides_flags() {
        let p = Protocol::new("walk", "Walk", ProtocolDomain::Longevity, Anchor::LastMeal, 15, 30);
        let resolved = ResolvedAnchor {
            time: at(19, 15),
            fallback: None,
        };
        let mut action = ScheduledAction::from_catalog(&p, resolved, date(), at(8, 0));
        assert!(action.is_pending(at(8, 0)));
        action.apply_status(&ActionStatus::skipped(action.id.clone()));
        assert!(action.is_skipped);
        assert!(!action.is_pending(at(8, 0)));
    }

    #[test]
    fn status_never_clears_tracker_completion() {
        let p = Protocol::new("row", "Row", ProtocolDomain::Training, Anchor::Training, 0, 45);
        let resolved = ResolvedAnchor {
            time: at(17, 0),
            fallback: None,
        };
        let mut action = ScheduledAction::from_catalog(&p, resolved, date(), at(8, 0));
        action.is_completed = true;
        action.apply_status(&ActionStatus::skipped(action.id.clone()));
        assert!(action.is_completed);
        assert!(action.is_skipped);
    }
}
