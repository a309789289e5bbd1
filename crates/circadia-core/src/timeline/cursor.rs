//! Current/next action selection over an already sorted list.

use chrono::NaiveDateTime;

use super::action::ScheduledAction;

/// First active action in sort order.
///
/// Several windows may be active at once; the earliest-scheduled wins, and
/// equal times keep insertion order.
pub fn find_current(actions: &[ScheduledAction]) -> Option<&ScheduledAction> {
    actions.iter().find(|a| a.is_active)
}

/// First action strictly after `now` that is neither completed nor skipped.
pub fn find_next(actions: &[ScheduledAction], now: NaiveDateTime) -> Option<&ScheduledAction> {
    actions.iter().find(|a| a.is_pending(now))
}
