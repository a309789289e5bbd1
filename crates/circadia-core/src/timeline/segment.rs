//! Day-segment categorization.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::action::ScheduledAction;

/// One of four buckets a day is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySegment {
    Morning,
    Midday,
    Evening,
    WindDown,
}

impl DaySegment {
    pub const ALL: [DaySegment; 4] = [
        DaySegment::Morning,
        DaySegment::Midday,
        DaySegment::Evening,
        DaySegment::WindDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Evening => "evening",
            Self::WindDown => "wind_down",
        }
    }
}

/// Segment boundaries derived from the wake and sleep anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBoundaries {
    /// wake + 4h, inclusive.
    pub morning_end: NaiveDateTime,
    /// sleep - 6h, inclusive.
    pub evening_start: NaiveDateTime,
    /// sleep - 2h, inclusive.
    pub wind_down_start: NaiveDateTime,
}

impl SegmentBoundaries {
    pub fn new(wake: NaiveDateTime, sleep: NaiveDateTime) -> Self {
        Self {
            morning_end: wake + Duration::hours(4),
            evening_start: sleep - Duration::hours(6),
            wind_down_start: sleep - Duration::hours(2),
        }
    }

    /// First match wins: wind-down, evening, morning, then midday.
    pub fn classify(&self, time: NaiveDateTime) -> DaySegment {
        if time >= self.wind_down_start {
            DaySegment::WindDown
        } else if time >= self.evening_start {
            DaySegment::Evening
        } else if time <= self.morning_end {
            DaySegment::Morning
        } else {
            DaySegment::Midday
        }
    }
}

/// Actions bucketed by segment, each bucket in sort order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySegments {
    pub morning: Vec<ScheduledAction>,
    pub midday: Vec<ScheduledAction>,
    pub evening: Vec<ScheduledAction>,
    pub wind_down: Vec<ScheduledAction>,
}

impl DaySegments {
    /// Assign every action to exactly one bucket.
    pub fn categorize(actions: &[ScheduledAction], bounds: &SegmentBoundaries) -> Self {
        let mut segments = Self::default();
        for action in actions {
            segments
                .bucket_mut(bounds.classify(action.scheduled_time))
                .push(action.clone());
        }
        segments
    }

    pub fn get(&self, segment: DaySegment) -> &[ScheduledAction] {
        match segment {
            DaySegment::Morning => &self.morning,
            DaySegment::Midday => &self.midday,
            DaySegment::Evening => &self.evening,
            DaySegment::WindDown => &self.wind_down,
        }
    }

    fn bucket_mut(&mut self, segment: DaySegment) -> &mut Vec<ScheduledAction> {
        match segment {
            DaySegment::Morning => &mut self.morning,
            DaySegment::Midday => &mut self.midday,
            DaySegment::Evening => &mut self.evening,
            DaySegment::WindDown => &mut self.wind_down,
        }
    }

    /// Total actions across all buckets.
    pub fn len(&self) -> usize {
        DaySegment::ALL.iter().map(|s| self.get(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
