//! Per-user anchor snapshot and anchor resolution.
//!
//! An anchor is a behavioral reference point (wake, sleep, training, meals).
//! Resolving an anchor plus a signed offset yields an absolute timestamp on
//! or around the snapshot's reference date.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::chronotype::Chronotype;
use crate::clock::MinuteOfDay;
use crate::protocol::Anchor;

/// Working hours, start and end as times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

/// Snapshot of one user's anchors for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTimeAnchors {
    /// Reference calendar date every time of day is placed on.
    pub date: NaiveDate,
    /// Actual wake time today; overrides `typical_wake_time` when present.
    #[serde(default)]
    pub wake_time_today: Option<NaiveDateTime>,
    pub target_bed_time: NaiveDateTime,
    /// 7-day average wake time.
    pub typical_wake_time: MinuteOfDay,
    /// 7-day average bedtime.
    pub typical_bed_time: MinuteOfDay,
    #[serde(default)]
    pub work_hours: Option<WorkHours>,
    #[serde(default)]
    pub training_time: Option<MinuteOfDay>,
    #[serde(default)]
    pub has_training_today: bool,
    pub first_meal_time: MinuteOfDay,
    pub last_meal_time: MinuteOfDay,
    #[serde(default)]
    pub chronotype: Chronotype,
}

impl UserTimeAnchors {
    /// Snapshot built from the typical pattern alone.
    ///
    /// The target bedtime is placed on `date`, or the following day when the
    /// typical bedtime is earlier than the typical wake time (past midnight).
    /// Meals default to one hour after waking and three hours before bed.
    pub fn from_typical(date: NaiveDate, typical_wake: MinuteOfDay, typical_bed: MinuteOfDay) -> Self {
        let mut target_bed_time = typical_bed.on(date);
        if typical_bed < typical_wake {
            target_bed_time += Duration::days(1);
        }
        Self {
            date,
            wake_time_today: None,
            target_bed_time,
            typical_wake_time: typical_wake,
            typical_bed_time: typical_bed,
            work_hours: None,
            training_time: None,
            has_training_today: false,
            first_meal_time: typical_wake.add_minutes(60),
            last_meal_time: typical_bed.add_minutes(-180),
            chronotype: Chronotype::default(),
        }
    }

    pub fn with_wake_today(mut self, wake: NaiveDateTime) -> Self {
        self.wake_time_today = Some(wake);
        self
    }

    /// Set today's training time and mark the day as a training day.
    pub fn with_training(mut self, time: MinuteOfDay) -> Self {
        self.training_time = Some(time);
        self.has_training_today = true;
        self
    }

    pub fn with_meals(mut self, first: MinuteOfDay, last: MinuteOfDay) -> Self {
        self.first_meal_time = first;
        self.last_meal_time = last;
        self
    }

    pub fn with_work_hours(mut self, start: MinuteOfDay, end: MinuteOfDay) -> Self {
        self.work_hours = Some(WorkHours { start, end });
        self
    }

    pub fn with_chronotype(mut self, chronotype: Chronotype) -> Self {
        self.chronotype = chronotype;
        self
    }
}

/// Why an anchor did not come from the user's own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorFallback {
    /// No actual wake time today; the 7-day typical wake time was used.
    TypicalWake,
    /// No training time configured; the current instant was used.
    CurrentInstant,
}

/// Outcome of resolving one anchor and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub time: NaiveDateTime,
    pub fallback: Option<AnchorFallback>,
}

impl ResolvedAnchor {
    /// True when the anchor had no real value and fell back to "now".
    pub fn is_unresolved(&self) -> bool {
        self.fallback == Some(AnchorFallback::CurrentInstant)
    }
}

/// Resolves anchors against one snapshot and one sampled instant.
#[derive(Debug, Clone, Copy)]
pub struct AnchorResolver<'a> {
    anchors: &'a UserTimeAnchors,
    now: NaiveDateTime,
}

impl<'a> AnchorResolver<'a> {
    pub fn new(anchors: &'a UserTimeAnchors, now: NaiveDateTime) -> Self {
        Self { anchors, now }
    }

    pub fn anchors(&self) -> &'a UserTimeAnchors {
        self.anchors
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Base timestamp for an anchor, before any offset.
    pub fn base(&self, anchor: Anchor) -> ResolvedAnchor {
        let a = self.anchors;
        match anchor {
            Anchor::Wake => match a.wake_time_today {
                Some(wake) => ResolvedAnchor {
                    time: wake,
                    fallback: None,
                },
                None => ResolvedAnchor {
                    time: a.typical_wake_time.on(a.date),
                    fallback: Some(AnchorFallback::TypicalWake),
                },
            },
            Anchor::Sleep => ResolvedAnchor {
                time: a.target_bed_time,
                fallback: None,
            },
            Anchor::Training => match a.training_time {
                Some(time) => ResolvedAnchor {
                    time: time.on(a.date),
                    fallback: None,
                },
                None => ResolvedAnchor {
                    time: self.now,
                    fallback: Some(AnchorFallback::CurrentInstant),
                },
            },
            Anchor::FirstMeal => ResolvedAnchor {
                time: a.first_meal_time.on(a.date),
                fallback: None,
            },
            Anchor::LastMeal => ResolvedAnchor {
                time: a.last_meal_time.on(a.date),
                fallback: None,
            },
        }
    }

    /// Anchor plus a signed minute offset. Never clamps.
    pub fn resolve(&self, anchor: Anchor, offset_minutes: i64) -> ResolvedAnchor {
        let base = self.base(anchor);
        ResolvedAnchor {
            time: base.time + Duration::minutes(offset_minutes),
            fallback: base.fallback,
        }
    }

    pub fn wake_time(&self) -> NaiveDateTime {
        self.base(Anchor::Wake).time
    }

    pub fn sleep_time(&self) -> NaiveDateTime {
        self.base(Anchor::Sleep).time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> MinuteOfDay {
        MinuteOfDay::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn wake_prefers_actual_over_typical() {
        let anchors = UserTimeAnchors::from_typical(date(), t("07:00"), t("23:00"));
        let resolver = AnchorResolver::new(&anchors, at(12, 0));
        let typical = resolver.base(Anchor::Wake);
        assert_eq!(typical.time, at(7, 0));
        assert_eq!(typical.fallback, Some(AnchorFallback::TypicalWake));
        assert!(!typical.is_unresolved());

        let anchors = anchors.with_wake_today(at(6, 12));
        let resolver = AnchorResolver::new(&anchors, at(12, 0));
        let actual = resolver.base(Anchor::Wake);
        assert_eq!(actual.time, at(6, 12));
        assert_eq!(actual.fallback, None);
    }

    #[test]
    fn sleep_uses_target_bed_time_directly() {
        let anchors = UserTimeAnchors::from_typical(date(), t("07:00"), t("23:00"));
        let resolver = AnchorResolver::new(&anchors, at(12, 0));
        assert_eq!(resolver.resolve(Anchor::Sleep, -600).time, at(13, 0));
    }

    #[test]
    fn after_midnight_bedtime_lands_on_next_day() {
        let anchors = UserTimeAnchors::from_typical(date(), t("08:00"), t("00:30"));
        let expected = date().succ_opt().unwrap().and_hms_opt(0, 30, 0).unwrap();
        assert_eq!(anchors.target_bed_time, expected);
    }

    #[test]
    fn missing_training_time_falls_back_to_now() {
        let anchors = UserTimeAnchors::from_typical(date(), t("07:00"), t("23:00"));
        let resolver = AnchorResolver::new(&anchors, at(10, 37));
        let resolved = resolver.resolve(Anchor::Training, -45);
        assert_eq!(resolved.time, at(9, 52));
        assert!(resolved.is_unresolved());

        let anchors = anchors.with_training(t("17:30"));
        let resolver = AnchorResolver::new(&anchors, at(10, 37));
        let resolved = resolver.resolve(Anchor::Training, -45);
        assert_eq!(resolved.time, at(16, 45));
        assert!(!resolved.is_unresolved());
    }

    #[test]
    fn offsets_cross_into_neighbouring_days() {
        let anchors = UserTimeAnchors::from_typical(date(), t("01:00"), t("17:00"));
        let resolver = AnchorResolver::new(&anchors, at(12, 0));
        let before = resolver.resolve(Anchor::Wake, -120).time;
        assert_eq!(before, date().pred_opt().unwrap().and_hms_opt(23, 0, 0).unwrap());
    }

    #[test]
    fn meals_resolve_on_reference_date() {
        let anchors = UserTimeAnchors::from_typical(date(), t("07:00"), t("23:00"))
            .with_meals(t("09:30"), t("19:15"));
        let resolver = AnchorResolver::new(&anchors, at(12, 0));
        assert_eq!(resolver.resolve(Anchor::FirstMeal, 0).time, at(9, 30));
        assert_eq!(resolver.resolve(Anchor::LastMeal, 15).time, at(19, 30));
    }
}
