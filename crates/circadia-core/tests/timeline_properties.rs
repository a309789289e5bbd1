//! Property tests for timeline invariants.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use circadia_core::{
    generate_timeline, AnchorResolver, DaySegment, MinuteOfDay, ProtocolCatalog, TrainingSession,
    UserTimeAnchors,
};
use proptest::prelude::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

prop_compose! {
    fn arb_anchors()(
        wake in 240i64..660,
        awake_hours in 12i64..19,
        training in proptest::option::of(300i64..1260),
        actual_wake_shift in proptest::option::of(-90i64..90),
    ) -> UserTimeAnchors {
        let wake_t = MinuteOfDay::wrapping(wake);
        let bed_t = MinuteOfDay::wrapping(wake + awake_hours * 60);
        let mut anchors = UserTimeAnchors::from_typical(date(), wake_t, bed_t);
        if let Some(training) = training {
            anchors = anchors.with_training(MinuteOfDay::wrapping(training));
        }
        if let Some(shift) = actual_wake_shift {
            anchors = anchors.with_wake_today(wake_t.on(date()) + Duration::minutes(shift));
        }
        anchors
    }
}

fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..(36 * 60)).prop_map(|m| date().and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(m))
}

fn arb_sessions() -> impl Strategy<Value = Vec<TrainingSession>> {
    proptest::collection::vec(
        (proptest::option::of(0i64..1440), proptest::option::of(10u32..180), any::<bool>()),
        0..4,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (time, duration, completed))| {
                let mut s = TrainingSession::new(format!("s{i}"), "Session").with_completed(completed);
                s.time_of_day = time.map(MinuteOfDay::wrapping);
                s.duration_minutes = duration;
                s
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn actions_match_resolver_and_window(anchors in arb_anchors(), score in 0u8..=100, now in arb_now()) {
        let timeline = generate_timeline(&anchors, score, &[], &[], now);
        let resolver = AnchorResolver::new(&anchors, now);
        for action in &timeline.all_actions {
            let p = &action.protocol;
            let expected = resolver.resolve(p.anchor, i64::from(p.offset_minutes)).time;
            prop_assert_eq!(action.scheduled_time, expected);
            prop_assert_eq!(
                action.window_end,
                action.scheduled_time + Duration::minutes(i64::from(p.window_minutes))
            );
        }
    }

    #[test]
    fn conditions_are_honoured(anchors in arb_anchors(), score in 0u8..=100, now in arb_now()) {
        let timeline = generate_timeline(&anchors, score, &[], &[], now);
        let catalog = ProtocolCatalog::builtin();
        for p in &catalog {
            let present = timeline.all_actions.iter().any(|a| a.protocol.id == p.id);
            let mut expected = true;
            if p.conditions.only_if_training {
                expected &= anchors.has_training_today;
            }
            if p.conditions.only_if_no_training {
                expected &= !anchors.has_training_today;
            }
            if let Some(min) = p.conditions.min_recovery_score {
                expected &= score >= min;
            }
            prop_assert_eq!(present, expected, "protocol {}", p.id);
        }
    }

    #[test]
    fn sorted_partitioned_and_consistent(
        anchors in arb_anchors(),
        sessions in arb_sessions(),
        now in arb_now(),
    ) {
        let timeline = generate_timeline(&anchors, 80, &sessions, &[], now);
        let all = &timeline.all_actions;

        prop_assert!(all.windows(2).all(|w| w[0].scheduled_time <= w[1].scheduled_time));
        prop_assert!(all.iter().all(|a| a.window_end >= a.scheduled_time));

        let bucketed: usize = DaySegment::ALL.iter().map(|s| timeline.segments.get(*s).len()).sum();
        prop_assert_eq!(bucketed, all.len());
        for action in all {
            let hits = DaySegment::ALL
                .iter()
                .filter(|s| timeline.segments.get(**s).iter().any(|a| a.id == action.id))
                .count();
            prop_assert_eq!(hits, 1);
        }

        match &timeline.current_action {
            Some(current) => {
                prop_assert!(current.scheduled_time <= now && now <= current.window_end);
                let first_active = all.iter().find(|a| a.contains(now)).unwrap();
                prop_assert_eq!(&first_active.id, &current.id);
            }
            None => prop_assert!(all.iter().all(|a| !a.contains(now))),
        }

        if let Some(next) = &timeline.next_action {
            prop_assert!(next.scheduled_time > now && !next.is_completed && !next.is_skipped);
        }
    }

    #[test]
    fn generation_is_idempotent(anchors in arb_anchors(), sessions in arb_sessions(), now in arb_now()) {
        let a = generate_timeline(&anchors, 55, &sessions, &[], now);
        let b = generate_timeline(&anchors, 55, &sessions, &[], now);
        prop_assert_eq!(a, b);
    }
}
