//! Reverse-chained protocol stack for a single training session.
//!
//! Given when a session starts, work backwards to when the user must wake,
//! go to bed and start winding down, and forwards to the refuel window.
//! Offsets chain transitively (wind-down depends on bedtime, which depends
//! on wake, which depends on the session) instead of hanging off the
//! catalog's top-level anchors.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::MinuteOfDay;
use crate::error::ValidationError;
use crate::protocol::{ActionCategory, ProtocolDomain};
use crate::timeline::TrainingSession;

const WIND_DOWN_BEFORE_BED: i64 = 30;
const MORNING_LIGHT_AFTER_WAKE: i64 = 30;
const PRE_FUEL_BEFORE_SESSION: i64 = 120;
const NEURAL_PREP_BEFORE_SESSION: i64 = 45;
const POST_SESSION_AFTER_START: i64 = 90;
/// Upper bound for both pattern durations.
const MAX_PATTERN_HOURS: f64 = 24.0;

/// User patterns the chain is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionPatterns {
    #[serde(default = "default_target_sleep_hours")]
    pub target_sleep_hours: f64,
    /// How long before the session the user wakes.
    #[serde(default = "default_wake_buffer_hours")]
    pub wake_buffer_hours: f64,
}

fn default_target_sleep_hours() -> f64 {
    8.0
}

fn default_wake_buffer_hours() -> f64 {
    2.0
}

impl Default for SessionPatterns {
    fn default() -> Self {
        Self {
            target_sleep_hours: default_target_sleep_hours(),
            wake_buffer_hours: default_wake_buffer_hours(),
        }
    }
}

/// Hours as whole minutes, clamped to `0..=24h`; NaN counts as zero.
fn clamped_minutes(hours: f64) -> i64 {
    (hours.clamp(0.0, MAX_PATTERN_HOURS) * 60.0).round() as i64
}

fn check_hours(field: &str, hours: f64) -> Result<(), ValidationError> {
    if (0.0..=MAX_PATTERN_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: hours,
            min: 0.0,
            max: MAX_PATTERN_HOURS,
        })
    }
}

impl SessionPatterns {
    /// Reject durations outside `0..=24` hours (including NaN).
    ///
    /// Timing calculations clamp regardless, so this is for input boundaries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_hours("target_sleep_hours", self.target_sleep_hours)?;
        check_hours("wake_buffer_hours", self.wake_buffer_hours)
    }

    fn sleep_minutes(&self) -> i64 {
        clamped_minutes(self.target_sleep_hours)
    }

    fn wake_buffer_minutes(&self) -> i64 {
        clamped_minutes(self.wake_buffer_hours)
    }
}

/// Minute offsets of each chained time, relative to the session start.
#[derive(Debug, Clone, Copy)]
struct Chain {
    wake: i64,
    bedtime: i64,
    wind_down: i64,
    morning_light: i64,
    pre_fuel: i64,
    neural_prep: i64,
    post_session: i64,
}

impl Chain {
    fn new(patterns: &SessionPatterns) -> Self {
        let wake = -patterns.wake_buffer_minutes();
        let bedtime = wake - patterns.sleep_minutes();
        Self {
            wake,
            bedtime,
            wind_down: bedtime - WIND_DOWN_BEFORE_BED,
            morning_light: wake + MORNING_LIGHT_AFTER_WAKE,
            pre_fuel: -PRE_FUEL_BEFORE_SESSION,
            neural_prep: -NEURAL_PREP_BEFORE_SESSION,
            post_session: POST_SESSION_AFTER_START,
        }
    }
}

/// Times of day derived from one session, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolTimings {
    pub bedtime: MinuteOfDay,
    pub wind_down: MinuteOfDay,
    pub wake_time: MinuteOfDay,
    pub morning_light: MinuteOfDay,
    pub pre_fuel: MinuteOfDay,
    pub neural_prep: MinuteOfDay,
    pub session: MinuteOfDay,
    pub post_session: MinuteOfDay,
}

/// Back-compute the full chain of times for a session starting at `session_time`.
pub fn calculate_protocol_timings(
    session_time: MinuteOfDay,
    patterns: &SessionPatterns,
) -> ProtocolTimings {
    let chain = Chain::new(patterns);
    let shift = |offset: i64| session_time.add_minutes(offset);
    ProtocolTimings {
        bedtime: shift(chain.bedtime),
        wind_down: shift(chain.wind_down),
        wake_time: shift(chain.wake),
        morning_light: shift(chain.morning_light),
        pre_fuel: shift(chain.pre_fuel),
        neural_prep: shift(chain.neural_prep),
        session: session_time,
        post_session: shift(chain.post_session),
    }
}

/// What a stacked protocol's time was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackDependency {
    Bedtime,
    Session,
}

/// One protocol instance in a session stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedProtocol {
    /// `<session id>-<step>`
    pub id: String,
    pub name: String,
    pub description: String,
    pub domain: ProtocolDomain,
    pub category: ActionCategory,
    pub scheduled_time: NaiveDateTime,
    pub time_of_day: MinuteOfDay,
    pub depends_on: StackDependency,
    /// Signed minutes from the time it depends on.
    pub offset_minutes: i64,
}

struct Step {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    domain: ProtocolDomain,
    category: ActionCategory,
    depends_on: StackDependency,
    /// Offset from the session start.
    from_session: i64,
    /// Offset from the dependency.
    from_dependency: i64,
}

/// Emit the dependent protocols for one session on `date`.
///
/// Returns an empty stack for a session without a time of day. Times before
/// the session may fall on the previous calendar day (bedtime, wind-down).
pub fn generate_session_protocol_stack(
    session: &TrainingSession,
    date: NaiveDate,
    patterns: &SessionPatterns,
) -> Vec<StackedProtocol> {
    let Some(time) = session.time_of_day else {
        tracing::debug!(session = %session.id, "no time of day, empty protocol stack");
        return Vec::new();
    };
    let start = time.on(date);
    let chain = Chain::new(patterns);

    let steps = [
        Step {
            key: "wind_down",
            name: "Wind Down",
            description: "Start the pre-sleep routine so bedtime lands on target.",
            domain: ProtocolDomain::Recovery,
            category: ActionCategory::Sleep,
            depends_on: StackDependency::Bedtime,
            from_session: chain.wind_down,
            from_dependency: -WIND_DOWN_BEFORE_BED,
        },
        Step {
            key: "wake",
            name: "Wake",
            description: "Wake early enough to be fully alert for the session.",
            domain: ProtocolDomain::Recovery,
            category: ActionCategory::Sleep,
            depends_on: StackDependency::Session,
            from_session: chain.wake,
            from_dependency: chain.wake,
        },
        Step {
            key: "morning_light",
            name: "Morning Light",
            description: "Bright light shortly after waking to lift alertness.",
            domain: ProtocolDomain::Longevity,
            category: ActionCategory::Light,
            depends_on: StackDependency::Session,
            from_session: chain.morning_light,
            from_dependency: chain.morning_light,
        },
        Step {
            key: "pre_fuel",
            name: "Pre-Session Fuel",
            description: "Top up glycogen with time to digest.",
            domain: ProtocolDomain::Fuel,
            category: ActionCategory::Nutrition,
            depends_on: StackDependency::Session,
            from_session: chain.pre_fuel,
            from_dependency: chain.pre_fuel,
        },
        Step {
            key: "neural_prep",
            name: "Neural Prep",
            description: "Activation and visualisation before starting.",
            domain: ProtocolDomain::Mind,
            category: ActionCategory::Cognitive,
            depends_on: StackDependency::Session,
            from_session: chain.neural_prep,
            from_dependency: chain.neural_prep,
        },
        Step {
            key: "post_session",
            name: "Post-Session Refuel",
            description: "Protein and carbohydrate once the session is done.",
            domain: ProtocolDomain::Fuel,
            category: ActionCategory::Nutrition,
            depends_on: StackDependency::Session,
            from_session: chain.post_session,
            from_dependency: chain.post_session,
        },
    ];

    let mut stack: Vec<StackedProtocol> = steps
        .into_iter()
        .map(|step| {
            let scheduled_time = start + Duration::minutes(step.from_session);
            StackedProtocol {
                id: format!("{}-{}", session.id, step.key),
                name: step.name.to_string(),
                description: step.description.to_string(),
                domain: step.domain,
                category: step.category,
                scheduled_time,
                time_of_day: MinuteOfDay::of(scheduled_time),
                depends_on: step.depends_on,
                offset_minutes: step.from_dependency,
            }
        })
        .collect();
    stack.sort_by_key(|p| p.scheduled_time);
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> MinuteOfDay {
        MinuteOfDay::parse(s).unwrap()
    }

    #[test]
    fn nine_am_session_with_defaults() {
        let timings = calculate_protocol_timings(t("09:00"), &SessionPatterns::default());
        assert_eq!(timings.wake_time, t("07:00"));
        assert_eq!(timings.bedtime, t("23:00"));
        assert_eq!(timings.wind_down, t("22:30"));
        assert_eq!(timings.morning_light, t("07:30"));
        assert_eq!(timings.pre_fuel, t("07:00"));
        assert_eq!(timings.neural_prep, t("08:15"));
        assert_eq!(timings.session, t("09:00"));
        assert_eq!(timings.post_session, t("10:30"));
    }

    #[test]
    fn timings_serialize_as_strings() {
        let timings = calculate_protocol_timings(t("06:00"), &SessionPatterns::default());
        let json = serde_json::to_value(timings).unwrap();
        assert_eq!(json["bedtime"], "20:00");
        assert_eq!(json["wind_down"], "19:30");
        assert_eq!(json["wake_time"], "04:00");
    }

    #[test]
    fn custom_patterns_shift_the_chain() {
        let patterns = SessionPatterns {
            target_sleep_hours: 7.5,
            wake_buffer_hours: 3.0,
        };
        let timings = calculate_protocol_timings(t("10:00"), &patterns);
        assert_eq!(timings.wake_time, t("07:00"));
        assert_eq!(timings.bedtime, t("23:30"));
        assert_eq!(timings.wind_down, t("23:00"));
    }

    #[test]
    fn stack_has_six_back_referenced_steps() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
        let session = TrainingSession::new("tempo", "Tempo run").at(t("09:00"));
        let stack = generate_session_protocol_stack(&session, date, &SessionPatterns::default());
        assert_eq!(stack.len(), 6);
        assert!(stack.windows(2).all(|w| w[0].scheduled_time <= w[1].scheduled_time));

        let wind_down = &stack[0];
        assert_eq!(wind_down.id, "tempo-wind_down");
        assert_eq!(wind_down.depends_on, StackDependency::Bedtime);
        assert_eq!(wind_down.offset_minutes, -30);
        assert_eq!(
            wind_down.scheduled_time,
            date.pred_opt().unwrap().and_hms_opt(22, 30, 0).unwrap()
        );

        assert!(stack[1..].iter().all(|p| p.depends_on == StackDependency::Session));
        let post = stack.last().unwrap();
        assert_eq!(post.time_of_day, t("10:30"));
        assert_eq!(post.offset_minutes, 90);
    }

    #[test]
    fn absurd_patterns_are_clamped_not_fatal() {
        let patterns = SessionPatterns {
            target_sleep_hours: 1e18,
            wake_buffer_hours: -3.0,
        };
        let timings = calculate_protocol_timings(t("09:00"), &patterns);
        assert_eq!(timings.wake_time, t("09:00"));
        assert_eq!(timings.bedtime, t("09:00"));

        let nan = SessionPatterns {
            target_sleep_hours: f64::NAN,
            wake_buffer_hours: f64::INFINITY,
        };
        let date = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
        let session = TrainingSession::new("odd", "Odd").at(t("09:00"));
        let stack = generate_session_protocol_stack(&session, date, &nan);
        assert_eq!(stack.len(), 6);
        assert_eq!(calculate_protocol_timings(t("09:00"), &nan).wake_time, t("09:00"));
    }

    #[test]
    fn validate_rejects_out_of_range_hours() {
        assert!(SessionPatterns::default().validate().is_ok());
        let too_long = SessionPatterns {
            target_sleep_hours: 25.0,
            ..SessionPatterns::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "target_sleep_hours"
        ));
        let negative = SessionPatterns {
            wake_buffer_hours: -1.0,
            ..SessionPatterns::default()
        };
        assert!(negative.validate().is_err());
        let nan = SessionPatterns {
            target_sleep_hours: f64::NAN,
            ..SessionPatterns::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn untimed_session_yields_empty_stack() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
        let session = TrainingSession::new("x", "Whenever");
        assert!(generate_session_protocol_stack(&session, date, &SessionPatterns::default()).is_empty());
    }
}
