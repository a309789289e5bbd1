//! State-reactive suggestions outside the static catalog.
//!
//! These are never merged into a [`Timeline`](crate::Timeline); callers show
//! them alongside it.

use serde::{Deserialize, Serialize};

/// Physiological signals from upstream scoring engines, consumed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalState {
    /// 0-100
    pub readiness_score: f64,
    /// 0-10
    pub stress_level: f64,
    /// 0-100
    pub recovery_score: f64,
}

/// Ad-hoc action kinds the overlay can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactiveAction {
    PowerNap,
    EveningSauna,
    BoxBreathing,
}

impl ReactiveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerNap => "power_nap",
            Self::EveningSauna => "evening_sauna",
            Self::BoxBreathing => "box_breathing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveRecommendation {
    pub action: ReactiveAction,
    /// 0-100, higher is more pressing.
    pub urgency: u8,
    pub reason: String,
}

/// Suggestions for `state` at `current_hour` (0-23), in a fixed order.
pub fn get_state_reactive_recommendations(
    state: &PhysiologicalState,
    current_hour: u32,
) -> Vec<ReactiveRecommendation> {
    let mut recommendations = Vec::new();

    if (13..=16).contains(&current_hour) && (state.readiness_score < 40.0 || state.stress_level > 7.0) {
        recommendations.push(ReactiveRecommendation {
            action: ReactiveAction::PowerNap,
            urgency: 85,
            reason: "Low readiness or high stress during the afternoon dip; 20 minutes max".into(),
        });
    }

    if (17..=21).contains(&current_hour) && state.recovery_score < 50.0 {
        recommendations.push(ReactiveRecommendation {
            action: ReactiveAction::EveningSauna,
            urgency: 70,
            reason: "Recovery is below 50; heat exposure supports parasympathetic rebound".into(),
        });
    }

    if state.stress_level > 8.0 {
        recommendations.push(ReactiveRecommendation {
            action: ReactiveAction::BoxBreathing,
            urgency: 90,
            reason: "Acute stress; four rounds of 4-4-4-4 breathing".into(),
        });
    }

    recommendations
}
