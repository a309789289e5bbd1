//! Protocol value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Reference point a protocol is scheduled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Wake,
    Sleep,
    Training,
    FirstMeal,
    LastMeal,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::Wake,
        Anchor::Sleep,
        Anchor::Training,
        Anchor::FirstMeal,
        Anchor::LastMeal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wake => "wake",
            Self::Sleep => "sleep",
            Self::Training => "training",
            Self::FirstMeal => "first_meal",
            Self::LastMeal => "last_meal",
        }
    }

    /// Human-readable prefix used in relative labels ("Wake +2h").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wake => "Wake",
            Self::Sleep => "Sleep",
            Self::Training => "Training",
            Self::FirstMeal => "First meal",
            Self::LastMeal => "Last meal",
        }
    }
}

/// Catalog partition a protocol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolDomain {
    Longevity,
    Fuel,
    Recovery,
    Mind,
    /// Synthesized from external training sessions, never in the catalog.
    Training,
}

impl ProtocolDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Longevity => "longevity",
            Self::Fuel => "fuel",
            Self::Recovery => "recovery",
            Self::Mind => "mind",
            Self::Training => "training",
        }
    }
}

impl FromStr for ProtocolDomain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "longevity" => Ok(Self::Longevity),
            "fuel" => Ok(Self::Fuel),
            "recovery" => Ok(Self::Recovery),
            "mind" => Ok(Self::Mind),
            "training" => Ok(Self::Training),
            other => Err(ValidationError::InvalidValue {
                field: "domain".into(),
                message: format!("unknown domain '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ProtocolDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority tier, ordered from most to least important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl ProtocolPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Kind of physiological load an action carries, consulted by the deferral guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Sauna,
    ColdExposure,
    Training,
    HighIntensity,
    HeavyTraining,
    Light,
    Nutrition,
    Caffeine,
    Breathwork,
    Sleep,
    Cognitive,
    Movement,
    Other,
}

impl ActionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sauna => "sauna",
            Self::ColdExposure => "cold_exposure",
            Self::Training => "training",
            Self::HighIntensity => "high_intensity",
            Self::HeavyTraining => "heavy_training",
            Self::Light => "light",
            Self::Nutrition => "nutrition",
            Self::Caffeine => "caffeine",
            Self::Breathwork => "breathwork",
            Self::Sleep => "sleep",
            Self::Cognitive => "cognitive",
            Self::Movement => "movement",
            Self::Other => "other",
        }
    }
}

impl FromStr for ActionCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sauna" => Self::Sauna,
            "cold_exposure" => Self::ColdExposure,
            "training" => Self::Training,
            "high_intensity" => Self::HighIntensity,
            "heavy_training" => Self::HeavyTraining,
            "light" => Self::Light,
            "nutrition" => Self::Nutrition,
            "caffeine" => Self::Caffeine,
            "breathwork" => Self::Breathwork,
            "sleep" => Self::Sleep,
            "cognitive" => Self::Cognitive,
            "movement" => Self::Movement,
            "other" => Self::Other,
            other => {
                return Err(ValidationError::InvalidValue {
                    field: "category".into(),
                    message: format!("unknown action category '{other}'"),
                })
            }
        };
        Ok(category)
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applicability conditions; an empty set always applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConditions {
    #[serde(default)]
    pub only_if_training: bool,
    #[serde(default)]
    pub only_if_no_training: bool,
    #[serde(default)]
    pub min_recovery_score: Option<u8>,
}

impl ProtocolConditions {
    /// Whether a protocol with these conditions applies today.
    pub fn allows(&self, has_training_today: bool, recovery_score: u8) -> bool {
        if self.only_if_training && !has_training_today {
            return false;
        }
        if self.only_if_no_training && has_training_today {
            return false;
        }
        match self.min_recovery_score {
            Some(threshold) => recovery_score >= threshold,
            None => true,
        }
    }
}

/// A catalog entry: what to do, and when relative to which anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub domain: ProtocolDomain,
    pub anchor: Anchor,
    /// Signed minutes from the anchor; negative means before it.
    pub offset_minutes: i32,
    /// Actionable window length; 0 is a point-in-time reminder.
    pub window_minutes: u32,
    pub priority: ProtocolPriority,
    #[serde(default = "default_true")]
    pub skippable: bool,
    #[serde(default)]
    pub conditions: ProtocolConditions,
    pub duration_minutes: u32,
    #[serde(default)]
    pub category: Option<ActionCategory>,
}

fn default_true() -> bool {
    true
}

impl Protocol {
    /// Create a protocol with medium priority, skippable, no conditions.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: ProtocolDomain,
        anchor: Anchor,
        offset_minutes: i32,
        window_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            domain,
            anchor,
            offset_minutes,
            window_minutes,
            priority: ProtocolPriority::Medium,
            skippable: true,
            conditions: ProtocolConditions::default(),
            duration_minutes: window_minutes,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: ProtocolPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn not_skippable(mut self) -> Self {
        self.skippable = false;
        self
    }

    pub fn only_if_training(mut self) -> Self {
        self.conditions.only_if_training = true;
        self
    }

    pub fn only_if_no_training(mut self) -> Self {
        self.conditions.only_if_no_training = true;
        self
    }

    pub fn min_recovery(mut self, score: u8) -> Self {
        self.conditions.min_recovery_score = Some(score);
        self
    }

    /// Whether this protocol survives the applicability filter.
    pub fn applies(&self, has_training_today: bool, recovery_score: u8) -> bool {
        self.conditions.allows(has_training_today, recovery_score)
    }
}
