//! Built-in protocol catalog.
//!
//! The catalog is an explicitly constructed, immutable value. Callers build
//! it once (usually at startup) and hand a reference to the generator; there
//! is no process-wide instance.

use serde::{Deserialize, Serialize};

use super::types::{ActionCategory, Anchor, Protocol, ProtocolDomain, ProtocolPriority};

/// Revision of the built-in protocol set. Bump when entries change.
pub const CATALOG_VERSION: u32 = 3;

/// Read-only set of protocol definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolCatalog {
    version: u32,
    protocols: Vec<Protocol>,
}

impl Default for ProtocolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProtocolCatalog {
    /// Catalog from an arbitrary protocol list.
    pub fn from_protocols(version: u32, protocols: Vec<Protocol>) -> Self {
        Self { version, protocols }
    }

    /// The built-in longevity, fuel, recovery and mind protocols.
    pub fn builtin() -> Self {
        let mut protocols = Vec::new();
        protocols.extend(longevity());
        protocols.extend(fuel());
        protocols.extend(recovery());
        protocols.extend(mind());
        Self::from_protocols(CATALOG_VERSION, protocols)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Protocol> {
        self.protocols.iter()
    }

    /// Protocols of a single domain, in catalog order.
    pub fn by_domain(&self, domain: ProtocolDomain) -> impl Iterator<Item = &Protocol> {
        self.protocols.iter().filter(move |p| p.domain == domain)
    }

    /// Find a protocol by id.
    pub fn get(&self, id: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.id == id)
    }

    /// Built-in protocols followed by caller-supplied extras, in that order.
    pub fn iter_with<'a>(&'a self, extra: &'a [Protocol]) -> impl Iterator<Item = &'a Protocol> {
        self.protocols.iter().chain(extra.iter())
    }
}

impl<'a> IntoIterator for &'a ProtocolCatalog {
    type Item = &'a Protocol;
    type IntoIter = std::slice::Iter<'a, Protocol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn longevity() -> Vec<Protocol> {
    use ProtocolDomain::Longevity;
    vec![
        Protocol::new("morning_sunlight", "Morning Sunlight", Longevity, Anchor::Wake, 0, 60)
            .with_description("Get outdoor light in your eyes to set the circadian clock.")
            .with_priority(ProtocolPriority::Critical)
            .with_duration(10)
            .with_category(ActionCategory::Light)
            .not_skippable(),
        Protocol::new("cold_exposure", "Cold Exposure", Longevity, Anchor::Wake, 120, 240)
            .with_description("Cold shower or plunge while core temperature is rising.")
            .with_duration(5)
            .with_category(ActionCategory::ColdExposure)
            .min_recovery(60),
        Protocol::new("evening_sauna", "Evening Sauna", Longevity, Anchor::Sleep, -240, 120)
            .with_description("Heat session early enough for core temperature to drop before bed.")
            .with_duration(20)
            .with_category(ActionCategory::Sauna)
            .min_recovery(40),
        Protocol::new("post_meal_walk", "Post-Meal Walk", Longevity, Anchor::LastMeal, 15, 30)
            .with_description("Easy walk to blunt the glucose response of the last meal.")
            .with_priority(ProtocolPriority::Low)
            .with_duration(15)
            .with_category(ActionCategory::Movement),
    ]
}

fn fuel() -> Vec<Protocol> {
    use ProtocolDomain::Fuel;
    vec![
        Protocol::new("morning_hydration", "Morning Hydration", Fuel, Anchor::Wake, 0, 30)
            .with_description("Water with electrolytes before anything else.")
            .with_priority(ProtocolPriority::High)
            .with_duration(5)
            .with_category(ActionCategory::Nutrition),
        Protocol::new("first_caffeine", "First Caffeine", Fuel, Anchor::Wake, 90, 60)
            .with_description("Delay caffeine until adenosine has cleared.")
            .with_duration(5)
            .with_category(ActionCategory::Caffeine),
        Protocol::new("caffeine_cutoff", "Caffeine Cutoff", Fuel, Anchor::Sleep, -600, 0)
            .with_description("No caffeine after this point.")
            .with_priority(ProtocolPriority::High)
            .with_duration(0)
            .with_category(ActionCategory::Caffeine),
        Protocol::new("first_meal", "First Meal", Fuel, Anchor::FirstMeal, 0, 60)
            .with_description("Protein-forward first meal.")
            .with_priority(ProtocolPriority::High)
            .with_duration(30)
            .with_category(ActionCategory::Nutrition),
        Protocol::new("pre_training_fuel", "Pre-Training Fuel", Fuel, Anchor::Training, -120, 60)
            .with_description("Easily digested carbohydrate and protein ahead of the session.")
            .with_priority(ProtocolPriority::High)
            .with_duration(15)
            .with_category(ActionCategory::Nutrition)
            .only_if_training(),
        Protocol::new("post_training_refuel", "Post-Training Refuel", Fuel, Anchor::Training, 90, 60)
            .with_description("Refuel and rehydrate after training.")
            .with_priority(ProtocolPriority::Critical)
            .with_duration(20)
            .with_category(ActionCategory::Nutrition)
            .only_if_training(),
        Protocol::new("last_meal_cutoff", "Last Meal Cutoff", Fuel, Anchor::Sleep, -180, 0)
            .with_description("Finish eating three hours before bed.")
            .with_priority(ProtocolPriority::High)
            .with_duration(0)
            .with_category(ActionCategory::Nutrition),
    ]
}

fn recovery() -> Vec<Protocol> {
    use ProtocolDomain::Recovery;
    vec![
        Protocol::new("midday_nsdr", "NSDR Reset", Recovery, Anchor::Wake, 420, 60)
            .with_description("Non-sleep deep rest during the post-lunch dip.")
            .with_priority(ProtocolPriority::Low)
            .with_duration(20)
            .with_category(ActionCategory::Breathwork),
        Protocol::new("rest_day_mobility", "Rest-Day Mobility", Recovery, Anchor::Wake, 480, 180)
            .with_description("Light mobility work on days without training.")
            .with_priority(ProtocolPriority::Low)
            .with_duration(20)
            .with_category(ActionCategory::Movement)
            .only_if_no_training(),
        Protocol::new("dim_lights", "Dim the Lights", Recovery, Anchor::Sleep, -120, 120)
            .with_description("Switch to low, warm light.")
            .with_duration(5)
            .with_category(ActionCategory::Light),
        Protocol::new("screens_off", "Screens Off", Recovery, Anchor::Sleep, -60, 60)
            .with_description("Put devices away and start the wind-down routine.")
            .with_priority(ProtocolPriority::Critical)
            .with_duration(60)
            .with_category(ActionCategory::Sleep)
            .not_skippable(),
    ]
}

fn mind() -> Vec<Protocol> {
    use ProtocolDomain::Mind;
    vec![
        Protocol::new("morning_breathwork", "Breathwork Primer", Mind, Anchor::Wake, 30, 30)
            .with_description("Five minutes of cyclic sighing.")
            .with_duration(10)
            .with_category(ActionCategory::Breathwork),
        Protocol::new("deep_work_block", "Deep Work Block", Mind, Anchor::Wake, 150, 180)
            .with_description("Protect the morning alertness peak for focused work.")
            .with_priority(ProtocolPriority::High)
            .with_duration(90)
            .with_category(ActionCategory::Cognitive),
        Protocol::new("neural_prep", "Neural Prep", Mind, Anchor::Training, -45, 30)
            .with_description("Visualisation and activation drills before the session.")
            .with_priority(ProtocolPriority::High)
            .with_duration(10)
            .with_category(ActionCategory::Cognitive)
            .only_if_training(),
        Protocol::new("evening_journal", "Evening Journal", Mind, Anchor::Sleep, -90, 30)
            .with_description("Offload open loops before bed.")
            .with_priority(ProtocolPriority::Low)
            .with_duration(10)
            .with_category(ActionCategory::Cognitive),
    ]
}
