//! Timeline generator.
//!
//! Filters the catalog by today's conditions, resolves each surviving
//! protocol against the anchors, merges timed training sessions, sorts, and
//! categorizes. Generation is a pure function of its inputs and one sampled
//! "now"; it never fails.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::action::{ActionStatus, ScheduledAction};
use super::cursor::{find_current, find_next};
use super::segment::{DaySegments, SegmentBoundaries};
use super::session::{merge_sessions, TrainingSession, DEFAULT_SESSION_MINUTES};
use crate::anchors::{AnchorResolver, UserTimeAnchors};
use crate::protocol::{Protocol, ProtocolCatalog};

/// Recovery score assumed when the caller has none.
pub const DEFAULT_RECOVERY_SCORE: u8 = 80;

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Duration for sessions that do not state one (minutes)
    pub default_session_minutes: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_session_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

/// Inputs to one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRequest {
    pub anchors: UserTimeAnchors,
    /// Upstream recovery score, 0-100. Consumed as-is.
    #[serde(default = "default_recovery_score")]
    pub recovery_score: u8,
    #[serde(default)]
    pub sessions: Vec<TrainingSession>,
    #[serde(default)]
    pub extra_protocols: Vec<Protocol>,
    /// Completion/skip state persisted by the caller from earlier calls.
    #[serde(default)]
    pub statuses: Vec<ActionStatus>,
}

fn default_recovery_score() -> u8 {
    DEFAULT_RECOVERY_SCORE
}

impl TimelineRequest {
    pub fn new(anchors: UserTimeAnchors) -> Self {
        Self {
            anchors,
            recovery_score: DEFAULT_RECOVERY_SCORE,
            sessions: Vec::new(),
            extra_protocols: Vec::new(),
            statuses: Vec::new(),
        }
    }

    pub fn with_recovery_score(mut self, score: u8) -> Self {
        self.recovery_score = score;
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<TrainingSession>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_extra_protocols(mut self, protocols: Vec<Protocol>) -> Self {
        self.extra_protocols = protocols;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<ActionStatus>) -> Self {
        self.statuses = statuses;
        self
    }
}

/// One day's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub date: NaiveDate,
    pub anchors: UserTimeAnchors,
    pub catalog_version: u32,
    pub segments: DaySegments,
    /// Every action, sorted by scheduled time (stable).
    pub all_actions: Vec<ScheduledAction>,
    pub current_action: Option<ScheduledAction>,
    pub next_action: Option<ScheduledAction>,
}

impl Timeline {
    /// Look up an action by id.
    pub fn find(&self, id: &str) -> Option<&ScheduledAction> {
        self.all_actions.iter().find(|a| a.id == id)
    }

    /// Actions whose anchor fell back to the generation instant.
    pub fn unresolved_actions(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.all_actions.iter().filter(|a| a.anchor_unresolved)
    }
}

/// Stateless generator over an explicitly supplied catalog.
#[derive(Debug, Clone, Copy)]
pub struct TimelineGenerator<'a> {
    catalog: &'a ProtocolCatalog,
    config: GeneratorConfig,
}

impl<'a> TimelineGenerator<'a> {
    /// Create a generator with default config
    pub fn new(catalog: &'a ProtocolCatalog) -> Self {
        Self {
            catalog,
            config: GeneratorConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(catalog: &'a ProtocolCatalog, config: GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a ProtocolCatalog {
        self.catalog
    }

    /// Catalog-derived actions surviving today's conditions, in catalog order.
    pub fn resolve_protocols(
        &self,
        request: &TimelineRequest,
        now: NaiveDateTime,
    ) -> Vec<ScheduledAction> {
        let anchors = &request.anchors;
        let resolver = AnchorResolver::new(anchors, now);

        self.catalog
            .iter_with(&request.extra_protocols)
            .filter(|p| {
                let keep = p.applies(anchors.has_training_today, request.recovery_score);
                if !keep {
                    tracing::trace!(protocol = %p.id, "conditions not met, filtered out");
                }
                keep
            })
            .map(|p| {
                let resolved = resolver.resolve(p.anchor, i64::from(p.offset_minutes));
                ScheduledAction::from_catalog(p, resolved, anchors.date, now)
            })
            .collect()
    }

    /// Generate the timeline for `request` as seen at `now`.
    pub fn generate(&self, request: &TimelineRequest, now: NaiveDateTime) -> Timeline {
        let anchors = &request.anchors;
        let resolver = AnchorResolver::new(anchors, now);

        let mut all_actions = self.resolve_protocols(request, now);
        let catalog_count = all_actions.len();
        all_actions.extend(merge_sessions(
            &request.sessions,
            anchors.date,
            self.config.default_session_minutes,
            now,
        ));

        if !request.statuses.is_empty() {
            let statuses: HashMap<&str, &ActionStatus> = request
                .statuses
                .iter()
                .map(|s| (s.action_id.as_str(), s))
                .collect();
            for action in &mut all_actions {
                if let Some(status) = statuses.get(action.id.as_str()) {
                    action.apply_status(status);
                }
            }
        }

        // Vec::sort_by_key is stable: ties keep catalog-then-session order.
        all_actions.sort_by_key(|a| a.scheduled_time);

        let unresolved = all_actions.iter().filter(|a| a.anchor_unresolved).count();
        if unresolved > 0 {
            tracing::warn!(
                count = unresolved,
                "training anchor has no time, scheduled around the current instant"
            );
        }

        let bounds = SegmentBoundaries::new(resolver.wake_time(), resolver.sleep_time());
        let segments = DaySegments::categorize(&all_actions, &bounds);
        let current_action = find_current(&all_actions).cloned();
        let next_action = find_next(&all_actions, now).cloned();

        tracing::debug!(
            date = %anchors.date,
            catalog = catalog_count,
            sessions = all_actions.len() - catalog_count,
            current = current_action.as_ref().map(|a| a.id.as_str()),
            next = next_action.as_ref().map(|a| a.id.as_str()),
            "generated timeline"
        );

        Timeline {
            date: anchors.date,
            anchors: anchors.clone(),
            catalog_version: self.catalog.version(),
            segments,
            all_actions,
            current_action,
            next_action,
        }
    }
}

/// Generate a timeline from the built-in catalog with default configuration.
pub fn generate_timeline(
    anchors: &UserTimeAnchors,
    recovery_score: u8,
    sessions: &[TrainingSession],
    extra_protocols: &[Protocol],
    now: NaiveDateTime,
) -> Timeline {
    let catalog = ProtocolCatalog::builtin();
    let request = TimelineRequest::new(anchors.clone())
        .with_recovery_score(recovery_score)
        .with_sessions(sessions.to_vec())
        .with_extra_protocols(extra_protocols.to_vec());
    TimelineGenerator::new(&catalog).generate(&request, now)
}
