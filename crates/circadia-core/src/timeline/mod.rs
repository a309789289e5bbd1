//! Daily timeline generation.
//!
//! This module provides:
//! - Resolution of catalog protocols into dated, scheduled actions
//! - Merging of externally tracked training sessions into the same list
//! - Day-segment categorization and current/next selection

mod action;
mod cursor;
mod generator;
mod segment;
mod session;

pub use action::{relative_label, ActionSource, ActionStatus, ScheduledAction};
pub use cursor::{find_current, find_next};
pub use generator::{
    generate_timeline, GeneratorConfig, Timeline, TimelineGenerator, TimelineRequest,
    DEFAULT_RECOVERY_SCORE,
};
pub use segment::{DaySegment, DaySegments, SegmentBoundaries};
pub use session::{merge_sessions, TrainingSession, DEFAULT_SESSION_MINUTES};
