//! # Circadia Core Library
//!
//! This library generates a personalized daily action plan for a user whose
//! day is anchored to biological and behavioral events (waking, sleep,
//! training, meals) rather than fixed clock times. It is CLI-first: every
//! operation is exposed through the standalone `circadia` binary, and any
//! application can embed the same library.
//!
//! ## Architecture
//!
//! - **Protocol Catalog**: an explicitly constructed, read-only set of
//!   anchor-relative protocols grouped by domain
//! - **Anchor Resolver**: turns an anchor plus a signed offset into an
//!   absolute timestamp on the snapshot's reference date
//! - **Timeline**: condition filtering, session merging, day segments and
//!   current/next selection
//! - **Utilities**: deferral guard, reverse-chained session stack,
//!   state-reactive overlay and chronotype detection
//!
//! Every scheduling operation is a pure function of its inputs plus a
//! caller-sampled "now"; nothing here blocks, mutates shared state or fails.
//!
//! ## Key Components
//!
//! - [`ProtocolCatalog`]: Built-in protocol definitions
//! - [`TimelineGenerator`]: Daily timeline generation
//! - [`Config`]: User configuration management

pub mod anchors;
pub mod chronotype;
pub mod clock;
pub mod config;
pub mod deferral;
pub mod error;
pub mod protocol;
pub mod reactive;
pub mod session_stack;
pub mod timeline;

pub use anchors::{AnchorFallback, AnchorResolver, ResolvedAnchor, UserTimeAnchors, WorkHours};
pub use chronotype::{detect_chronotype, Chronotype};
pub use clock::{format_hhmm, MinuteOfDay};
pub use config::Config;
pub use deferral::{should_defer_action, DeferralDecision, SleepPatterns};
pub use error::{ConfigError, CoreError, ValidationError};
pub use protocol::{
    ActionCategory, Anchor, Protocol, ProtocolCatalog, ProtocolConditions, ProtocolDomain,
    ProtocolPriority, CATALOG_VERSION,
};
pub use reactive::{
    get_state_reactive_recommendations, PhysiologicalState, ReactiveAction, ReactiveRecommendation,
};
pub use session_stack::{
    calculate_protocol_timings, generate_session_protocol_stack, ProtocolTimings, SessionPatterns,
    StackDependency, StackedProtocol,
};
pub use timeline::{
    generate_timeline, ActionSource, ActionStatus, DaySegment, DaySegments, GeneratorConfig,
    ScheduledAction, SegmentBoundaries, Timeline, TimelineGenerator, TimelineRequest,
    TrainingSession,
};
