//! Protocol definitions and the built-in catalog.
//!
//! A protocol is a reusable behavioral recommendation scheduled relative to
//! an anchor (wake, sleep, training, meals) rather than a fixed clock time.

mod catalog;
mod types;

pub use catalog::{ProtocolCatalog, CATALOG_VERSION};
pub use types::{
    ActionCategory, Anchor, Protocol, ProtocolConditions, ProtocolDomain, ProtocolPriority,
};
