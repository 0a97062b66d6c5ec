//! Violation classification
//!
//! Consumes per-frame observations at a fixed sampling cadence and emits
//! edge-triggered [`ViolationEvent`]s: one event when a condition appears,
//! silence while it persists, and a mandatory pass through clear before the
//! next event can fire.

pub mod classifier;
pub mod event;

pub use classifier::{ViolationClassifier, ViolationCounts};
pub use event::{ViolationEvent, ViolationKind};
