//! Drift engine for sqlapply
//!
//! The engine orchestrates:
//! 1. Diffing - Recompute declared script identities against recorded state
//! 2. Executing - Apply drifted scripts sequentially and record the results

pub mod differ;
pub mod executor;

pub use differ::{Change, ScriptDiff, compute_diffs, display_diffs};
pub use executor::{ApplyOutcome, execute};
