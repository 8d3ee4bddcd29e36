//! Repricing engine.
//!
//! `Repricer` pulls market samples and computes undercut quotes;
//! `Syncer` republishes our classifieds at the stored quotes.

pub mod repricer;
pub mod syncer;

pub use repricer::{RefreshOutcome, Repricer, TrackedItem};
pub use syncer::{SyncOutcome, Syncer};
