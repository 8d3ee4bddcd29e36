//! Pricing pipeline.
//!
//! Listing price samples (in scrap) flow through three stages:
//! outlier trimming, median aggregation, and undercut quoting. All three
//! are pure, synchronous functions over caller-owned data — safe to call
//! from anywhere without coordination.

pub mod aggregate;
pub mod quote;
pub mod trim;

pub use aggregate::median;
pub use quote::{compute_quote, Quote};
pub use trim::trim_outliers;
