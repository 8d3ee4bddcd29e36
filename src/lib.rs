//! relist — automated backpack.tf classifieds repricer.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod backpack;
pub mod config;
pub mod currency;
pub mod engine;
pub mod pricing;
pub mod storage;
pub mod types;
