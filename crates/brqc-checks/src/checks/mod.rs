//! The individual QC checks.
//!
//! Each module exposes its output column family name(s) and a `run` function
//! taking the table and the [`crate::RunContext`]. Checks read the table,
//! never write it; annotation is the engine's job.

pub mod completeness;
pub mod domestic_coverage;
pub mod duplicated_market;
pub mod event_fixture;
pub mod id_consistency;
pub mod market_channel;
pub mod overlap;
pub mod program_category;
pub mod rates_ratings;
pub mod source;
pub mod within_period;
