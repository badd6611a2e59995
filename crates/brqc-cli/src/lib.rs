//! CLI library components for the broadcast QC tool.

pub mod cli;
pub mod logging;
pub mod pipeline;
pub mod summary;
