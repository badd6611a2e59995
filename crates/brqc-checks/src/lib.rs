mod checks;
mod context;
mod engine;
mod outcome;

pub use checks::duplicated_market::DuplicatedChannels;
pub use checks::program_category::EXPECTED_COLUMN;
pub use context::{RunContext, resolver_for};
pub use engine::{CHECK_ORDER, EngineReport, run_checks};
pub use outcome::{CheckOutcome, annotate, join_remarks};
