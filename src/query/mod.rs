//! Per-request execution for db-narrate.
//!
//! `Pipeline` turns raw SQL into a `FormattedOutput`; `Assistant` puts the
//! translator in front of it.

pub mod assistant;
pub mod executor;
pub mod pipeline;

pub use assistant::Assistant;
pub use executor::{execute, ExecutionOutcome};
pub use pipeline::{FormattedOutput, Pipeline};
