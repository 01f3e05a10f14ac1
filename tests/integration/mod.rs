//! Integration tests for db-narrate.

pub mod assistant_test;
pub mod config_test;
pub mod pipeline_test;
