//! # inbox-observability
//!
//! Tracing subscriber setup plus span macros shared by the encoder crates.

pub mod tracing_setup;

pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
