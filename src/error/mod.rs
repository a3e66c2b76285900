//! Error handling module
//!
//! Closed set of failures the entry point can report, each with its exit code

pub mod types;

pub use types::*;
