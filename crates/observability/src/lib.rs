//! Process-wide tracing setup for the console binaries and tests.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};
