//! Time subsystem.
//!
//! Stable, testable timing utilities without coupling to the loop thread:
//! - `FixedStep` turns wall time into fixed simulation ticks
//! - `RateCounter` measures frames and ticks per wall-clock second

mod fixed_step;
mod rate;

pub use fixed_step::FixedStep;
pub use rate::{RateCounter, RateSample};
