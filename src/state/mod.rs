//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `LapPhase`: the lap driver's state machine
//! - `BoundWindow`: the observed timestamp range that seeds the next lap

pub mod bounds;
mod lap_phase;

pub use bounds::{track, BoundWindow};
pub use lap_phase::LapPhase;
