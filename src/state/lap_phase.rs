//! Lap phase definitions for tracking crawl progress
//!
//! A lap moves through fetch, normalize, flush and bound-update phases in a
//! fixed order; the driver either returns to `Idle` for the next lap or stops
//! in one of the terminal phases.

use std::fmt;

/// Represents the current phase of the lap driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LapPhase {
    // ===== Active Phases =====
    /// Waiting to start the next lap
    Idle,

    /// Querying the search API for a page of submissions
    Fetching,

    /// Normalizing submissions and expanding their comment trees
    Normalizing,

    /// Writing the lap's batch to disk
    Flushing,

    /// Folding observed timestamps and persisting run metadata
    BoundUpdating,

    // ===== Terminal Phases =====
    /// All configured laps completed
    Done,

    /// A lap-level error aborted the run
    Failed,
}

impl LapPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if a lap is currently in progress
    pub fn is_in_lap(&self) -> bool {
        matches!(
            self,
            Self::Fetching | Self::Normalizing | Self::Flushing | Self::BoundUpdating
        )
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Any in-lap phase may fail. `Done` is reachable only once the bound
    /// update finished, or from `Idle` when no laps were configured.
    pub fn can_transition_to(&self, next: LapPhase) -> bool {
        use LapPhase::*;

        match (self, next) {
            (Idle, Fetching) | (Idle, Done) => true,
            (Fetching, Normalizing) => true,
            (Normalizing, Flushing) => true,
            (Flushing, BoundUpdating) => true,
            (BoundUpdating, Idle) | (BoundUpdating, Done) => true,
            (from, Failed) => from.is_in_lap(),
            _ => false,
        }
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Normalizing => "normalizing",
            Self::Flushing => "flushing",
            Self::BoundUpdating => "bound_updating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
