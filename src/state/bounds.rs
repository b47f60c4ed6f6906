//! Bound window tracking
//!
//! The bound window is the `(lower, upper)` pair of creation timestamps seen in
//! a lap. It seeds the next lap's query and is persisted in `params.yaml`.

use serde::{Deserialize, Serialize};

/// The observed time range of a batch, in seconds since the epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundWindow {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl BoundWindow {
    /// A window with both bounds set
    pub fn new(lower: i64, upper: i64) -> Self {
        Self {
            lower: Some(lower.min(upper)),
            upper: Some(lower.max(upper)),
        }
    }

    /// True until the first timestamp has been observed
    pub fn is_unset(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// True when `ts` lies within both bounds
    pub fn contains(&self, ts: i64) -> bool {
        matches!((self.lower, self.upper), (Some(lower), Some(upper)) if lower <= ts && ts <= upper)
    }

    /// Folds a sequence of timestamps into a window
    ///
    /// Returns `None` for an empty sequence: there is no range to report, and
    /// the caller decides what an empty lap means.
    pub fn from_timestamps<I>(timestamps: I) -> Option<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let window = timestamps
            .into_iter()
            .fold(BoundWindow::default(), |window, ts| track(ts, window));

        if window.is_unset() {
            None
        } else {
            Some(window)
        }
    }
}

/// Widens `window` so that it includes `observed`
///
/// Unset bounds initialize to the observed value.
pub fn track(observed: i64, window: BoundWindow) -> BoundWindow {
    BoundWindow {
        lower: Some(window.lower.map_or(observed, |lower| lower.min(observed))),
        upper: Some(window.upper.map_or(observed, |upper| upper.max(observed))),
    }
}
