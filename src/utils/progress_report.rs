//! Progress reporting for long-running operations.
//!
//! Importing a full dict.cc file produces hundreds of thousands of store
//! records. The builder reports its position through a [`ProgressState`] so a
//! caller can print progress or cancel the import.
//!
//! # Examples
//!
//! ```
//! use dictcc::utils::progress_report::{ProgressState, ProgressReportFn};
//!
//! fn my_reporter(state: &mut ProgressState) -> bool {
//!     println!("{}: {}/{}", state.state_id, state.current, state.total);
//!     false // Return true to cancel the operation
//! }
//!
//! let mut progress = ProgressState::new("writing", 100, 10, Some(my_reporter));
//! for i in 0..100 {
//!     if progress.report(i) {
//!         break;
//!     }
//! }
//! ```

/// Function type for progress reporting callbacks.
///
/// The function receives a mutable reference to the progress state and
/// returns `true` to cancel the operation, or `false` to continue.
pub type ProgressReportFn = fn(&mut ProgressState) -> bool;

/// State information for progress reporting.
pub struct ProgressState {
    /// Identifier for this progress state (e.g., "Writing DE-EN dictionary")
    pub state_id: String,
    /// Total number of items to process
    pub total: u64,
    /// Current item being processed
    pub current: u64,
    /// Last item at which progress was reported
    pub last: u64,
    /// Number of items between progress reports
    pub report_interval: u64,
    /// Optional reporter function to call
    pub reporter: Option<ProgressReportFn>,
}

impl ProgressState {
    /// Creates a new progress state.
    ///
    /// `report_interval_percent` is the share of `total` (0-100) that must be
    /// processed between two calls of the reporter.
    pub fn new(state_id: &str, total: u64, report_interval_percent: u64, reporter: Option<ProgressReportFn>) -> Self {
        Self {
            state_id: state_id.to_string(),
            total,
            current: 0,
            last: 0,
            report_interval: total * report_interval_percent / 100,
            reporter,
        }
    }

    /// Reports progress for the current item.
    ///
    /// Returns `true` if the operation should be cancelled.
    pub fn report(&mut self, current: u64) -> bool {
        let Some(reporter) = self.reporter else {
            return false;
        };
        let is_last = current + 1 >= self.total;
        if current.saturating_sub(self.last) > self.report_interval || is_last {
            self.current = current;
            let cancelled = reporter(self);
            self.last = current;
            cancelled
        } else {
            false
        }
    }
}
