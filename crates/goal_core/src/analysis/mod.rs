//! # Analyses
//!
//! Summaries and comparisons computed from a loaded (possibly pooled)
//! [`GoalTable`](crate::table::GoalTable):
//!
//! - `rates` - goals per match, per half, per stage
//! - `home_away` - home vs away goal rates and timing
//! - `halves` - first vs second half, pairwise interval matrix
//!
//! Every result derives `Serialize` so the CLI can print it as JSON.

pub mod halves;
pub mod home_away;
pub mod rates;

pub use halves::{compare_halves, half_samples, interval_matrix, HalfComparison, IntervalMatrix};
pub use home_away::{compare_home_away, HomeAwayComparison, LATE_GOAL_MINUTE};
pub use rates::{goals_by_stage, summarize, PeriodRates, RateSummary, TournamentRates};

/// `count / matches`, `None` when there are no matches.
pub fn per_match(count: usize, matches: u32) -> Option<f64> {
    if matches == 0 {
        None
    } else {
        Some(count as f64 / f64::from(matches))
    }
}
