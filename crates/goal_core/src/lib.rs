//! # goal_core - Goal Timing Analysis Core
//!
//! Turns per-match football event data into a flat table of goals and runs
//! the timing analyses on top of it.
//!
//! ## Pipeline
//! - `extract` - goal filter, side attribution, extra-time detection per match
//! - `timeline` - maps (period, minute) onto one continuous minute axis
//! - `table` - CSV persistence of goal tables (one per competition + season)
//! - `histogram` - weighted binning over adjusted minutes
//! - `stats` - Poisson-rate Z-test, Mann-Whitney U, Kolmogorov-Smirnov
//! - `analysis` - rate summaries, home/away and first/second half comparisons
//!
//! Nothing here talks to the network; the data source lives in
//! `dataset_builder`.

pub mod analysis;
pub mod error;
pub mod extract;
pub mod histogram;
pub mod models;
pub mod stats;
pub mod table;
pub mod timeline;

pub use error::{CoreError, HistogramError, Result, StatsError};
pub use extract::{extract_match_goals, is_goal_event, ExtractOptions, MatchExtraction};
pub use histogram::{BinEdges, Histogram, LabeledBins, Weighting};
pub use models::{
    DatasetKind, EventRecord, GoalRecord, MatchCounts, MatchSummary, Period, Side,
};
pub use stats::TestOutcome;
pub use table::{metadata_path, table_file_name, GoalTable, TableMetadata};
pub use timeline::{adjust_minute, adjusted_minute, AdjustedGoalRecord};
