//! # Goal Extraction Module
//!
//! Turns one match's raw event stream into goal records.
//!
//! - `goal_extractor` - goal filter, side attribution, extra-time detection

pub mod goal_extractor;

pub use goal_extractor::{
    extract_match_goals, is_goal_event, reached_extra_time, ExtractOptions, MatchExtraction,
};
