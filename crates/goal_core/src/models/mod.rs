//! Data model: upstream match/event rows and the derived goal records.

pub mod event;
pub mod goal;

pub use event::{EventRecord, MatchSummary, GOAL_OUTCOME, GROUP_STAGE, OWN_GOAL_FOR};
pub use goal::{DatasetKind, GoalRecord, MatchCounts, Period, Side};
