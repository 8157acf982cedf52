//! # Minute Timeline
//!
//! The source's match clock keeps running through stoppage time, so a 45+2
//! goal is minute 47 and would land on top of early second-half goals
//! (which start at 45). Shifting every period after the first by a fixed
//! gap gives one increasing axis:
//!
//! | period | raw minutes | adjusted    |
//! |--------|-------------|-------------|
//! | 1      | 0..45+      | 0..45+      |
//! | 2      | 45..90+     | 60..105+    |
//! | 3      | 90..105+    | 120..135+   |
//! | 4      | 105..120+   | 150..165+   |
//!
//! Tables always store the raw minute; the adjustment is applied at
//! analysis time only.

use crate::models::{GoalRecord, Period};
use serde::Serialize;

/// Offset added to the raw minute of periods 1..=4.
pub const PERIOD_OFFSETS: [u32; 4] = [0, 15, 30, 45];

/// Map a raw (period number, minute) pair onto the continuous axis.
/// Unknown periods (0, shoot-outs) are left unchanged.
pub fn adjust_minute(period: u8, minute: u32) -> u32 {
    match period {
        1..=4 => minute + PERIOD_OFFSETS[usize::from(period - 1)],
        _ => minute,
    }
}

pub fn adjusted_minute(period: Period, minute: u32) -> u32 {
    adjust_minute(period.number(), minute)
}

/// Minutes elapsed since the period kicked off (second half: minute - 45).
pub fn minute_into_period(period: Period, minute: u32) -> u32 {
    minute.saturating_sub(period.start_minute())
}

/// A goal record with its position on the continuous axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjustedGoalRecord<'a> {
    pub record: &'a GoalRecord,
    pub adjusted_minute: u32,
}

impl<'a> AdjustedGoalRecord<'a> {
    pub fn new(record: &'a GoalRecord) -> Self {
        Self {
            record,
            adjusted_minute: adjusted_minute(record.period, record.minute),
        }
    }
}

pub fn adjust_goals<'a, I>(goals: I) -> Vec<AdjustedGoalRecord<'a>>
where
    I: IntoIterator<Item = &'a GoalRecord>,
{
    goals.into_iter().map(AdjustedGoalRecord::new).collect()
}
