//! First vs second half comparison.
//!
//! Only goals inside the nominal 45 minutes of each regulation half take
//! part: period 1 below minute 45 and period 2 below minute 90. Stoppage-time
//! goals are left out so both halves span the same length. Samples are
//! expressed as minutes into the half (0..45).

use crate::error::StatsError;
use crate::models::{GoalRecord, Period};
use crate::stats::{ks_two_sample, mann_whitney_u, poisson_count_test, TestOutcome};
use crate::table::GoalTable;
use crate::timeline::minute_into_period;
use serde::Serialize;

const HALF_LENGTH: u32 = 45;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfComparison {
    pub matches: u32,
    pub first_half_goals: usize,
    pub second_half_goals: usize,
    /// Poisson-rate test on goals per match
    pub rate: TestOutcome,
    /// Mann-Whitney U on minute into the half
    pub rank_sum: TestOutcome,
    /// KS test on minute into the half
    pub distribution: TestOutcome,
}

/// Minute into the half of every goal scored inside the nominal length of
/// `half`, in table order.
fn minutes_in_half(goals: &[GoalRecord], half: Period) -> Vec<u32> {
    goals
        .iter()
        .filter(|g| g.period == half && g.minute < half.start_minute() + HALF_LENGTH)
        .map(|g| minute_into_period(half, g.minute))
        .collect()
}

/// (first half, second half) samples for the distribution tests.
pub fn half_samples(table: &GoalTable) -> (Vec<f64>, Vec<f64>) {
    let to_f64 = |minutes: Vec<u32>| -> Vec<f64> { minutes.into_iter().map(f64::from).collect() };
    (
        to_f64(minutes_in_half(&table.goals, Period::FirstHalf)),
        to_f64(minutes_in_half(&table.goals, Period::SecondHalf)),
    )
}

pub fn compare_halves(table: &GoalTable) -> Result<HalfComparison, StatsError> {
    let (first, second) = half_samples(table);
    let matches = table.counts.total;

    let rate = poisson_count_test(first.len(), matches, second.len(), matches)?;
    let rank_sum = mann_whitney_u(&first, &second)?;
    let distribution = ks_two_sample(&first, &second)?;

    Ok(HalfComparison {
        matches,
        first_half_goals: first.len(),
        second_half_goals: second.len(),
        rate,
        rank_sum,
        distribution,
    })
}

/// Pairwise Poisson-rate p-values between equal intervals of one half.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalMatrix {
    pub half: Period,
    pub interval_minutes: u32,
    /// `[start, end)` minute into the half
    pub intervals: Vec<(u32, u32)>,
    pub counts: Vec<usize>,
    /// Lower triangle: `p_values[j][i]` for `j > i`, `None` elsewhere
    pub p_values: Vec<Vec<Option<f64>>>,
}

impl IntervalMatrix {
    /// Pairs whose rates differ at `alpha`, as (earlier, later) interval
    /// indices.
    pub fn significant_pairs(&self, alpha: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (j, row) in self.p_values.iter().enumerate() {
            for (i, p) in row.iter().enumerate() {
                if matches!(p, Some(p) if *p < alpha) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

pub fn interval_matrix(
    table: &GoalTable,
    half: Period,
    interval_minutes: u32,
) -> Result<IntervalMatrix, StatsError> {
    if !half.is_regulation() {
        return Err(StatsError::InsufficientData(format!(
            "interval matrix needs a regulation half, got period {}",
            half.number()
        )));
    }
    if interval_minutes == 0 || HALF_LENGTH % interval_minutes != 0 {
        return Err(StatsError::InvalidInterval(interval_minutes));
    }

    let k = (HALF_LENGTH / interval_minutes) as usize;
    let intervals: Vec<(u32, u32)> = (0..k as u32)
        .map(|i| (i * interval_minutes, (i + 1) * interval_minutes))
        .collect();

    let mut counts = vec![0usize; k];
    for minute in minutes_in_half(&table.goals, half) {
        counts[(minute / interval_minutes) as usize] += 1;
    }

    let matches = table.counts.total;
    let mut p_values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let outcome = poisson_count_test(counts[i], matches, counts[j], matches)?;
            p_values[j][i] = Some(outcome.p_value);
        }
    }

    Ok(IntervalMatrix {
        half,
        interval_minutes,
        intervals,
        counts,
        p_values,
    })
}
