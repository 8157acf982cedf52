//! Home vs away comparison over a league table with side attribution.
//!
//! Unattributed goals (side 2) are counted but belong to neither sample.

use crate::error::StatsError;
use crate::models::Side;
use crate::stats::{ks_two_sample, poisson_count_test, TestOutcome};
use crate::table::GoalTable;
use serde::Serialize;

/// Raw minute from which a goal counts as late (90th minute onwards,
/// stoppage time included).
pub const LATE_GOAL_MINUTE: u32 = 90;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeAwayComparison {
    pub matches: u32,
    pub home_goals: usize,
    pub away_goals: usize,
    pub unattributed_goals: usize,
    /// KS test on raw goal minutes, home vs away
    pub timing: TestOutcome,
    /// Poisson-rate test on goals per match, home vs away
    pub rate: TestOutcome,
    pub late_home_goals: usize,
    pub late_away_goals: usize,
    /// Poisson-rate test on late goals per match
    pub late_rate: TestOutcome,
}

pub fn compare_home_away(table: &GoalTable) -> Result<HomeAwayComparison, StatsError> {
    if !table.has_sides() {
        return Err(StatsError::InsufficientData(
            "table was built without side attribution".to_string(),
        ));
    }

    let mut home = Vec::new();
    let mut away = Vec::new();
    let mut unattributed_goals = 0;
    for goal in &table.goals {
        match goal.side {
            Some(Side::Home) => home.push(goal.minute),
            Some(Side::Away) => away.push(goal.minute),
            _ => unattributed_goals += 1,
        }
    }

    let matches = table.counts.total;
    let late = |minutes: &[u32]| minutes.iter().filter(|&&m| m >= LATE_GOAL_MINUTE).count();
    let late_home_goals = late(&home);
    let late_away_goals = late(&away);

    let rate = poisson_count_test(home.len(), matches, away.len(), matches)?;
    let late_rate = poisson_count_test(late_home_goals, matches, late_away_goals, matches)?;

    let as_f64 = |minutes: &[u32]| minutes.iter().map(|&m| f64::from(m)).collect::<Vec<_>>();
    let timing = ks_two_sample(&as_f64(&home), &as_f64(&away))?;

    log::debug!(
        "home/away: {} vs {} goals over {} matches ({} unattributed)",
        home.len(),
        away.len(),
        matches,
        unattributed_goals
    );

    Ok(HomeAwayComparison {
        matches,
        home_goals: home.len(),
        away_goals: away.len(),
        unattributed_goals,
        timing,
        rate,
        late_home_goals,
        late_away_goals,
        late_rate,
    })
}
