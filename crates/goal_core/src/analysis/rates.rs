use super::per_match;
use crate::models::{DatasetKind, GoalRecord, Period};
use crate::table::GoalTable;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Goal rates over one group of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRates {
    pub matches: u32,
    pub goals: usize,
    pub per_match: Option<f64>,
    pub first_half: Option<f64>,
    pub second_half: Option<f64>,
}

impl PeriodRates {
    fn from_goals<'a, I>(goals: I, matches: u32) -> Self
    where
        I: IntoIterator<Item = &'a GoalRecord>,
    {
        let (mut total, mut first, mut second) = (0, 0, 0);
        for goal in goals {
            total += 1;
            match goal.period {
                Period::FirstHalf => first += 1,
                Period::SecondHalf => second += 1,
                _ => {}
            }
        }
        Self {
            matches,
            goals: total,
            per_match: per_match(total, matches),
            first_half: per_match(first, matches),
            second_half: per_match(second, matches),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentRates {
    pub group: PeriodRates,
    pub knockout: PeriodRates,
    /// Knockout goals scored in periods 3 and 4
    pub extra_time_goals: usize,
    pub extra_time_matches: u32,
    /// Extra-time goals per match that reached extra time
    pub extra_time_per_match: Option<f64>,
    pub goals_by_stage: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateSummary {
    League(PeriodRates),
    Tournament(TournamentRates),
}

pub fn summarize(table: &GoalTable) -> RateSummary {
    match table.kind {
        DatasetKind::League => {
            RateSummary::League(PeriodRates::from_goals(&table.goals, table.counts.total))
        }
        DatasetKind::Tournament => {
            let counts = table.counts;
            let group = PeriodRates::from_goals(
                table.goals.iter().filter(|g| g.is_group_stage()),
                counts.group,
            );
            let knockout_goals: Vec<&GoalRecord> =
                table.goals.iter().filter(|g| !g.is_group_stage()).collect();
            let knockout =
                PeriodRates::from_goals(knockout_goals.iter().copied(), counts.knockout);
            let extra_time_goals = knockout_goals
                .iter()
                .filter(|g| g.period.is_extra_time())
                .count();

            RateSummary::Tournament(TournamentRates {
                group,
                knockout,
                extra_time_goals,
                extra_time_matches: counts.extra_time,
                extra_time_per_match: per_match(extra_time_goals, counts.extra_time),
                goals_by_stage: goals_by_stage(table),
            })
        }
    }
}

/// Goal count per competition stage label, sorted by label.
/// Goals without a stage (league tables) are skipped.
pub fn goals_by_stage(table: &GoalTable) -> Vec<(String, usize)> {
    let mut by_stage: FxHashMap<&str, usize> = FxHashMap::default();
    for stage in table.goals.iter().filter_map(|g| g.stage.as_deref()) {
        *by_stage.entry(stage).or_insert(0) += 1;
    }

    let mut stages: Vec<(String, usize)> = by_stage
        .into_iter()
        .map(|(stage, count)| (stage.to_string(), count))
        .collect();
    stages.sort();
    stages
}
