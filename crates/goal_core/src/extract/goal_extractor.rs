//! # Goal Extractor
//!
//! ## Algorithm
//! 1. Scan the match's events once for a period-3 event (extra time reached)
//! 2. Keep events that are a scored shot or an "Own Goal For"
//! 3. Drop penalty shoot-out goals (period >= 5)
//! 4. Attribute each goal to home / away / neither by team label
//!
//! Own goals never carry a shot outcome, and a match without shots has no
//! outcome values at all. Both cases fall out of the optional fields: the
//! filter only ever compares `Some` values and never faults on absence.

use crate::error::{CoreError, Result};
use crate::models::{DatasetKind, EventRecord, GoalRecord, MatchSummary, Period, Side};

/// Variation points of the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub kind: DatasetKind,
    /// Resolve the scoring team against the home/away labels
    pub attribute_side: bool,
}

impl ExtractOptions {
    pub fn league() -> Self {
        Self {
            kind: DatasetKind::League,
            attribute_side: true,
        }
    }

    pub fn tournament() -> Self {
        Self {
            kind: DatasetKind::Tournament,
            attribute_side: true,
        }
    }

    pub fn for_kind(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::League => Self::league(),
            DatasetKind::Tournament => Self::tournament(),
        }
    }

    pub fn without_side(mut self) -> Self {
        self.attribute_side = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::league()
    }
}

/// Goals of one match plus the per-match facts the builder aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExtraction {
    pub match_id: u64,
    pub goals: Vec<GoalRecord>,
    pub reached_extra_time: bool,
    /// Goals dropped because they were scored in a shoot-out
    pub shootout_goals: usize,
}

/// Scored shot or "Own Goal For".
pub fn is_goal_event(event: &EventRecord) -> bool {
    event.is_shot_goal() || event.is_own_goal_for()
}

/// A match reached extra time if any event was recorded in period 3.
pub fn reached_extra_time(events: &[EventRecord]) -> bool {
    events.iter().any(|e| e.period == Some(3))
}

/// Extract the goal records of one match.
///
/// # Errors
///
/// Returns a schema-integrity fault (`MissingField` / `InvalidPeriod`) when an
/// event passed the goal filter but lacks a field the table needs. Nothing is
/// defaulted.
pub fn extract_match_goals(
    summary: &MatchSummary,
    events: &[EventRecord],
    options: &ExtractOptions,
) -> Result<MatchExtraction> {
    let match_id = summary.match_id;
    let reached_extra_time = reached_extra_time(events);
    let stage = match options.kind {
        DatasetKind::Tournament => Some(summary.competition_stage.clone()),
        DatasetKind::League => None,
    };

    let mut goals = Vec::new();
    let mut shootout_goals = 0;

    for (event_index, event) in events.iter().enumerate() {
        if !is_goal_event(event) {
            continue;
        }

        let missing = |field: &'static str| CoreError::MissingField {
            match_id,
            event_index,
            field,
        };

        if event.event_type.is_none() {
            return Err(missing("type"));
        }
        let period_number = event.period.ok_or_else(|| missing("period"))?;
        let period = Period::from_number(period_number).ok_or(CoreError::InvalidPeriod {
            match_id,
            event_index,
            period: period_number,
        })?;
        let minute = event.minute.ok_or_else(|| missing("minute"))?;

        if period.is_shootout() {
            shootout_goals += 1;
            continue;
        }

        let side = if options.attribute_side {
            let team = event.team.as_deref().ok_or_else(|| missing("team"))?;
            Some(Side::attribute(team, &summary.home_team, &summary.away_team))
        } else {
            None
        };

        goals.push(GoalRecord {
            match_id,
            period,
            minute,
            side,
            stage: stage.clone(),
            extra_time_match: reached_extra_time,
        });
    }

    if shootout_goals > 0 {
        log::debug!(
            "match {}: dropped {} shoot-out goals",
            match_id,
            shootout_goals
        );
    }

    Ok(MatchExtraction {
        match_id,
        goals,
        reached_extra_time,
        shootout_goals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn league_match() -> MatchSummary {
        MatchSummary::new(3754058, "Leicester City", "Arsenal", "Regular Season")
    }

    #[test]
    fn test_shot_goals_and_own_goals_are_kept() {
        let events = vec![
            EventRecord::new("Pass").with_team("Arsenal").at(1, 3),
            EventRecord::shot("Saved").with_team("Arsenal").at(1, 5),
            EventRecord::shot("Goal").with_team("Leicester City").at(1, 10),
            EventRecord::own_goal_for().with_team("Arsenal").at(2, 80),
            EventRecord::new("Own Goal Against")
                .with_team("Leicester City")
                .at(2, 80),
        ];

        let result = extract_match_goals(&league_match(), &events, &ExtractOptions::league())
            .expect("valid events");

        assert_eq!(result.goals.len(), 2);
        assert_eq!(result.goals[0].period, Period::FirstHalf);
        assert_eq!(result.goals[0].minute, 10);
        assert_eq!(result.goals[0].side, Some(Side::Home));
        assert_eq!(result.goals[1].period, Period::SecondHalf);
        assert_eq!(result.goals[1].minute, 80);
        assert_eq!(result.goals[1].side, Some(Side::Away));
        assert!(result.goals.iter().all(|g| g.stage.is_none()));
        assert!(!result.reached_extra_time);
    }

    #[test]
    fn test_match_without_any_shot_outcome() {
        // No shot events at all: only the own-goal branch can match.
        let events = vec![
            EventRecord::new("Pass").with_team("Arsenal").at(1, 1),
            EventRecord::own_goal_for().with_team("Arsenal").at(2, 80),
        ];
        assert!(events.iter().all(|e| e.shot_outcome.is_none()));

        let result = extract_match_goals(&league_match(), &events, &ExtractOptions::league())
            .expect("valid events");
        assert_eq!(result.goals.len(), 1);
        assert_eq!(result.goals[0].side, Some(Side::Away));
    }

    #[test]
    fn test_unknown_team_label_is_unattributed() {
        let events = vec![EventRecord::own_goal_for()
            .with_team("Arsenal WFC")
            .at(1, 30)];
        let result = extract_match_goals(&league_match(), &events, &ExtractOptions::league())
            .expect("valid events");
        assert_eq!(result.goals[0].side, Some(Side::Unattributed));
    }

    #[test]
    fn test_missing_minute_is_integrity_fault() {
        let mut goal = EventRecord::shot("Goal").with_team("Arsenal");
        goal.period = Some(1);

        let err = extract_match_goals(&league_match(), &[goal], &ExtractOptions::league())
            .unwrap_err();
        assert!(err.is_integrity_fault());
        match err {
            CoreError::MissingField {
                match_id,
                event_index,
                field,
            } => {
                assert_eq!(match_id, 3754058);
                assert_eq!(event_index, 0);
                assert_eq!(field, "minute");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_team_only_matters_with_side_attribution() {
        let goal = EventRecord::shot("Goal").at(1, 20);

        let err = extract_match_goals(&league_match(), &[goal.clone()], &ExtractOptions::league())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field: "team", .. }));

        let options = ExtractOptions::league().without_side();
        let result = extract_match_goals(&league_match(), &[goal], &options).expect("no side");
        assert_eq!(result.goals[0].side, None);
    }

    #[test]
    fn test_period_zero_is_rejected() {
        let goal = EventRecord::shot("Goal").with_team("Arsenal").at(0, 20);
        let err = extract_match_goals(&league_match(), &[goal], &ExtractOptions::league())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidPeriod { period: 0, .. }));
    }

    #[test]
    fn test_tournament_extraction_marks_stage_and_extra_time() {
        let summary = MatchSummary::new(7585, "Croatia", "Denmark", "Round of 16");
        let events = vec![
            EventRecord::shot("Goal").with_team("Denmark").at(1, 0),
            EventRecord::shot("Goal").with_team("Croatia").at(1, 3),
            EventRecord::new("Pass").with_team("Croatia").at(3, 95),
            EventRecord::shot("Goal").with_team("Croatia").at(5, 120),
            EventRecord::shot("Goal").with_team("Croatia").at(5, 121),
        ];

        let result = extract_match_goals(&summary, &events, &ExtractOptions::tournament())
            .expect("valid events");

        assert!(result.reached_extra_time);
        assert_eq!(result.shootout_goals, 2);
        assert_eq!(result.goals.len(), 2);
        for goal in &result.goals {
            assert_eq!(goal.stage.as_deref(), Some("Round of 16"));
            assert!(goal.extra_time_match);
            assert!(!goal.period.is_shootout());
        }
    }

    fn arb_event() -> impl Strategy<Value = EventRecord> {
        let types = prop::sample::select(vec!["Pass", "Shot", "Own Goal For", "Own Goal Against"]);
        let outcomes = prop::option::of(prop::sample::select(vec![
            "Goal", "Saved", "Off T", "Blocked",
        ]));
        let teams = prop::sample::select(vec!["Home FC", "Away FC", "Somebody Else"]);
        (types, outcomes, teams, 1u8..=5, 0u32..130).prop_map(
            |(event_type, outcome, team, period, minute)| EventRecord {
                event_type: Some(event_type.to_string()),
                shot_outcome: outcome.map(str::to_string),
                team: Some(team.to_string()),
                period: Some(period),
                minute: Some(minute),
            },
        )
    }

    proptest! {
        /// Every emitted goal comes from a scored shot or an own goal for
        #[test]
        fn prop_only_goal_events_are_emitted(events in prop::collection::vec(arb_event(), 0..60)) {
            let summary = MatchSummary::new(1, "Home FC", "Away FC", "Group Stage");
            let result = extract_match_goals(&summary, &events, &ExtractOptions::tournament()).unwrap();

            let expected = events
                .iter()
                .filter(|e| is_goal_event(e) && e.period.unwrap_or(0) < 5)
                .count();
            prop_assert_eq!(result.goals.len(), expected);

            let mut goals = result.goals.iter();
            for event in events.iter().filter(|e| is_goal_event(e) && e.period.unwrap_or(0) < 5) {
                let goal = goals.next().unwrap();
                prop_assert_eq!(Some(goal.minute), event.minute);
                prop_assert_eq!(Some(goal.period.number()), event.period);
            }
        }

        /// Side is 2 exactly when the label matches neither participant
        #[test]
        fn prop_side_is_unattributed_only_for_foreign_labels(events in prop::collection::vec(arb_event(), 0..60)) {
            let summary = MatchSummary::new(1, "Home FC", "Away FC", "Regular Season");
            let result = extract_match_goals(&summary, &events, &ExtractOptions::league()).unwrap();
            let scorers = events
                .iter()
                .filter(|e| is_goal_event(e) && e.period.unwrap_or(0) < 5)
                .map(|e| e.team.clone().unwrap());

            for (goal, team) in result.goals.iter().zip(scorers) {
                let side = goal.side.unwrap();
                prop_assert!(side.code() <= 2);
                prop_assert_eq!(side == Side::Unattributed, team != "Home FC" && team != "Away FC");
            }
        }
    }
}
