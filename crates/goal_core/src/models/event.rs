use serde::{Deserialize, Serialize};

/// Shot outcome marking a scored shot
pub const GOAL_OUTCOME: &str = "Goal";

/// Event type credited to the team that benefits from an own goal
pub const OWN_GOAL_FOR: &str = "Own Goal For";

/// Competition stage label of tournament group matches
pub const GROUP_STAGE: &str = "Group Stage";

/// One match as listed by the data source for a competition + season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: u64,
    pub home_team: String,
    pub away_team: String,
    /// e.g. "Group Stage", "Round of 16", "Final", "Regular Season"
    pub competition_stage: String,
}

impl MatchSummary {
    pub fn new(
        match_id: u64,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        competition_stage: impl Into<String>,
    ) -> Self {
        Self {
            match_id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            competition_stage: competition_stage.into(),
        }
    }

    pub fn is_group_stage(&self) -> bool {
        self.competition_stage == GROUP_STAGE
    }
}

/// One in-match event, flattened from the source's nested JSON.
///
/// Every field is optional: the source omits fields freely (only shots carry
/// an outcome, tactical events carry no team, ...). Missing values only become
/// a problem once the event has been identified as a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: Option<String>,
    pub shot_outcome: Option<String>,
    pub team: Option<String>,
    /// 1/2 regulation halves, 3/4 extra time, 5 penalty shoot-out
    pub period: Option<u8>,
    /// Match clock minute; stoppage time runs past the nominal period end
    pub minute: Option<u32>,
}

impl EventRecord {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            ..Self::default()
        }
    }

    /// Shot event with the given outcome ("Goal", "Saved", "Off T", ...)
    pub fn shot(outcome: impl Into<String>) -> Self {
        Self {
            event_type: Some("Shot".to_string()),
            shot_outcome: Some(outcome.into()),
            ..Self::default()
        }
    }

    pub fn own_goal_for() -> Self {
        Self::new(OWN_GOAL_FOR)
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn at(mut self, period: u8, minute: u32) -> Self {
        self.period = Some(period);
        self.minute = Some(minute);
        self
    }

    pub fn is_shot_goal(&self) -> bool {
        self.shot_outcome.as_deref() == Some(GOAL_OUTCOME)
    }

    pub fn is_own_goal_for(&self) -> bool {
        self.event_type.as_deref() == Some(OWN_GOAL_FOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builders() {
        let shot = EventRecord::shot("Goal").with_team("Arsenal").at(1, 12);
        assert!(shot.is_shot_goal());
        assert!(!shot.is_own_goal_for());
        assert_eq!(shot.period, Some(1));
        assert_eq!(shot.minute, Some(12));

        let og = EventRecord::own_goal_for().with_team("Chelsea").at(2, 70);
        assert!(og.is_own_goal_for());
        assert!(og.shot_outcome.is_none());
    }

    #[test]
    fn test_group_stage_label() {
        assert!(MatchSummary::new(1, "A", "B", "Group Stage").is_group_stage());
        assert!(!MatchSummary::new(2, "A", "B", "Quarter-finals").is_group_stage());
    }
}
