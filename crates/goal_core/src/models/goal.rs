use super::event::MatchSummary;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Match period as numbered by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Period {
    FirstHalf,
    SecondHalf,
    ExtraTimeFirstHalf,
    ExtraTimeSecondHalf,
    /// Period 5 and anything beyond it
    PenaltyShootout,
}

impl Period {
    /// Regulation and extra-time periods, in playing order
    pub const PLAYED: [Period; 4] = [
        Period::FirstHalf,
        Period::SecondHalf,
        Period::ExtraTimeFirstHalf,
        Period::ExtraTimeSecondHalf,
    ];

    /// `None` for 0, which the source never uses for a real period.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => None,
            1 => Some(Period::FirstHalf),
            2 => Some(Period::SecondHalf),
            3 => Some(Period::ExtraTimeFirstHalf),
            4 => Some(Period::ExtraTimeSecondHalf),
            _ => Some(Period::PenaltyShootout),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Period::FirstHalf => 1,
            Period::SecondHalf => 2,
            Period::ExtraTimeFirstHalf => 3,
            Period::ExtraTimeSecondHalf => 4,
            Period::PenaltyShootout => 5,
        }
    }

    pub fn is_regulation(self) -> bool {
        matches!(self, Period::FirstHalf | Period::SecondHalf)
    }

    pub fn is_extra_time(self) -> bool {
        matches!(
            self,
            Period::ExtraTimeFirstHalf | Period::ExtraTimeSecondHalf
        )
    }

    pub fn is_shootout(self) -> bool {
        self == Period::PenaltyShootout
    }

    /// Match clock minute at which the period kicks off
    pub fn start_minute(self) -> u32 {
        match self {
            Period::FirstHalf => 0,
            Period::SecondHalf => 45,
            Period::ExtraTimeFirstHalf => 90,
            Period::ExtraTimeSecondHalf => 105,
            Period::PenaltyShootout => 120,
        }
    }
}

impl TryFrom<u8> for Period {
    type Error = String;

    fn try_from(number: u8) -> std::result::Result<Self, Self::Error> {
        Period::from_number(number).ok_or_else(|| format!("invalid period {}", number))
    }
}

impl From<Period> for u8 {
    fn from(period: Period) -> Self {
        period.number()
    }
}

/// Which side a goal counts for. Serialized as the table's `home` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    Away,
    Home,
    /// Team label matches neither participant (malformed own-goal attribution)
    Unattributed,
}

impl Side {
    /// Compare the scoring team label against the match's participants.
    pub fn attribute(team: &str, home_team: &str, away_team: &str) -> Self {
        if team == home_team {
            Side::Home
        } else if team == away_team {
            Side::Away
        } else {
            Side::Unattributed
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Side::Away => 0,
            Side::Home => 1,
            Side::Unattributed => 2,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Side::Away),
            1 => Ok(Side::Home),
            2 => Ok(Side::Unattributed),
            other => Err(format!("invalid side code {}", other)),
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side.code()
    }
}

/// Which table layout (and which denominators) a dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Club league season: one denominator, every match
    League,
    /// International tournament: group / knockout / extra-time denominators
    Tournament,
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::League => write!(f, "league"),
            DatasetKind::Tournament => write!(f, "tournament"),
        }
    }
}

/// Exposure counts used to turn goal counts into per-match rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub total: u32,
    pub group: u32,
    pub knockout: u32,
    /// Matches with at least one period-3 event
    pub extra_time: u32,
}

impl MatchCounts {
    /// Total, group and knockout counts from a match listing.
    /// Extra-time matches are only known after reading events.
    pub fn from_matches(matches: &[MatchSummary]) -> Self {
        let group = matches.iter().filter(|m| m.is_group_stage()).count() as u32;
        let total = matches.len() as u32;
        Self {
            total,
            group,
            knockout: total - group,
            extra_time: 0,
        }
    }
}

impl AddAssign for MatchCounts {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.group += other.group;
        self.knockout += other.knockout;
        self.extra_time += other.extra_time;
    }
}

/// One goal that survived the goal filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub match_id: u64,
    /// Never a shoot-out period
    pub period: Period,
    /// Raw match clock minute
    pub minute: u32,
    /// `None` when side attribution was turned off
    pub side: Option<Side>,
    /// Competition stage (tournament tables only)
    pub stage: Option<String>,
    /// Whether the match went to extra time (tournament tables only)
    pub extra_time_match: bool,
}

impl GoalRecord {
    pub fn is_group_stage(&self) -> bool {
        self.stage.as_deref() == Some(super::event::GROUP_STAGE)
    }
}
