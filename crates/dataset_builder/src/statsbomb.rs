//! StatsBomb open-data JSON payloads.
//!
//! Only the fields the goal extraction reads are declared; everything else in
//! the payloads is ignored. Layout of the open-data repository:
//!
//! - `matches/{competition_id}/{season_id}.json` - array of matches
//! - `events/{match_id}.json` - array of events of one match

use goal_core::{EventRecord, MatchSummary};
use serde::Deserialize;

/// `{ "id": 16, "name": "Shot" }` style reference
#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct HomeTeam {
    home_team_name: String,
}

#[derive(Debug, Deserialize)]
struct AwayTeam {
    away_team_name: String,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    match_id: u64,
    home_team: HomeTeam,
    away_team: AwayTeam,
    competition_stage: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct RawShot {
    outcome: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: Option<Named>,
    team: Option<Named>,
    period: Option<u8>,
    minute: Option<u32>,
    shot: Option<RawShot>,
}

impl From<RawMatch> for MatchSummary {
    fn from(raw: RawMatch) -> Self {
        MatchSummary::new(
            raw.match_id,
            raw.home_team.home_team_name,
            raw.away_team.away_team_name,
            raw.competition_stage.map(|s| s.name).unwrap_or_default(),
        )
    }
}

impl From<RawEvent> for EventRecord {
    fn from(raw: RawEvent) -> Self {
        EventRecord {
            event_type: raw.event_type.map(|t| t.name),
            shot_outcome: raw.shot.and_then(|s| s.outcome).map(|o| o.name),
            team: raw.team.map(|t| t.name),
            period: raw.period,
            minute: raw.minute,
        }
    }
}

pub fn parse_matches(json: &str) -> serde_json::Result<Vec<MatchSummary>> {
    let raw: Vec<RawMatch> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(MatchSummary::from).collect())
}

pub fn parse_events(json: &str) -> serde_json::Result<Vec<EventRecord>> {
    let raw: Vec<RawEvent> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(EventRecord::from).collect())
}
