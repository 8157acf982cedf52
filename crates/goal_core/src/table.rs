//! # Goal Tables
//!
//! One CSV file per (competition, season), one row per goal. The exposure
//! counts ride along as constant columns on every row so a table is
//! self-contained:
//!
//! - league: `match_id,period,n_matches,goal_time,home`
//! - tournament: `match_id,period,stage,goal_time,n_matches_group,n_matches_ko,n_matches_ET,ET_match,home`
//!
//! `home` is empty when side attribution was turned off. A table with no goals
//! carries no counts, so the builder also writes a JSON sidecar
//! (`<table>.meta.json`) that `load` falls back to.

use crate::error::{CoreError, Result};
use crate::models::{DatasetKind, GoalRecord, MatchCounts, Period, Side};
use crate::timeline::{adjust_goals, AdjustedGoalRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const LEAGUE_HEADER: [&str; 5] = ["match_id", "period", "n_matches", "goal_time", "home"];

const TOURNAMENT_HEADER: [&str; 9] = [
    "match_id",
    "period",
    "stage",
    "goal_time",
    "n_matches_group",
    "n_matches_ko",
    "n_matches_ET",
    "ET_match",
    "home",
];

/// File name a (competition, season) table is stored under.
pub fn table_file_name(competition_id: u32, season_id: u32) -> String {
    format!(
        "goals_competition{}_season{}.csv",
        competition_id, season_id
    )
}

/// Sidecar path for a table: `goals_x.csv` → `goals_x.meta.json`
pub fn metadata_path(table_path: &Path) -> PathBuf {
    table_path.with_extension("meta.json")
}

#[derive(Debug, Serialize, Deserialize)]
struct LeagueRow {
    match_id: u64,
    period: u8,
    n_matches: u32,
    goal_time: u32,
    home: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TournamentRow {
    match_id: u64,
    period: u8,
    stage: String,
    goal_time: u32,
    n_matches_group: u32,
    n_matches_ko: u32,
    #[serde(rename = "n_matches_ET")]
    n_matches_et: u32,
    #[serde(rename = "ET_match")]
    et_match: bool,
    home: Option<u8>,
}

/// All goals of one dataset plus its exposure counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTable {
    pub kind: DatasetKind,
    pub counts: MatchCounts,
    pub goals: Vec<GoalRecord>,
}

impl GoalTable {
    pub fn new(kind: DatasetKind, counts: MatchCounts, goals: Vec<GoalRecord>) -> Self {
        Self {
            kind,
            counts,
            goals,
        }
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Goals on the continuous minute axis, in table order.
    pub fn adjusted(&self) -> Vec<AdjustedGoalRecord<'_>> {
        adjust_goals(&self.goals)
    }

    /// Whether every row carries a side.
    pub fn has_sides(&self) -> bool {
        self.goals.iter().all(|g| g.side.is_some())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        // Header is written by hand so an empty table still has one.
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        match self.kind {
            DatasetKind::League => {
                csv.write_record(LEAGUE_HEADER)?;
                for goal in &self.goals {
                    csv.serialize(LeagueRow {
                        match_id: goal.match_id,
                        period: goal.period.number(),
                        n_matches: self.counts.total,
                        goal_time: goal.minute,
                        home: goal.side.map(Side::code),
                    })?;
                }
            }
            DatasetKind::Tournament => {
                csv.write_record(TOURNAMENT_HEADER)?;
                for goal in &self.goals {
                    csv.serialize(TournamentRow {
                        match_id: goal.match_id,
                        period: goal.period.number(),
                        stage: goal.stage.clone().unwrap_or_default(),
                        goal_time: goal.minute,
                        n_matches_group: self.counts.group,
                        n_matches_ko: self.counts.knockout,
                        n_matches_et: self.counts.extra_time,
                        et_match: goal.extra_time_match,
                        home: goal.side.map(Side::code),
                    })?;
                }
            }
        }

        csv.flush()?;
        Ok(())
    }

    /// Write the table, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    /// Parse a table; the layout is detected from the header. `source` only
    /// labels errors.
    pub fn read_csv<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv.headers()?.clone();

        let invalid = |reason: String| CoreError::InvalidTable {
            path: source.to_string(),
            reason,
        };

        let kind = if headers.iter().any(|h| h == "n_matches_group") {
            DatasetKind::Tournament
        } else if headers.iter().any(|h| h == "n_matches") {
            DatasetKind::League
        } else {
            return Err(invalid("no match-count column in header".to_string()));
        };

        let mut goals = Vec::new();
        let mut counts: Option<MatchCounts> = None;

        match kind {
            DatasetKind::League => {
                for (line, row) in csv.deserialize::<LeagueRow>().enumerate() {
                    let row = row?;
                    let row_counts = MatchCounts {
                        total: row.n_matches,
                        ..MatchCounts::default()
                    };
                    check_constant(&mut counts, row_counts, line).map_err(invalid)?;
                    goals.push(GoalRecord {
                        match_id: row.match_id,
                        period: parse_period(row.period, line).map_err(invalid)?,
                        minute: row.goal_time,
                        side: parse_side(row.home, line).map_err(invalid)?,
                        stage: None,
                        extra_time_match: false,
                    });
                }
            }
            DatasetKind::Tournament => {
                for (line, row) in csv.deserialize::<TournamentRow>().enumerate() {
                    let row = row?;
                    let row_counts = MatchCounts {
                        total: row.n_matches_group + row.n_matches_ko,
                        group: row.n_matches_group,
                        knockout: row.n_matches_ko,
                        extra_time: row.n_matches_et,
                    };
                    check_constant(&mut counts, row_counts, line).map_err(invalid)?;
                    goals.push(GoalRecord {
                        match_id: row.match_id,
                        period: parse_period(row.period, line).map_err(invalid)?,
                        minute: row.goal_time,
                        side: parse_side(row.home, line).map_err(invalid)?,
                        stage: Some(row.stage),
                        extra_time_match: row.et_match,
                    });
                }
            }
        }

        Ok(Self {
            kind,
            counts: counts.unwrap_or_default(),
            goals,
        })
    }

    /// Read a table file without consulting its sidecar.
    pub fn read(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::read_csv(std::io::BufReader::new(file), &path.display().to_string())
    }

    /// Read a table file; an empty table takes its counts from the sidecar
    /// when one exists.
    pub fn load(path: &Path) -> Result<Self> {
        let mut table = Self::read(path)?;
        if table.is_empty() {
            let sidecar = metadata_path(path);
            if sidecar.exists() {
                let metadata = TableMetadata::read(&sidecar)?;
                log::debug!(
                    "{}: empty table, counts taken from {}",
                    path.display(),
                    sidecar.display()
                );
                table.counts = metadata.counts;
            }
        }
        Ok(table)
    }

    /// Pool several tables of the same kind: goals are appended in order and
    /// exposure counts are summed.
    pub fn concat<'a, I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a GoalTable>,
    {
        let mut iter = tables.into_iter();
        let first = match iter.next() {
            Some(first) => first,
            None => {
                return Err(CoreError::InvalidTable {
                    path: "<concat>".to_string(),
                    reason: "no tables to combine".to_string(),
                })
            }
        };

        let mut combined = first.clone();
        for table in iter {
            if table.kind != combined.kind {
                return Err(CoreError::MixedTableKinds);
            }
            combined.counts += table.counts;
            combined.goals.extend(table.goals.iter().cloned());
        }
        Ok(combined)
    }
}

fn check_constant(
    seen: &mut Option<MatchCounts>,
    row: MatchCounts,
    line: usize,
) -> std::result::Result<(), String> {
    match *seen {
        Some(counts) if counts != row => Err(format!(
            "row {}: match counts {:?} differ from earlier rows {:?}",
            line + 1,
            row,
            counts
        )),
        Some(_) => Ok(()),
        None => {
            *seen = Some(row);
            Ok(())
        }
    }
}

fn parse_period(number: u8, line: usize) -> std::result::Result<Period, String> {
    match Period::from_number(number) {
        Some(period) if !period.is_shootout() => Ok(period),
        _ => Err(format!("row {}: invalid period {}", line + 1, number)),
    }
}

fn parse_side(code: Option<u8>, line: usize) -> std::result::Result<Option<Side>, String> {
    code.map(Side::try_from)
        .transpose()
        .map_err(|e| format!("row {}: {}", line + 1, e))
}

/// Build summary stored next to a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub competition_id: u32,
    pub season_id: u32,
    pub kind: DatasetKind,
    pub counts: MatchCounts,
    pub goal_count: usize,
    /// Matches whose events could not be fetched or normalized
    #[serde(default)]
    pub failed_matches: Vec<u64>,
    /// SHA256 of the table file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
}

impl TableMetadata {
    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn league_table() -> GoalTable {
        GoalTable::new(
            DatasetKind::League,
            MatchCounts {
                total: 2,
                ..MatchCounts::default()
            },
            vec![
                GoalRecord {
                    match_id: 10,
                    period: Period::FirstHalf,
                    minute: 10,
                    side: Some(Side::Home),
                    stage: None,
                    extra_time_match: false,
                },
                GoalRecord {
                    match_id: 11,
                    period: Period::SecondHalf,
                    minute: 80,
                    side: Some(Side::Away),
                    stage: None,
                    extra_time_match: false,
                },
            ],
        )
    }

    fn tournament_table() -> GoalTable {
        GoalTable::new(
            DatasetKind::Tournament,
            MatchCounts {
                total: 3,
                group: 2,
                knockout: 1,
                extra_time: 1,
            },
            vec![GoalRecord {
                match_id: 7,
                period: Period::ExtraTimeFirstHalf,
                minute: 98,
                side: None,
                stage: Some("Final".to_string()),
                extra_time_match: true,
            }],
        )
    }

    #[test]
    fn test_file_name() {
        assert_eq!(table_file_name(2, 27), "goals_competition2_season27.csv");
        assert_eq!(
            metadata_path(Path::new("data/goals_competition2_season27.csv")),
            PathBuf::from("data/goals_competition2_season27.meta.json")
        );
    }

    #[test]
    fn test_league_csv_layout() {
        let mut buffer = Vec::new();
        league_table().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "match_id,period,n_matches,goal_time,home\n10,1,2,10,1\n11,2,2,80,0\n"
        );
    }

    #[test]
    fn test_tournament_csv_layout() {
        let mut buffer = Vec::new();
        tournament_table().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "match_id,period,stage,goal_time,n_matches_group,n_matches_ko,n_matches_ET,ET_match,home\n\
             7,3,Final,98,2,1,1,true,\n"
        );
    }

    #[test]
    fn test_file_round_trip_detects_kind() {
        let dir = tempdir().unwrap();
        for table in [league_table(), tournament_table()] {
            let path = dir.path().join(format!("{}.csv", table.kind));
            table.write(&path).unwrap();
            assert_eq!(GoalTable::read(&path).unwrap(), table);
        }
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let table = GoalTable::new(DatasetKind::League, MatchCounts::default(), Vec::new());
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "match_id,period,n_matches,goal_time,home\n"
        );
    }

    #[test]
    fn test_empty_table_counts_from_sidecar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(table_file_name(9, 27));
        let counts = MatchCounts {
            total: 4,
            ..MatchCounts::default()
        };
        GoalTable::new(DatasetKind::League, counts, Vec::new())
            .write(&path)
            .unwrap();

        assert_eq!(GoalTable::read(&path).unwrap().counts.total, 0);

        TableMetadata {
            competition_id: 9,
            season_id: 27,
            kind: DatasetKind::League,
            counts,
            goal_count: 0,
            failed_matches: vec![],
            checksum: String::new(),
            created_at: String::new(),
        }
        .write(&metadata_path(&path))
        .unwrap();

        assert_eq!(GoalTable::load(&path).unwrap().counts, counts);
    }

    #[test]
    fn test_inconsistent_counts_rejected() {
        let text = "match_id,period,n_matches,goal_time,home\n1,1,380,5,1\n2,1,379,7,0\n";
        let err = GoalTable::read_csv(text.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTable { .. }));
    }

    #[test]
    fn test_shootout_rows_rejected() {
        let text = "match_id,period,n_matches,goal_time,home\n1,5,10,120,1\n";
        let err = GoalTable::read_csv(text.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTable { .. }));
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let text = "match_id,period,goal_time\n1,1,5\n";
        let err = GoalTable::read_csv(text.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTable { .. }));
    }

    #[test]
    fn test_concat_sums_counts() {
        let combined = GoalTable::concat([&league_table(), &league_table()]).unwrap();
        assert_eq!(combined.counts.total, 4);
        assert_eq!(combined.len(), 4);

        assert!(matches!(
            GoalTable::concat([&league_table(), &tournament_table()]),
            Err(CoreError::MixedTableKinds)
        ));
        assert!(GoalTable::concat(std::iter::empty::<&GoalTable>()).is_err());
    }
}
