//! Match and event sources.
//!
//! The builder only needs two calls: list the matches of a competition +
//! season, then fetch the events of one match. Three implementations:
//!
//! - [`OpenDataDir`] - a local checkout of the open-data repository
//! - [`OpenDataHttp`] - the same files over HTTP (raw GitHub by default)
//! - [`StaticSource`] - in-memory fixtures

use crate::statsbomb::{parse_events, parse_matches};
use goal_core::{EventRecord, MatchSummary};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/statsbomb/open-data/master/data";

/// Attempts per HTTP request unless configured otherwise
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed payload for {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where matches and events come from.
pub trait MatchSource {
    fn matches(&self, competition_id: u32, season_id: u32)
        -> Result<Vec<MatchSummary>, SourceError>;

    fn events(&self, match_id: u64) -> Result<Vec<EventRecord>, SourceError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

fn matches_path(competition_id: u32, season_id: u32) -> String {
    format!("matches/{}/{}.json", competition_id, season_id)
}

fn events_path(match_id: u64) -> String {
    format!("events/{}.json", match_id)
}

/// Local checkout of the open-data `data/` directory.
#[derive(Debug, Clone)]
pub struct OpenDataDir {
    root: PathBuf,
}

impl OpenDataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, relative: &str) -> Result<String, SourceError> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    what: path.display().to_string(),
                }
            } else {
                SourceError::Io {
                    path: path.display().to_string(),
                    source,
                }
            }
        })
    }
}

impl MatchSource for OpenDataDir {
    fn matches(
        &self,
        competition_id: u32,
        season_id: u32,
    ) -> Result<Vec<MatchSummary>, SourceError> {
        let relative = matches_path(competition_id, season_id);
        let json = self.read(&relative)?;
        parse_matches(&json).map_err(|source| SourceError::Json {
            what: relative,
            source,
        })
    }

    fn events(&self, match_id: u64) -> Result<Vec<EventRecord>, SourceError> {
        let relative = events_path(match_id);
        let json = self.read(&relative)?;
        parse_events(&json).map_err(|source| SourceError::Json {
            what: relative,
            source,
        })
    }

    fn describe(&self) -> String {
        format!("open data at {}", self.root.display())
    }
}

/// Open-data files fetched over HTTP with a blocking client.
///
/// Failed requests are retried with a linear backoff; a 404 is final.
pub struct OpenDataHttp {
    base_url: String,
    client: reqwest::blocking::Client,
    max_attempts: u32,
}

impl OpenDataHttp {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("goal-dataset-builder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn get_text(&self, relative: &str) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.base_url, relative);
        let mut attempt = 1;
        loop {
            let fetched = self
                .client
                .get(&url)
                .send()
                .and_then(|res| res.error_for_status())
                .and_then(|res| res.text());

            match fetched {
                Ok(text) => return Ok(text),
                Err(err) if err.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                    return Err(SourceError::NotFound { what: url });
                }
                Err(err) if attempt < self.max_attempts => {
                    log::warn!("{} (attempt {}/{}): {}", url, attempt, self.max_attempts, err);
                    std::thread::sleep(Duration::from_millis(500 * u64::from(attempt)));
                    attempt += 1;
                }
                Err(source) => return Err(SourceError::Http { url, source }),
            }
        }
    }
}

impl MatchSource for OpenDataHttp {
    fn matches(
        &self,
        competition_id: u32,
        season_id: u32,
    ) -> Result<Vec<MatchSummary>, SourceError> {
        let relative = matches_path(competition_id, season_id);
        let json = self.get_text(&relative)?;
        parse_matches(&json).map_err(|source| SourceError::Json {
            what: relative,
            source,
        })
    }

    fn events(&self, match_id: u64) -> Result<Vec<EventRecord>, SourceError> {
        let relative = events_path(match_id);
        let json = self.get_text(&relative)?;
        parse_events(&json).map_err(|source| SourceError::Json {
            what: relative,
            source,
        })
    }

    fn describe(&self) -> String {
        format!("open data at {}", self.base_url)
    }
}

/// In-memory source. Matches without an events entry fail with `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    seasons: HashMap<(u32, u32), Vec<MatchSummary>>,
    events: HashMap<u64, Vec<EventRecord>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_season(
        mut self,
        competition_id: u32,
        season_id: u32,
        matches: Vec<MatchSummary>,
    ) -> Self {
        self.seasons.insert((competition_id, season_id), matches);
        self
    }

    pub fn with_events(mut self, match_id: u64, events: Vec<EventRecord>) -> Self {
        self.events.insert(match_id, events);
        self
    }
}

impl MatchSource for StaticSource {
    fn matches(
        &self,
        competition_id: u32,
        season_id: u32,
    ) -> Result<Vec<MatchSummary>, SourceError> {
        self.seasons
            .get(&(competition_id, season_id))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                what: format!("competition {} season {}", competition_id, season_id),
            })
    }

    fn events(&self, match_id: u64) -> Result<Vec<EventRecord>, SourceError> {
        self.events
            .get(&match_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                what: format!("events of match {}", match_id),
            })
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} seasons)", self.seasons.len())
    }
}
