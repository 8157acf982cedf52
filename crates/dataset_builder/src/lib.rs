//! Dataset Builder Library
//!
//! Match listing → per-match events → goal extraction → CSV goal table
//! → SHA256 checksum + metadata sidecar

pub mod plan;
pub mod source;
pub mod statsbomb;

use anyhow::{Context, Result};
use goal_core::extract::reached_extra_time;
use goal_core::table::metadata_path;
use goal_core::{
    extract_match_goals, table_file_name, DatasetKind, ExtractOptions, GoalTable, MatchCounts,
    TableMetadata,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub use plan::{build_plan, DatasetEntry, DatasetPlan, SourceConfig};
pub use source::{MatchSource, OpenDataDir, OpenDataHttp, SourceError, StaticSource};

/// What to build and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub competition_id: u32,
    pub season_id: u32,
    /// Table file to write; the sidecar goes next to it
    pub output_path: PathBuf,
    /// Rebuild even if the table already exists
    pub force_rebuild: bool,
    pub kind: DatasetKind,
    /// Resolve each goal to home / away
    pub attribute_side: bool,
}

impl BuildConfig {
    /// Table named by the (competition, season) convention inside `output_dir`.
    pub fn new(competition_id: u32, season_id: u32, output_dir: &Path, kind: DatasetKind) -> Self {
        Self {
            competition_id,
            season_id,
            output_path: output_dir.join(table_file_name(competition_id, season_id)),
            force_rebuild: false,
            kind,
            attribute_side: true,
        }
    }

    pub fn force(mut self, force_rebuild: bool) -> Self {
        self.force_rebuild = force_rebuild;
        self
    }

    pub fn with_side(mut self, attribute_side: bool) -> Self {
        self.attribute_side = attribute_side;
        self
    }

    fn extract_options(&self) -> ExtractOptions {
        let options = ExtractOptions::for_kind(self.kind);
        if self.attribute_side {
            options
        } else {
            options.without_side()
        }
    }
}

/// Why a match contributed no goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Events could not be fetched or decoded
    Retrieval,
    /// A goal event lacked a required field
    Integrity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFailure {
    pub match_id: u64,
    pub kind: FailureKind,
    pub message: String,
}

/// Result of one build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub table_path: PathBuf,
    pub metadata: TableMetadata,
    pub failures: Vec<MatchFailure>,
    /// Goals dropped because they were scored in a shoot-out
    pub shootout_goals: usize,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Built(BuildReport),
    /// Table already present and no rebuild was requested
    Skipped { table_path: PathBuf },
}

/// Build one goal table.
///
/// Per-match failures are collected, not fatal: goals from every match that
/// did succeed are always written. Failing to list the season's matches or to
/// write the table is fatal.
pub fn build_dataset(source: &dyn MatchSource, config: &BuildConfig) -> Result<BuildOutcome> {
    if config.output_path.exists() && !config.force_rebuild {
        log::info!(
            "{} exists, skipping (use --force to rebuild)",
            config.output_path.display()
        );
        return Ok(BuildOutcome::Skipped {
            table_path: config.output_path.clone(),
        });
    }

    log::info!(
        "Building {} table for competition {} season {} from {}",
        config.kind,
        config.competition_id,
        config.season_id,
        source.describe()
    );

    let matches = source
        .matches(config.competition_id, config.season_id)
        .with_context(|| {
            format!(
                "Failed to list matches for competition {} season {}",
                config.competition_id, config.season_id
            )
        })?;

    let mut counts = MatchCounts::from_matches(&matches);
    let options = config.extract_options();
    let mut goals = Vec::new();
    let mut failures = Vec::new();
    let mut shootout_goals = 0;

    for (i, summary) in matches.iter().enumerate() {
        if i % 10 == 0 {
            log::debug!("{} / {}", i, matches.len());
        }

        let events = match source.events(summary.match_id) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("match {}: {}", summary.match_id, err);
                failures.push(MatchFailure {
                    match_id: summary.match_id,
                    kind: FailureKind::Retrieval,
                    message: err.to_string(),
                });
                continue;
            }
        };

        // known from the events even when extraction fails
        if reached_extra_time(&events) {
            counts.extra_time += 1;
        }

        match extract_match_goals(summary, &events, &options) {
            Ok(extraction) => {
                shootout_goals += extraction.shootout_goals;
                goals.extend(extraction.goals);
            }
            Err(err) => {
                log::error!("match {}: {}", summary.match_id, err);
                failures.push(MatchFailure {
                    match_id: summary.match_id,
                    kind: if err.is_integrity_fault() {
                        FailureKind::Integrity
                    } else {
                        FailureKind::Retrieval
                    },
                    message: err.to_string(),
                });
            }
        }
    }

    let table = GoalTable::new(config.kind, counts, goals);
    table
        .write(&config.output_path)
        .with_context(|| format!("Failed to write table: {}", config.output_path.display()))?;

    let checksum = file_checksum(&config.output_path)?;
    let metadata = TableMetadata {
        competition_id: config.competition_id,
        season_id: config.season_id,
        kind: config.kind,
        counts,
        goal_count: table.len(),
        failed_matches: failures.iter().map(|f| f.match_id).collect(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let sidecar = metadata_path(&config.output_path);
    metadata
        .write(&sidecar)
        .with_context(|| format!("Failed to write metadata: {}", sidecar.display()))?;

    log::info!(
        "Wrote {} goals from {} matches to {} ({} failed)",
        table.len(),
        counts.total,
        config.output_path.display(),
        failures.len()
    );

    Ok(BuildOutcome::Built(BuildReport {
        table_path: config.output_path.clone(),
        metadata,
        failures,
        shootout_goals,
    }))
}

/// SHA256 of a file as a hex string.
pub fn file_checksum(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a table against the checksum recorded in its sidecar.
pub fn verify_table(table_path: &Path) -> Result<bool> {
    let sidecar = metadata_path(table_path);
    let metadata = TableMetadata::read(&sidecar)
        .with_context(|| format!("Failed to read metadata: {}", sidecar.display()))?;
    Ok(file_checksum(table_path)? == metadata.checksum)
}
