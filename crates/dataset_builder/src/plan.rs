//! Dataset plan: which competitions/seasons to build, from where, into where.
//!
//! ```yaml
//! output_dir: data
//! source:
//!   http:
//!     base_url: https://raw.githubusercontent.com/statsbomb/open-data/master/data
//! leagues:
//!   - label: Premier League 2015/16
//!     competition_id: 2
//!     season_id: 27
//! tournaments:
//!   - label: World Cup 2022
//!     competition_id: 43
//!     season_id: 106
//! ```

use crate::source::{
    MatchSource, OpenDataDir, OpenDataHttp, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS,
};
use crate::{build_dataset, BuildConfig, BuildOutcome};
use anyhow::{Context, Result};
use goal_core::DatasetKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    /// Local checkout of the open-data `data/` directory
    OpenDataDir { path: PathBuf },
    Http {
        #[serde(default = "default_base_url")]
        base_url: String,
        /// Attempts per request before a transient error is reported
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http {
            base_url: default_base_url(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl SourceConfig {
    pub fn open(&self) -> Result<Box<dyn MatchSource>> {
        let source: Box<dyn MatchSource> = match self {
            SourceConfig::OpenDataDir { path } => Box::new(OpenDataDir::new(path)),
            SourceConfig::Http {
                base_url,
                max_attempts,
            } => Box::new(
                OpenDataHttp::new(base_url.as_str())
                    .context("Failed to create HTTP client")?
                    .with_max_attempts(*max_attempts),
            ),
        };
        Ok(source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub label: String,
    pub competition_id: u32,
    pub season_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPlan {
    pub output_dir: PathBuf,
    /// Written as a single-key map (`http: {...}` / `open_data_dir: {...}`)
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub source: SourceConfig,
    #[serde(default = "default_true")]
    pub attribute_side: bool,
    #[serde(default)]
    pub leagues: Vec<DatasetEntry>,
    #[serde(default)]
    pub tournaments: Vec<DatasetEntry>,
}

fn default_true() -> bool {
    true
}

impl DatasetPlan {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse dataset plan")
    }

    /// Load a plan; a relative `output_dir` (or source path) is resolved
    /// against the plan file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan: {}", path.display()))?;
        let mut plan = Self::from_yaml_str(&yaml)
            .with_context(|| format!("Invalid plan: {}", path.display()))?;

        if let Some(base) = path.parent() {
            if plan.output_dir.is_relative() {
                plan.output_dir = base.join(&plan.output_dir);
            }
            if let SourceConfig::OpenDataDir { path } = &mut plan.source {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        Ok(plan)
    }

    /// Entries of one kind
    pub fn entries(&self, kind: DatasetKind) -> &[DatasetEntry] {
        match kind {
            DatasetKind::League => &self.leagues,
            DatasetKind::Tournament => &self.tournaments,
        }
    }

    /// Every dataset as (label, build config), leagues first.
    pub fn build_configs(&self, force_rebuild: bool) -> Vec<(String, BuildConfig)> {
        [DatasetKind::League, DatasetKind::Tournament]
            .into_iter()
            .flat_map(|kind| {
                self.entries(kind).iter().map(move |entry| {
                    let config = BuildConfig::new(
                        entry.competition_id,
                        entry.season_id,
                        &self.output_dir,
                        kind,
                    )
                    .force(force_rebuild)
                    .with_side(self.attribute_side);
                    (entry.label.clone(), config)
                })
            })
            .collect()
    }

    /// Table paths of one kind, in plan order.
    pub fn table_paths(&self, kind: DatasetKind) -> Vec<PathBuf> {
        self.entries(kind)
            .iter()
            .map(|e| {
                self.output_dir
                    .join(goal_core::table_file_name(e.competition_id, e.season_id))
            })
            .collect()
    }
}

/// Build every dataset of the plan. One failing dataset does not stop the
/// others; results come back in plan order.
pub fn build_plan(
    plan: &DatasetPlan,
    source: &dyn MatchSource,
    force_rebuild: bool,
) -> Vec<(String, Result<BuildOutcome>)> {
    plan.build_configs(force_rebuild)
        .into_iter()
        .map(|(label, config)| {
            log::info!("== {} ==", label);
            let result = build_dataset(source, &config)
                .with_context(|| format!("Failed to build {}", label));
            (label, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use goal_core::{EventRecord, MatchSummary};
    use tempfile::tempdir;

    const PLAN: &str = r#"
output_dir: tables
source:
  open_data_dir:
    path: open-data/data
leagues:
  - label: Premier League 2015/16
    competition_id: 2
    season_id: 27
tournaments:
  - label: World Cup 2022
    competition_id: 43
    season_id: 106
"#;

    #[test]
    fn test_parse_plan() {
        let plan = DatasetPlan::from_yaml_str(PLAN).unwrap();
        assert!(plan.attribute_side);
        assert_eq!(plan.leagues.len(), 1);
        assert_eq!(plan.tournaments[0].season_id, 106);
        assert_eq!(
            plan.source,
            SourceConfig::OpenDataDir {
                path: PathBuf::from("open-data/data")
            }
        );

        let configs = plan.build_configs(true);
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].1.kind, DatasetKind::League);
        assert_eq!(configs[1].1.kind, DatasetKind::Tournament);
        assert!(configs[1].1.force_rebuild);
        assert_eq!(
            configs[1].1.output_path,
            PathBuf::from("tables/goals_competition43_season106.csv")
        );
    }

    #[test]
    fn test_http_source_fields() {
        let yaml = "output_dir: data\nsource:\n  http:\n    max_attempts: 5\n";
        let plan = DatasetPlan::from_yaml_str(yaml).unwrap();
        assert_eq!(
            plan.source,
            SourceConfig::Http {
                base_url: DEFAULT_BASE_URL.to_string(),
                max_attempts: 5,
            }
        );

        let written = serde_yaml::to_string(&plan).unwrap();
        assert!(written.contains("http:"));
        assert_eq!(DatasetPlan::from_yaml_str(&written).unwrap(), plan);
    }

    #[test]
    fn test_shipped_plan_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/datasets.yaml");
        let plan = DatasetPlan::load(&path).unwrap();
        assert_eq!(plan.source, SourceConfig::default());
        assert!(plan.attribute_side);
        assert_eq!(plan.leagues.len(), 5);
        assert_eq!(plan.tournaments.len(), 3);
        assert_eq!(
            plan.table_paths(DatasetKind::Tournament)[0],
            path.parent()
                .unwrap()
                .join("../data/goals_competition43_season106.csv")
        );
    }

    #[test]
    fn test_default_source_is_http() {
        let plan = DatasetPlan::from_yaml_str("output_dir: data\n").unwrap();
        assert_eq!(plan.source, SourceConfig::default());
        assert!(plan.leagues.is_empty());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        fs::write(&path, PLAN).unwrap();
        let plan = DatasetPlan::load(&path).unwrap();
        assert_eq!(plan.output_dir, dir.path().join("tables"));
        assert_eq!(
            plan.table_paths(DatasetKind::League),
            vec![dir.path().join("tables/goals_competition2_season27.csv")]
        );
    }

    #[test]
    fn test_build_plan_continues_after_failure() {
        let dir = tempdir().unwrap();
        let mut plan = DatasetPlan::from_yaml_str(PLAN).unwrap();
        plan.output_dir = dir.path().to_path_buf();

        // only the league season exists
        let source = StaticSource::new()
            .with_season(2, 27, vec![MatchSummary::new(1, "A", "B", "Regular Season")])
            .with_events(1, vec![EventRecord::shot("Goal").with_team("B").at(2, 77)]);

        let results = build_plan(&plan, &source, false);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Ok(BuildOutcome::Built(_))));
        assert!(results[1].1.is_err());
    }
}
