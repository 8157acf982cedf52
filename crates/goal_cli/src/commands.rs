//! Command implementations. Each returns a serializable result; printing is
//! left to `render`.

use anyhow::{bail, Context, Result};
use goal_core::analysis::{
    compare_halves, compare_home_away, interval_matrix, summarize, HalfComparison,
    HomeAwayComparison, IntervalMatrix, RateSummary,
};
use goal_core::histogram::Weighting;
use goal_core::{DatasetKind, GoalRecord, GoalTable, Histogram, LabeledBins, Period};
use serde::Serialize;
use std::path::PathBuf;

/// Load and pool tables.
pub fn load_tables(paths: &[PathBuf]) -> Result<GoalTable> {
    if paths.is_empty() {
        bail!("No goal tables given");
    }
    let tables = paths
        .iter()
        .map(|path| {
            GoalTable::load(path)
                .with_context(|| format!("Failed to load table: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let pooled = GoalTable::concat(&tables).context("Failed to combine tables")?;
    log::info!(
        "Loaded {} goals over {} matches from {} tables",
        pooled.len(),
        pooled.counts.total,
        tables.len()
    );
    Ok(pooled)
}

pub fn summary(table: &GoalTable) -> RateSummary {
    summarize(table)
}

pub fn home_away(table: &GoalTable) -> Result<HomeAwayComparison> {
    if table.kind != DatasetKind::League {
        log::warn!("home/away comparison over tournament tables pools every stage");
    }
    compare_home_away(table).context("Home/away comparison failed")
}

#[derive(Debug, Serialize)]
pub struct HalvesReport {
    pub comparison: HalfComparison,
    pub first_half: IntervalMatrix,
    pub second_half: IntervalMatrix,
}

pub fn halves(table: &GoalTable, interval_minutes: u32) -> Result<HalvesReport> {
    Ok(HalvesReport {
        comparison: compare_halves(table).context("Half comparison failed")?,
        first_half: interval_matrix(table, Period::FirstHalf, interval_minutes)?,
        second_half: interval_matrix(table, Period::SecondHalf, interval_minutes)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Even bins over the adjusted axis
    Timeline,
    /// First-half bins, "45+", second-half bins, "90+"
    SplitHalves,
}

/// Tournament stage filter; leagues ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFilter {
    All,
    Group,
    Knockout,
}

#[derive(Debug, Clone, Copy)]
pub struct HistogramRequest {
    pub width: u32,
    pub weighted: bool,
    pub layout: Layout,
    pub stage: StageFilter,
}

pub fn histogram(table: &GoalTable, request: &HistogramRequest) -> Result<Histogram> {
    let counts = table.counts;
    let (goals, extra_time, weighting): (Vec<&GoalRecord>, bool, Weighting) = match table.kind {
        DatasetKind::League => (
            table.goals.iter().collect(),
            false,
            Weighting::PerMatch {
                matches: counts.total,
            },
        ),
        DatasetKind::Tournament => match request.stage {
            StageFilter::Group => (
                table.goals.iter().filter(|g| g.is_group_stage()).collect(),
                false,
                Weighting::PerMatch {
                    matches: counts.group,
                },
            ),
            StageFilter::Knockout => (
                table.goals.iter().filter(|g| !g.is_group_stage()).collect(),
                true,
                Weighting::Piecewise {
                    matches: counts.knockout,
                    extra_time_matches: counts.extra_time,
                },
            ),
            StageFilter::All => (
                table.goals.iter().collect(),
                true,
                Weighting::Piecewise {
                    matches: counts.total,
                    extra_time_matches: counts.extra_time,
                },
            ),
        },
    };
    let weighting = if request.weighted {
        weighting
    } else {
        Weighting::Unweighted
    };

    let bins = match request.layout {
        Layout::Timeline => LabeledBins::timeline(request.width, extra_time)?,
        Layout::SplitHalves if extra_time => {
            bail!("The split-halves layout covers regulation time only; use --stage group or the timeline layout")
        }
        Layout::SplitHalves => LabeledBins::split_halves(request.width)?,
    };

    let adjusted = goal_core::timeline::adjust_goals(goals);
    let histogram = Histogram::build(&adjusted, &bins, weighting)?;
    if histogram.dropped > 0 {
        log::info!("{} goals fall outside the bins", histogram.dropped);
    }
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goal_core::{MatchCounts, Side};
    use tempfile::tempdir;

    fn goal(period: Period, minute: u32, stage: Option<&str>) -> GoalRecord {
        GoalRecord {
            match_id: 1,
            period,
            minute,
            side: Some(Side::Home),
            stage: stage.map(str::to_string),
            extra_time_match: period.is_extra_time(),
        }
    }

    fn tournament() -> GoalTable {
        GoalTable::new(
            DatasetKind::Tournament,
            MatchCounts {
                total: 4,
                group: 2,
                knockout: 2,
                extra_time: 1,
            },
            vec![
                goal(Period::FirstHalf, 10, Some("Group Stage")),
                goal(Period::SecondHalf, 50, Some("Group Stage")),
                goal(Period::SecondHalf, 92, Some("Final")),
                goal(Period::ExtraTimeFirstHalf, 95, Some("Final")),
            ],
        )
    }

    #[test]
    fn test_load_tables_pools_counts() -> Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        tournament().write(&first)?;
        tournament().write(&second)?;

        let pooled = load_tables(&[first, second])?;
        assert_eq!(pooled.len(), 8);
        assert_eq!(pooled.counts.group, 4);
        assert_eq!(pooled.counts.extra_time, 2);
        assert!(load_tables(&[]).is_err());
        Ok(())
    }

    #[test]
    fn test_knockout_histogram_weights() -> Result<()> {
        let request = HistogramRequest {
            width: 15,
            weighted: true,
            layout: Layout::Timeline,
            stage: StageFilter::Knockout,
        };
        let hist = histogram(&tournament(), &request)?;
        assert_eq!(hist.values.len(), 12);
        // 92' in the second half → adjusted 107 → "90+"
        assert_eq!(hist.labels[7], "90+");
        assert!((hist.values[7] - 0.5).abs() < 1e-12);
        // 95' in extra time → adjusted 125 → "90 - 105", one extra-time match
        assert!((hist.values[8] - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_group_histogram_split_halves() -> Result<()> {
        let request = HistogramRequest {
            width: 15,
            weighted: false,
            layout: Layout::SplitHalves,
            stage: StageFilter::Group,
        };
        let hist = histogram(&tournament(), &request)?;
        assert_eq!(hist.total(), 2.0);
        assert_eq!(hist.values[0], 1.0);
        // 50' in the second half → adjusted 65 → "45 - 60"
        assert_eq!(hist.values[4], 1.0);

        let knockout = HistogramRequest {
            stage: StageFilter::Knockout,
            ..request
        };
        assert!(histogram(&tournament(), &knockout).is_err());
        Ok(())
    }

    #[test]
    fn test_halves_report() -> Result<()> {
        let report = halves(&tournament(), 15)?;
        assert_eq!(report.comparison.first_half_goals, 1);
        assert_eq!(report.comparison.second_half_goals, 1);
        assert_eq!(report.first_half.counts, vec![1, 0, 0]);
        assert_eq!(report.second_half.counts, vec![1, 0, 0]);
        Ok(())
    }
}
