//! # Binned Aggregator
//!
//! Weighted histogram over adjusted goal minutes.
//!
//! Bin k covers `[edge[k], edge[k+1])`, the last bin also includes its upper
//! edge, and values outside `[edge[0], edge[last]]` are dropped. Weights turn
//! raw counts into per-match rates:
//!
//! - unweighted: 1 per goal (total goals)
//! - per match: 1 / matches
//! - piecewise: 1 / all matches for regulation goals, 1 / extra-time matches
//!   for extra-time goals (only a subset of matches play extra time)

use crate::error::HistogramError;
use crate::models::Period;
use crate::timeline::AdjustedGoalRecord;
use serde::Serialize;

/// Strictly increasing bin boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    pub fn new(edges: Vec<f64>) -> Result<Self, HistogramError> {
        if edges.len() < 2 {
            return Err(HistogramError::TooFewEdges(edges.len()));
        }
        for (index, pair) in edges.windows(2).enumerate() {
            if !(pair[1] > pair[0]) || !pair[0].is_finite() || !pair[1].is_finite() {
                return Err(HistogramError::NonIncreasingEdges {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }
        Ok(Self(edges))
    }

    /// Edges `start, start+step, ...` below `stop`, like `range(start, stop, step)`.
    pub fn range(start: u32, stop: u32, step: u32) -> Result<Self, HistogramError> {
        if step == 0 {
            return Err(HistogramError::ZeroWidth);
        }
        let edges = (start..stop)
            .step_by(step as usize)
            .map(f64::from)
            .collect();
        Self::new(edges)
    }

    /// Regulation time on the adjusted axis: 0..=120 (first half, its
    /// stoppage gap, second half, its stoppage gap).
    pub fn regulation(width: u32) -> Result<Self, HistogramError> {
        Self::range(0, 121, width)
    }

    /// Regulation plus both extra-time halves: 0..=180.
    pub fn with_extra_time(width: u32) -> Result<Self, HistogramError> {
        Self::range(0, 181, width)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn bin_count(&self) -> usize {
        self.0.len() - 1
    }

    pub fn lower(&self) -> f64 {
        self.0[0]
    }

    pub fn upper(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Index of the bin holding `value`, `None` outside the edges.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower() && value <= self.upper()) {
            return None;
        }
        if value == self.upper() {
            return Some(self.bin_count() - 1);
        }
        // first edge strictly greater than value, minus one
        Some(self.0.partition_point(|edge| *edge <= value) - 1)
    }
}

/// Edges plus a display label per bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledBins {
    pub edges: BinEdges,
    pub labels: Vec<String>,
}

impl LabeledBins {
    /// Bins for regulation time with the stoppage-time gaps kept as their own
    /// bins ("45+" between the halves, "90+" at the end).
    ///
    /// First-half edges run 0..=45, second-half edges 60..<105 (second-half
    /// minutes shifted by 15), then 105 and 120. A width of 1 gives plain
    /// 0..=120 minute bins. The width must divide 45.
    pub fn split_halves(width: u32) -> Result<Self, HistogramError> {
        if width == 0 {
            return Err(HistogramError::ZeroWidth);
        }
        if 45 % width != 0 {
            return Err(HistogramError::UnsupportedWidth(width));
        }

        if width == 1 {
            let edges: Vec<u32> = (0..=120).collect();
            let labels = edges
                .windows(2)
                .map(|w| match w[0] {
                    45..=59 => format!("45+{}", w[0] - 44),
                    60..=104 => format!("{} - {}", w[0] - 15, w[1] - 15),
                    105..=u32::MAX => format!("90+{}", w[0] - 104),
                    _ => format!("{} - {}", w[0], w[1]),
                })
                .collect();
            return Ok(Self {
                edges: BinEdges::new(edges.into_iter().map(f64::from).collect())?,
                labels,
            });
        }

        let first_half: Vec<u32> = (0..=45).step_by(width as usize).collect();
        let second_half: Vec<u32> = (60..105).step_by(width as usize).collect();

        let mut labels: Vec<String> = first_half
            .windows(2)
            .map(|w| format!("{} - {}", w[0], w[1]))
            .collect();
        labels.push("45+".to_string());
        labels.extend(
            second_half
                .windows(2)
                .map(|w| format!("{} - {}", w[0] - 15, w[1] - 15)),
        );
        if let Some(last) = second_half.last() {
            labels.push(format!("{} - 90", last - 15));
        }
        labels.push("90+".to_string());

        let edges: Vec<f64> = first_half
            .iter()
            .chain(second_half.iter())
            .chain([105, 120].iter())
            .map(|&m| f64::from(m))
            .collect();

        Ok(Self {
            edges: BinEdges::new(edges)?,
            labels,
        })
    }

    /// Evenly spaced bins over the adjusted axis, labelled in match-clock
    /// minutes: 0..=120 for regulation, 0..=180 with extra time. The axis is
    /// a sequence of 15 minute segments, each either play or the stoppage gap
    /// that trails a period, so the width must divide 15.
    pub fn timeline(width: u32, extra_time: bool) -> Result<Self, HistogramError> {
        if width == 0 {
            return Err(HistogramError::ZeroWidth);
        }
        if 15 % width != 0 {
            return Err(HistogramError::UnsupportedWidth(width));
        }
        let edges = if extra_time {
            BinEdges::with_extra_time(width)?
        } else {
            BinEdges::regulation(width)?
        };

        let labels = edges
            .as_slice()
            .windows(2)
            .map(|w| timeline_label(w[0] as u32, w[1] as u32))
            .collect();
        Ok(Self { edges, labels })
    }

    /// Plain "a - b" labels for arbitrary edges.
    pub fn plain(edges: BinEdges) -> Self {
        let labels = edges
            .as_slice()
            .windows(2)
            .map(|w| format!("{} - {}", w[0], w[1]))
            .collect();
        Self { edges, labels }
    }
}

#[derive(Clone, Copy)]
enum Segment {
    /// Playing time; subtract `offset` to get back to the match clock
    Play { offset: u32 },
    /// Stoppage gap trailing the period that ends at `period_end`
    Stoppage { period_end: u32 },
}

/// Start of each 15 minute segment of the adjusted axis
const SEGMENTS: [(u32, Segment); 8] = [
    (0, Segment::Play { offset: 0 }),
    (45, Segment::Stoppage { period_end: 45 }),
    (60, Segment::Play { offset: 15 }),
    (105, Segment::Stoppage { period_end: 90 }),
    (120, Segment::Play { offset: 30 }),
    (135, Segment::Stoppage { period_end: 105 }),
    (150, Segment::Play { offset: 45 }),
    (165, Segment::Stoppage { period_end: 120 }),
];

/// Label of the adjusted-axis bin `[start, end)`; the bin lies inside one
/// segment.
fn timeline_label(start: u32, end: u32) -> String {
    let (segment_start, segment) = SEGMENTS
        .iter()
        .rev()
        .find(|(s, _)| *s <= start)
        .copied()
        .unwrap_or(SEGMENTS[0]);

    match segment {
        Segment::Play { offset } => format!("{} - {}", start - offset, end - offset),
        Segment::Stoppage { period_end } if end - start == 15 => format!("{}+", period_end),
        Segment::Stoppage { period_end } => format!(
            "{}+{}-{}",
            period_end,
            start - segment_start,
            end - segment_start
        ),
    }
}

/// Per-bin weighted sums. `weights` must have one entry per value.
pub fn weighted_histogram(
    values: &[f64],
    weights: &[f64],
    edges: &BinEdges,
) -> Result<Vec<f64>, HistogramError> {
    if values.len() != weights.len() {
        return Err(HistogramError::WeightLengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }

    let mut sums = vec![0.0; edges.bin_count()];
    for (&value, &weight) in values.iter().zip(weights) {
        if let Some(bin) = edges.bin_of(value) {
            sums[bin] += weight;
        }
    }
    Ok(sums)
}

/// Raw counts (weight 1 per value).
pub fn count_histogram(values: &[f64], edges: &BinEdges) -> Vec<f64> {
    let mut counts = vec![0.0; edges.bin_count()];
    for &value in values {
        if let Some(bin) = edges.bin_of(value) {
            counts[bin] += 1.0;
        }
    }
    counts
}

/// How goals are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Total goals per bin
    Unweighted,
    /// Goals per match over a single exposure count
    PerMatch { matches: u32 },
    /// Regulation goals over all matches, extra-time goals over the
    /// matches that went to extra time
    Piecewise {
        matches: u32,
        extra_time_matches: u32,
    },
}

impl Weighting {
    pub fn weight_for(&self, period: Period) -> Result<f64, HistogramError> {
        match *self {
            Weighting::Unweighted => Ok(1.0),
            Weighting::PerMatch { matches } => inverse("matches", matches),
            Weighting::Piecewise {
                matches,
                extra_time_matches,
            } => {
                if period.is_extra_time() {
                    inverse("extra_time_matches", extra_time_matches)
                } else {
                    inverse("matches", matches)
                }
            }
        }
    }

    /// One weight per goal, in order.
    pub fn weights(&self, goals: &[AdjustedGoalRecord<'_>]) -> Result<Vec<f64>, HistogramError> {
        goals
            .iter()
            .map(|g| self.weight_for(g.record.period))
            .collect()
    }

    pub fn is_rate(&self) -> bool {
        !matches!(self, Weighting::Unweighted)
    }
}

fn inverse(name: &'static str, count: u32) -> Result<f64, HistogramError> {
    if count == 0 {
        return Err(HistogramError::ZeroExposure(name));
    }
    Ok(1.0 / f64::from(count))
}

/// Histogram of adjusted goal minutes, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub weighting: Weighting,
    /// Goals that fell outside the edges
    pub dropped: usize,
}

impl Histogram {
    pub fn build(
        goals: &[AdjustedGoalRecord<'_>],
        bins: &LabeledBins,
        weighting: Weighting,
    ) -> Result<Self, HistogramError> {
        let minutes: Vec<f64> = goals.iter().map(|g| f64::from(g.adjusted_minute)).collect();
        let weights = weighting.weights(goals)?;
        let values = weighted_histogram(&minutes, &weights, &bins.edges)?;
        let dropped = minutes
            .iter()
            .filter(|&&m| bins.edges.bin_of(m).is_none())
            .count();

        Ok(Self {
            edges: bins.edges.as_slice().to_vec(),
            labels: bins.labels.clone(),
            values,
            weighting,
            dropped,
        })
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}
