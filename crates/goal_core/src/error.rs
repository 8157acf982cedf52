use thiserror::Error;

/// Errors raised while extracting goals or reading/writing goal tables.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A goal event is missing a field the table needs.
    #[error("match {match_id}: goal event #{event_index} has no `{field}`")]
    MissingField {
        match_id: u64,
        event_index: usize,
        field: &'static str,
    },

    #[error("match {match_id}: goal event #{event_index} has invalid period {period}")]
    InvalidPeriod {
        match_id: u64,
        event_index: usize,
        period: u8,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid goal table {path}: {reason}")]
    InvalidTable { path: String, reason: String },

    #[error("Cannot combine league and tournament tables")]
    MixedTableKinds,
}

impl CoreError {
    /// Schema-integrity faults point at the source data, not at this process.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            CoreError::MissingField { .. } | CoreError::InvalidPeriod { .. }
        )
    }
}

/// Errors from the statistical comparators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Sample `{0}` is empty")]
    EmptySample(&'static str),

    #[error("Sample `{0}` contains a non-finite value")]
    NonFiniteSample(&'static str),

    #[error("Invalid rate {value} for `{name}`")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("Invalid exposure {value} for `{name}` (must be > 0)")]
    InvalidExposure { name: &'static str, value: f64 },

    #[error("Interval width {0} does not divide a 45 minute half")]
    InvalidInterval(u32),

    #[error("Not enough data: {0}")]
    InsufficientData(String),
}

/// Errors from histogram binning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("At least two bin edges are required, got {0}")]
    TooFewEdges(usize),

    #[error("Bin edges must be strictly increasing (edge {index}: {value})")]
    NonIncreasingEdges { index: usize, value: f64 },

    #[error("Bin width must be positive")]
    ZeroWidth,

    #[error("Bin width {0} does not divide a 45 minute half")]
    UnsupportedWidth(u32),

    #[error("Got {weights} weights for {values} observations")]
    WeightLengthMismatch { values: usize, weights: usize },

    #[error("Exposure count for `{0}` is zero")]
    ZeroExposure(&'static str),
}

pub type Result<T> = std::result::Result<T, CoreError>;
