use thiserror::Error;

/// Ways an explicit time axis can break the series invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAxisViolation {
    Negative,
    ZeroAfterStart,
    NotIncreasing,
}

impl std::fmt::Display for TimeAxisViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            TimeAxisViolation::Negative => "time series cannot have negative values",
            TimeAxisViolation::ZeroAfterStart => {
                "time series cannot have 0 values after first position"
            }
            TimeAxisViolation::NotIncreasing => "time series must be monotonically increasing",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RRiError {
    #[error("rri series can only have positive values")]
    InvalidSeries,
    #[error("rri series cannot be empty")]
    EmptySeries,
    #[error("rri and time series must have the same length")]
    LengthMismatch,
    #[error("{0}")]
    InvalidTimeAxis(TimeAxisViolation),
    #[error("can't set attribute '{field}'")]
    ImmutabilityViolation { field: String },
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("unknown statistic '{0}'")]
    UnknownStatistic(String),
    #[error("invalid segmentation: {0}")]
    InvalidSegmentation(String),
    #[error("poincare summary needs at least 3 intervals, got {0}")]
    NotEnoughPoints(usize),
}

pub type Result<T> = std::result::Result<T, RRiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_distinct() {
        let errors = [
            RRiError::InvalidSeries,
            RRiError::LengthMismatch,
            RRiError::InvalidTimeAxis(TimeAxisViolation::Negative),
            RRiError::InvalidTimeAxis(TimeAxisViolation::ZeroAfterStart),
            RRiError::InvalidTimeAxis(TimeAxisViolation::NotIncreasing),
        ];
        let messages: std::collections::HashSet<String> =
            errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), errors.len());
    }
}
