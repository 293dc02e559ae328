use std::fmt;

use crate::model::Timepoint;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, blank labels, etc.).
    ConfigValidation(String),
    /// No field qualified as the name column under any detection rule.
    NoSuitableColumn { columns: Vec<String> },
    /// A required column is absent from the input table.
    MissingColumn { column: String },
    /// One side of the link has no records.
    EmptyGroup { timepoint: Timepoint },
    /// Threshold outside the 0-100 similarity scale.
    InvalidThreshold(f64),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::NoSuitableColumn { columns } => write!(
                f,
                "could not detect a name column among [{}]",
                columns.join(", ")
            ),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::EmptyGroup { timepoint } => {
                write!(f, "{timepoint} group is empty; both groups need records to link")
            }
            Self::InvalidThreshold(t) => {
                write!(f, "threshold must be between 0 and 100, got {t}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
