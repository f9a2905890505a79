use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExperimentError>;

#[derive(Debug, Error, PartialEq)]
pub enum ExperimentError {
    #[error("unknown speaker condition {0:?}, expected \"cautious\" or \"confident\"")]
    UnknownCondition(String),
    #[error("{field} must be at most {max}, got {value}")]
    InvalidAssignment {
        field: &'static str,
        value: u8,
        max: u8,
    },
    #[error("speaker threshold {0} is outside 0..=1")]
    InvalidThreshold(f64),
    #[error("slider value {0} is outside 0..=100")]
    SliderOutOfRange(u32),
    #[error("prediction must sum to 100, got {total}")]
    InvalidPrediction { total: u32 },
    #[error("failed to serialize session: {0}")]
    Export(String),
}

impl From<serde_json::Error> for ExperimentError {
    fn from(e: serde_json::Error) -> Self {
        ExperimentError::Export(e.to_string())
    }
}
