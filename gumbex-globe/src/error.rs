use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlobeError>;

#[derive(Debug, Error, PartialEq)]
pub enum GlobeError {
    #[error("invalid token count {count} for {class}")]
    InvalidCount { class: &'static str, count: i64 },
    #[error("{requested} tokens requested, at most {max} can be placed")]
    TooManyTokens { requested: usize, max: usize },
    #[error("tuning leaves no room for tokens: {0}")]
    InvalidTuning(String),
}
