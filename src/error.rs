use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SeqDocError {
    /// A range constructor was given bounds that do not describe a live range.
    InvalidRange { from: usize, to: usize },
    /// A feature constructor was given no ranges.
    EmptyFeature,
    Serde(serde_json::Error),
}

impl Error for SeqDocError {}

impl fmt::Display for SeqDocError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeqDocError::InvalidRange { from, to } => {
                write!(f, "invalid range: from={from} must be smaller than to={to}")
            }
            SeqDocError::EmptyFeature => write!(f, "a feature requires at least one range"),
            SeqDocError::Serde(err) => write!(f, "{err}"),
        }
    }
}

impl From<serde_json::Error> for SeqDocError {
    fn from(err: serde_json::Error) -> Self {
        SeqDocError::Serde(err)
    }
}
