use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Fatal conditions that abort a run.
#[derive(Debug, Error)]
pub enum FlowTagError {
    /// An input file (flow log or reference table) does not exist
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// A reference table row is missing a column or holds a non-numeric number
    #[error("parse error in {} at row {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// Any other failure while reading an input
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A report could not be created or written
    #[error("failed to write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file exists but could not be loaded
    #[error("invalid configuration file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl FlowTagError {
    /// Maps an error raised while opening an input, keeping "not found" distinct.
    pub fn from_open(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::NotFound {
            FlowTagError::SourceNotFound { path }
        } else {
            FlowTagError::Io { path, source: err }
        }
    }
}

/// Why a flow log line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    TooFewFields { found: usize },
    InvalidPort(String),
    InvalidProtocol(String),
}

/// A recoverable, per-line rejection from the flow log scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub line_number: u64,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MalformedReason::TooFewFields { found } => write!(
                f,
                "Invalid log entry at line {}: {} fields, at least {} required, skipping",
                self.line_number,
                found,
                crate::flow_log::scanner::MIN_FIELDS_IN_LOG
            ),
            MalformedReason::InvalidPort(text) => write!(
                f,
                "Invalid destination port {:?} at line {}, skipping",
                text, self.line_number
            ),
            MalformedReason::InvalidProtocol(text) => write!(
                f,
                "Invalid protocol number {:?} at line {}, skipping",
                text, self.line_number
            ),
        }
    }
}
