use std::{fmt, io};
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a pipeline an I/O failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    /// Reading from the input stream.
    Read,
    /// Writing to the output stream.
    Write,
}

impl fmt::Display for IoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoDirection::Read => write!(f, "read"),
            IoDirection::Write => write!(f, "write"),
        }
    }
}

/// Errors raised while building an alias table or driving a pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Two entries claim the same alias.
    #[error("alias '{alias}' is claimed by both :{first}: and :{second}:")]
    DuplicateAlias {
        /// The contested alias.
        alias: String,
        /// Canonical name of the entry that claimed it first.
        first: String,
        /// Canonical name of the entry that claimed it again.
        second: String,
    },

    /// Two entries share a codepoint sequence and none of them is preferred.
    #[error("sequence {sequence} is claimed by both :{first}: and :{second}: with no preferred entry")]
    AmbiguousSequence {
        /// The contested sequence, as space separated hex codepoints.
        sequence: String,
        /// Canonical name of one claimant.
        first: String,
        /// Canonical name of another claimant.
        second: String,
    },

    /// An entry violates the shape every entry must have.
    #[error("invalid entry '{canonical}': {reason}")]
    InvalidEntry {
        /// Canonical name of the entry (may be empty).
        canonical: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The textual table data could not be parsed.
    #[error("table data line {line}: {message}")]
    TableData {
        /// 1-based line number.
        line: usize,
        /// Parser complaint.
        message: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The underlying reader or writer failed.
    #[error("{direction} failed: {source}")]
    Io {
        /// Whether the read or the write side failed.
        direction: IoDirection,
        /// The underlying cause.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn read(source: io::Error) -> Self {
        Error::Io {
            direction: IoDirection::Read,
            source,
        }
    }

    pub(crate) fn write(source: io::Error) -> Self {
        Error::Io {
            direction: IoDirection::Write,
            source,
        }
    }

    /// Returns the direction of an I/O failure, or `None` for table and config errors.
    pub fn io_direction(&self) -> Option<IoDirection> {
        match self {
            Error::Io { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}
