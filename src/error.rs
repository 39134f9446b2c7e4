//! Error types for share decoding and secret recovery.

use std::path::PathBuf;

use thiserror::Error;

use crate::math::Rational;

pub type Result<T> = std::result::Result<T, Error>;

/// A share value that cannot be read as a numeral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty numeral")]
    Empty,

    #[error("unsupported base {0} (must be 2..=36)")]
    UnsupportedBase(i64),

    #[error("invalid digit {digit:?} at position {position} for base {base}")]
    InvalidDigit {
        digit: char,
        position: usize,
        base: u32,
    },
}

/// The selected points do not describe an integer secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    #[error("duplicate x-coordinate {0} among selected shares")]
    DuplicateX(u32),

    #[error("interpolated value {0} is not an integer")]
    NonIntegral(Rational),

    #[error("share {x} is inconsistent with the reconstructed polynomial")]
    InconsistentShare { x: u32 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("share {index}: {source}")]
    Decode {
        index: u32,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    #[error("not enough shares: have {have}, need {need}")]
    InsufficientShares { have: usize, need: usize },

    #[error("threshold must be at least 1")]
    ZeroThreshold,

    #[error("threshold {k} exceeds share count {n}")]
    ThresholdTooLarge { k: usize, n: usize },

    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("share {index}: malformed record: {source}")]
    MalformedShare {
        index: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
