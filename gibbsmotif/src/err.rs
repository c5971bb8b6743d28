//! Error types.

use std::fmt::Display;
use std::fmt::Formatter;

/// The given character is not a valid symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSymbol(pub char);

impl Display for InvalidSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid symbol: {:?}", self.0)
    }
}

impl std::error::Error for InvalidSymbol {}

/// Invalid data was passed to initialize a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidData;

impl Display for InvalidData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid data")
    }
}

impl std::error::Error for InvalidData {}

// --- ConfigError -------------------------------------------------------------

/// A search or sweep was configured with parameters it cannot run with.
///
/// Configuration errors are always detected before any sampling happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The sequence set contains no sequence.
    EmptySequenceSet,
    /// The sequence set contains a single sequence, so no profile can be
    /// built once it is held out.
    SingleSequence,
    /// The motif width is zero.
    ZeroWidth,
    /// The motif width exceeds the length of a sequence.
    WidthTooLarge {
        width: usize,
        sequence: usize,
        length: usize,
    },
    /// The width range is empty.
    InvalidRange { min: usize, max: usize },
    /// The width step is zero.
    ZeroStep,
    /// The worker pool has no worker.
    ZeroJobs,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptySequenceSet => f.write_str("sequence set is empty"),
            ConfigError::SingleSequence => {
                f.write_str("sequence set must contain at least two sequences")
            }
            ConfigError::ZeroWidth => f.write_str("motif width must be positive"),
            ConfigError::WidthTooLarge {
                width,
                sequence,
                length,
            } => write!(
                f,
                "motif width {} exceeds length {} of sequence {}",
                width, length, sequence
            ),
            ConfigError::InvalidRange { min, max } => {
                write!(f, "invalid width range: {}..={}", min, max)
            }
            ConfigError::ZeroStep => f.write_str("width step must be positive"),
            ConfigError::ZeroJobs => f.write_str("worker pool size must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

// --- SweepError --------------------------------------------------------------

/// An error that aborted a parameter sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    /// The sweep was misconfigured, no worker was started.
    Config(ConfigError),
    /// A search run terminated abnormally.
    WorkerFailure { width: usize, message: String },
    /// A worker thread died outside of any search run.
    WorkerLost { message: String },
}

impl From<ConfigError> for SweepError {
    fn from(error: ConfigError) -> Self {
        SweepError::Config(error)
    }
}

impl Display for SweepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepError::Config(e) => e.fmt(f),
            SweepError::WorkerFailure { width, message } => {
                write!(f, "search run for width {} failed: {}", width, message)
            }
            SweepError::WorkerLost { message } => write!(f, "worker thread died: {}", message),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Config(e) => Some(e),
            SweepError::WorkerFailure { .. } => None,
            SweepError::WorkerLost { .. } => None,
        }
    }
}
