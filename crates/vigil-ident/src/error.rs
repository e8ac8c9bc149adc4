//! Error types for identifier sampling.

use std::error::Error;
use std::fmt;

/// Errors from building sample specs, generators and samplers, or from
/// drawing identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentError {
    /// Both the source count and the filler count are zero.
    EmptySample,
    /// `source_count + filler_count` does not fit in a `usize`.
    SampleTooLong {
        /// Distinct source characters requested.
        source_count: usize,
        /// Filler characters requested.
        filler_count: usize,
    },
    /// A fixed prefix leaves no room for random characters.
    PrefixTooLong {
        /// Prefix length in characters.
        prefix_len: usize,
        /// Requested total length in characters.
        total_len: usize,
    },
    /// A strict sample found fewer qualifying source characters than
    /// requested and had no filler to make up for it.
    InsufficientSource {
        /// Distinct source characters requested.
        requested: usize,
        /// Distinct qualifying characters found.
        found: usize,
    },
    /// Every draw collided with an identifier already issued.
    Exhausted {
        /// Number of draws attempted.
        attempts: u32,
    },
    /// Sampler configuration invariant violated.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for IdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySample => write!(f, "sample must request at least one character"),
            Self::SampleTooLong {
                source_count,
                filler_count,
            } => write!(
                f,
                "sample of {source_count} source and {filler_count} filler chars is too long"
            ),
            Self::PrefixTooLong {
                prefix_len,
                total_len,
            } => write!(
                f,
                "prefix of {prefix_len} chars leaves no random chars in an id of {total_len}"
            ),
            Self::InsufficientSource { requested, found } => write!(
                f,
                "source has {found} qualifying distinct chars, {requested} requested"
            ),
            Self::Exhausted { attempts } => {
                write!(f, "no unused identifier after {attempts} attempts")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid sampler config: {reason}"),
        }
    }
}

impl Error for IdentError {}
