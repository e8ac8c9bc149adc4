//! Fixed-prefix identifiers: a constant prefix followed by random digits.

use rand::Rng;

use crate::alphabet::{push_random, IdAlphabet};
use crate::error::IdentError;

/// Prefix of every simulation identifier.
pub const SIMULATION_ID_PREFIX: &str = "ùûÇ:";

/// Total length of a simulation identifier, in characters.
pub const SIMULATION_ID_LENGTH: usize = 12;

/// Generates `prefix` followed by `total_len - prefix_len` random digits.
///
/// Lengths count characters, not bytes, so multi-byte prefixes such as
/// [`SIMULATION_ID_PREFIX`] behave as expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixedIdGenerator {
    prefix: String,
    total_len: usize,
    random_len: usize,
}

impl PrefixedIdGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// [`IdentError::PrefixTooLong`] unless the prefix is strictly shorter
    /// than `total_len`.
    pub fn new(prefix: impl Into<String>, total_len: usize) -> Result<Self, IdentError> {
        let prefix = prefix.into();
        let prefix_len = prefix.chars().count();
        if prefix_len >= total_len {
            return Err(IdentError::PrefixTooLong {
                prefix_len,
                total_len,
            });
        }
        Ok(Self {
            prefix,
            total_len,
            random_len: total_len - prefix_len,
        })
    }

    /// The generator for simulation identifiers
    /// (`"ùûÇ:"` + 8 digits).
    pub fn simulation() -> Self {
        let prefix_len = SIMULATION_ID_PREFIX.chars().count();
        Self {
            prefix: SIMULATION_ID_PREFIX.to_owned(),
            total_len: SIMULATION_ID_LENGTH,
            random_len: SIMULATION_ID_LENGTH - prefix_len,
        }
    }

    /// The fixed prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length of every generated id, in characters.
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Number of random digits after the prefix.
    pub fn random_len(&self) -> usize {
        self.random_len
    }

    /// Draw one identifier.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let mut id = String::with_capacity(self.prefix.len() + self.random_len);
        id.push_str(&self.prefix);
        push_random(&mut id, rng, IdAlphabet::Numeric, self.random_len);
        id
    }
}
