//! [`IdSampler`]: an RNG-owning front end for sampling, random strings and
//! prefixed identifiers, with an optional registry of issued ids.
//!
//! The RNG is a type parameter. Tests use [`IdSampler::seeded`] for
//! reproducible output; production code uses [`IdSampler::from_entropy`].

use std::collections::HashSet;

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::alphabet::{self, IdAlphabet};
use crate::error::IdentError;
use crate::prefixed::PrefixedIdGenerator;
use crate::sample::SampleSpec;

// ── SamplerConfig ─────────────────────────────────────────────────

/// Issued-id registry settings for an [`IdSampler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Remember every id handed out and redraw on collision. Default: false.
    pub track_issued: bool,
    /// Draws attempted per id before giving up when tracking. Default: 16.
    pub max_attempts: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            track_issued: false,
            max_attempts: 16,
        }
    }
}

impl SamplerConfig {
    /// Enable or disable the issued-id registry.
    pub fn track_issued(mut self, track: bool) -> Self {
        self.track_issued = track;
        self
    }

    /// Set the redraw budget.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidConfig`] if `max_attempts` is zero.
    pub fn validate(&self) -> Result<(), IdentError> {
        if self.max_attempts == 0 {
            return Err(IdentError::InvalidConfig {
                reason: "max_attempts must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

// ── IdSampler ─────────────────────────────────────────────────────

/// Draws identifiers from an owned RNG.
#[derive(Debug)]
pub struct IdSampler<R = ChaCha8Rng> {
    rng: R,
    config: SamplerConfig,
    issued: HashSet<String>,
}

impl IdSampler<ChaCha8Rng> {
    /// A deterministic sampler: equal seeds give equal id sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl IdSampler<ThreadRng> {
    /// A sampler backed by the thread-local, OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl<R: Rng> IdSampler<R> {
    /// Wrap an existing RNG with the default config.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            config: SamplerConfig::default(),
            issued: HashSet::new(),
        }
    }

    /// Replace the config.
    ///
    /// # Errors
    ///
    /// Whatever [`SamplerConfig::validate`] reports.
    pub fn with_config(mut self, config: SamplerConfig) -> Result<Self, IdentError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The active config.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Number of ids recorded by the registry. Always 0 when tracking is off.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    /// `true` if the registry has recorded `id`.
    pub fn was_issued(&self, id: &str) -> bool {
        self.issued.contains(id)
    }

    /// A random string of `len` characters from `alphabet`.
    ///
    /// Not recorded in the registry.
    pub fn random_string(&mut self, alphabet: IdAlphabet, len: usize) -> String {
        alphabet::random_string(&mut self.rng, alphabet, len)
    }

    /// Sample `source` per `spec`, redrawing on collision if tracking.
    ///
    /// # Errors
    ///
    /// Any error of [`SampleSpec::sample`], or [`IdentError::Exhausted`]
    /// if every draw collided with an issued id.
    pub fn sample(&mut self, source: &str, spec: &SampleSpec) -> Result<String, IdentError> {
        self.issue(|rng| spec.sample(source, rng))
    }

    /// Draw the next id from `generator`, redrawing on collision if
    /// tracking.
    ///
    /// # Errors
    ///
    /// [`IdentError::Exhausted`] if every draw collided with an issued id.
    pub fn next_id(&mut self, generator: &PrefixedIdGenerator) -> Result<String, IdentError> {
        self.issue(|rng| Ok(generator.generate(rng)))
    }

    fn issue<F>(&mut self, mut draw: F) -> Result<String, IdentError>
    where
        F: FnMut(&mut R) -> Result<String, IdentError>,
    {
        if !self.config.track_issued {
            return draw(&mut self.rng);
        }
        for attempt in 1..=self.config.max_attempts {
            let candidate = draw(&mut self.rng)?;
            if self.issued.insert(candidate.clone()) {
                return Ok(candidate);
            }
            tracing::debug!(attempt, id = %candidate, "issued id collision, redrawing");
        }
        Err(IdentError::Exhausted {
            attempts: self.config.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_samplers_are_reproducible() {
        let generator = PrefixedIdGenerator::simulation();
        let mut a = IdSampler::seeded(99);
        let mut b = IdSampler::seeded(99);
        for _ in 0..20 {
            assert_eq!(a.next_id(&generator).unwrap(), b.next_id(&generator).unwrap());
        }
    }

    #[test]
    fn untracked_sampler_records_nothing() {
        let mut sampler = IdSampler::seeded(3);
        sampler.random_string(IdAlphabet::AlphaNumeric, 10);
        sampler.next_id(&PrefixedIdGenerator::simulation()).unwrap();
        assert_eq!(sampler.issued_count(), 0);
    }

    #[test]
    fn registry_exhausts_a_tiny_id_space() {
        // One random digit: at most ten distinct ids.
        let generator = PrefixedIdGenerator::new("x", 2).unwrap();
        let mut sampler = IdSampler::seeded(5)
            .with_config(SamplerConfig::default().track_issued(true).max_attempts(1_000))
            .unwrap();

        let mut ids = HashSet::new();
        for _ in 0..10 {
            assert!(ids.insert(sampler.next_id(&generator).unwrap()));
        }
        assert_eq!(sampler.issued_count(), 10);
        assert_eq!(
            sampler.next_id(&generator),
            Err(IdentError::Exhausted { attempts: 1_000 })
        );
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let err = IdSampler::seeded(0)
            .with_config(SamplerConfig::default().max_attempts(0))
            .unwrap_err();
        assert!(matches!(err, IdentError::InvalidConfig { .. }));
    }

    #[test]
    fn sample_errors_pass_through_registry() {
        let strict = SampleSpec::builder()
            .source_count(4)
            .filler_count(0)
            .strict(true)
            .build()
            .unwrap();
        let mut sampler = IdSampler::seeded(1)
            .with_config(SamplerConfig::default().track_issued(true))
            .unwrap();
        assert!(matches!(
            sampler.sample("ab", &strict),
            Err(IdentError::InsufficientSource { .. })
        ));
        assert_eq!(sampler.issued_count(), 0);
    }

    #[test]
    fn entropy_sampler_draws_from_alphabet() {
        let mut sampler = IdSampler::from_entropy();
        let s = sampler.random_string(IdAlphabet::Alpha, 12);
        assert_eq!(s.len(), 12);
        assert!(s.chars().all(|c| c.is_ascii_lowercase()));
    }
}
