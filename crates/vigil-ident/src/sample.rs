//! Unique-content sampling: source-derived characters plus random filler.
//!
//! A sample keeps up to `source_count` distinct characters of a source
//! string (left to right, case-sensitive, filtered by an [`AcceptChars`]
//! rule) and pads with random characters from an [`IdAlphabet`] so the
//! result is traceable to its source yet unlikely to repeat.
//!
//! Constructed via the builder pattern: [`SampleSpec::builder`].

use rand::Rng;
use smallvec::SmallVec;

use crate::alphabet::{push_random, AcceptChars, IdAlphabet};
use crate::error::IdentError;

/// How to sample an identifier from a source string.
#[derive(Clone, Copy, Debug)]
pub struct SampleSpec {
    source_count: usize,
    filler_count: usize,
    alphabet: IdAlphabet,
    accept: AcceptChars,
    strict: bool,
}

/// Builder for [`SampleSpec`].
pub struct SampleSpecBuilder {
    source_count: usize,
    filler_count: usize,
    alphabet: IdAlphabet,
    accept: AcceptChars,
    strict: bool,
}

impl SampleSpec {
    /// Create a builder. Defaults: 3 source chars, 3 numeric filler chars,
    /// accept any source char, lenient.
    pub fn builder() -> SampleSpecBuilder {
        SampleSpecBuilder {
            source_count: 3,
            filler_count: 3,
            alphabet: IdAlphabet::Numeric,
            accept: AcceptChars::Any,
            strict: false,
        }
    }

    /// Distinct source characters requested.
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Filler characters requested.
    pub fn filler_count(&self) -> usize {
        self.filler_count
    }

    /// `source_count + filler_count`, checked not to overflow by
    /// [`SampleSpecBuilder::build`].
    pub fn total_len(&self) -> usize {
        self.source_count + self.filler_count
    }

    /// Filler alphabet.
    pub fn alphabet(&self) -> IdAlphabet {
        self.alphabet
    }

    /// Source acceptance rule.
    pub fn accept(&self) -> AcceptChars {
        self.accept
    }

    /// Whether a shortfall is an error.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Draw one sample of `source`.
    ///
    /// Filler makes up for missing source characters, so with a non-zero
    /// filler count the result is always [`total_len`](Self::total_len)
    /// characters long. With no filler, a source lacking enough qualifying
    /// distinct characters yields a shorter string, or
    /// [`IdentError::InsufficientSource`] in strict mode.
    pub fn sample<R: Rng>(&self, source: &str, rng: &mut R) -> Result<String, IdentError> {
        let mut kept: SmallVec<[char; 16]> = SmallVec::new();
        for c in source.chars() {
            if kept.len() == self.source_count {
                break;
            }
            if self.accept.accepts(c) && !kept.contains(&c) {
                kept.push(c);
            }
        }

        let total = self.total_len();
        let mut out: String = kept.iter().collect();
        let remaining = total - kept.len();
        if remaining > 0 && self.filler_count != 0 {
            push_random(&mut out, rng, self.alphabet, remaining);
        }

        if self.strict && out.chars().count() < total {
            return Err(IdentError::InsufficientSource {
                requested: self.source_count,
                found: kept.len(),
            });
        }
        Ok(out)
    }
}

impl SampleSpecBuilder {
    /// Distinct source characters to keep.
    pub fn source_count(mut self, n: usize) -> Self {
        self.source_count = n;
        self
    }

    /// Filler characters to add (default: 3).
    pub fn filler_count(mut self, n: usize) -> Self {
        self.filler_count = n;
        self
    }

    /// Filler alphabet (default: numeric).
    pub fn alphabet(mut self, alphabet: IdAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Source acceptance rule (default: any).
    pub fn accept(mut self, accept: AcceptChars) -> Self {
        self.accept = accept;
        self
    }

    /// Reject shortfalls instead of returning a shorter string
    /// (default: false).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the spec.
    ///
    /// # Errors
    ///
    /// [`IdentError::EmptySample`] if both counts are zero,
    /// [`IdentError::SampleTooLong`] if their sum overflows.
    pub fn build(self) -> Result<SampleSpec, IdentError> {
        if self.source_count == 0 && self.filler_count == 0 {
            return Err(IdentError::EmptySample);
        }
        if self.source_count.checked_add(self.filler_count).is_none() {
            return Err(IdentError::SampleTooLong {
                source_count: self.source_count,
                filler_count: self.filler_count,
            });
        }
        Ok(SampleSpec {
            source_count: self.source_count,
            filler_count: self.filler_count,
            alphabet: self.alphabet,
            accept: self.accept,
            strict: self.strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn spec(source: usize, filler: usize) -> SampleSpecBuilder {
        SampleSpec::builder().source_count(source).filler_count(filler)
    }

    #[test]
    fn keeps_first_distinct_source_chars_then_filler() {
        let s = spec(3, 3).build().unwrap().sample("ABCDEF", &mut rng()).unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(&s[..3], "ABC");
        assert!(s[3..].chars().all(|c| c.is_ascii_digit()), "{s}");
    }

    #[test]
    fn repeated_source_chars_are_skipped() {
        let s = spec(4, 0).build().unwrap().sample("AABBACD", &mut rng()).unwrap();
        assert_eq!(s, "ABCD");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let s = spec(3, 0).build().unwrap().sample("aAbB", &mut rng()).unwrap();
        assert_eq!(s, "aAb");
    }

    #[test]
    fn filler_covers_short_source() {
        let s = spec(5, 2).build().unwrap().sample("AB", &mut rng()).unwrap();
        assert_eq!(s.chars().count(), 7);
        assert!(s.starts_with("AB"));
        assert!(s[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn no_filler_shortfall_is_lenient_by_default() {
        let s = spec(5, 0).build().unwrap().sample("AB", &mut rng()).unwrap();
        assert_eq!(s, "AB");
    }

    #[test]
    fn strict_shortfall_is_an_error() {
        let strict = spec(5, 0).strict(true).build().unwrap();
        assert_eq!(
            strict.sample("AB", &mut rng()),
            Err(IdentError::InsufficientSource {
                requested: 5,
                found: 2
            })
        );
    }

    #[test]
    fn predicate_filters_source() {
        let s = spec(4, 0)
            .accept(AcceptChars::LetterOrDigit)
            .build()
            .unwrap()
            .sample("T-E L:M", &mut rng())
            .unwrap();
        assert_eq!(s, "TELM");

        let uri = spec(4, 0)
            .accept(AcceptChars::UriLike)
            .build()
            .unwrap()
            .sample("TE LM:", &mut rng())
            .unwrap();
        assert_eq!(uri, "TELM");
    }

    #[test]
    fn multibyte_source_chars_are_kept_whole() {
        let s = spec(3, 1).build().unwrap().sample("ùûÇ:", &mut rng()).unwrap();
        assert!(s.starts_with("ùûÇ"));
        assert_eq!(s.chars().count(), 4);
    }

    #[test]
    fn empty_spec_is_rejected() {
        assert_eq!(spec(0, 0).build().unwrap_err(), IdentError::EmptySample);
    }

    #[test]
    fn overflowing_length_is_rejected() {
        assert_eq!(
            spec(usize::MAX, 1).build().unwrap_err(),
            IdentError::SampleTooLong {
                source_count: usize::MAX,
                filler_count: 1
            }
        );
        let widest = spec(usize::MAX - 1, 1).build().unwrap();
        assert_eq!(widest.total_len(), usize::MAX);
    }

    #[test]
    fn filler_only_spec_uses_alphabet() {
        let s = spec(0, 8)
            .alphabet(IdAlphabet::Alpha)
            .build()
            .unwrap()
            .sample("IGNORED", &mut rng())
            .unwrap();
        assert_eq!(s.len(), 8);
        assert!(s.chars().all(|c| c.is_ascii_lowercase()));
    }
}
