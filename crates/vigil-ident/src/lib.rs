//! Identifier sampling for Vigil simulations.
//!
//! Identifiers here are meant to be traceable to what they name while
//! staying unlikely to repeat:
//!
//! - [`SampleSpec`] keeps the first distinct characters of a source string
//!   and pads them with random filler.
//! - [`PrefixedIdGenerator`] emits a fixed prefix plus random digits.
//! - [`IdSampler`] owns the RNG (seeded for tests, thread-local otherwise)
//!   and can remember issued ids so it never hands out the same one twice.
//!
//! ```
//! use vigil_ident::{IdSampler, SampleSpec};
//!
//! let spec = SampleSpec::builder().source_count(3).filler_count(3).build().unwrap();
//! let mut sampler = IdSampler::seeded(7);
//! let serial = sampler.sample("MovementSensor", &spec).unwrap();
//! assert!(serial.starts_with("Mov"));
//! assert_eq!(serial.len(), 6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alphabet;
pub mod error;
pub mod prefixed;
pub mod sample;
pub mod sampler;

pub use alphabet::{random_string, AcceptChars, IdAlphabet};
pub use error::IdentError;
pub use prefixed::{PrefixedIdGenerator, SIMULATION_ID_LENGTH, SIMULATION_ID_PREFIX};
pub use sample::{SampleSpec, SampleSpecBuilder};
pub use sampler::{IdSampler, SamplerConfig};
