//! Vigil: observables with pluggable failure policies, plus unique
//! identifier sampling.
//!
//! This is the facade crate that re-exports the public API of the Vigil
//! sub-crates. Most users only need `vigil` as a dependency.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vigil::prelude::*;
//!
//! let sim = Simulation::new(SimulationConfig {
//!     auto_activate: true,
//!     seed: Some(3),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let notices = Rc::new(Cell::new(0));
//! let seen = notices.clone();
//! sim.attach(Rc::new(move |_: &Simulation| {
//!     seen.set(seen.get() + 1);
//!     Ok::<(), ObserverError>(())
//! }));
//!
//! sim.switch_on().unwrap();
//! sim.deactivate().unwrap();
//! assert_eq!(sim.cabin_light().state(), CabinLightState::On);
//! assert_eq!(notices.get(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`observe`] | `vigil-observe` | `Observer`, `Observable`, `ObservableBase`, failure policies |
//! | [`ident`] | `vigil-ident` | Sample specs, prefixed ids, seeded samplers |
//! | [`vehicle`] | `vigil-vehicle` | Sensor assemblies and simulations |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Observer contracts and failure policies (`vigil-observe`).
///
/// Embed an [`observe::ObservableBase`] in a domain type and forward
/// [`observe::Observable`] to it, by hand or with
/// [`impl_observable!`](observe::impl_observable).
pub use vigil_observe as observe;

/// Identifier sampling (`vigil-ident`).
///
/// [`ident::SampleSpec`] derives ids from source text,
/// [`ident::PrefixedIdGenerator`] emits prefixed random ids, and
/// [`ident::IdSampler`] owns the RNG and the issued-id registry.
pub use vigil_ident as ident;

/// Vehicle sensor assemblies and simulations (`vigil-vehicle`).
pub use vigil_vehicle as vehicle;

/// Common imports for typical Vigil usage.
///
/// ```rust
/// use vigil::prelude::*;
/// ```
pub mod prelude {
    // Observer framework
    pub use vigil_observe::{
        DetachPolicy, DetachTrigger, FailureCollector, NotificationPolicy, Observable,
        ObservableBase, Observer, OnDetached, OnDetachedFrom, PostDetach, SharedObserver,
    };

    // Errors
    pub use vigil_ident::IdentError;
    pub use vigil_observe::{ObservableError, ObserverError};
    pub use vigil_vehicle::VehicleError;

    // Identifiers
    pub use vigil_ident::{IdAlphabet, IdSampler, PrefixedIdGenerator, SampleSpec};

    // Vehicle
    pub use vigil_vehicle::{
        CabinControl, CabinLightSensor, CabinLightState, Location, MovementControl,
        MovementSensor, Sensor, Simulation, SimulationConfig,
    };
}
