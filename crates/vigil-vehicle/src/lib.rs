//! Vehicle sensor assemblies built on Vigil observables.
//!
//! [`MovementAssembly`] and [`CabinLightAssembly`] are observable sensors
//! with control operations; a [`Simulation`] combines one of each and
//! relays their changes to its own observers while active.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vigil_observe::{Observable, ObserverError};
//! use vigil_vehicle::{MovementControl, Simulation, SimulationConfig};
//!
//! let sim = Simulation::new(SimulationConfig {
//!     auto_activate: true,
//!     seed: Some(1),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let changes = Rc::new(Cell::new(0));
//! let seen = changes.clone();
//! sim.attach(Rc::new(move |_: &Simulation| {
//!     seen.set(seen.get() + 1);
//!     Ok::<(), ObserverError>(())
//! }));
//!
//! sim.start(30).unwrap();
//! sim.stop().unwrap();
//! assert_eq!(changes.get(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cabin_light;
pub mod error;
pub mod movement;
pub mod sensor;
pub mod simulation;

pub use cabin_light::{CabinControl, CabinLightAssembly, CabinLightSensor, CabinLightState};
pub use error::VehicleError;
pub use movement::{Movement, MovementAssembly, MovementControl, MovementSensor};
pub use sensor::{Location, Sensor, SensorDescription};
pub use simulation::{Simulation, SimulationConfig};
