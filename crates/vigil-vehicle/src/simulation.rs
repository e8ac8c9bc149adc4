//! A simulated vehicle: one movement assembly and one cabin light, relayed
//! through a single observable.
//!
//! While active, a [`Simulation`] observes both assemblies through an
//! internal relay and notifies its own observers whenever either changes.
//! Deactivating detaches the relay; the relay's detach hook records the
//! deactivation and notifies once more.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use vigil_ident::{IdAlphabet, IdSampler, PrefixedIdGenerator, SampleSpec};
use vigil_observe::{
    impl_observable, DetachHook, Observable, ObservableBase, Observer, ObserverError, OnDetached,
};

use crate::cabin_light::{CabinControl, CabinLightAssembly};
use crate::error::VehicleError;
use crate::movement::{MovementAssembly, MovementControl};
use crate::sensor::{Location, SensorDescription};

// ── SimulationConfig ──────────────────────────────────────────────

/// Inputs for [`Simulation::new`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfig {
    /// Fixed simulation id. `None` draws a fresh prefixed id.
    pub simulation_id: Option<String>,
    /// Activate immediately after construction. Default: false.
    pub auto_activate: bool,
    /// Seed for generated ids and sensor identities. `None` seeds from
    /// the thread-local generator.
    pub seed: Option<u64>,
}

// ── Relay ─────────────────────────────────────────────────────────

struct Relay {
    simulation: Weak<Simulation>,
}

impl Relay {
    fn forward(&self) -> Result<(), ObserverError> {
        let Some(simulation) = self.simulation.upgrade() else {
            return Ok(());
        };
        if !simulation.activated.get() {
            return Ok(());
        }
        simulation
            .observers
            .notify_observers(&simulation)
            .map_err(|e| e.into_failure().translate("simulation relay failed"))
    }
}

impl Observer<MovementAssembly> for Relay {
    fn subject_changed(&self, _: &MovementAssembly) -> Result<(), ObserverError> {
        self.forward()
    }

    fn name(&self) -> &str {
        "simulation-relay"
    }

    fn detach_hook(&self) -> Option<DetachHook<'_, MovementAssembly>> {
        Some(DetachHook::Detached(self))
    }
}

impl Observer<CabinLightAssembly> for Relay {
    fn subject_changed(&self, _: &CabinLightAssembly) -> Result<(), ObserverError> {
        self.forward()
    }

    fn name(&self) -> &str {
        "simulation-relay"
    }

    fn detach_hook(&self) -> Option<DetachHook<'_, CabinLightAssembly>> {
        Some(DetachHook::Detached(self))
    }
}

impl OnDetached for Relay {
    /// Runs once per assembly; only the first call while active records
    /// the deactivation.
    fn detached(&self) -> Result<(), ObserverError> {
        let Some(simulation) = self.simulation.upgrade() else {
            return Ok(());
        };
        if !simulation.activated.replace(false) {
            return Ok(());
        }
        simulation.deactivation_date.set(Some(Utc::now()));
        tracing::info!(simulation = %simulation.id, "simulation deactivated");
        simulation
            .observers
            .notify_observers(&simulation)
            .map_err(|e| e.into_failure().translate("deactivation notice failed"))
    }
}

// ── Simulation ────────────────────────────────────────────────────

/// A simulated vehicle.
pub struct Simulation {
    id: String,
    movement: Rc<MovementAssembly>,
    cabin_light: Rc<CabinLightAssembly>,
    relay: Rc<Relay>,
    activated: Cell<bool>,
    activation_date: Cell<Option<DateTime<Utc>>>,
    deactivation_date: Cell<Option<DateTime<Utc>>>,
    observers: ObservableBase<Simulation>,
}

impl Simulation {
    /// Build a simulation with generated sensor identities.
    ///
    /// # Errors
    ///
    /// [`VehicleError::Ident`] or [`VehicleError::InvalidIdentifierFormat`]
    /// if identity generation fails.
    pub fn new(config: SimulationConfig) -> Result<Rc<Self>, VehicleError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut sampler = IdSampler::seeded(seed);
        let id = match config.simulation_id {
            Some(id) => id,
            None => sampler.next_id(&PrefixedIdGenerator::simulation())?,
        };

        let movement = MovementAssembly::new(simulated_description(
            &mut sampler,
            &id,
            "MovementSensor",
            "movement-sensor",
        )?);
        let cabin_light = CabinLightAssembly::new(simulated_description(
            &mut sampler,
            &id,
            "CabinLightSensor",
            "cabin-light-sensor",
        )?);

        let simulation = Self::from_parts(id, Rc::new(movement), Rc::new(cabin_light));
        if config.auto_activate {
            simulation.activate();
        }
        Ok(simulation)
    }

    /// Build an inactive simulation over existing assemblies.
    pub fn from_parts(
        id: impl Into<String>,
        movement: Rc<MovementAssembly>,
        cabin_light: Rc<CabinLightAssembly>,
    ) -> Rc<Self> {
        let id = id.into();
        tracing::debug!(simulation = %id, "simulation created");
        Rc::new_cyclic(|weak| Self {
            id,
            movement,
            cabin_light,
            relay: Rc::new(Relay {
                simulation: weak.clone(),
            }),
            activated: Cell::new(false),
            activation_date: Cell::new(None),
            deactivation_date: Cell::new(None),
            observers: ObservableBase::new(),
        })
    }

    /// Start relaying assembly changes. Returns `false` if already active.
    pub fn activate(&self) -> bool {
        if self.activated.get() {
            return false;
        }
        self.movement.attach(self.relay.clone());
        self.cabin_light.attach(self.relay.clone());
        self.activated.set(true);
        self.activation_date.set(Some(Utc::now()));
        self.deactivation_date.set(None);
        tracing::info!(simulation = %self.id, "simulation activated");
        true
    }

    /// Stop relaying. Returns `Ok(false)` if already inactive.
    ///
    /// The relay is detached from both assemblies even if the first
    /// detachment fails.
    ///
    /// # Errors
    ///
    /// The first detach failure, which includes a failing observer of the
    /// deactivation notice.
    pub fn deactivate(&self) -> Result<bool, VehicleError> {
        if !self.activated.get() {
            return Ok(false);
        }
        let from_movement = self.movement.detach(&self.relay);
        let from_cabin_light = self.cabin_light.detach(&self.relay);
        from_movement?;
        from_cabin_light?;
        Ok(true)
    }

    /// Simulation id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `true` while relaying.
    pub fn is_activated(&self) -> bool {
        self.activated.get()
    }

    /// When the simulation was last activated.
    pub fn activation_date(&self) -> Option<DateTime<Utc>> {
        self.activation_date.get()
    }

    /// When the simulation was last deactivated, if not active since.
    pub fn deactivation_date(&self) -> Option<DateTime<Utc>> {
        self.deactivation_date.get()
    }

    /// The movement assembly.
    pub fn movement(&self) -> &Rc<MovementAssembly> {
        &self.movement
    }

    /// The cabin light assembly.
    pub fn cabin_light(&self) -> &Rc<CabinLightAssembly> {
        &self.cabin_light
    }
}

impl_observable!(Simulation => observers);

impl MovementControl for Simulation {
    fn start(&self, initial_speed: u32) -> Result<(), VehicleError> {
        self.movement.start(initial_speed)
    }

    fn update_speed_by(&self, delta: i32) -> Result<(), VehicleError> {
        self.movement.update_speed_by(delta)
    }

    fn stop(&self) -> Result<(), VehicleError> {
        self.movement.stop()
    }
}

impl CabinControl for Simulation {
    fn dim_cabin(&self) -> Result<(), VehicleError> {
        self.cabin_light.dim_cabin()
    }

    fn switch_on(&self) -> Result<(), VehicleError> {
        self.cabin_light.switch_on()
    }

    fn switch_off(&self) -> Result<(), VehicleError> {
        self.cabin_light.switch_off()
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulation(id={}, activated={}",
            self.id,
            if self.is_activated() { "Y" } else { "N" }
        )?;
        if let Some(at) = self.activation_date() {
            write!(f, ", activated_at={}", at.to_rfc3339())?;
        }
        if let Some(at) = self.deactivation_date() {
            write!(f, ", deactivated_at={}", at.to_rfc3339())?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("id", &self.id)
            .field("activated", &self.activated.get())
            .field("activation_date", &self.activation_date.get())
            .field("deactivation_date", &self.deactivation_date.get())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

/// Sensor identity derived from the simulation id and the sensor kind.
fn simulated_description<R: rand::Rng>(
    sampler: &mut IdSampler<R>,
    simulation_id: &str,
    kind: &str,
    slug: &str,
) -> Result<SensorDescription, VehicleError> {
    let location = Location::new(format!(
        "{slug}.loc-{}",
        sampler.random_string(IdAlphabet::Numeric, 5)
    ))?;
    let serial = sampler.sample(kind, &SampleSpec::builder().build()?)?;
    let description = format!(
        "{simulation_id}:{kind}:{}",
        sampler.random_string(IdAlphabet::AlphaNumeric, 15)
    );
    Ok(SensorDescription::new(
        location,
        format!("{simulation_id}:{serial}"),
        description,
    ))
}
