//! Cabin lighting.

use std::cell::Cell;
use std::fmt;

use vigil_observe::{impl_observable, ObservableBase};

use crate::error::VehicleError;
use crate::sensor::{Location, Sensor, SensorDescription};

/// Cabin light setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CabinLightState {
    /// Full brightness.
    On,
    /// Dimmed.
    OnDim,
    /// Off.
    #[default]
    Off,
}

impl fmt::Display for CabinLightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::OnDim => "on-dim",
            Self::Off => "off",
        })
    }
}

/// A sensor reporting the cabin light setting.
pub trait CabinLightSensor: Sensor {
    /// Current setting.
    fn state(&self) -> CabinLightState;
}

/// Operations on the cabin light.
///
/// Each returns an error only if an observer fails.
pub trait CabinControl {
    /// Dim the light.
    fn dim_cabin(&self) -> Result<(), VehicleError>;
    /// Full brightness.
    fn switch_on(&self) -> Result<(), VehicleError>;
    /// Switch off.
    fn switch_off(&self) -> Result<(), VehicleError>;
}

/// Observable cabin light with control.
///
/// Observers are notified only when the setting actually changes.
pub struct CabinLightAssembly {
    description: SensorDescription,
    state: Cell<CabinLightState>,
    observers: ObservableBase<CabinLightAssembly>,
}

impl CabinLightAssembly {
    /// A switched-off light with fail-fast observer policies.
    pub fn new(description: SensorDescription) -> Self {
        Self::with_observers(description, ObservableBase::new())
    }

    /// A switched-off light using a preconfigured observer registry.
    pub fn with_observers(
        description: SensorDescription,
        observers: ObservableBase<CabinLightAssembly>,
    ) -> Self {
        Self {
            description,
            state: Cell::new(CabinLightState::Off),
            observers,
        }
    }

    fn set_state(&self, state: CabinLightState) -> Result<(), VehicleError> {
        if self.state.replace(state) == state {
            return Ok(());
        }
        tracing::debug!(%state, "cabin light changed");
        self.observers.notify_observers(self)?;
        Ok(())
    }
}

impl Sensor for CabinLightAssembly {
    fn location(&self) -> &Location {
        self.description.location()
    }

    fn serial_no(&self) -> &str {
        self.description.serial_no()
    }

    fn description(&self) -> &str {
        self.description.description()
    }
}

impl CabinLightSensor for CabinLightAssembly {
    fn state(&self) -> CabinLightState {
        self.state.get()
    }
}

impl CabinControl for CabinLightAssembly {
    fn dim_cabin(&self) -> Result<(), VehicleError> {
        self.set_state(CabinLightState::OnDim)
    }

    fn switch_on(&self) -> Result<(), VehicleError> {
        self.set_state(CabinLightState::On)
    }

    fn switch_off(&self) -> Result<(), VehicleError> {
        self.set_state(CabinLightState::Off)
    }
}

impl_observable!(CabinLightAssembly => observers);
