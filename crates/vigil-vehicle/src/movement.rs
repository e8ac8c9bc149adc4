//! Movement sensing and control.

use std::cell::Cell;
use std::cmp::Ordering;

use vigil_observe::{impl_observable, ObservableBase};

use crate::error::VehicleError;
use crate::sensor::{Location, Sensor, SensorDescription};

/// Whether, and how fast, the vehicle is moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Not moving.
    Stationary,
    /// Moving at the given speed.
    InMotion(u32),
}

impl Movement {
    /// Current speed; zero when stationary.
    pub fn speed(self) -> u32 {
        match self {
            Self::Stationary => 0,
            Self::InMotion(speed) => speed,
        }
    }

    /// `true` unless stationary.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::InMotion(_))
    }
}

/// Ordered by speed; at equal speed, stationary sorts first.
impl Ord for Movement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.speed()
            .cmp(&other.speed())
            .then_with(|| self.is_moving().cmp(&other.is_moving()))
    }
}

impl PartialOrd for Movement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A sensor reporting [`Movement`].
pub trait MovementSensor: Sensor {
    /// Current movement.
    fn movement(&self) -> Movement;

    /// Current speed; zero when stationary.
    fn speed(&self) -> u32 {
        self.movement().speed()
    }
}

/// Operations that change a vehicle's movement.
pub trait MovementControl {
    /// Start moving at `initial_speed`.
    ///
    /// # Errors
    ///
    /// [`VehicleError::IllegalStateTransition`] if already moving, or an
    /// observer failure.
    fn start(&self, initial_speed: u32) -> Result<(), VehicleError>;

    /// Change the speed by `delta`. Reaching zero or below stops the vehicle.
    ///
    /// # Errors
    ///
    /// [`VehicleError::IllegalStateTransition`] if stationary, or an
    /// observer failure.
    fn update_speed_by(&self, delta: i32) -> Result<(), VehicleError>;

    /// Stop moving. A no-op when already stationary.
    ///
    /// # Errors
    ///
    /// An observer failure.
    fn stop(&self) -> Result<(), VehicleError>;
}

/// Observable movement sensor with control.
///
/// A successful `start` or `update_speed_by` notifies observers, even when
/// the delta is zero. `stop` notifies only if the vehicle was moving.
pub struct MovementAssembly {
    description: SensorDescription,
    movement: Cell<Movement>,
    observers: ObservableBase<MovementAssembly>,
}

impl MovementAssembly {
    /// A stationary assembly with fail-fast observer policies.
    pub fn new(description: SensorDescription) -> Self {
        Self::with_observers(description, ObservableBase::new())
    }

    /// A stationary assembly using a preconfigured observer registry.
    pub fn with_observers(
        description: SensorDescription,
        observers: ObservableBase<MovementAssembly>,
    ) -> Self {
        Self {
            description,
            movement: Cell::new(Movement::Stationary),
            observers,
        }
    }

    fn change(&self, movement: Movement) -> Result<(), VehicleError> {
        tracing::debug!(from = ?self.movement.get(), to = ?movement, "movement changed");
        self.movement.set(movement);
        self.observers.notify_observers(self)?;
        Ok(())
    }
}

impl Sensor for MovementAssembly {
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

impl MovementSensor for MovementAssembly {
    fn movement(&self) -> Movement {
        self.movement.get()
    }
}

impl MovementControl for MovementAssembly {
    fn start(&self, initial_speed: u32) -> Result<(), VehicleError> {
        let current = self.movement.get();
        if current.is_moving() {
            return Err(VehicleError::IllegalStateTransition {
                reason: format!("already moving at {}", current.speed()),
            });
        }
        self.change(Movement::InMotion(initial_speed))
    }

    fn update_speed_by(&self, delta: i32) -> Result<(), VehicleError> {
        let Movement::InMotion(speed) = self.movement.get() else {
            return Err(VehicleError::IllegalStateTransition {
                reason: "cannot change speed if not moving".to_owned(),
            });
        };
        let target = i64::from(speed) + i64::from(delta);
        let next = if target <= 0 {
            Movement::Stationary
        } else {
            Movement::InMotion(u32::try_from(target).unwrap_or(u32::MAX))
        };
        self.change(next)
    }

    fn stop(&self) -> Result<(), VehicleError> {
        if self.movement.get().is_moving() {
            self.change(Movement::Stationary)?;
        }
        Ok(())
    }
}

impl_observable!(MovementAssembly => observers);
