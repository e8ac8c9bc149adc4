//! Reusable observable fixtures.
//!
//! [`Gauge`] is the smallest possible domain entity: one integer reading,
//! an embedded [`ObservableBase`], and a `set` mutation that notifies.

use std::cell::Cell;

use vigil_observe::{DetachPolicy, NotificationPolicy, ObservableBase, ObservableError};

/// An observable integer reading.
pub struct Gauge {
    reading: Cell<i64>,
    observers: ObservableBase<Gauge>,
}

impl Gauge {
    /// A gauge at zero with fail-fast policies.
    pub fn new() -> Self {
        Self::with_policies(DetachPolicy::FailFast, NotificationPolicy::FailFast)
    }

    /// A gauge at zero with the given policies.
    pub fn with_policies(detach: DetachPolicy<Gauge>, notify: NotificationPolicy<Gauge>) -> Self {
        Self {
            reading: Cell::new(0),
            observers: ObservableBase::builder()
                .detach_policy(detach)
                .notification_policy(notify)
                .build(),
        }
    }

    pub fn reading(&self) -> i64 {
        self.reading.get()
    }

    /// Change the reading and notify observers, even if it is unchanged.
    pub fn set(&self, value: i64) -> Result<(), ObservableError> {
        self.reading.set(value);
        self.observers.notify_observers(self)
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

vigil_observe::impl_observable!(Gauge => observers);
