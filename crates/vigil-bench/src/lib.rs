//! Benchmark profiles for the Vigil observer framework.
//!
//! - [`Counter`]: a minimal observable whose every bump notifies.
//! - [`counter_profile`]: a counter with `n` no-op observers attached.
//! - [`serial_spec`]: the sample spec used for sensor serial numbers.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use vigil_ident::SampleSpec;
use vigil_observe::{
    impl_observable, NotificationPolicy, Observable, ObservableBase, ObservableError,
    ObserverError,
};

/// An observable counter.
pub struct Counter {
    value: Cell<u64>,
    observers: ObservableBase<Counter>,
}

impl Counter {
    /// A zeroed counter using `policy` for notification failures.
    pub fn new(policy: NotificationPolicy<Counter>) -> Self {
        Self {
            value: Cell::new(0),
            observers: ObservableBase::builder().notification_policy(policy).build(),
        }
    }

    /// Current value.
    pub fn value(&self) -> u64 {
        self.value.get()
    }

    /// Increment and run one notification round.
    pub fn bump(&self) -> Result<(), ObservableError> {
        self.value.set(self.value.get() + 1);
        self.observers.notify_observers(self)
    }
}

impl_observable!(Counter => observers);

/// A fail-fast counter with `observers` attached closures that read the
/// value and succeed.
pub fn counter_profile(observers: usize) -> Counter {
    let counter = Counter::new(NotificationPolicy::FailFast);
    for _ in 0..observers {
        counter.attach(Rc::new(|c: &Counter| {
            std::hint::black_box(c.value());
            Ok::<(), ObserverError>(())
        }));
    }
    counter
}

/// A counter whose every observer fails, with `policy` deciding what
/// happens to each failure.
pub fn failing_counter_profile(observers: usize, policy: NotificationPolicy<Counter>) -> Counter {
    let counter = Counter::new(policy);
    for _ in 0..observers {
        counter.attach(Rc::new(|_: &Counter| {
            Err::<(), ObserverError>(ObserverError::failed("bench"))
        }));
    }
    counter
}

/// Three source characters plus three digits.
pub fn serial_spec() -> SampleSpec {
    SampleSpec::builder()
        .source_count(3)
        .filler_count(3)
        .build()
        .expect("non-empty spec")
}
