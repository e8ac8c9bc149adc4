//! The [`Observable`] contract.

use std::rc::Rc;

use crate::error::ObservableError;
use crate::observer::SharedObserver;

/// An entity that maintains a set of observers of itself.
///
/// Implementors usually own an [`ObservableBase<Self>`](crate::ObservableBase)
/// and forward each method to it, passing `self` where the base asks for
/// the subject.
///
/// Identity queries take any `Rc<O>`, so an observer can be looked up
/// through its concrete handle as well as through the
/// [`SharedObserver`] it was attached with.
pub trait Observable {
    /// Attach `observer`. Returns `true` if it was not already attached.
    fn attach(&self, observer: SharedObserver<Self>) -> bool;

    /// Detach `observer`. Returns `Ok(true)` if it was attached.
    ///
    /// # Errors
    ///
    /// A failing detach hook, when the detach policy rethrows it.
    fn detach<O: ?Sized>(&self, observer: &Rc<O>) -> Result<bool, ObservableError>;

    /// `true` if `observer` is attached.
    fn is_observed_by<O: ?Sized>(&self, observer: &Rc<O>) -> bool;

    /// Detach every observer in attachment order.
    ///
    /// # Errors
    ///
    /// The first failing detach hook, when the detach policy rethrows it.
    fn detach_all(&self) -> Result<(), ObservableError>;

    /// `true` if at least one observer is attached.
    fn is_observed(&self) -> bool;

    /// Number of attached observers.
    fn count_observers(&self) -> usize;
}

/// Implement [`Observable`] for a type by forwarding every method to one of
/// its [`ObservableBase`](crate::ObservableBase) fields.
///
/// ```
/// use vigil_observe::{impl_observable, ObservableBase};
///
/// struct Door {
///     observers: ObservableBase<Door>,
/// }
///
/// impl_observable!(Door => observers);
/// ```
#[macro_export]
macro_rules! impl_observable {
    ($ty:ty => $field:ident) => {
        impl $crate::Observable for $ty {
            fn attach(&self, observer: $crate::SharedObserver<Self>) -> bool {
                self.$field.attach(observer)
            }

            fn detach<O: ?Sized>(
                &self,
                observer: &::std::rc::Rc<O>,
            ) -> ::std::result::Result<bool, $crate::ObservableError> {
                self.$field.detach(self, observer)
            }

            fn is_observed_by<O: ?Sized>(&self, observer: &::std::rc::Rc<O>) -> bool {
                self.$field.is_observed_by(observer)
            }

            fn detach_all(&self) -> ::std::result::Result<(), $crate::ObservableError> {
                self.$field.detach_all(self)
            }

            fn is_observed(&self) -> bool {
                self.$field.is_observed()
            }

            fn count_observers(&self) -> usize {
                self.$field.count_observers()
            }
        }
    };
}
