//! The [`Observer`] contract and the optional detach-hook capabilities.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::ObserverError;

/// A callback invoked with the observed subject after it changed.
///
/// `S` is the concrete observable type. Observers are shared as
/// [`SharedObserver<S>`]; an observable tells observers apart by the
/// identity of that shared allocation, never by value.
///
/// Any `Fn(&S) -> Result<(), ObserverError>` closure is an observer.
///
/// # Detach hooks
///
/// An observer that wants to learn it was removed returns a
/// [`DetachHook`] from [`detach_hook`](Observer::detach_hook). The
/// observable calls the hook once, right after removal.
pub trait Observer<S: ?Sized> {
    /// Called once per notification round, in attachment order.
    fn subject_changed(&self, subject: &S) -> Result<(), ObserverError>;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The detach-hook capability of this observer, if it has one.
    fn detach_hook(&self) -> Option<DetachHook<'_, S>> {
        None
    }
}

impl<S: ?Sized, F> Observer<S> for F
where
    F: Fn(&S) -> Result<(), ObserverError>,
{
    fn subject_changed(&self, subject: &S) -> Result<(), ObserverError> {
        self(subject)
    }
}

/// An observer shared between its owner and the observables it watches.
pub type SharedObserver<S> = Rc<dyn Observer<S>>;

/// Zero-argument detach hook: "you have been detached".
pub trait OnDetached {
    /// Called after the observer was removed from an observable.
    fn detached(&self) -> Result<(), ObserverError>;
}

/// Detach hook that also receives the observable it was removed from.
pub trait OnDetachedFrom<S: ?Sized> {
    /// Called after the observer was removed from `observable`.
    fn detached_from(&self, observable: &S) -> Result<(), ObserverError>;
}

/// The two forms a detach hook may take.
pub enum DetachHook<'a, S: ?Sized> {
    /// Hook that takes no arguments.
    Detached(&'a dyn OnDetached),
    /// Hook that receives the observable.
    DetachedFrom(&'a dyn OnDetachedFrom<S>),
}

impl<S: ?Sized> DetachHook<'_, S> {
    /// Run the hook against the observable the observer was removed from.
    pub fn invoke(&self, observable: &S) -> Result<(), ObserverError> {
        match self {
            Self::Detached(hook) => hook.detached(),
            Self::DetachedFrom(hook) => hook.detached_from(observable),
        }
    }
}

/// A closure observer with an explicit diagnostic name.
///
/// Closures passed directly report their compiler-generated type name;
/// wrap them in `FnObserver` when failures need to be attributed.
pub struct FnObserver<F> {
    name: String,
    callback: F,
}

impl<F> FnObserver<F> {
    /// Wrap `callback` under `name`.
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<S: ?Sized, F> Observer<S> for FnObserver<F>
where
    F: Fn(&S) -> Result<(), ObserverError>,
{
    fn subject_changed(&self, subject: &S) -> Result<(), ObserverError> {
        (self.callback)(subject)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Thin address of a shared allocation, used as observer identity.
pub(crate) fn address_of<O: ?Sized>(observer: &Rc<O>) -> usize {
    Rc::as_ptr(observer) as *const () as usize
}

/// Identity-keyed entry of an observer collection.
pub(crate) struct ObserverKey<S: ?Sized>(pub(crate) SharedObserver<S>);

impl<S: ?Sized> ObserverKey<S> {
    fn address(&self) -> usize {
        address_of(&self.0)
    }
}

impl<S: ?Sized> PartialEq for ObserverKey<S> {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<S: ?Sized> Eq for ObserverKey<S> {}

impl<S: ?Sized> Hash for ObserverKey<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

/// Lookup key for an [`ObserverKey`] when only the address is at hand.
#[derive(Hash)]
pub(crate) struct Address(pub(crate) usize);

impl<S: ?Sized> indexmap::Equivalent<ObserverKey<S>> for Address {
    fn equivalent(&self, key: &ObserverKey<S>) -> bool {
        self.0 == key.address()
    }
}
