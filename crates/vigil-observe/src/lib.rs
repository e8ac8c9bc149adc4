//! Observable/observer contracts with pluggable failure policies.
//!
//! A domain entity embeds an [`ObservableBase`], implements [`Observable`]
//! by forwarding to it, and calls
//! [`notify_observers`](ObservableBase::notify_observers) after every state
//! change. What happens when an observer fails is decided by two policies
//! chosen at construction:
//!
//! - [`DetachPolicy`]: outcome of an observer's optional detach hook.
//! - [`NotificationPolicy`]: failure of an observer's change callback.
//!
//! Both default to fail-fast.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vigil_observe::{
//!     Observable, ObservableBase, ObservableError, ObserverError, SharedObserver,
//! };
//!
//! struct Lamp {
//!     on: Cell<bool>,
//!     observers: ObservableBase<Lamp>,
//! }
//!
//! impl Lamp {
//!     fn toggle(&self) -> Result<(), ObservableError> {
//!         self.on.set(!self.on.get());
//!         self.observers.notify_observers(self)
//!     }
//! }
//!
//! impl Observable for Lamp {
//!     fn attach(&self, observer: SharedObserver<Self>) -> bool {
//!         self.observers.attach(observer)
//!     }
//!     fn detach<O: ?Sized>(&self, observer: &Rc<O>) -> Result<bool, ObservableError> {
//!         self.observers.detach(self, observer)
//!     }
//!     fn is_observed_by<O: ?Sized>(&self, observer: &Rc<O>) -> bool {
//!         self.observers.is_observed_by(observer)
//!     }
//!     fn detach_all(&self) -> Result<(), ObservableError> {
//!         self.observers.detach_all(self)
//!     }
//!     fn is_observed(&self) -> bool {
//!         self.observers.is_observed()
//!     }
//!     fn count_observers(&self) -> usize {
//!         self.observers.count_observers()
//!     }
//! }
//!
//! let lamp = Lamp { on: Cell::new(false), observers: ObservableBase::new() };
//! let flips = Rc::new(Cell::new(0));
//! let counter = flips.clone();
//! lamp.attach(Rc::new(move |_: &Lamp| {
//!     counter.set(counter.get() + 1);
//!     Ok::<(), ObserverError>(())
//! }));
//! lamp.toggle().unwrap();
//! lamp.toggle().unwrap();
//! assert_eq!(flips.get(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod base;
pub mod builtin;
pub mod error;
pub mod observable;
pub mod observer;
pub mod policy;

pub use base::{ObservableBase, ObservableBaseBuilder};
pub use builtin::{AfterLogging, CollectedFailure, FailureCollector};
pub use error::{ObservableError, ObserverError};
pub use observable::Observable;
pub use observer::{DetachHook, FnObserver, Observer, OnDetached, OnDetachedFrom, SharedObserver};
pub use policy::{
    DetachHandler, DetachPolicy, DetachTrigger, NotificationHandler, NotificationPolicy,
    PostDetach,
};
