//! [`ObservableBase`]: the reusable observer registry a domain entity embeds.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::error::ObservableError;
use crate::observer::{address_of, Address, Observer, ObserverKey, SharedObserver};
use crate::policy::{DetachPolicy, DetachTrigger, NotificationPolicy, PostDetach};

/// An order-preserving, duplicate-free observer registry with failure
/// policies.
///
/// A domain entity `S` owns an `ObservableBase<S>` privately, forwards the
/// [`Observable`](crate::Observable) methods to it, and calls
/// [`notify_observers`](Self::notify_observers) after each state change.
/// Operations that invoke observer code take the owning entity as
/// `subject` so callbacks see it.
///
/// # Ordering
///
/// Observers are notified and bulk-detached in attachment order.
///
/// # Reentrancy
///
/// No internal borrow is held while observer code runs. An observer may
/// attach or detach observers on its subject from inside a callback.
/// Notification rounds and [`detach_all`](Self::detach_all) work on a
/// snapshot taken when they start: observers attached meanwhile wait for
/// the next call, and observers detached meanwhile are skipped.
///
/// # Threading
///
/// Not thread-safe: observers are `Rc`-shared and the registry sits in a
/// `RefCell`, so the type is neither `Send` nor `Sync`.
pub struct ObservableBase<S: ?Sized> {
    observers: RefCell<IndexSet<ObserverKey<S>>>,
    detach_policy: DetachPolicy<S>,
    notification_policy: NotificationPolicy<S>,
}

/// Builder for [`ObservableBase`].
///
/// Both policies default to fail-fast.
pub struct ObservableBaseBuilder<S: ?Sized> {
    detach_policy: DetachPolicy<S>,
    notification_policy: NotificationPolicy<S>,
}

impl<S: ?Sized> ObservableBaseBuilder<S> {
    /// Set the policy applied to detach-hook outcomes.
    pub fn detach_policy(mut self, policy: DetachPolicy<S>) -> Self {
        self.detach_policy = policy;
        self
    }

    /// Set the policy applied to failed change notifications.
    pub fn notification_policy(mut self, policy: NotificationPolicy<S>) -> Self {
        self.notification_policy = policy;
        self
    }

    /// Build the registry with no observers attached.
    pub fn build(self) -> ObservableBase<S> {
        ObservableBase {
            observers: RefCell::new(IndexSet::new()),
            detach_policy: self.detach_policy,
            notification_policy: self.notification_policy,
        }
    }
}

impl<S: ?Sized> ObservableBase<S> {
    /// A registry with fail-fast policies.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a registry.
    pub fn builder() -> ObservableBaseBuilder<S> {
        ObservableBaseBuilder {
            detach_policy: DetachPolicy::FailFast,
            notification_policy: NotificationPolicy::FailFast,
        }
    }

    /// The configured detach policy.
    pub fn detach_policy(&self) -> &DetachPolicy<S> {
        &self.detach_policy
    }

    /// The configured notification policy.
    pub fn notification_policy(&self) -> &NotificationPolicy<S> {
        &self.notification_policy
    }

    /// Add `observer` unless it is already attached.
    ///
    /// Returns `true` if it was added. Never notifies.
    pub fn attach(&self, observer: SharedObserver<S>) -> bool {
        let name = observer.name().to_owned();
        let added = self.observers.borrow_mut().insert(ObserverKey(observer));
        tracing::trace!(observer = %name, added, "attach");
        added
    }

    /// Remove `observer` and run its detach pipeline.
    ///
    /// Returns `Ok(false)` without touching any policy if the observer was
    /// not attached. Under a fail-fast policy a failing detach hook is
    /// returned as [`ObservableError::DetachHook`]; the observer is removed
    /// either way.
    pub fn detach<O: ?Sized>(&self, subject: &S, observer: &Rc<O>) -> Result<bool, ObservableError> {
        let removed = self
            .observers
            .borrow_mut()
            .shift_remove_full(&Address(address_of(observer)));
        match removed {
            Some((_, ObserverKey(observer))) => {
                self.after_detach(subject, observer, DetachTrigger::Detach)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every observer, one at a time, in attachment order.
    ///
    /// Each removal runs the detach pipeline with
    /// [`DetachTrigger::DetachAll`]. Under a fail-fast policy the first
    /// hook failure stops the loop and is returned, leaving the observers
    /// after it attached. Under a handled policy every observer attached
    /// when the call started is removed; observers attached by a hook stay.
    pub fn detach_all(&self, subject: &S) -> Result<(), ObservableError> {
        for observer in self.snapshot() {
            let removed = self
                .observers
                .borrow_mut()
                .shift_take(&Address(address_of(&observer)));
            // Already detached by an earlier hook.
            let Some(ObserverKey(observer)) = removed else {
                continue;
            };
            self.after_detach(subject, observer, DetachTrigger::DetachAll)?;
        }
        Ok(())
    }

    /// `true` if `observer` is attached.
    pub fn is_observed_by<O: ?Sized>(&self, observer: &Rc<O>) -> bool {
        self.observers
            .borrow()
            .contains(&Address(address_of(observer)))
    }

    /// `true` if at least one observer is attached.
    pub fn is_observed(&self) -> bool {
        !self.observers.borrow().is_empty()
    }

    /// Number of attached observers.
    pub fn count_observers(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Notify every attached observer that `subject` changed, applying the
    /// configured notification policy.
    pub fn notify_observers(&self, subject: &S) -> Result<(), ObservableError> {
        self.notify_observers_with(subject, &self.notification_policy)
    }

    /// Notify every attached observer, applying `policy` instead of the
    /// configured one for this round only.
    ///
    /// A raised failure aborts the round: observers after the failing one
    /// are not called. A suppressed failure lets the round continue.
    pub fn notify_observers_with(
        &self,
        subject: &S,
        policy: &NotificationPolicy<S>,
    ) -> Result<(), ObservableError> {
        let round = self.snapshot();
        tracing::trace!(observers = round.len(), "notify");

        for (index, observer) in round.iter().enumerate() {
            if !self.is_observed_by(observer) {
                continue;
            }
            let Err(failure) = observer.subject_changed(subject) else {
                continue;
            };
            if let Some(raised) = policy.resolve(observer.as_ref(), index, failure) {
                return Err(ObservableError::Notification {
                    index,
                    observer: observer.name().to_owned(),
                    failure: raised,
                });
            }
        }
        Ok(())
    }

    /// Strong handles to the attached observers, in order. Holding them
    /// keeps every address in the snapshot unique for the whole pass.
    fn snapshot(&self) -> Vec<SharedObserver<S>> {
        self.observers
            .borrow()
            .iter()
            .map(|key| Rc::clone(&key.0))
            .collect()
    }

    /// Run the detach hook of a removed observer and apply the detach
    /// policy to its outcome.
    fn after_detach(
        &self,
        subject: &S,
        observer: SharedObserver<S>,
        trigger: DetachTrigger,
    ) -> Result<(), ObservableError> {
        let outcome = match observer.detach_hook() {
            Some(hook) => PostDetach::from(hook.invoke(subject)),
            None => PostDetach::Ok,
        };
        tracing::trace!(
            observer = observer.name(),
            %trigger,
            panic = outcome.is_panic(),
            "detached"
        );

        match &self.detach_policy {
            DetachPolicy::FailFast => match outcome {
                PostDetach::Ok => Ok(()),
                PostDetach::Panic(failure) => Err(ObservableError::DetachHook {
                    observer: observer.name().to_owned(),
                    failure,
                }),
            },
            DetachPolicy::Handled(handler) => {
                handler(trigger, subject, &outcome);
                Ok(())
            }
        }
    }
}

impl<S: ?Sized> Default for ObservableBase<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for ObservableBase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .observers
            .borrow()
            .iter()
            .map(|key| key.0.name().to_owned())
            .collect();
        f.debug_struct("ObservableBase")
            .field("observers", &names)
            .field("detach_policy", &self.detach_policy)
            .field("notification_policy", &self.notification_policy)
            .finish()
    }
}
