//! Ready-made failure policies.
//!
//! - [`NotificationPolicy::log_and_suppress`] / [`NotificationPolicy::log_and_raise`]:
//!   emit a `tracing` event, then suppress or rethrow.
//! - [`NotificationPolicy::log_with`]: a caller-supplied log adapter decides.
//! - [`FailureCollector`]: records every failure of a round and suppresses
//!   it, for callers that want to report failures in aggregate.
//! - [`DetachPolicy::log`]: logs detach-hook outcomes and carries on.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ObserverError;
use crate::observer::Observer;
use crate::policy::{DetachPolicy, NotificationPolicy, PostDetach};

/// What a log adapter wants done with a failure after logging it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterLogging {
    /// Raise the failure unchanged.
    RaiseAgain,
    /// Suppress the failure.
    Ignore,
}

impl<S: ?Sized> NotificationPolicy<S> {
    /// Log each failure at `warn` level and suppress it.
    pub fn log_and_suppress() -> Self {
        Self::handled(|observer, index, failure| {
            tracing::warn!(
                observer = observer.name(),
                index,
                %failure,
                "observer notification failed; suppressed"
            );
            None
        })
    }

    /// Log each failure at `error` level and raise it unchanged.
    pub fn log_and_raise() -> Self {
        Self::handled(|observer, index, failure| {
            tracing::error!(
                observer = observer.name(),
                index,
                %failure,
                "observer notification failed"
            );
            Some(failure)
        })
    }

    /// Hand each failure to `adapter`, which logs it wherever it likes and
    /// says whether to raise it again.
    pub fn log_with<F>(adapter: F) -> Self
    where
        F: Fn(&dyn Observer<S>, usize, &ObserverError) -> AfterLogging + 'static,
    {
        Self::handled(move |observer, index, failure| {
            match adapter(observer, index, &failure) {
                AfterLogging::RaiseAgain => Some(failure),
                AfterLogging::Ignore => None,
            }
        })
    }
}

impl<S: ?Sized> DetachPolicy<S> {
    /// Log failing detach hooks at `warn` level, clean ones at `trace`, and
    /// never rethrow.
    pub fn log() -> Self {
        Self::handled(|trigger, _, outcome| match outcome {
            PostDetach::Ok => tracing::trace!(%trigger, "observer detached"),
            PostDetach::Panic(cause) => {
                tracing::warn!(%trigger, %cause, "observer detach hook failed")
            }
        })
    }
}

/// One failure recorded by a [`FailureCollector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectedFailure {
    /// 0-based position of the observer in its round.
    pub index: usize,
    /// Name of the failing observer.
    pub observer: String,
    /// What the observer raised.
    pub failure: ObserverError,
}

/// Collects notification failures instead of raising them.
///
/// Clones share the same buffer, so a collector can be kept by the caller
/// while its [`policy`](Self::policy) lives inside an observable.
///
/// ```
/// use std::rc::Rc;
/// use vigil_observe::{FailureCollector, ObservableBase, ObserverError};
///
/// let collector = FailureCollector::new();
/// let base: ObservableBase<()> = ObservableBase::builder()
///     .notification_policy(collector.policy())
///     .build();
/// base.attach(Rc::new(|_: &()| Err::<(), _>(ObserverError::failed("a"))));
/// base.attach(Rc::new(|_: &()| Err::<(), _>(ObserverError::failed("b"))));
///
/// base.notify_observers(&()).unwrap();
/// let failures = collector.drain();
/// assert_eq!(failures.len(), 2);
/// assert!(collector.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FailureCollector {
    collected: Rc<RefCell<Vec<CollectedFailure>>>,
}

impl FailureCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// A notification policy that records into this collector and
    /// suppresses every failure.
    pub fn policy<S: ?Sized>(&self) -> NotificationPolicy<S> {
        let collected = Rc::clone(&self.collected);
        NotificationPolicy::handled(move |observer, index, failure| {
            collected.borrow_mut().push(CollectedFailure {
                index,
                observer: observer.name().to_owned(),
                failure,
            });
            None
        })
    }

    /// Number of failures recorded since the last drain.
    pub fn len(&self) -> usize {
        self.collected.borrow().len()
    }

    /// `true` if nothing was recorded since the last drain.
    pub fn is_empty(&self) -> bool {
        self.collected.borrow().is_empty()
    }

    /// Take every recorded failure, leaving the collector empty.
    pub fn drain(&self) -> Vec<CollectedFailure> {
        std::mem::take(&mut *self.collected.borrow_mut())
    }
}
