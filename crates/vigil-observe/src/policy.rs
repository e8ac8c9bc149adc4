//! Failure policies for detachment and change notification.
//!
//! Both policies are a two-way choice between [`FailFast`] (the default:
//! surface the failure to the caller immediately) and `Handled` (a callback
//! decides). The observable dispatches on them with a `match`.
//!
//! [`FailFast`]: DetachPolicy::FailFast

use std::fmt;

use crate::error::ObserverError;
use crate::observer::Observer;

/// Which call removed the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetachTrigger {
    /// A single observer was removed via `detach`.
    Detach,
    /// The observer was removed as part of `detach_all`.
    DetachAll,
}

impl fmt::Display for DetachTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detach => write!(f, "detach"),
            Self::DetachAll => write!(f, "detach_all"),
        }
    }
}

/// Outcome of an observer's detach hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostDetach {
    /// The hook succeeded, or the observer has no hook.
    Ok,
    /// The hook failed.
    Panic(ObserverError),
}

impl PostDetach {
    /// `true` for [`PostDetach::Panic`].
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panic(_))
    }

    /// The failure carried by a [`PostDetach::Panic`].
    pub fn cause(&self) -> Option<&ObserverError> {
        match self {
            Self::Ok => None,
            Self::Panic(cause) => Some(cause),
        }
    }
}

impl From<Result<(), ObserverError>> for PostDetach {
    fn from(result: Result<(), ObserverError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(cause) => Self::Panic(cause),
        }
    }
}

/// Callback of a [`DetachPolicy::Handled`] policy.
///
/// Receives the trigger, the observable the observer was removed from, and
/// the hook outcome. It is an informational sink: it cannot stop a
/// `detach_all` loop, and the detach call succeeds once it returns.
pub type DetachHandler<S> = Box<dyn Fn(DetachTrigger, &S, &PostDetach)>;

/// What an observable does when a detach hook fails.
pub enum DetachPolicy<S: ?Sized> {
    /// Return the failure to the caller of `detach` / `detach_all`.
    ///
    /// During `detach_all` the first failure aborts the loop; observers
    /// after the failing one stay attached.
    FailFast,
    /// Hand every outcome to a callback and carry on.
    Handled(DetachHandler<S>),
}

impl<S: ?Sized> DetachPolicy<S> {
    /// Build a [`DetachPolicy::Handled`] from a closure.
    pub fn handled<F>(handler: F) -> Self
    where
        F: Fn(DetachTrigger, &S, &PostDetach) + 'static,
    {
        Self::Handled(Box::new(handler))
    }

    /// `true` for [`DetachPolicy::FailFast`].
    pub fn is_fail_fast(&self) -> bool {
        matches!(self, Self::FailFast)
    }
}

impl<S: ?Sized> Default for DetachPolicy<S> {
    fn default() -> Self {
        Self::FailFast
    }
}

impl<S: ?Sized> fmt::Debug for DetachPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "FailFast"),
            Self::Handled(_) => write!(f, "Handled(..)"),
        }
    }
}

/// Callback of a [`NotificationPolicy::Handled`] policy.
///
/// Receives the failing observer, its 0-based index in the round, and the
/// failure. Returning `None` suppresses the failure and the round moves on
/// to the next observer. Returning a failure (the same one, or a translated
/// one) raises it and aborts the round.
pub type NotificationHandler<S> =
    Box<dyn Fn(&dyn Observer<S>, usize, ObserverError) -> Option<ObserverError>>;

/// What an observable does when an observer's change callback fails.
pub enum NotificationPolicy<S: ?Sized> {
    /// Raise the failure unchanged and skip the remaining observers.
    FailFast,
    /// Let a callback suppress, rethrow or translate each failure.
    Handled(NotificationHandler<S>),
}

impl<S: ?Sized> NotificationPolicy<S> {
    /// Build a [`NotificationPolicy::Handled`] from a closure.
    pub fn handled<F>(handler: F) -> Self
    where
        F: Fn(&dyn Observer<S>, usize, ObserverError) -> Option<ObserverError> + 'static,
    {
        Self::Handled(Box::new(handler))
    }

    /// A handled policy that silently drops every failure.
    pub fn suppress_all() -> Self {
        Self::handled(|_, _, _| None)
    }

    /// A handled policy that rewrites every failure with `reason`, keeping
    /// the original as the cause.
    pub fn translate_all(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::handled(move |_, _, failure| Some(failure.translate(reason.clone())))
    }

    /// `true` for [`NotificationPolicy::FailFast`].
    pub fn is_fail_fast(&self) -> bool {
        matches!(self, Self::FailFast)
    }

    /// Decide what to raise for a failed observer, if anything.
    pub(crate) fn resolve(
        &self,
        observer: &dyn Observer<S>,
        index: usize,
        failure: ObserverError,
    ) -> Option<ObserverError> {
        match self {
            Self::FailFast => Some(failure),
            Self::Handled(handler) => {
                let raised = handler(observer, index, failure);
                match &raised {
                    Some(f) => tracing::debug!(
                        observer = observer.name(),
                        index,
                        failure = %f,
                        "notification failure raised by policy"
                    ),
                    None => tracing::debug!(
                        observer = observer.name(),
                        index,
                        "notification failure suppressed by policy"
                    ),
                }
                raised
            }
        }
    }
}

impl<S: ?Sized> Default for NotificationPolicy<S> {
    fn default() -> Self {
        Self::FailFast
    }
}

impl<S: ?Sized> fmt::Debug for NotificationPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "FailFast"),
            Self::Handled(_) => write!(f, "Handled(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(_: &u8) -> Result<(), ObserverError> {
        Ok(())
    }

    #[test]
    fn defaults_are_fail_fast() {
        assert!(DetachPolicy::<u8>::default().is_fail_fast());
        assert!(NotificationPolicy::<u8>::default().is_fail_fast());
        assert_eq!(format!("{:?}", DetachPolicy::<u8>::default()), "FailFast");
    }

    #[test]
    fn fail_fast_raises_unchanged() {
        let policy = NotificationPolicy::<u8>::FailFast;
        let raised = policy.resolve(&quiet, 0, ObserverError::failed("x"));
        assert_eq!(raised, Some(ObserverError::failed("x")));
    }

    #[test]
    fn suppress_all_swallows() {
        let policy = NotificationPolicy::<u8>::suppress_all();
        assert_eq!(policy.resolve(&quiet, 3, ObserverError::failed("x")), None);
        assert_eq!(format!("{policy:?}"), "Handled(..)");
    }

    #[test]
    fn translate_all_keeps_cause() {
        let policy = NotificationPolicy::<u8>::translate_all("light bus down");
        let raised = policy
            .resolve(&quiet, 1, ObserverError::failed("x"))
            .unwrap();
        assert_eq!(raised, ObserverError::failed("x").translate("light bus down"));
    }

    #[test]
    fn post_detach_from_result() {
        assert_eq!(PostDetach::from(Ok(())), PostDetach::Ok);
        let panic = PostDetach::from(Err(ObserverError::failed("hook")));
        assert!(panic.is_panic());
        assert_eq!(panic.cause().unwrap().reason(), "hook");
        assert_eq!(DetachTrigger::DetachAll.to_string(), "detach_all");
    }
}
