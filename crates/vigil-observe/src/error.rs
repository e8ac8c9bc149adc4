//! Error types for the observer framework.
//!
//! [`ObserverError`] is what an observer raises from a callback.
//! [`ObservableError`] is what an observable surfaces to the caller of
//! `detach`, `detach_all` or a mutation that triggered a notification
//! round, once the configured failure policy decided not to swallow it.

use std::error::Error;
use std::fmt;

/// A failure raised by an observer callback.
///
/// Returned from [`Observer::subject_changed`](crate::Observer::subject_changed)
/// and from detach hooks. Notification policies may hand back a different
/// value to translate the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObserverError {
    /// The observer could not act on the change.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The observer was invoked in a state where it cannot act.
    IllegalState {
        /// Description of the violated precondition.
        reason: String,
    },
    /// A failure rewritten by a notification policy.
    Translated {
        /// Description supplied by the translating policy.
        reason: String,
        /// The failure originally raised by the observer.
        cause: Box<ObserverError>,
    },
}

impl ObserverError {
    /// Shorthand for [`ObserverError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ObserverError::IllegalState`].
    pub fn illegal_state(reason: impl Into<String>) -> Self {
        Self::IllegalState {
            reason: reason.into(),
        }
    }

    /// Wrap `self` as the cause of a [`ObserverError::Translated`] failure.
    pub fn translate(self, reason: impl Into<String>) -> Self {
        Self::Translated {
            reason: reason.into(),
            cause: Box::new(self),
        }
    }

    /// The human-readable reason, without the cause chain.
    pub fn reason(&self) -> &str {
        match self {
            Self::Failed { reason }
            | Self::IllegalState { reason }
            | Self::Translated { reason, .. } => reason,
        }
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "observer failed: {reason}"),
            Self::IllegalState { reason } => write!(f, "observer in illegal state: {reason}"),
            Self::Translated { reason, .. } => write!(f, "{reason}"),
        }
    }
}

impl Error for ObserverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Translated { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Errors surfaced by an observable to its direct caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservableError {
    /// An observer's detach hook failed and the detach policy rethrew it.
    ///
    /// The observer has already been removed when this is returned.
    DetachHook {
        /// Name of the detached observer.
        observer: String,
        /// The failure raised by the hook.
        failure: ObserverError,
    },
    /// An observer's change callback failed during a notification round,
    /// and the notification policy raised (or translated) it.
    Notification {
        /// 0-based position of the failing observer in the round.
        index: usize,
        /// Name of the failing observer.
        observer: String,
        /// The raised failure, as returned by the policy.
        failure: ObserverError,
    },
}

impl ObservableError {
    /// The observer failure carried by this error.
    pub fn failure(&self) -> &ObserverError {
        match self {
            Self::DetachHook { failure, .. } | Self::Notification { failure, .. } => failure,
        }
    }

    /// Consume the error, returning the observer failure.
    pub fn into_failure(self) -> ObserverError {
        match self {
            Self::DetachHook { failure, .. } | Self::Notification { failure, .. } => failure,
        }
    }
}

impl fmt::Display for ObservableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetachHook { observer, failure } => {
                write!(f, "detach hook of '{observer}' failed: {failure}")
            }
            Self::Notification {
                index,
                observer,
                failure,
            } => write!(
                f,
                "notification of observer #{index} '{observer}' failed: {failure}"
            ),
        }
    }
}

impl Error for ObservableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.failure())
    }
}
