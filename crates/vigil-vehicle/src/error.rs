//! Error types for vehicle assemblies and simulations.

use std::error::Error;
use std::fmt;

use vigil_ident::IdentError;
use vigil_observe::ObservableError;

/// Errors from constructing or driving vehicle components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VehicleError {
    /// A location or other identifier does not match its required format.
    InvalidIdentifierFormat {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// An operation is not valid in the component's current state.
    IllegalStateTransition {
        /// Description of the refused transition.
        reason: String,
    },
    /// Notifying or detaching observers failed.
    Observable(ObservableError),
    /// Generating a simulation identifier failed.
    Ident(IdentError),
}

impl fmt::Display for VehicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifierFormat { value, reason } => {
                write!(f, "invalid identifier {value:?}: {reason}")
            }
            Self::IllegalStateTransition { reason } => {
                write!(f, "illegal state transition: {reason}")
            }
            Self::Observable(e) => write!(f, "observer failure: {e}"),
            Self::Ident(e) => write!(f, "identifier generation failed: {e}"),
        }
    }
}

impl Error for VehicleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Observable(e) => Some(e),
            Self::Ident(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ObservableError> for VehicleError {
    fn from(e: ObservableError) -> Self {
        Self::Observable(e)
    }
}

impl From<IdentError> for VehicleError {
    fn from(e: IdentError) -> Self {
        Self::Ident(e)
    }
}
