//! Test utilities and mock observers for Vigil development.
//!
//! Provides a shared [`CallLog`], mock observers that record calls and can
//! be told to fail ([`RecordingObserver`], [`HookedObserver`]), a
//! [`DetachProbe`] that captures detach-policy callbacks, and a minimal
//! observable entity ([`fixtures::Gauge`]) for exercising the contract.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use vigil_observe::{
    DetachHook, DetachPolicy, DetachTrigger, Observer, ObserverError, OnDetached,
    OnDetachedFrom, PostDetach,
};

/// Ordered log of observer events shared between mocks.
///
/// Entries look like `"a:changed"`, `"a:detached"`.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.entries.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Observer that logs `"<name>:changed"` and optionally fails.
pub struct RecordingObserver {
    name: String,
    log: CallLog,
    failure: Option<ObserverError>,
}

impl RecordingObserver {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            log: log.clone(),
            failure: None,
        })
    }

    /// An observer that logs, then fails with `ObserverError::failed(name)`.
    pub fn failing(name: impl Into<String>, log: &CallLog) -> Rc<Self> {
        let name = name.into();
        Rc::new(Self {
            failure: Some(ObserverError::failed(name.clone())),
            name,
            log: log.clone(),
        })
    }
}

impl<S: ?Sized> Observer<S> for RecordingObserver {
    fn subject_changed(&self, _subject: &S) -> Result<(), ObserverError> {
        self.log.push(format!("{}:changed", self.name));
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Which detach-hook form a [`HookedObserver`] exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookForm {
    /// Zero-argument [`OnDetached`].
    Detached,
    /// Observable-receiving [`OnDetachedFrom`].
    DetachedFrom,
}

/// Observer with a detach hook that logs `"<name>:detached"` and
/// optionally fails.
pub struct HookedObserver {
    name: String,
    log: CallLog,
    form: HookForm,
    hook_failure: Option<ObserverError>,
}

impl HookedObserver {
    pub fn new(name: impl Into<String>, form: HookForm, log: &CallLog) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            log: log.clone(),
            form,
            hook_failure: None,
        })
    }

    /// A hooked observer whose hook fails with `ObserverError::failed(name)`.
    pub fn failing(name: impl Into<String>, form: HookForm, log: &CallLog) -> Rc<Self> {
        let name = name.into();
        Rc::new(Self {
            hook_failure: Some(ObserverError::failed(name.clone())),
            name,
            log: log.clone(),
            form,
        })
    }

    fn run_hook(&self) -> Result<(), ObserverError> {
        self.log.push(format!("{}:detached", self.name));
        match &self.hook_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

impl<S: ?Sized> Observer<S> for HookedObserver {
    fn subject_changed(&self, _subject: &S) -> Result<(), ObserverError> {
        self.log.push(format!("{}:changed", self.name));
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn detach_hook(&self) -> Option<DetachHook<'_, S>> {
        Some(match self.form {
            HookForm::Detached => DetachHook::Detached(self),
            HookForm::DetachedFrom => DetachHook::<'_, S>::DetachedFrom(self),
        })
    }
}

impl OnDetached for HookedObserver {
    fn detached(&self) -> Result<(), ObserverError> {
        self.run_hook()
    }
}

impl<S: ?Sized> OnDetachedFrom<S> for HookedObserver {
    fn detached_from(&self, _observable: &S) -> Result<(), ObserverError> {
        self.log.push(format!("{}:from", self.name));
        self.run_hook()
    }
}

/// Captures every callback of a handled detach policy.
#[derive(Clone, Debug, Default)]
pub struct DetachProbe {
    seen: Rc<RefCell<Vec<(DetachTrigger, PostDetach)>>>,
}

impl DetachProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handled detach policy feeding this probe.
    pub fn policy<S: ?Sized>(&self) -> DetachPolicy<S> {
        let seen = Rc::clone(&self.seen);
        DetachPolicy::handled(move |trigger, _, outcome| {
            seen.borrow_mut().push((trigger, outcome.clone()));
        })
    }

    /// Every `(trigger, outcome)` pair seen so far.
    pub fn seen(&self) -> Vec<(DetachTrigger, PostDetach)> {
        self.seen.borrow().clone()
    }
}
