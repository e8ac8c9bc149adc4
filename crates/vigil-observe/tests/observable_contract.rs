use std::cell::Cell;
use std::rc::{Rc, Weak};

use vigil_observe::{
    DetachTrigger, FailureCollector, NotificationPolicy, Observable, ObservableError, Observer,
    ObserverError, OnDetachedFrom, PostDetach,
};
use vigil_test_utils::fixtures::Gauge;
use vigil_test_utils::{CallLog, DetachProbe, HookForm, HookedObserver, RecordingObserver};

#[test]
fn attaching_twice_keeps_one_entry() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let a = RecordingObserver::new("a", &log);

    assert!(gauge.attach(a.clone()));
    assert!(!gauge.attach(a.clone()));
    assert_eq!(gauge.count_observers(), 1);

    gauge.set(1).unwrap();
    assert_eq!(log.count("a:changed"), 1);
}

#[test]
fn detaching_unattached_observer_touches_no_policy() {
    let probe = DetachProbe::new();
    let gauge = Gauge::with_policies(probe.policy(), NotificationPolicy::FailFast);
    let log = CallLog::new();
    let stranger = HookedObserver::failing("x", HookForm::Detached, &log);

    assert_eq!(gauge.detach(&stranger), Ok(false));
    assert!(probe.seen().is_empty());
    assert!(log.entries().is_empty());
}

#[test]
fn notification_follows_attachment_order() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    for name in ["o1", "o2", "o3"] {
        gauge.attach(RecordingObserver::new(name, &log));
    }
    gauge.set(5).unwrap();
    assert_eq!(log.entries(), vec!["o1:changed", "o2:changed", "o3:changed"]);
}

#[test]
fn observers_detached_then_reattached_move_to_the_back() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let a = RecordingObserver::new("a", &log);
    let b = RecordingObserver::new("b", &log);
    gauge.attach(a.clone());
    gauge.attach(b.clone());
    gauge.detach(&a).unwrap();
    gauge.attach(a.clone());

    gauge.set(1).unwrap();
    assert_eq!(log.entries(), vec!["b:changed", "a:changed"]);
}

#[test]
fn default_policy_fails_fast_with_unchanged_failure() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    gauge.attach(RecordingObserver::new("o1", &log));
    gauge.attach(RecordingObserver::failing("o2", &log));
    gauge.attach(RecordingObserver::new("o3", &log));

    let err = gauge.set(9).unwrap_err();
    assert_eq!(
        err,
        ObservableError::Notification {
            index: 1,
            observer: "o2".into(),
            failure: ObserverError::failed("o2"),
        }
    );
    assert_eq!(log.entries(), vec!["o1:changed", "o2:changed"]);
    // The mutation itself went through.
    assert_eq!(gauge.reading(), 9);
}

#[test]
fn handled_policy_suppression_continues_the_round() {
    let log = CallLog::new();
    let gauge = Gauge::with_policies(Default::default(), NotificationPolicy::suppress_all());
    gauge.attach(RecordingObserver::new("o1", &log));
    gauge.attach(RecordingObserver::failing("o2", &log));
    gauge.attach(RecordingObserver::new("o3", &log));

    gauge.set(1).unwrap();
    assert_eq!(log.entries(), vec!["o1:changed", "o2:changed", "o3:changed"]);
}

#[test]
fn handled_policy_translation_aborts_the_round() {
    let log = CallLog::new();
    let gauge = Gauge::with_policies(
        Default::default(),
        NotificationPolicy::handled(|observer, index, failure| {
            Some(failure.translate(format!("{} #{index} offline", observer.name())))
        }),
    );
    gauge.attach(RecordingObserver::failing("o1", &log));
    gauge.attach(RecordingObserver::new("o2", &log));

    let failure = gauge.set(1).unwrap_err().into_failure();
    assert_eq!(failure.reason(), "o1 #0 offline");
    match failure {
        ObserverError::Translated { cause, .. } => {
            assert_eq!(*cause, ObserverError::failed("o1"));
        }
        other => panic!("expected translated failure, got {other:?}"),
    }
    assert_eq!(log.count("o2:changed"), 0);
}

#[test]
fn handled_policy_rethrow_is_indexed() {
    let log = CallLog::new();
    let gauge = Gauge::with_policies(
        Default::default(),
        NotificationPolicy::handled(|_, index, failure| (index > 0).then_some(failure)),
    );
    gauge.attach(RecordingObserver::failing("o1", &log));
    gauge.attach(RecordingObserver::failing("o2", &log));
    gauge.attach(RecordingObserver::new("o3", &log));

    let err = gauge.set(1).unwrap_err();
    assert!(matches!(err, ObservableError::Notification { index: 1, .. }));
    assert_eq!(log.count("o3:changed"), 0);
}

#[test]
fn collector_reports_all_failures_in_aggregate() {
    let log = CallLog::new();
    let collector = FailureCollector::new();
    let gauge = Gauge::with_policies(Default::default(), collector.policy());
    gauge.attach(RecordingObserver::failing("o1", &log));
    gauge.attach(RecordingObserver::new("o2", &log));
    gauge.attach(RecordingObserver::failing("o3", &log));

    gauge.set(1).unwrap();
    let indices: Vec<usize> = collector.drain().into_iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn default_detach_surfaces_hook_failure_but_removes() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let faulty = HookedObserver::failing("faulty", HookForm::Detached, &log);
    gauge.attach(faulty.clone());
    assert!(gauge.is_observed_by(&faulty));

    let err = gauge.detach(&faulty).unwrap_err();
    assert_eq!(
        err,
        ObservableError::DetachHook {
            observer: "faulty".into(),
            failure: ObserverError::failed("faulty"),
        }
    );
    assert_eq!(log.count("faulty:detached"), 1);
    assert!(!gauge.is_observed_by(&faulty));
}

#[test]
fn handled_detach_swallows_and_reports() {
    let probe = DetachProbe::new();
    let gauge = Gauge::with_policies(probe.policy(), NotificationPolicy::FailFast);
    let log = CallLog::new();
    let faulty = HookedObserver::failing("faulty", HookForm::DetachedFrom, &log);
    gauge.attach(faulty.clone());

    assert_eq!(gauge.detach(&faulty), Ok(true));
    assert_eq!(
        probe.seen(),
        vec![(
            DetachTrigger::Detach,
            PostDetach::Panic(ObserverError::failed("faulty"))
        )]
    );
    assert_eq!(log.entries(), vec!["faulty:from", "faulty:detached"]);
}

#[test]
fn default_detach_all_aborts_on_first_hook_failure() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let first = HookedObserver::new("first", HookForm::Detached, &log);
    let faulty = HookedObserver::failing("faulty", HookForm::Detached, &log);
    let last = HookedObserver::new("last", HookForm::Detached, &log);
    gauge.attach(first.clone());
    gauge.attach(faulty.clone());
    gauge.attach(last.clone());

    let err = gauge.detach_all().unwrap_err();
    assert_eq!(err.failure(), &ObserverError::failed("faulty"));
    assert!(!gauge.is_observed_by(&first));
    assert!(!gauge.is_observed_by(&faulty));
    assert!(gauge.is_observed_by(&last));
    assert_eq!(gauge.count_observers(), 1);
    assert_eq!(log.count("last:detached"), 0);
}

#[test]
fn handled_detach_all_always_empties() {
    let probe = DetachProbe::new();
    let gauge = Gauge::with_policies(probe.policy(), NotificationPolicy::FailFast);
    let log = CallLog::new();
    gauge.attach(HookedObserver::failing("a", HookForm::Detached, &log));
    gauge.attach(RecordingObserver::new("b", &log));
    gauge.attach(HookedObserver::failing("c", HookForm::DetachedFrom, &log));

    gauge.detach_all().unwrap();
    assert!(!gauge.is_observed());
    let seen = probe.seen();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|(t, _)| *t == DetachTrigger::DetachAll));
    assert_eq!(
        seen.iter().map(|(_, o)| o.is_panic()).collect::<Vec<_>>(),
        vec![true, false, true]
    );
}

struct Unsubscriber {
    seen_reading: Cell<Option<i64>>,
}

impl Observer<Gauge> for Unsubscriber {
    fn subject_changed(&self, _subject: &Gauge) -> Result<(), ObserverError> {
        Ok(())
    }

    fn detach_hook(&self) -> Option<vigil_observe::DetachHook<'_, Gauge>> {
        Some(vigil_observe::DetachHook::DetachedFrom(self))
    }
}

impl OnDetachedFrom<Gauge> for Unsubscriber {
    fn detached_from(&self, gauge: &Gauge) -> Result<(), ObserverError> {
        self.seen_reading.set(Some(gauge.reading()));
        Ok(())
    }
}

#[test]
fn detached_from_hook_sees_the_observable() {
    let gauge = Gauge::new();
    gauge.set(42).unwrap();
    let u = Rc::new(Unsubscriber {
        seen_reading: Cell::new(None),
    });
    gauge.attach(u.clone());
    gauge.detach(&u).unwrap();
    assert_eq!(u.seen_reading.get(), Some(42));
}

#[test]
fn observer_attaching_during_a_round_joins_the_next_one() {
    let log = CallLog::new();
    let gauge = Rc::new(Gauge::new());
    let late = RecordingObserver::new("late", &log);
    let late_handle = late.clone();
    gauge.attach(Rc::new(move |g: &Gauge| {
        g.attach(late_handle.clone());
        Ok::<(), ObserverError>(())
    }));

    gauge.set(1).unwrap();
    assert_eq!(log.count("late:changed"), 0);
    gauge.set(2).unwrap();
    assert_eq!(log.count("late:changed"), 1);
}

#[test]
fn observer_detached_during_a_round_is_skipped() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let victim = HookedObserver::new("victim", HookForm::Detached, &log);
    let handle = victim.clone();
    gauge.attach(Rc::new(move |g: &Gauge| {
        g.detach(&handle).expect("hook succeeds");
        Ok::<(), ObserverError>(())
    }));
    gauge.attach(victim.clone());

    gauge.set(1).unwrap();
    assert_eq!(log.entries(), vec!["victim:detached"]);
    assert!(!gauge.is_observed_by(&victim));
}

/// Re-attaches itself to the gauge it was removed from.
struct Sticky {
    me: Weak<Sticky>,
    hook_calls: Cell<u32>,
}

impl Sticky {
    fn new() -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            hook_calls: Cell::new(0),
        })
    }
}

impl Observer<Gauge> for Sticky {
    fn subject_changed(&self, _subject: &Gauge) -> Result<(), ObserverError> {
        Ok(())
    }

    fn detach_hook(&self) -> Option<vigil_observe::DetachHook<'_, Gauge>> {
        Some(vigil_observe::DetachHook::DetachedFrom(self))
    }
}

impl OnDetachedFrom<Gauge> for Sticky {
    fn detached_from(&self, gauge: &Gauge) -> Result<(), ObserverError> {
        self.hook_calls.set(self.hook_calls.get() + 1);
        if let Some(me) = self.me.upgrade() {
            gauge.attach(me);
        }
        Ok(())
    }
}

#[test]
fn detach_all_leaves_observers_attached_by_hooks_for_the_next_call() {
    let log = CallLog::new();
    let gauge = Gauge::new();
    let sticky = Sticky::new();
    let plain = RecordingObserver::new("plain", &log);
    gauge.attach(sticky.clone());
    gauge.attach(plain.clone());

    gauge.detach_all().unwrap();
    assert_eq!(sticky.hook_calls.get(), 1);
    assert!(gauge.is_observed_by(&sticky));
    assert!(!gauge.is_observed_by(&plain));
    assert_eq!(gauge.count_observers(), 1);

    gauge.detach_all().unwrap();
    assert_eq!(sticky.hook_calls.get(), 2);
    assert_eq!(gauge.count_observers(), 1);
}

#[test]
fn detach_all_skips_observers_a_hook_already_removed() {
    let log = CallLog::new();
    let probe = DetachProbe::new();
    let gauge = Gauge::with_policies(probe.policy(), NotificationPolicy::FailFast);
    let second = HookedObserver::new("second", HookForm::Detached, &log);
    gauge.attach(Rc::new(Remover {
        target: second.clone(),
    }));
    gauge.attach(second.clone());

    gauge.detach_all().unwrap();
    assert!(!gauge.is_observed());
    assert_eq!(log.count("second:detached"), 1);
    // One entry per removal: the remover's detach of `second`, then the
    // remover itself.
    let triggers: Vec<DetachTrigger> = probe.seen().into_iter().map(|(t, _)| t).collect();
    assert_eq!(triggers, vec![DetachTrigger::Detach, DetachTrigger::DetachAll]);
}

/// Detaches `target` from the gauge when it is itself removed.
struct Remover {
    target: Rc<HookedObserver>,
}

impl Observer<Gauge> for Remover {
    fn subject_changed(&self, _subject: &Gauge) -> Result<(), ObserverError> {
        Ok(())
    }

    fn detach_hook(&self) -> Option<vigil_observe::DetachHook<'_, Gauge>> {
        Some(vigil_observe::DetachHook::DetachedFrom(self))
    }
}

impl OnDetachedFrom<Gauge> for Remover {
    fn detached_from(&self, gauge: &Gauge) -> Result<(), ObserverError> {
        gauge.detach(&self.target).map(|_| ()).map_err(|e| e.into_failure())
    }
}
