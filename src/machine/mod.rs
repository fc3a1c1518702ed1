//! The transition engine.
//!
//! [`Machine`] tracks exactly one active state, dispatches events against
//! the chart's transition table, runs enter effects with automatic cleanup
//! of the previous state's effect, and notifies subscribers with immutable
//! snapshots. Effects may defer to background work; the engine auto-advances
//! on settlement and silently discards settlements that arrive after the
//! machine has moved on.
//!
//! All engine mutation happens synchronously inside `send`/`stop`/
//! construction. No lock is ever held while caller code (an effect, a
//! cleanup, a listener) runs, so sends issued from inside effects or
//! listeners are fully re-entrant and chain to completion before the outer
//! call returns.

mod error;

pub use error::{EffectFault, MachineError, Phase};

use crate::core::{ActivationToken, Chart, Payload, Snapshot, StateNode};
use crate::effects::{CleanupFn, EffectContext, EffectError, EffectFlow};
use error::Unrecovered;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, trace, warn};

type Listener = Arc<dyn Fn(Arc<Snapshot>) + Send + Sync>;

/// Mutable engine state. Exclusively owned; mutated only under the lock and
/// never while caller code runs.
struct Core {
    current: String,
    snapshot: Arc<Snapshot>,
    cleanup: Option<CleanupFn>,
    token: ActivationToken,
}

struct ListenerEntry {
    id: u64,
    callback: Listener,
}

pub(crate) struct MachineInner {
    chart: Chart,
    core: Mutex<Core>,
    listeners: Mutex<Vec<ListenerEntry>>,
    next_listener_id: AtomicU64,
}

impl MachineInner {
    fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<ListenerEntry>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a dispatch actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Transitioned,
    Ignored,
}

/// Why a state's enter effect is running.
enum Activation {
    Init,
    Transition { from: String, event: String },
}

fn classify(activation: Activation, to: &str, source: EffectError) -> MachineError {
    match activation {
        Activation::Init => MachineError::Init {
            state: to.to_string(),
            source,
        },
        Activation::Transition { from, event } => MachineError::Enter {
            from,
            event,
            to: to.to_string(),
            source,
        },
    }
}

/// A finite-state-machine execution engine over a [`Chart`].
///
/// `Machine` is a cheap-to-clone handle; clones share one engine instance.
///
/// # Example
///
/// ```rust
/// use flowstate::{chart, Machine};
///
/// let chart = chart! {
///     initial: idle,
///     states: {
///         idle { on: { FETCH => loading } },
///         loading { on: { RESOLVE => done } },
///         done {},
///     }
/// };
///
/// let machine = Machine::new(chart).unwrap();
/// assert_eq!(machine.snapshot().state, "idle");
///
/// machine.send("FETCH").unwrap();
/// assert_eq!(machine.snapshot().state, "loading");
/// assert_eq!(machine.snapshot().events, vec!["RESOLVE"]);
/// ```
#[derive(Clone)]
pub struct Machine {
    inner: Arc<MachineInner>,
}

impl Machine {
    /// Construct a machine and run the initial state's enter effect.
    ///
    /// A synchronous failure in that effect fails construction with an
    /// init-phase [`MachineError`], unless the initial state declares a
    /// reject-event transition that absorbs it.
    pub fn new(chart: Chart) -> Result<Self, MachineError> {
        let initial = chart.initial().to_string();
        let events = chart
            .node(&initial)
            .map(StateNode::events)
            .unwrap_or_default();
        let token = ActivationToken::new();
        let snapshot = Arc::new(Snapshot {
            state: initial.clone(),
            events,
            payload: None,
        });

        let machine = Machine {
            inner: Arc::new(MachineInner {
                chart,
                core: Mutex::new(Core {
                    current: initial.clone(),
                    snapshot,
                    cleanup: None,
                    token,
                }),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        };

        machine.enter_state(token, &initial, None, Activation::Init)?;
        Ok(machine)
    }

    /// The chart this machine executes.
    pub fn chart(&self) -> &Chart {
        &self.inner.chart
    }

    /// The latest committed snapshot. The same `Arc` is returned across
    /// reads until the next transition.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.lock_core().snapshot.clone()
    }

    /// Dispatch an event without a payload.
    ///
    /// If the current state does not map `event`, or maps it to itself, the
    /// call is a complete no-op. Otherwise the engine runs the outgoing
    /// state's cleanup, commits the target, runs its enter effect, and
    /// notifies subscribers, in that order.
    pub fn send(&self, event: &str) -> Result<(), MachineError> {
        self.dispatch(None, event, None).map(|_| ())
    }

    /// Dispatch an event carrying a payload. The payload lands on the new
    /// snapshot and on the target effect's context; it is discarded when the
    /// send does not transition.
    pub fn send_with(&self, event: &str, payload: Payload) -> Result<(), MachineError> {
        self.dispatch(None, event, Some(payload)).map(|_| ())
    }

    /// Run the pending cleanup, if any, and invalidate every outstanding
    /// guarded sender and deferred continuation. Idempotent; never fails.
    /// A cleanup failure here is logged and swallowed.
    pub fn stop(&self) {
        let cleanup = {
            let mut core = self.inner.lock_core();
            core.token = ActivationToken::new();
            core.cleanup.take()
        };
        if let Some(f) = cleanup {
            if let Err(err) = f() {
                warn!(error = %err, "cleanup failed during stop");
            }
        }
    }

    /// Register a listener for every future snapshot produced by a state
    /// change. The current snapshot is not delivered synchronously.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Arc<Snapshot>) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.lock_listeners().push(ListenerEntry {
            id,
            callback: Arc::new(listener),
        });
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// The send/notify state machine proper. `guard` carries the activation
    /// token of a guarded sender; a mismatch means the activation was
    /// superseded and the call quietly does nothing.
    fn dispatch(
        &self,
        guard: Option<ActivationToken>,
        event: &str,
        payload: Option<Payload>,
    ) -> Result<Dispatch, MachineError> {
        // Phase 1: transition lookup and cleanup hand-off.
        let (from, target, cleanup, observed) = {
            let mut core = self.inner.lock_core();

            if let Some(expected) = guard {
                if core.token != expected {
                    trace!(event, "guarded send from superseded activation ignored");
                    return Ok(Dispatch::Ignored);
                }
            }

            let target = self
                .inner
                .chart
                .node(&core.current)
                .and_then(|node| node.target_for(event));
            let Some(target) = target else {
                return Ok(Dispatch::Ignored);
            };
            if target == core.current {
                return Ok(Dispatch::Ignored);
            }

            let target = target.to_string();
            (core.current.clone(), target, core.cleanup.take(), core.token)
        };

        // Phase 2: outgoing cleanup, outside the lock. The handle was taken
        // above, so it runs exactly once even when it fails; a failure
        // aborts the transition with state and snapshot untouched.
        if let Some(f) = cleanup {
            if let Err(source) = f() {
                return Err(MachineError::Cleanup {
                    from,
                    event: event.to_string(),
                    to: target,
                    source,
                });
            }
        }

        // Phase 3: rotate the token and commit. The snapshot is installed
        // before the enter effect runs, so the new payload is externally
        // visible mid-effect.
        let token = {
            let mut core = self.inner.lock_core();
            if core.token != observed {
                trace!(event, "send superseded during cleanup");
                return Ok(Dispatch::Ignored);
            }
            core.token = ActivationToken::new();
            core.current = target.clone();
            core.snapshot = Arc::new(Snapshot {
                state: target.clone(),
                events: self
                    .inner
                    .chart
                    .node(&target)
                    .map(StateNode::events)
                    .unwrap_or_default(),
                payload: payload.clone(),
            });
            core.token
        };

        debug!(from = %from, event, to = %target, "transition");

        // Phase 4: run the target's enter effect.
        self.enter_state(
            token,
            &target,
            payload,
            Activation::Transition {
                from,
                event: event.to_string(),
            },
        )?;

        // Phase 5: notify, unless a send chained inside the effect already
        // moved the machine on and delivered the newer snapshot itself.
        let snapshot = {
            let core = self.inner.lock_core();
            if core.token != token {
                return Ok(Dispatch::Transitioned);
            }
            core.snapshot.clone()
        };
        self.notify(snapshot);

        Ok(Dispatch::Transitioned)
    }

    /// Run `state`'s enter effect and apply its returned [`EffectFlow`].
    fn enter_state(
        &self,
        token: ActivationToken,
        state: &str,
        payload: Option<Payload>,
        activation: Activation,
    ) -> Result<(), MachineError> {
        let Some(node) = self.inner.chart.node(state) else {
            // Lazy target validation: a dangling target surfaces here, when
            // the state is looked up to run its effect.
            let fault = EffectFault::UnknownState(state.to_string());
            return self.recover_or_fail(token, state, activation, fault.into());
        };
        let Some(effect) = node.enter().cloned() else {
            return Ok(());
        };

        let ctx = EffectContext {
            sender: Sender {
                inner: Arc::downgrade(&self.inner),
                token,
            },
            payload,
            to: state.to_string(),
            from: match &activation {
                Activation::Init => None,
                Activation::Transition { from, .. } => Some(from.clone()),
            },
            event: match &activation {
                Activation::Init => None,
                Activation::Transition { event, .. } => Some(event.clone()),
            },
        };

        match effect(ctx) {
            Ok(EffectFlow::Done) => Ok(()),
            Ok(EffectFlow::Cleanup(f)) => {
                let stale = {
                    let mut core = self.inner.lock_core();
                    if core.token == token {
                        core.cleanup = Some(f);
                        None
                    } else {
                        Some(f)
                    }
                };
                // The effect chained past its own activation before
                // returning; its resource is already obsolete.
                if let Some(f) = stale {
                    if let Err(err) = f() {
                        warn!(state, error = %err, "cleanup from superseded activation failed");
                    }
                }
                Ok(())
            }
            Ok(EffectFlow::Defer(future)) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let sender = Sender {
                        inner: Arc::downgrade(&self.inner),
                        token,
                    };
                    let resolve = self.inner.chart.resolve_event().to_string();
                    let reject = self.inner.chart.reject_event().to_string();
                    let state = state.to_string();
                    handle.spawn(async move {
                        let (event, payload) = match future.await {
                            Ok(p) => (resolve, p),
                            Err(p) => (reject, p),
                        };
                        // No synchronous caller exists out here; a failure
                        // is terminal for this one continuation.
                        if let Err(err) = sender.send_with(&event, payload) {
                            warn!(state = %state, event = %event, error = %err,
                                "deferred completion send failed");
                        }
                    });
                    Ok(())
                }
                Err(_) => self.recover_or_fail(
                    token,
                    state,
                    activation,
                    EffectFault::DeferWithoutRuntime.into(),
                ),
            },
            Err(source) => self.recover_or_fail(token, state, activation, source),
        }
    }

    /// One-shot recovery for a synchronous effect failure: a guarded send of
    /// the reject event carrying the failure as payload. If that send
    /// actually changes state the failure is handled; otherwise it is
    /// re-raised with phase context.
    fn recover_or_fail(
        &self,
        token: ActivationToken,
        state: &str,
        activation: Activation,
        source: EffectError,
    ) -> Result<(), MachineError> {
        let shared: Arc<dyn Error + Send + Sync> = Arc::from(source);
        let reject = self.inner.chart.reject_event().to_string();

        match self.dispatch(Some(token), &reject, Some(Payload::new(shared.clone())))? {
            Dispatch::Transitioned => {
                debug!(state, event = %reject, "enter failure absorbed by reject transition");
                Ok(())
            }
            Dispatch::Ignored => Err(classify(activation, state, Box::new(Unrecovered(shared)))),
        }
    }

    fn notify(&self, snapshot: Arc<Snapshot>) {
        // Listeners are invoked with no lock held, in subscription order;
        // a listener may re-enter send, subscribe, or unsubscribe freely.
        let callbacks: Vec<Listener> = self
            .inner
            .lock_listeners()
            .iter()
            .map(|entry| entry.callback.clone())
            .collect();
        for callback in callbacks {
            callback(snapshot.clone());
        }
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.inner.lock_core().current)
            .finish()
    }
}

/// Guarded sender scoped to one effect activation.
///
/// Same contract as [`Machine::send`]/[`Machine::send_with`], except that it
/// silently no-ops once the activation it was created under has been
/// superseded by a state change or `stop()`, and after the machine itself
/// has been dropped.
#[derive(Debug, Clone)]
pub struct Sender {
    inner: Weak<MachineInner>,
    token: ActivationToken,
}

impl Sender {
    /// Guarded send without a payload.
    pub fn send(&self, event: &str) -> Result<(), MachineError> {
        self.deliver(event, None)
    }

    /// Guarded send carrying a payload.
    pub fn send_with(&self, event: &str, payload: Payload) -> Result<(), MachineError> {
        self.deliver(event, Some(payload))
    }

    fn deliver(&self, event: &str, payload: Option<Payload>) -> Result<(), MachineError> {
        let Some(inner) = self.inner.upgrade() else {
            trace!(event, "guarded send after machine drop ignored");
            return Ok(());
        };
        Machine { inner }
            .dispatch(Some(self.token), event, payload)
            .map(|_| ())
    }
}

/// Handle returned by [`Machine::subscribe`]; removes the listener when
/// [`Subscription::unsubscribe`] is called. Unsubscribing is idempotent and
/// legal during notification.
#[derive(Debug)]
pub struct Subscription {
    inner: Weak<MachineInner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock_listeners().retain(|entry| entry.id != self.id);
        }
    }
}
