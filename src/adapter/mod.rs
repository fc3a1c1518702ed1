//! UI adapter built on `tokio::sync::watch`.
//!
//! [`StateWatch`] subscribes to a machine, mirrors its latest snapshot into
//! a watch channel, and stops the machine when dropped, matching the
//! lifecycle of a consuming UI component. The engine itself is unaware of
//! the adapter and behaves identically without one.

use crate::core::{Payload, Snapshot};
use crate::machine::{Machine, MachineError, Subscription};
use std::sync::Arc;
use tokio::sync::watch;

/// Async view over a machine for rendering code.
///
/// # Example
///
/// ```rust
/// use flowstate::adapter::StateWatch;
/// use flowstate::{chart, Machine};
///
/// # #[tokio::main(flavor = "current_thread")] async fn main() {
/// let chart = chart! {
///     initial: idle,
///     states: {
///         idle { on: { FETCH => loading } },
///         loading {},
///     }
/// };
/// let machine = Machine::new(chart).unwrap();
/// let mut watch = StateWatch::new(machine);
///
/// watch.send("FETCH").unwrap();
/// watch.changed().await.unwrap();
/// assert_eq!(watch.snapshot().state, "loading");
/// # }
/// ```
pub struct StateWatch {
    machine: Machine,
    rx: watch::Receiver<Arc<Snapshot>>,
    subscription: Subscription,
}

impl StateWatch {
    /// Attach to a machine. The watch starts at the machine's current
    /// snapshot.
    pub fn new(machine: Machine) -> Self {
        let (tx, rx) = watch::channel(machine.snapshot());
        let subscription = machine.subscribe(move |snapshot| {
            let _ = tx.send(snapshot);
        });
        StateWatch {
            machine,
            rx,
            subscription,
        }
    }

    /// The latest snapshot seen by this watch.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.rx.borrow().clone()
    }

    /// Forward an event to the machine.
    pub fn send(&self, event: &str) -> Result<(), MachineError> {
        self.machine.send(event)
    }

    /// Forward an event with a payload to the machine.
    pub fn send_with(&self, event: &str, payload: Payload) -> Result<(), MachineError> {
        self.machine.send_with(event, payload)
    }

    /// Wait until the machine publishes a snapshot this watch has not seen.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}

impl Drop for StateWatch {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
        self.machine.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ChartBuilder, StateBuilder};
    use crate::core::Chart;
    use crate::effects::EffectFlow;
    use std::sync::Mutex;

    fn fetch_chart() -> Chart {
        ChartBuilder::new()
            .initial("idle")
            .state(StateBuilder::new("idle").on("FETCH", "loading"))
            .state(StateBuilder::new("loading").on("RESOLVE", "done"))
            .state(StateBuilder::new("done"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn watch_follows_transitions() {
        let machine = Machine::new(fetch_chart()).unwrap();
        let mut watch = StateWatch::new(machine);

        assert_eq!(watch.snapshot().state, "idle");

        watch.send("FETCH").unwrap();
        watch.changed().await.unwrap();
        assert_eq!(watch.snapshot().state, "loading");

        watch.send("RESOLVE").unwrap();
        watch.changed().await.unwrap();
        assert_eq!(watch.snapshot().state, "done");
    }

    #[tokio::test]
    async fn drop_stops_the_machine() {
        let cleaned = Arc::new(Mutex::new(false));
        let cleaned_in = cleaned.clone();

        let mut chart = fetch_chart();
        chart
            .on_enter("idle", move |_ctx| {
                let cleaned = cleaned_in.clone();
                Ok(EffectFlow::cleanup(move || {
                    *cleaned.lock().unwrap() = true;
                    Ok(())
                }))
            })
            .unwrap();

        let machine = Machine::new(chart).unwrap();
        let watch = StateWatch::new(machine.clone());
        drop(watch);

        assert!(*cleaned.lock().unwrap());
        // The machine itself keeps accepting ordinary sends.
        machine.send("FETCH").unwrap();
        assert_eq!(machine.snapshot().state, "loading");
    }
}
