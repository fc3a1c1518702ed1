//! Property-based tests for the transition engine.
//!
//! These tests use proptest to drive a fixed chart with arbitrary event
//! sequences and check the engine against a pure model of the table:
//! snapshot identity only changes on real transitions, payload identity is
//! preserved, available events always match declaration order, and every
//! departed activation is cleaned up exactly once.

use flowstate::builder::{ChartBuilder, StateBuilder};
use flowstate::core::{Chart, Payload};
use flowstate::effects::EffectFlow;
use flowstate::machine::Machine;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const EVENTS: &[&str] = &[
    "FETCH", "RESOLVE", "REJECT", "CANCEL", "RESET", "RETRY", "PING", "NOPE",
];

/// Pure mirror of the transition table the chart below declares.
fn model_target(state: &str, event: &str) -> Option<&'static str> {
    match (state, event) {
        ("idle", "FETCH") => Some("loading"),
        ("idle", "PING") => Some("idle"),
        ("loading", "RESOLVE") => Some("success"),
        ("loading", "REJECT") => Some("failure"),
        ("loading", "CANCEL") => Some("idle"),
        ("success", "RESET") => Some("idle"),
        ("failure", "RETRY") => Some("loading"),
        _ => None,
    }
}

fn declared_events(state: &str) -> Vec<&'static str> {
    match state {
        "idle" => vec!["FETCH", "PING"],
        "loading" => vec!["RESOLVE", "REJECT", "CANCEL"],
        "success" => vec!["RESET"],
        "failure" => vec!["RETRY"],
        _ => vec![],
    }
}

/// Chart matching `model_target`, with an enter effect on every state that
/// registers a cleanup counting invocations.
fn instrumented_chart(cleanups: Arc<AtomicUsize>) -> Chart {
    let mut chart = ChartBuilder::new()
        .initial("idle")
        .state(StateBuilder::new("idle").on("FETCH", "loading").on("PING", "idle"))
        .state(
            StateBuilder::new("loading")
                .on("RESOLVE", "success")
                .on("REJECT", "failure")
                .on("CANCEL", "idle"),
        )
        .state(StateBuilder::new("success").on("RESET", "idle"))
        .state(StateBuilder::new("failure").on("RETRY", "loading"))
        .build()
        .unwrap();

    for state in ["idle", "loading", "success", "failure"] {
        let cleanups = cleanups.clone();
        chart
            .on_enter(state, move |_ctx| {
                let cleanups = cleanups.clone();
                Ok(EffectFlow::cleanup(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }))
            })
            .unwrap();
    }

    chart
}

fn arbitrary_event() -> impl Strategy<Value = &'static str> {
    prop::sample::select(EVENTS)
}

proptest! {
    #[test]
    fn machine_tracks_the_pure_model(events in prop::collection::vec(arbitrary_event(), 0..25)) {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let machine = Machine::new(instrumented_chart(cleanups.clone())).unwrap();

        let notifications = Arc::new(AtomicUsize::new(0));
        let notifications_in = notifications.clone();
        let _sub = machine.subscribe(move |_snap| {
            notifications_in.fetch_add(1, Ordering::SeqCst);
        });

        let mut expected = "idle".to_string();
        let mut transitions = 0usize;

        for event in events {
            let before = machine.snapshot();
            machine.send(event).unwrap();
            let after = machine.snapshot();

            let transitioned = match model_target(&expected, event) {
                Some(target) if target != expected => {
                    expected = target.to_string();
                    true
                }
                _ => false,
            };

            if transitioned {
                transitions += 1;
                prop_assert!(!Arc::ptr_eq(&before, &after));
            } else {
                prop_assert!(Arc::ptr_eq(&before, &after));
            }

            prop_assert_eq!(&after.state, &expected);
            prop_assert_eq!(&after.events, &declared_events(&expected));
        }

        prop_assert_eq!(notifications.load(Ordering::SeqCst), transitions);
        // Every departed activation was cleaned exactly once.
        prop_assert_eq!(cleanups.load(Ordering::SeqCst), transitions);

        // stop() cleans the live activation; a second stop() changes nothing.
        machine.stop();
        machine.stop();
        prop_assert_eq!(cleanups.load(Ordering::SeqCst), transitions + 1);
    }

    #[test]
    fn payload_identity_survives_every_transition(
        events in prop::collection::vec(arbitrary_event(), 0..25),
        values in prop::collection::vec(any::<u64>(), 25)
    ) {
        let machine = Machine::new(instrumented_chart(Arc::new(AtomicUsize::new(0)))).unwrap();
        let mut expected = "idle".to_string();

        for (event, value) in events.into_iter().zip(values) {
            let payload = Payload::new(value);
            machine.send_with(event, payload.clone()).unwrap();
            let snapshot = machine.snapshot();

            match model_target(&expected, event) {
                Some(target) if target != expected => {
                    expected = target.to_string();
                    let installed = snapshot.payload.as_ref().unwrap();
                    prop_assert!(Payload::ptr_eq(installed, &payload));
                    prop_assert_eq!(installed.downcast_ref::<u64>(), Some(&value));
                }
                _ => {
                    // A payload on a non-transitioning send is discarded.
                    prop_assert_eq!(&snapshot.state, &expected);
                }
            }
        }
    }
}
