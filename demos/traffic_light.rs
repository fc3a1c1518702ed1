//! Timer-driven demo: each light defers a delay and the machine advances
//! itself when the delay settles. Stopping the machine discards whichever
//! delay is still pending.
//!
//! Run with `cargo run --example traffic_light`.

use flowstate::effects::EffectFlow;
use flowstate::{chart, Machine};
use std::convert::Infallible;
use std::time::Duration;

fn hold(duration: Duration) -> EffectFlow {
    EffectFlow::defer(async move {
        tokio::time::sleep(duration).await;
        Ok::<(), Infallible>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowstate=debug".into()),
        )
        .init();

    let chart = chart! {
        initial: red,
        states: {
            red {
                enter: |_ctx| Ok(hold(Duration::from_millis(900))),
                on: { SUCCESS => green },
            },
            green {
                enter: |_ctx| Ok(hold(Duration::from_millis(600))),
                on: { SUCCESS => yellow },
            },
            yellow {
                enter: |_ctx| Ok(hold(Duration::from_millis(300))),
                on: { SUCCESS => red },
            },
        }
    };

    let machine = Machine::new(chart)?;
    println!("light: {}", machine.snapshot().state);

    let _sub = machine.subscribe(|snapshot| {
        println!("light: {}", snapshot.state);
    });

    tokio::time::sleep(Duration::from_secs(4)).await;
    machine.stop();
    println!("stopped at: {}", machine.snapshot().state);

    Ok(())
}
