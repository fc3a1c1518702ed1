//! Deferred-effect demo: a request that settles asynchronously and
//! auto-advances the machine through SUCCESS or ERROR.
//!
//! Run with `cargo run --example fetch`.

use flowstate::adapter::StateWatch;
use flowstate::effects::EffectFlow;
use flowstate::{chart, Machine};
use std::time::Duration;

async fn fake_request(url: String) -> Result<String, String> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    if url.contains("flowstate") {
        Ok(format!("200 OK from {url}"))
    } else {
        Err(format!("unreachable host: {url}"))
    }
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
        initial: idle,
        states: {
            idle {
                on: { FETCH => loading },
            },
            loading {
                enter: |_ctx| {
                    Ok(EffectFlow::defer(fake_request(
                        "https://flowstate.dev/status".to_string(),
                    )))
                },
                on: { SUCCESS => done, ERROR => failed },
            },
            done {},
            failed {},
        }
    };

    let machine = Machine::new(chart)?;
    let mut watch = StateWatch::new(machine);

    println!("-> {}", watch.snapshot().state);
    watch.send("FETCH")?;

    loop {
        watch.changed().await?;
        let snapshot = watch.snapshot();
        println!("-> {}", snapshot.state);
        match snapshot.state.as_str() {
            "done" => {
                let body = snapshot
                    .payload
                    .as_ref()
                    .and_then(|p| p.downcast_ref::<String>())
                    .cloned()
                    .unwrap_or_default();
                println!("   response: {body}");
                break;
            }
            "failed" => {
                println!("   request failed");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
