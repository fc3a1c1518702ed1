//! Rendering demo: print a chart as a Mermaid state diagram, highlighting
//! the machine's active state.
//!
//! Run with `cargo run --example diagram`.

use flowstate::graph::{render_mermaid, RenderOptions};
use flowstate::{chart, Machine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let chart = chart! {
        initial: idle,
        states: {
            idle { on: { FETCH => loading } },
            loading { on: { SUCCESS => done, ERROR => failed } },
            done { on: { RESET => idle } },
            failed { on: { RETRY => loading } },
        }
    };

    let machine = Machine::new(chart)?;
    machine.send("FETCH")?;

    let options = RenderOptions {
        highlight: Some(machine.snapshot().state.clone()),
    };
    println!("{}", render_mermaid(machine.chart(), &options));

    Ok(())
}
