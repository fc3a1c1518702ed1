//! Macros for ergonomic chart construction.

/// Build a [`Chart`](crate::core::Chart) from a table literal.
///
/// Sugar over [`ChartBuilder`](crate::builder::ChartBuilder); panics at
/// construction if the table is invalid (duplicate states or triggers,
/// undefined initial state).
///
/// Each state takes an optional `enter:` effect and an optional `on:` block
/// of `EVENT => target` arms. `resolve:` and `reject:` rename the reserved
/// auto-dispatch events.
///
/// # Example
///
/// ```rust
/// use flowstate::chart;
/// use flowstate::effects::EffectFlow;
///
/// let chart = chart! {
///     initial: idle,
///     states: {
///         idle {
///             on: { FETCH => loading },
///         },
///         loading {
///             enter: |_ctx| Ok(EffectFlow::Done),
///             on: { SUCCESS => done, ERROR => failed },
///         },
///         done {},
///         failed {},
///     }
/// };
///
/// assert_eq!(chart.initial(), "idle");
/// assert_eq!(chart.node("loading").unwrap().events(), vec!["SUCCESS", "ERROR"]);
/// ```
#[macro_export]
macro_rules! chart {
    (
        initial: $initial:ident,
        $( resolve: $resolve:literal, )?
        $( reject: $reject:literal, )?
        states: {
            $(
                $state:ident {
                    $( enter: $enter:expr, )?
                    $( on: { $( $event:ident => $target:ident ),* $(,)? } $(,)? )?
                }
            ),* $(,)?
        }
    ) => {{
        let builder = $crate::builder::ChartBuilder::new()
            .initial(stringify!($initial));
        $( let builder = builder.resolve_event($resolve); )?
        $( let builder = builder.reject_event($reject); )?
        $(
            let state = $crate::builder::StateBuilder::new(stringify!($state));
            $( let state = state.enter($enter); )?
            $( $( let state = state.on(stringify!($event), stringify!($target)); )* )?
            let builder = builder.state(state);
        )*
        builder.build().expect("chart! produced an invalid chart")
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::Payload;
    use crate::effects::EffectFlow;
    use crate::machine::Machine;

    #[test]
    fn chart_macro_builds_transition_table() {
        let chart = chart! {
            initial: idle,
            states: {
                idle { on: { FETCH => loading } },
                loading { on: { RESOLVE => success, REJECT => failure } },
                success {},
                failure {},
            }
        };

        assert_eq!(chart.initial(), "idle");
        assert_eq!(chart.node("idle").unwrap().target_for("FETCH"), Some("loading"));
        assert_eq!(chart.node("loading").unwrap().events(), vec!["RESOLVE", "REJECT"]);
        assert!(chart.validate().is_ok());
    }

    #[test]
    fn chart_macro_attaches_effects() {
        let chart = chart! {
            initial: greeting,
            states: {
                greeting {
                    enter: |ctx| {
                        assert!(ctx.from.is_none());
                        Ok(EffectFlow::Done)
                    },
                },
            }
        };

        let machine = Machine::new(chart).unwrap();
        assert_eq!(machine.snapshot().state, "greeting");
    }

    #[test]
    fn chart_macro_renames_reserved_events() {
        let chart = chart! {
            initial: a,
            resolve: "OK",
            reject: "FAIL",
            states: {
                a {
                    enter: |_ctx| Err("boom".into()),
                    on: { FAIL => safe },
                },
                safe {},
            }
        };

        assert_eq!(chart.reject_event(), "FAIL");

        // The renamed reject event carries the init failure.
        let machine = Machine::new(chart).unwrap();
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.state, "safe");
        assert!(snapshot.payload.as_ref().and_then(Payload::as_error).is_some());
    }
}
