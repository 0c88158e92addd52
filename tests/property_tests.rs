//! Property-based tests for the chain algebra.
//!
//! These tests use proptest to verify the short-circuit, associativity,
//! and laziness laws hold across many randomly generated inputs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use sealway::{Direct, Sealed};

type Chain = Sealed<Direct, i64, String>;

/// An effectful step that records its tag and applies a small function.
fn traced_step(
    tag: &'static str,
    delta: i64,
    trace: &Rc<RefCell<Vec<(&'static str, i64)>>>,
) -> impl 'static + FnOnce(i64) -> Chain {
    let trace = Rc::clone(trace);
    move |v| {
        Sealed::lift_effect(move || {
            trace.borrow_mut().push((tag, v));
            v.wrapping_add(delta)
        })
    }
}

proptest! {
    #[test]
    fn flat_map_is_associative(
        start in -1_000i64..1_000,
        d1 in -100i64..100,
        d2 in -100i64..100,
    ) {
        let left_trace = Rc::new(RefCell::new(Vec::new()));
        let f = traced_step("f", d1, &left_trace);
        let g = traced_step("g", d2, &left_trace);
        let left = Chain::lift_value(start)
            .flat_map(f)
            .flat_map(g)
            .run_with(|v| v.to_string());

        let right_trace = Rc::new(RefCell::new(Vec::new()));
        let f = traced_step("f", d1, &right_trace);
        let g = traced_step("g", d2, &right_trace);
        let right = Chain::lift_value(start)
            .flat_map(move |a| f(a).flat_map(g))
            .run_with(|v| v.to_string());

        prop_assert_eq!(left, right);
        prop_assert_eq!(&*left_trace.borrow(), &*right_trace.borrow());
    }

    #[test]
    fn terminal_is_idempotent_under_every_combinator(outcome in "\\PC{0,20}") {
        let effects = Rc::new(Cell::new(0u32));
        let bump = |effects: &Rc<Cell<u32>>| {
            let effects = Rc::clone(effects);
            move || effects.set(effects.get() + 1)
        };

        let (e1, e2, e3, e4, e5) = (
            bump(&effects), bump(&effects), bump(&effects), bump(&effects), bump(&effects),
        );
        let result = Chain::terminal(outcome.clone())
            .map(move |v| { e1(); v + 1 })
            .flat_map(move |v| { e2(); Sealed::lift_value(v) })
            .ensure(move |_| { e3(); true }, "guard".to_string())
            .tap(move |_| e4())
            .semi_effect_map(move |v| { e5(); v })
            .attempt(|v| Ok::<_, String>(v))
            .run_with(|v| v.to_string());

        prop_assert_eq!(result, outcome);
        prop_assert_eq!(effects.get(), 0);
    }

    #[test]
    fn ensure_is_identity_when_the_predicate_holds(v in -1_000i64..1_000) {
        let plain = Chain::lift_value(v).run_with(|v| v.to_string());
        let guarded = Chain::lift_value(v)
            .ensure(|_| true, "never".to_string())
            .run_with(|v| v.to_string());
        prop_assert_eq!(plain, guarded);
    }

    #[test]
    fn ensure_is_complete_when_the_predicate_fails(v in -1_000i64..1_000, outcome in "\\PC{0,20}") {
        let guarded = Chain::lift_value(v)
            .ensure(|_| false, outcome.clone())
            .run_with(|v| v.to_string());
        let completed = Chain::lift_value(v)
            .complete(move |_| outcome)
            .run();
        prop_assert_eq!(guarded, completed);
    }

    #[test]
    fn attempt_coheres_with_map_then_rethrow(v in -1_000i64..1_000, pivot in -1_000i64..1_000) {
        let split = move |v: i64| {
            if v < pivot {
                Ok(v * 2)
            } else {
                Err(format!("past:{pivot}"))
            }
        };
        let attempted = Chain::lift_value(v).attempt(split).run_with(|v| v.to_string());
        let rethrown = Chain::lift_value(v).map(split).rethrow().run_with(|v| v.to_string());
        prop_assert_eq!(attempted, rethrown);
    }

    #[test]
    fn value_or_matches_lift_value_or_terminal(found in proptest::option::of(-1_000i64..1_000)) {
        let via_value_or = Chain::value_or(move || found, "absent".to_string())
            .run_with(|v| v.to_string());
        let expected = match found {
            Some(v) => Chain::lift_value(v).run_with(|v| v.to_string()),
            None => Chain::terminal("absent".to_string()).run_with(|v| v.to_string()),
        };
        prop_assert_eq!(via_value_or, expected);
    }

    #[test]
    fn reached_effects_run_exactly_once(start in -1_000i64..1_000) {
        let runs = Rc::new(Cell::new(0u32));
        let probe = Rc::clone(&runs);
        let result = Chain::lift_value(start)
            .semi_effect_map(move |v| {
                probe.set(probe.get() + 1);
                v
            })
            .run_with(|v| v.to_string());
        prop_assert_eq!(result, start.to_string());
        prop_assert_eq!(runs.get(), 1);
    }

    #[test]
    fn fold_recovery_reopens_the_value_track(outcome in "\\PC{1,20}", fallback in -1_000i64..1_000) {
        let recovered = Chain::terminal(outcome)
            .fold(move |_| Sealed::lift_value(fallback), Sealed::lift_value)
            .map(|v| v + 1)
            .run_with(|v| v.to_string());
        prop_assert_eq!(recovered, (fallback + 1).to_string());
    }

    #[test]
    fn to_either_reifies_exactly_the_resolution(v in -1_000i64..1_000, seal in any::<bool>()) {
        let chain = if seal {
            Chain::terminal(format!("sealed:{v}"))
        } else {
            Chain::lift_value(v)
        };
        let reified = chain.to_either().run_with(|either| match either {
            Ok(value) => format!("value:{value}"),
            Err(outcome) => format!("outcome:{outcome}"),
        });
        let expected = if seal {
            format!("outcome:sealed:{v}")
        } else {
            format!("value:{v}")
        };
        prop_assert_eq!(reified, expected);
    }
}
