//! The trampoline: reduces a node tree to a final outcome one step at a
//! time.
//!
//! Reduction never recurses on the host call stack. The driver loop is
//! the effect context's own [`iterate`](crate::EffectContext::iterate)
//! primitive, and the state it threads is a [`Machine`]: the node under
//! reduction plus an explicit stack of pending continuation frames. A
//! `Bind`/`Fold` node is unfolded by pushing its continuation as a frame
//! and descending into its prior, so arbitrarily left-nested chains
//! flatten into the frame stack instead of nesting on the call stack.
//! Every step is O(1); a terminal outcome discards skipped frames one
//! per step, and effects fire in exactly the left-to-right order they
//! were chained.

use crate::context::{EffectContext, Step};
use crate::core::node::{Erased, Node};

/// How a fully reduced chain ended: `Ok` is a bare in-flight value,
/// `Err` a terminal outcome.
pub(crate) type Outcome<R> = Result<Erased, R>;

/// A continuation waiting on the node currently under reduction.
enum Frame<C: EffectContext, R: 'static> {
    /// Wants a value; skipped wholesale by a terminal outcome.
    Bind(Box<dyn FnOnce(Erased) -> Node<C, R>>),
    /// Wants the resolution either way.
    Fold(Box<dyn FnOnce(Result<Erased, R>) -> Node<C, R>>),
}

/// The full evaluator state threaded through `iterate`.
struct Machine<C: EffectContext, R: 'static> {
    node: Node<C, R>,
    frames: Vec<Frame<C, R>>,
}

/// Drive `root` to a terminal state under the context's iteration
/// primitive.
pub(crate) fn evaluate<C: EffectContext, R: 'static>(root: Node<C, R>) -> C::Effect<Outcome<R>> {
    C::iterate(
        Machine {
            node: root,
            frames: Vec::new(),
        },
        advance::<C, R>,
    )
}

/// One reduction step. Consumes the current machine state and yields
/// either its successor or the final outcome.
fn advance<C: EffectContext, R: 'static>(
    mut machine: Machine<C, R>,
) -> C::Effect<Step<Machine<C, R>, Outcome<R>>> {
    match machine.node {
        Node::Bind { prior, cont } => {
            machine.frames.push(Frame::Bind(cont));
            machine.node = prior.into_node();
            C::pure(Step::Continue(machine))
        }
        Node::Fold { prior, cont } => {
            machine.frames.push(Frame::Fold(cont));
            machine.node = prior.into_node();
            C::pure(Step::Continue(machine))
        }
        Node::Pure(value) => {
            let mut frames = machine.frames;
            match frames.pop() {
                None => C::pure(Step::Done(Ok(value))),
                Some(Frame::Bind(cont)) => C::pure(Step::Continue(Machine {
                    node: cont(value),
                    frames,
                })),
                Some(Frame::Fold(cont)) => C::pure(Step::Continue(Machine {
                    node: cont(Ok(value)),
                    frames,
                })),
            }
        }
        Node::Effect(thunk) => {
            let frames = machine.frames;
            C::map(thunk(), |value| {
                Step::Continue(Machine {
                    node: Node::Pure(value),
                    frames,
                })
            })
        }
        Node::Final(result) => {
            let mut frames = machine.frames;
            match frames.pop() {
                None => C::pure(Step::Done(Err(result))),
                // Short-circuit: the skipped continuation is dropped
                // here, one frame per step.
                Some(Frame::Bind(_)) => C::pure(Step::Continue(Machine {
                    node: Node::Final(result),
                    frames,
                })),
                Some(Frame::Fold(cont)) => C::pure(Step::Continue(Machine {
                    node: cont(Err(result)),
                    frames,
                })),
            }
        }
        Node::DeferredFinal(thunk) => {
            let mut frames = machine.frames;
            match frames.pop() {
                None => C::map(thunk(), |result| Step::Done(Err(result))),
                // The thunk yields R and the frame is value-agnostic, so
                // the outcome propagates without forcing the thunk.
                Some(Frame::Bind(_)) => C::pure(Step::Continue(Machine {
                    node: Node::DeferredFinal(thunk),
                    frames,
                })),
                Some(Frame::Fold(cont)) => C::map(thunk(), |result| {
                    Step::Continue(Machine {
                        node: cont(Err(result)),
                        frames,
                    })
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::context::Direct;
    use crate::core::Sealed;

    type Chain<A> = Sealed<Direct, A, String>;

    #[test]
    fn deep_flat_map_tower_reduces_without_overflow() {
        let mut chain: Chain<u64> = Sealed::lift_value(0u64);
        for _ in 0..50_000 {
            chain = chain.flat_map(|n| Sealed::lift_value(n + 1));
        }
        let result = chain.run_with(|n| n.to_string());
        assert_eq!(result, "50000");
    }

    #[test]
    fn deep_map_tower_reduces_without_overflow() {
        let mut chain: Chain<u64> = Sealed::lift_value(0u64);
        for _ in 0..50_000 {
            chain = chain.map(|n| n + 1);
        }
        assert_eq!(chain.run_with(|n| n.to_string()), "50000");
    }

    #[test]
    fn deep_tower_short_circuits_to_the_terminal_outcome() {
        let mut chain: Chain<u64> = Sealed::terminal("stopped".to_string());
        for _ in 0..50_000 {
            chain = chain.map(|n| n + 1);
        }
        assert_eq!(chain.run_with(|n| n.to_string()), "stopped");
    }

    #[test]
    fn deep_tower_drops_unevaluated_without_overflow() {
        let mut chain: Chain<u64> = Sealed::lift_value(0u64);
        for _ in 0..25_000 {
            chain = chain
                .map(|n| n + 1)
                .fold(Sealed::terminal, Sealed::lift_value);
        }
        drop(chain);
    }

    #[test]
    fn effects_fire_in_chained_order_regardless_of_nesting() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let record = |tag: &'static str, trace: &Rc<RefCell<Vec<&'static str>>>| {
            let trace = Rc::clone(trace);
            move |n: u64| {
                Sealed::<Direct, u64, String>::lift_effect(move || {
                    trace.borrow_mut().push(tag);
                    n + 1
                })
            }
        };

        // Left-nested and hand-nested groupings of the same three steps.
        let chain = Sealed::<Direct, u64, String>::lift_value(0)
            .flat_map(record("a", &trace))
            .flat_map(record("b", &trace))
            .flat_map(record("c", &trace));
        assert_eq!(chain.run_with(|n| n.to_string()), "3");
        assert_eq!(*trace.borrow(), vec!["a", "b", "c"]);

        trace.borrow_mut().clear();
        let a = record("a", &trace);
        let b = record("b", &trace);
        let c = record("c", &trace);
        let nested = Sealed::<Direct, u64, String>::lift_value(0)
            .flat_map(move |n| a(n).flat_map(move |n| b(n).flat_map(c)));
        assert_eq!(nested.run_with(|n| n.to_string()), "3");
        assert_eq!(*trace.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn fold_under_bind_recovers_and_keeps_chaining() {
        let chain = Sealed::<Direct, u64, String>::terminal("missing".to_string())
            .fold(
                |_| Sealed::lift_value(100),
                |n| Sealed::lift_value(n),
            )
            .map(|n| n + 1);
        assert_eq!(chain.run_with(|n| n.to_string()), "101");
    }

    #[test]
    fn fold_over_bind_observes_the_propagated_terminal() {
        let chain = Sealed::<Direct, u64, String>::terminal("blocked".to_string())
            .map(|n| n + 1)
            .map(|n| n * 2)
            .fold(
                |outcome| Sealed::terminal(format!("saw:{outcome}")),
                Sealed::lift_value,
            );
        assert_eq!(chain.run_with(|n| n.to_string()), "saw:blocked");
    }

    #[test]
    fn deferred_terminal_thunk_runs_exactly_once_through_a_bind() {
        let forced = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&forced);
        let chain = Sealed::<Direct, u64, String>::terminal_effect(move || {
            *seen.borrow_mut() += 1;
            "deferred".to_string()
        })
        .map(|n| n + 1);
        assert_eq!(chain.run_with(|n| n.to_string()), "deferred");
        assert_eq!(*forced.borrow(), 1);
    }
}
