//! The chain type and its combinators.

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use crate::context::EffectContext;
use crate::core::eval;
use crate::core::node::{reclaim, Link, Node};

/// A short-circuiting sequential computation.
///
/// A `Sealed<C, A, R>` is a chain of steps that, when run under the
/// effect context `C`, either carries an in-flight value of type `A`
/// forward or resolves to a terminal business outcome of type `R`. Once
/// a step produces a terminal outcome the chain is sealed: every later
/// combinator passes the outcome through unchanged and schedules no
/// further effects.
///
/// `R` is a caller-defined closed set of responses, not an error type —
/// a successful-but-different-shaped response is modeled the same way as
/// a failure. Failures native to the effect context (an `Err` under
/// [`Fallible`](crate::Fallible), a panicking future) are not caught or
/// translated; they propagate through the context's own channel.
///
/// Chains are built lazily (constructing a node never runs its effect)
/// and consumed exactly once by [`run_with`](Sealed::run_with) or
/// [`run`](Sealed::run).
///
/// # Example
///
/// ```rust
/// use sealway::{Direct, Sealed};
///
/// #[derive(Debug, PartialEq)]
/// enum Response {
///     Ok(String),
///     Negative,
///     TooBig,
/// }
///
/// let response = Sealed::<Direct, _, Response>::lift_value(5)
///     .ensure(|v| *v > 0, Response::Negative)
///     .ensure(|v| *v < 10, Response::TooBig)
///     .complete(|v| Response::Ok(format!("Ok:{v}")))
///     .run();
/// assert_eq!(response, Response::Ok("Ok:5".to_string()));
/// ```
pub struct Sealed<C: EffectContext, A, R: 'static> {
    node: Node<C, R>,
    _value: PhantomData<fn() -> A>,
}

impl<C: EffectContext, A: 'static, R: 'static> Sealed<C, A, R> {
    fn from_node(node: Node<C, R>) -> Self {
        Sealed {
            node,
            _value: PhantomData,
        }
    }

    /// Lift an already-known value into a chain.
    pub fn lift_value(value: A) -> Self {
        Self::from_node(Node::Pure(Box::new(value)))
    }

    /// Lift a deferred effect into a chain. The thunk is not invoked
    /// until the evaluator reaches this node, and then at most once.
    pub fn lift_effect<F>(thunk: F) -> Self
    where
        F: FnOnce() -> C::Effect<A> + 'static,
    {
        Self::from_node(Node::Effect(Box::new(move || {
            C::map(thunk(), |value| Box::new(value) as Box<dyn Any>)
        })))
    }

    /// Start a chain already sealed with a terminal outcome.
    ///
    /// The outcome is a plain value: nothing is forced at construction
    /// because there is nothing to force. Use
    /// [`terminal_effect`](Sealed::terminal_effect) when producing the
    /// outcome itself requires an effect.
    pub fn terminal(result: R) -> Self {
        Self::from_node(Node::Final(result))
    }

    /// Start a chain sealed with a deferred terminal outcome.
    pub fn terminal_effect<F>(thunk: F) -> Self
    where
        F: FnOnce() -> C::Effect<R> + 'static,
    {
        Self::from_node(Node::DeferredFinal(Box::new(thunk)))
    }

    /// Consume an optional-valued effect: a present value continues the
    /// chain, an absent one seals it with `outcome`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sealway::{Direct, Sealed};
    ///
    /// let outcome = Sealed::<Direct, i32, &str>::value_or(|| None, "NotFound")
    ///     .complete(|_| "Found")
    ///     .run();
    /// assert_eq!(outcome, "NotFound");
    /// ```
    pub fn value_or<F>(thunk: F, outcome: R) -> Self
    where
        F: FnOnce() -> C::Effect<Option<A>> + 'static,
    {
        Sealed::<C, Option<A>, R>::lift_effect(thunk).flat_map(move |found| match found {
            Some(value) => Sealed::lift_value(value),
            None => Sealed::terminal(outcome),
        })
    }

    /// Like [`value_or`](Sealed::value_or), but the fallback outcome is
    /// itself produced by an effect, which runs only in the absent case.
    pub fn value_or_effect<F, G>(thunk: F, otherwise: G) -> Self
    where
        F: FnOnce() -> C::Effect<Option<A>> + 'static,
        G: FnOnce() -> C::Effect<R> + 'static,
    {
        Sealed::<C, Option<A>, R>::lift_effect(thunk).flat_map(move |found| match found {
            Some(value) => Sealed::lift_value(value),
            None => Sealed::terminal_effect(otherwise),
        })
    }

    /// Consume an either-valued effect, sealing the chain on the error
    /// side: `Ok` continues with the value, `Err` becomes a terminal
    /// outcome via `to_outcome`.
    pub fn merge_either<E, F, G>(thunk: F, to_outcome: G) -> Self
    where
        E: 'static,
        F: FnOnce() -> C::Effect<Result<A, E>> + 'static,
        G: FnOnce(E) -> R + 'static,
    {
        Sealed::<C, Result<A, E>, R>::lift_effect(thunk).flat_map(move |either| match either {
            Ok(value) => Sealed::lift_value(value),
            Err(error) => Sealed::terminal(to_outcome(error)),
        })
    }

    /// Consume an either-valued effect, recovering the error side back
    /// into an in-flight value instead of sealing the chain.
    pub fn handle_error<E, F, G>(thunk: F, recover: G) -> Self
    where
        E: 'static,
        F: FnOnce() -> C::Effect<Result<A, E>> + 'static,
        G: FnOnce(E) -> A + 'static,
    {
        Sealed::<C, Result<A, E>, R>::lift_effect(thunk).map(move |either| match either {
            Ok(value) => value,
            Err(error) => recover(error),
        })
    }

    /// Transform the in-flight value.
    pub fn map<B: 'static, F>(self, f: F) -> Sealed<C, B, R>
    where
        F: FnOnce(A) -> B + 'static,
    {
        Sealed::from_node(Node::Bind {
            prior: Link::new(self.node),
            cont: Box::new(move |value| Node::Pure(Box::new(f(reclaim::<A>(value))))),
        })
    }

    /// Sequence a dependent chain after this one. If this chain seals
    /// first, `f` is never invoked.
    pub fn flat_map<B: 'static, F>(self, f: F) -> Sealed<C, B, R>
    where
        F: FnOnce(A) -> Sealed<C, B, R> + 'static,
    {
        Sealed::from_node(Node::Bind {
            prior: Link::new(self.node),
            cont: Box::new(move |value| f(reclaim::<A>(value)).node),
        })
    }

    /// Sequence an effect after this chain, continuing with its result.
    pub fn semi_effect_map<B: 'static, F>(self, f: F) -> Sealed<C, B, R>
    where
        F: FnOnce(A) -> C::Effect<B> + 'static,
    {
        self.flat_map(|value| Sealed::lift_effect(move || f(value)))
    }

    /// End the chain, converting the in-flight value into a terminal
    /// outcome. The returned chain has no live value, which is what
    /// makes [`run`](Sealed::run) available on it.
    pub fn complete<F>(self, f: F) -> Sealed<C, Infallible, R>
    where
        F: FnOnce(A) -> R + 'static,
    {
        self.flat_map(|value| Sealed::terminal(f(value)))
    }

    /// End the chain with an effectfully produced terminal outcome.
    pub fn complete_effect<F>(self, f: F) -> Sealed<C, Infallible, R>
    where
        F: FnOnce(A) -> C::Effect<R> + 'static,
    {
        self.flat_map(|value| Sealed::terminal_effect(move || f(value)))
    }

    /// Branch the value: `Ok` continues, `Err` seals. Equivalent to
    /// `map(f).rethrow()`.
    pub fn attempt<B: 'static, F>(self, f: F) -> Sealed<C, B, R>
    where
        F: FnOnce(A) -> Result<B, R> + 'static,
    {
        self.map(f).rethrow()
    }

    /// Effectful counterpart of [`attempt`](Sealed::attempt).
    pub fn attempt_effect<B: 'static, F>(self, f: F) -> Sealed<C, B, R>
    where
        F: FnOnce(A) -> C::Effect<Result<B, R>> + 'static,
    {
        self.semi_effect_map(f).rethrow()
    }

    /// Branch on how the chain so far resolves. This is the only
    /// combinator able to observe — and recover from — a terminal
    /// outcome produced upstream.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sealway::{Direct, Sealed};
    ///
    /// let recovered = Sealed::<Direct, i32, &str>::terminal("Missing")
    ///     .fold(|_| Sealed::lift_value(0), Sealed::lift_value)
    ///     .complete(|v| if v == 0 { "Defaulted" } else { "Present" })
    ///     .run();
    /// assert_eq!(recovered, "Defaulted");
    /// ```
    pub fn fold<B: 'static, F, G>(self, on_final: F, on_value: G) -> Sealed<C, B, R>
    where
        F: FnOnce(R) -> Sealed<C, B, R> + 'static,
        G: FnOnce(A) -> Sealed<C, B, R> + 'static,
    {
        Sealed::from_node(Node::Fold {
            prior: Link::new(self.node),
            cont: Box::new(move |taken| match taken {
                Ok(value) => on_value(reclaim::<A>(value)).node,
                Err(result) => on_final(result).node,
            }),
        })
    }

    /// Convert the control-flow short-circuit into an explicit value:
    /// the chain continues with `Ok(value)` or `Err(outcome)`, and stops
    /// short-circuiting from this point on.
    pub fn to_either(self) -> Sealed<C, Result<A, R>, R> {
        self.fold(
            |result| Sealed::lift_value(Err(result)),
            |value| Sealed::lift_value(Ok(value)),
        )
    }

    /// Seal the chain with `outcome` unless the predicate holds.
    pub fn ensure<P>(self, predicate: P, outcome: R) -> Self
    where
        P: FnOnce(&A) -> bool + 'static,
    {
        self.ensure_or(predicate, move |_| outcome)
    }

    /// Seal the chain with an outcome computed from the value unless the
    /// predicate holds.
    pub fn ensure_or<P, F>(self, predicate: P, to_outcome: F) -> Self
    where
        P: FnOnce(&A) -> bool + 'static,
        F: FnOnce(A) -> R + 'static,
    {
        self.attempt(move |value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(to_outcome(value))
            }
        })
    }

    /// Seal the chain with `outcome` if the predicate holds.
    pub fn ensure_not<P>(self, predicate: P, outcome: R) -> Self
    where
        P: FnOnce(&A) -> bool + 'static,
    {
        self.ensure(move |value| !predicate(value), outcome)
    }

    /// Observe the current resolution — `Ok(&value)` or `Err(&outcome)`
    /// — without changing it. The observer sees exactly the discriminant
    /// that is re-emitted; it can never substitute a different one.
    pub fn inspect<F>(self, observer: F) -> Self
    where
        F: FnOnce(&Result<A, R>) + 'static,
    {
        Sealed::from_node(Node::Fold {
            prior: Link::new(self.node),
            cont: Box::new(move |taken| {
                let observed: Result<A, R> = taken.map(reclaim::<A>);
                observer(&observed);
                match observed {
                    Ok(value) => Node::Pure(Box::new(value)),
                    Err(result) => Node::Final(result),
                }
            }),
        })
    }

    /// Pure side observation of the value; its result is discarded and
    /// the value passes through unchanged.
    pub fn tap<B, F>(self, observer: F) -> Self
    where
        F: FnOnce(&A) -> B + 'static,
    {
        self.map(move |value| {
            observer(&value);
            value
        })
    }

    /// Effectful side observation of the value; the effect's result is
    /// discarded and the value passes through unchanged.
    pub fn flat_tap<B: 'static, F>(self, observer: F) -> Self
    where
        A: Clone,
        F: FnOnce(A) -> C::Effect<B> + 'static,
    {
        self.flat_map(move |value| {
            let observed = value.clone();
            Sealed::<C, B, R>::lift_effect(move || observer(observed)).map(move |_| value)
        })
    }

    /// Like [`flat_tap`](Sealed::flat_tap), but the observation effect
    /// is only scheduled when `condition` holds on the value.
    pub fn flat_tap_when<B: 'static, P, F>(self, condition: P, observer: F) -> Self
    where
        A: Clone,
        P: FnOnce(&A) -> bool + 'static,
        F: FnOnce(A) -> C::Effect<B> + 'static,
    {
        self.flat_map(move |value| {
            if condition(&value) {
                let observed = value.clone();
                Sealed::<C, B, R>::lift_effect(move || observer(observed)).map(move |_| value)
            } else {
                Sealed::lift_value(value)
            }
        })
    }

    /// Observe whichever branch the chain is about to resolve to,
    /// without altering which branch is taken.
    pub fn bi_tap<F, G>(self, on_final: F, on_value: G) -> Self
    where
        F: FnOnce(&R) + 'static,
        G: FnOnce(&A) + 'static,
    {
        self.inspect(move |taken| match taken {
            Ok(value) => on_value(value),
            Err(result) => on_final(result),
        })
    }

    /// Consume the chain, reducing it to an effectful computation of the
    /// final outcome. A chain still carrying a bare value when it ends
    /// is coerced into the result type by `coerce`.
    ///
    /// Evaluation is driven by the effect context's own iteration
    /// primitive, so chain depth is bounded by heap, not call-stack,
    /// memory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sealway::{Direct, Sealed};
    ///
    /// let n = Sealed::<Direct, i32, i32>::lift_value(20)
    ///     .map(|v| v + 1)
    ///     .run_with(|v| v);
    /// assert_eq!(n, 21);
    /// ```
    pub fn run_with<F>(self, coerce: F) -> C::Effect<R>
    where
        F: FnOnce(A) -> R + 'static,
    {
        C::map(eval::evaluate::<C, R>(self.node), |outcome| match outcome {
            Ok(value) => coerce(reclaim::<A>(value)),
            Err(result) => result,
        })
    }
}

impl<C: EffectContext, B: 'static, R: 'static> Sealed<C, Result<B, R>, R> {
    /// Rethrow an either-shaped value onto the chain's two tracks:
    /// `Ok` continues with the value, `Err` seals the chain.
    pub fn rethrow(self) -> Sealed<C, B, R> {
        self.flat_map(|either| match either {
            Ok(value) => Sealed::lift_value(value),
            Err(result) => Sealed::terminal(result),
        })
    }
}

impl<C: EffectContext, R: 'static> Sealed<C, Infallible, R> {
    /// Consume a completed chain. Available once
    /// [`complete`](Sealed::complete) or
    /// [`complete_effect`](Sealed::complete_effect) has eliminated the
    /// value track, so no coercion is needed.
    pub fn run(self) -> C::Effect<R> {
        self.run_with(|never| match never {})
    }
}

impl<C: EffectContext, A, R: 'static> fmt::Debug for Sealed<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sealed").field(&self.node.shape()).finish()
    }
}
