//! The effect-context capability: the minimal interface a chain needs
//! from its execution substrate.
//!
//! The core never schedules, blocks, or performs I/O. Everything effectful
//! is delegated to an [`EffectContext`]: wrap a pure value, sequence a
//! dependent computation, and iterate a step function to a fixed point
//! without growing the call stack. Contexts are type-level strategies with
//! no runtime state, so picking one is a type parameter, not a value.
//!
//! Three contexts ship with the crate:
//!
//! - [`Direct`]: synchronous, `Effect<T> = T`
//! - [`Fallible<E>`]: synchronous with a native failure channel,
//!   `Effect<T> = Result<T, E>`
//! - [`Deferred`]: asynchronous, `Effect<T>` is a boxed local future

mod deferred;
mod direct;
mod fallible;

pub use deferred::Deferred;
pub use direct::Direct;
pub use fallible::Fallible;

/// One turn of a stack-safe iteration driven by [`EffectContext::iterate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<S, T> {
    /// Keep iterating with the next state.
    Continue(S),
    /// Iteration finished with a result.
    Done(T),
}

/// Capability trait for an externally supplied execution substrate.
///
/// Implementations decide what "an effectful computation of `T`" is
/// (a plain value, a `Result`, a future) and how to sequence them. The
/// chain evaluator only ever uses these three primitives, so any failure
/// raised inside an effect propagates through the context's own failure
/// channel untouched — the core neither catches nor translates it.
///
/// # Contract
///
/// `iterate` must consume call-stack space independent of the number of
/// `Continue` turns it takes; chain depth is bounded by heap memory only.
pub trait EffectContext: Sized + 'static {
    /// The wrapper type for an effectful computation producing `T`.
    type Effect<T: 'static>;

    /// Wrap an already-known value.
    fn pure<T: 'static>(value: T) -> Self::Effect<T>;

    /// Sequence a dependent computation after `effect`.
    fn bind<A, B, F>(effect: Self::Effect<A>, f: F) -> Self::Effect<B>
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> Self::Effect<B> + 'static;

    /// Transform the produced value without adding a new effect.
    fn map<A, B, F>(effect: Self::Effect<A>, f: F) -> Self::Effect<B>
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        Self::bind(effect, |value| Self::pure(f(value)))
    }

    /// Run `step` repeatedly, threading the state, until it yields
    /// [`Step::Done`]. Must not recurse on the host call stack.
    fn iterate<S, T, F>(init: S, step: F) -> Self::Effect<T>
    where
        S: 'static,
        T: 'static,
        F: FnMut(S) -> Self::Effect<Step<S, T>> + 'static;
}
