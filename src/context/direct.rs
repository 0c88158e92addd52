//! Synchronous effect context.

use super::{EffectContext, Step};

/// The trivial synchronous context: an effectful computation of `T` is
/// just a `T`, sequencing is function application, and iteration is a
/// plain loop.
///
/// # Example
///
/// ```rust
/// use sealway::{Direct, EffectContext, Step};
///
/// let done = Direct::iterate(0, |n| {
///     if n < 10 {
///         Step::Continue(n + 1)
///     } else {
///         Step::Done(n)
///     }
/// });
/// assert_eq!(done, 10);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Direct;

impl EffectContext for Direct {
    type Effect<T: 'static> = T;

    fn pure<T: 'static>(value: T) -> T {
        value
    }

    fn bind<A, B, F>(effect: A, f: F) -> B
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        f(effect)
    }

    fn iterate<S, T, F>(init: S, mut step: F) -> T
    where
        S: 'static,
        T: 'static,
        F: FnMut(S) -> Step<S, T> + 'static,
    {
        let mut state = init;
        loop {
            match step(state) {
                Step::Continue(next) => state = next,
                Step::Done(value) => return value,
            }
        }
    }
}
