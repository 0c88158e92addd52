//! Synchronous effect context with a native failure channel.

use std::marker::PhantomData;

use super::{EffectContext, Step};

/// A synchronous context whose computations can fail with an `E`.
///
/// Failure belongs to the context, not to the chain: an `Err` raised by
/// any step aborts the whole evaluation and surfaces unchanged, exactly
/// as the pass-through failure contract requires. Business outcomes stay
/// on the chain's own terminal track.
///
/// # Example
///
/// ```rust
/// use sealway::{EffectContext, Fallible};
///
/// let doubled = Fallible::<String>::map(Ok(21), |n: i32| n * 2);
/// assert_eq!(doubled, Ok(42));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Fallible<E>(PhantomData<E>);

impl<E: 'static> EffectContext for Fallible<E> {
    type Effect<T: 'static> = Result<T, E>;

    fn pure<T: 'static>(value: T) -> Result<T, E> {
        Ok(value)
    }

    fn bind<A, B, F>(effect: Result<A, E>, f: F) -> Result<B, E>
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> Result<B, E> + 'static,
    {
        effect.and_then(f)
    }

    fn iterate<S, T, F>(init: S, mut step: F) -> Result<T, E>
    where
        S: 'static,
        T: 'static,
        F: FnMut(S) -> Result<Step<S, T>, E> + 'static,
    {
        let mut state = init;
        loop {
            match step(state)? {
                Step::Continue(next) => state = next,
                Step::Done(value) => return Ok(value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_short_circuits_on_failure() {
        let failed: Result<i32, &str> = Err("down");
        let result = Fallible::bind(failed, |n: i32| Ok(n + 1));
        assert_eq!(result, Err("down"));
    }

    #[test]
    fn iterate_stops_at_first_failure() {
        let result: Result<i32, &str> = Fallible::iterate(0, |n| {
            if n == 3 {
                Err("boom")
            } else {
                Ok(Step::Continue(n + 1))
            }
        });
        assert_eq!(result, Err("boom"));
    }
}
