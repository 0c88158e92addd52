//! Asynchronous effect context backed by boxed local futures.

use futures::future::LocalBoxFuture;

use super::{EffectContext, Step};

/// An asynchronous context: an effectful computation of `T` is a
/// `LocalBoxFuture<'static, T>`.
///
/// Futures are boxed and non-`Send`, so chain closures never pick up
/// `Send` bounds; drive the resulting future on a current-thread runtime
/// or inside a `LocalSet`. Iteration is an async loop, so depth costs
/// heap, not stack.
///
/// # Example
///
/// ```rust
/// use sealway::{Deferred, Sealed};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let chain = Sealed::<Deferred, i32, String>::lift_effect(|| Box::pin(async { 21 }))
///     .map(|n| n * 2)
///     .complete(|n| format!("got {n}"));
/// assert_eq!(chain.run().await, "got 42");
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Deferred;

impl EffectContext for Deferred {
    type Effect<T: 'static> = LocalBoxFuture<'static, T>;

    fn pure<T: 'static>(value: T) -> Self::Effect<T> {
        Box::pin(async move { value })
    }

    fn bind<A, B, F>(effect: Self::Effect<A>, f: F) -> Self::Effect<B>
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> Self::Effect<B> + 'static,
    {
        Box::pin(async move { f(effect.await).await })
    }

    fn iterate<S, T, F>(init: S, mut step: F) -> Self::Effect<T>
    where
        S: 'static,
        T: 'static,
        F: FnMut(S) -> Self::Effect<Step<S, T>> + 'static,
    {
        Box::pin(async move {
            let mut state = init;
            loop {
                match step(state).await {
                    Step::Continue(next) => state = next,
                    Step::Done(value) => break value,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_sequences_futures() {
        let effect = Deferred::bind(Deferred::pure(5), |n: i32| Deferred::pure(n * 2));
        assert_eq!(effect.await, 10);
    }

    #[tokio::test]
    async fn iterate_loops_without_stack_growth() {
        let effect: LocalBoxFuture<'static, u64> = Deferred::iterate(0u64, |n| {
            Deferred::pure(if n < 50_000 {
                Step::Continue(n + 1)
            } else {
                Step::Done(n)
            })
        });
        assert_eq!(effect.await, 50_000);
    }
}
