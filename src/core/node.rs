//! The closed set of node shapes representing a pending or terminal
//! computation.
//!
//! The in-flight value type changes along a chain (`map` from `i32` to
//! `String` and so on), but the evaluator needs a single state type to
//! thread through [`EffectContext::iterate`]. Intermediate values are
//! therefore erased to `Box<dyn Any>` here; the public `Sealed<C, A, R>`
//! wrapper restores full type safety, so every downcast below is an
//! invariant of chain construction, never a user-reachable failure.

use std::any::Any;

use crate::context::EffectContext;

/// A type-erased in-flight value.
pub(crate) type Erased = Box<dyn Any>;

/// One node of a computation tree. Owned exclusively top-down: a
/// `Bind`/`Fold` node owns its `prior` child and its continuation, and
/// every node is consumed exactly once by reduction.
pub(crate) enum Node<C: EffectContext, R: 'static> {
    /// Already-known intermediate value, no effect.
    Pure(Erased),
    /// Deferred effectful computation producing a value. Runs at most
    /// once, and only if reduction reaches it.
    Effect(Box<dyn FnOnce() -> C::Effect<Erased>>),
    /// Already-known terminal outcome; ends the chain.
    Final(R),
    /// Deferred effectful computation producing a terminal outcome.
    DeferredFinal(Box<dyn FnOnce() -> C::Effect<R>>),
    /// Sequencing: run `prior`, feed its value into `cont`. A terminal
    /// outcome in `prior` propagates without invoking `cont`.
    Bind {
        prior: Link<C, R>,
        cont: Box<dyn FnOnce(Erased) -> Node<C, R>>,
    },
    /// Branch on how `prior` resolves: `Ok` carries a value, `Err` a
    /// terminal outcome. The single continuation keeps each pending
    /// branch a one-owner move; the public API still exposes two
    /// closures.
    Fold {
        prior: Link<C, R>,
        cont: Box<dyn FnOnce(Result<Erased, R>) -> Node<C, R>>,
    },
}

impl<C: EffectContext, R: 'static> Node<C, R> {
    /// Variant name, for `Debug` output on the public wrapper.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Node::Pure(_) => "Pure",
            Node::Effect(_) => "Effect",
            Node::Final(_) => "Final",
            Node::DeferredFinal(_) => "DeferredFinal",
            Node::Bind { .. } => "Bind",
            Node::Fold { .. } => "Fold",
        }
    }
}

/// Owning edge from a `Bind`/`Fold` node to its `prior` child.
///
/// A chain is a left-leaning spine of these edges, and its depth is
/// bounded only by the heap. A naive recursive drop of the spine would
/// overflow the call stack on chains construction legitimately allows,
/// so the edge, not the node, owns teardown: dropping a `Link` unlinks
/// the spine into a worklist and frees it iteratively.
pub(crate) struct Link<C: EffectContext, R: 'static>(Option<Box<Node<C, R>>>);

impl<C: EffectContext, R: 'static> Link<C, R> {
    pub(crate) fn new(node: Node<C, R>) -> Self {
        Link(Some(Box::new(node)))
    }

    /// Detach the child for reduction. Consumes the edge, so drop sees
    /// an already-empty link.
    pub(crate) fn into_node(mut self) -> Node<C, R> {
        *self
            .0
            .take()
            .expect("chain invariant: a link is detached at most once")
    }
}

impl<C: EffectContext, R: 'static> Drop for Link<C, R> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        pending.extend(self.0.take());
        while let Some(mut node) = pending.pop() {
            if let Node::Bind { prior, .. } | Node::Fold { prior, .. } = &mut *node {
                pending.extend(prior.0.take());
            }
        }
    }
}

/// Recover a typed value from an erased one.
pub(crate) fn reclaim<A: 'static>(value: Erased) -> A {
    *value
        .downcast::<A>()
        .expect("chain invariant: a continuation always receives the value type it was chained after")
}
