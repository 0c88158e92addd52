//! The pure core: node variants, chain combinators, and the trampoline
//! evaluator.
//!
//! Everything in this module is pure control flow. Nodes are immutable,
//! owned exclusively top-down, and consumed exactly once; effects are
//! deferred thunks that only the evaluator ever runs, through whatever
//! [`EffectContext`](crate::EffectContext) the caller supplies.

mod eval;
mod node;
mod sealed;

pub use sealed::Sealed;
