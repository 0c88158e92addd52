//! Sealway: short-circuiting computation chains.
//!
//! A chain of steps each either produces an intermediate value to pass
//! forward, or a terminal *business outcome* that immediately seals the
//! chain — every later step passes the outcome through unchanged and
//! schedules no further effects. Outcomes are ordinary values of a
//! caller-defined closed type, so "user not found" and "logged in" ride
//! the same track; there is no separate error channel.
//!
//! The core is a small closed set of node shapes and a stack-safe
//! trampoline that reduces them in O(1) amortized per step, preserving
//! left-to-right effect order no matter how deeply chains nest. It is
//! polymorphic over an [`EffectContext`] — the minimal capability the
//! caller's execution substrate must provide — and never performs I/O
//! or scheduling itself.
//!
//! # Example
//!
//! ```rust
//! use sealway::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! enum LookupResponse {
//!     Found(String),
//!     NotFound,
//!     Archived,
//! }
//!
//! fn fetch(id: u32) -> Option<(u32, bool)> {
//!     (id == 7).then_some((7, false))
//! }
//!
//! let response = Sealed::<Direct, _, LookupResponse>::value_or(
//!     || fetch(7),
//!     LookupResponse::NotFound,
//! )
//! .ensure(|(_, archived)| !archived, LookupResponse::Archived)
//! .complete(|(id, _)| LookupResponse::Found(format!("user-{id}")))
//! .run();
//!
//! assert_eq!(response, LookupResponse::Found("user-7".to_string()));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod context;
pub mod core;

pub use crate::context::{Deferred, Direct, EffectContext, Fallible, Step};
pub use crate::core::Sealed;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::context::{Deferred, Direct, EffectContext, Fallible, Step};
    pub use crate::core::Sealed;
}
