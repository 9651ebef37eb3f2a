//! `bookstore-policy`
//!
//! **Responsibility:** purchase decisions for customer actors.
//!
//! A policy only *chooses*; it never mutates inventory or budgets. All
//! randomness comes from the caller's per-tick RNG so runs stay reproducible.

pub mod kind;
pub mod policies;

pub use kind::{PolicyError, PolicyKind};
pub use policies::{DecisionPolicy, GenrePreferencePolicy, GreedyPolicy, MostStockedPolicy, RandomPolicy};
