//! Short code generators.
//!
//! A generator only proposes candidates. Uniqueness against the store is
//! enforced by the store's conditional insert, and callers retry on conflict.

pub mod counter;
pub mod random;

pub use counter::{CounterSettings, GeneratorError, PermutedCounterGenerator};
pub use random::RandomGenerator;

use burrow_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate code. Never blocks.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
