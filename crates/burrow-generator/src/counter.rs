use crate::Generator;
use burrow_core::base62::{encode_fixed, CODE_SPACE};
use burrow_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("multiplier {0} is not coprime with 62")]
    InvalidMultiplier(u64),
}

#[derive(Debug, Clone, TypedBuilder)]
/// Settings for [`PermutedCounterGenerator`].
///
/// Nodes sharing a store must use disjoint `start` ranges.
pub struct CounterSettings {
    /// First counter value handed out.
    #[builder(default = 0)]
    start: u64,
    /// Must be coprime with 62, otherwise the mapping is not a bijection.
    #[builder(default = 2_654_435_761)]
    multiplier: u64,
    #[builder(default = 0x2F_9A3C_71D5)]
    offset: u64,
}

/// Sequential counter scrambled through the affine bijection
/// `n -> (n * multiplier + offset) mod 62^7`.
///
/// Consecutive codes look unrelated, and two distinct counter values never
/// map to the same code until the counter wraps the code space.
#[derive(Debug)]
pub struct PermutedCounterGenerator {
    counter: AtomicU64,
    multiplier: u64,
    offset: u64,
}

impl PermutedCounterGenerator {
    pub fn new(settings: CounterSettings) -> Result<Self, GeneratorError> {
        let multiplier = settings.multiplier % CODE_SPACE;

        // 62 = 2 * 31
        if multiplier % 2 == 0 || multiplier % 31 == 0 {
            return Err(GeneratorError::InvalidMultiplier(settings.multiplier));
        }

        Ok(Self {
            counter: AtomicU64::new(settings.start),
            multiplier,
            offset: settings.offset % CODE_SPACE,
        })
    }

    fn permute(&self, n: u64) -> u64 {
        let n = u128::from(n % CODE_SPACE);
        let mixed = n * u128::from(self.multiplier) + u128::from(self.offset);
        (mixed % u128::from(CODE_SPACE)) as u64
    }
}

impl Generator for PermutedCounterGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        ShortCode::from_digits(encode_fixed(self.permute(n)))
    }
}
