use crate::Generator;
use burrow_core::base62::{ALPHABET, BASE, CODE_LENGTH};
use burrow_core::ShortCode;
use rand::Rng;

/// Draws 7 uniformly random base62 digits per call.
///
/// Each thread owns its random source, so concurrent callers never contend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::thread_rng();
        let mut digits = [0_u8; CODE_LENGTH];

        for slot in digits.iter_mut() {
            *slot = ALPHABET[rng.gen_range(0..BASE as usize)];
        }

        ShortCode::from_digits(digits)
    }
}
