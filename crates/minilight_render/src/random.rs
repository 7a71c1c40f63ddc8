//! Pseudo-random sampling source.
//!
//! The reference stream is LFSR113, L'Ecuyer's maximally equidistributed
//! combined Tausworthe generator. With the fixed default seed the whole
//! render is reproducible byte for byte, which the progressive save cadence
//! and the regression tests rely on.

use rand::{RngCore, SeedableRng};

/// Default seed value, replicated into all four state words.
const SEED: u32 = 987_654_321;

/// Smallest valid value per state word; anything lower collapses that
/// word's shift register.
const SEED_MINS: [u32; 4] = [2, 8, 16, 128];

/// LFSR113 generator (period ~2^113).
///
/// `next_u32` is one generator step; everything else is derived from it.
#[derive(Debug, Clone)]
pub struct Lfsr113 {
    z: [u32; 4],
}

impl Lfsr113 {
    /// The reference stream: the default seed in every state word.
    pub fn new() -> Self {
        Self { z: [SEED; 4] }
    }
}

impl Default for Lfsr113 {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Lfsr113 {
    fn next_u32(&mut self) -> u32 {
        self.z[0] = ((self.z[0] & 0xFFFF_FFFE) << 18) ^ (((self.z[0] << 6) ^ self.z[0]) >> 13);
        self.z[1] = ((self.z[1] & 0xFFFF_FFF8) << 2) ^ (((self.z[1] << 2) ^ self.z[1]) >> 27);
        self.z[2] = ((self.z[2] & 0xFFFF_FFF0) << 7) ^ (((self.z[2] << 13) ^ self.z[2]) >> 21);
        self.z[3] = ((self.z[3] & 0xFFFF_FF80) << 13) ^ (((self.z[3] << 3) ^ self.z[3]) >> 12);
        self.z[0] ^ self.z[1] ^ self.z[2] ^ self.z[3]
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lfsr113 {
    type Seed = [u8; 16];

    /// Four little-endian words; each is conditioned against its minimum,
    /// falling back to the default seed value.
    fn from_seed(seed: Self::Seed) -> Self {
        let mut z = [0u32; 4];
        for (i, word) in z.iter_mut().enumerate() {
            let bytes: [u8; 4] = seed[i * 4..i * 4 + 4].try_into().unwrap();
            let value = u32::from_le_bytes(bytes);
            *word = if value < SEED_MINS[i] { SEED } else { value };
        }
        Self { z }
    }
}

/// Generate a uniform f64 in [0, 1) from one generator step.
///
/// This is needed because `dyn RngCore` can't use `Rng::gen()` directly.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    f64::from(rng.next_u32()) * (1.0 / 4_294_967_296.0)
}
