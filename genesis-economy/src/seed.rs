//! Seeded random streams for the macro economy update.
//!
//! A user seed is never fed to an RNG directly: every consumer derives its own
//! stream with HMAC-SHA256 domain separation so adding a new stream never
//! shifts the draws of an existing one.
use hmac::digest::Key;
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

/// Domain tag for the growth-factor stream used by the macro cycle.
pub const GROWTH_STREAM: &[u8] = b"growth";

const HMAC_BLOCK_LEN: usize = 64;

/// Derive an independent stream seed from `user_seed` and `domain_tag`.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // Short HMAC keys are zero padded to the block length, so this is the
    // same MAC as keying with the eight seed bytes alone.
    let mut key = [0_u8; HMAC_BLOCK_LEN];
    key[..8].copy_from_slice(&user_seed.to_le_bytes());
    let mut mac = <Hmac<Sha256> as Mac>::new(&Key::<Hmac<Sha256>>::clone_from_slice(&key));
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// RNG wrapper that counts draw calls, handy for replay diagnostics.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    /// Stream for `domain_tag` derived from `user_seed`.
    #[must_use]
    pub fn for_stream(user_seed: u64, domain_tag: &[u8]) -> Self {
        Self::new(SmallRng::seed_from_u64(derive_stream_seed(
            user_seed, domain_tag,
        )))
    }

    #[must_use]
    pub fn growth(user_seed: u64) -> Self {
        Self::for_stream(user_seed, GROWTH_STREAM)
    }
}

impl<R: RngCore> CountingRng<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}
