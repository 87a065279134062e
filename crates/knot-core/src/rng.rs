//! Seeding of diagram generation.
//!
//! A single `u64` seed fixes a diagram. The builder threads one [`RngHandle`]
//! through its retries, drawing the half-edge pairing and the port shuffle of
//! each attempt and finally the node colours. Batches never share a handle.
//! Diagram `i` of a batch seeded with `s` is built from
//! [`derive_substream_seed`]`(s, i)`, which is also the seed the CLI records in
//! each diagram's provenance so one member can be rebuilt alone.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Random source lent by `&mut` to every random step of a build.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Seeds a handle directly, as `build_seeded` and `build_link_diagram` do.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Handle for diagram `index` of a batch seeded with `master_seed`.
    pub fn for_substream(master_seed: u64, index: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, index))
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of batch member `substream`: SipHash-1-3 with zero keys over the
/// master seed then the index, so the value is the same on every platform.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
