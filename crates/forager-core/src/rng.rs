use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// World stream: placement, prey walks, respawns and schedule shuffles.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Per-forager stream: same key as the world, its own ChaCha stream id.
///
/// Stream 0 belongs to the world, so forager `i` uses stream `i + 1`.
pub fn derive_forager_rng(seed: u64, forager_id: usize) -> ChaCha12Rng {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    rng.set_stream(forager_id as u64 + 1);
    rng
}
