use rand::SeedableRng;
use rand_xoshiro::Xoroshiro64StarStar;

/// A fast rng with a fixed seed, for reproducible bots in tests and demos.
pub fn consistent_rng() -> Xoroshiro64StarStar {
    seeded_rng(0)
}

pub fn seeded_rng(seed: u64) -> Xoroshiro64StarStar {
    Xoroshiro64StarStar::seed_from_u64(seed)
}
