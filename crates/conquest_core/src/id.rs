use rand::Rng;
use uuid::Uuid;

/// Generate a deterministic v4-format match id from a seeded RNG.
pub fn generate_match_id(rng: &mut impl Rng) -> Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
