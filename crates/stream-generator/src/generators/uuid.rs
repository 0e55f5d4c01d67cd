//! UUID value generator.
//!
//! Draws the id bytes from the caller's RNG rather than `Uuid::new_v4` so
//! seeded sessions reproduce their ids.

use rand::Rng;
use stream_core::GeneratedValue;
use uuid::{Builder, Uuid};

/// Random version-4 UUID whose bytes come from `rng`.
pub fn generate_uuid<R: Rng + ?Sized>(rng: &mut R) -> GeneratedValue {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    let uuid: Uuid = Builder::from_random_bytes(bytes).into_uuid();
    GeneratedValue::Uuid(uuid)
}
