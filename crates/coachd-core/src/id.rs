//! ID generation helpers.

use uuid::Uuid;

/// Generate a new UUID v4 string.
pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a short random hex ID (8 characters).
pub fn short_id() -> String {
    let bytes: [u8; 4] = rand::random();
    hex::encode(bytes)
}
