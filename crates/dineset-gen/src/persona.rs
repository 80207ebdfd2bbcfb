//! Fake-value provider.
//!
//! The rest of the pipeline treats realistic-looking strings (names,
//! emails, phone numbers, addresses, menu blurbs) as opaque values; this
//! module is the only place that knows they come from the `fake` crate.
//! All fakers run against the shared seeded RNG so the generated identity
//! fields are as reproducible as everything else.

use fake::faker::address::en::{BuildingNumber, CityName, PostCode, StreetName};
use fake::faker::internet::en::{FreeEmail, Username};
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Identity fields for one user row.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
}

pub fn identity(rng: &mut StdRng) -> Identity {
    let username: String = Username().fake_with_rng(rng);
    Identity {
        email: FreeEmail().fake_with_rng(rng),
        password_hash: sha256_hex(&format!("{username}:{}", rng.gen::<u64>())),
        phone: phone_number(rng),
        address: street_address(rng),
        username,
    }
}

pub fn phone_number(rng: &mut StdRng) -> String {
    PhoneNumber().fake_with_rng(rng)
}

/// Single-line postal address, comma-joined the way the reference tables
/// store it.
pub fn street_address(rng: &mut StdRng) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let post_code: String = PostCode().fake_with_rng(rng);
    format!("{building}, {street}, {city} {post_code}")
}

/// Short free-text blurb for menu item descriptions.
pub fn menu_blurb(rng: &mut StdRng) -> String {
    Sentence(8..13).fake_with_rng(rng)
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;

    #[test]
    fn identity_is_deterministic_for_a_seed() {
        let a = identity(&mut seeded_rng(42));
        let b = identity(&mut seeded_rng(42));
        assert_eq!(a.username, b.username);
        assert_eq!(a.email, b.email);
        assert_eq!(a.password_hash, b.password_hash);
        assert_eq!(a.address, b.address);
    }

    #[test]
    fn password_hash_is_sha256_hex() {
        let id = identity(&mut seeded_rng(1));
        assert_eq!(id.password_hash.len(), 64);
        assert!(id.password_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn address_is_single_line() {
        let addr = street_address(&mut seeded_rng(9));
        assert!(!addr.contains('\n'));
        assert!(addr.contains(','));
    }
}
