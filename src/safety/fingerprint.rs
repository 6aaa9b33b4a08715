//! Keyed fingerprints for audit entries.
//!
//! Most sensitive values have few possible inputs (an 8-digit DNI has 10^8),
//! so a plain hash is reversed by enumeration. Fingerprints are
//! HMAC-SHA256 under a random key held in memory only: stable within one
//! key, unrelated across keys.

use hmac::digest::generic_array::GenericArray;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

// SHA-256 block size; HMAC uses a key of this length without rehashing.
const KEY_LEN: usize = 64;

/// Hex characters kept from the MAC.
pub const FINGERPRINT_LEN: usize = 12;

#[derive(Clone)]
pub struct FingerprintKey {
    key: [u8; KEY_LEN],
}

impl FingerprintKey {
    pub fn random() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill(&mut key[..]);
        Self { key }
    }

    pub fn fingerprint(&self, value: &str) -> String {
        let mut mac = <HmacSha256 as KeyInit>::new(GenericArray::from_slice(&self.key));
        mac.update(value.as_bytes());
        let digest = mac.finalize().into_bytes();
        hex::encode(&digest[..FINGERPRINT_LEN / 2])
    }
}

impl Default for FingerprintKey {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Debug for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FingerprintKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Digest;

    #[test]
    fn stable_under_one_key() {
        let key = FingerprintKey::random();
        assert_eq!(key.fingerprint("12345678"), key.fingerprint("12345678"));
        assert_ne!(key.fingerprint("12345678"), key.fingerprint("12345679"));
        assert_eq!(key.fingerprint("12345678").len(), FINGERPRINT_LEN);
    }

    #[test]
    fn differs_across_keys() {
        let a = FingerprintKey::random();
        let b = FingerprintKey::random();
        assert_ne!(a.fingerprint("12345678"), b.fingerprint("12345678"));
    }

    #[test]
    fn is_not_a_plain_hash() {
        let plain = hex::encode(Sha256::digest(b"12345678"));
        let keyed = FingerprintKey::random().fingerprint("12345678");
        assert!(!plain.starts_with(&keyed));
    }

    #[test]
    fn debug_hides_key() {
        assert_eq!(format!("{:?}", FingerprintKey::random()), "FingerprintKey(..)");
    }
}
