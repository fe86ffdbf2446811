//! Invite-code generation and token hashing utilities.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API layer and any future CLI tooling.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated invitation code.
pub const CODE_LENGTH: usize = 8;

/// The 32-symbol code alphabet: uppercase letters and digits with the
/// visually confusable 0/O and 1/I removed.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random 8-character invitation code.
///
/// Generation does not check for collisions with existing codes; the
/// unique constraint on the `code` column is the arbiter, and the
/// creating caller retries once on conflict.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Compute the SHA-256 hex digest of the given bytes.
///
/// Used for refresh-token storage: the raw secret is never persisted,
/// only this digest, so a database leak does not expose usable tokens.
/// The digest is deterministic, which is what makes hash lookup work.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_has_expected_length_and_alphabet() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert_eq!(code.len(), CODE_LENGTH);
            for byte in code.bytes() {
                assert!(
                    CODE_ALPHABET.contains(&byte),
                    "unexpected character {:?} in code {code}",
                    byte as char
                );
            }
        }
    }

    #[test]
    fn test_alphabet_excludes_confusable_characters() {
        for confusable in [b'0', b'O', b'1', b'I'] {
            assert!(!CODE_ALPHABET.contains(&confusable));
        }
        assert_eq!(CODE_ALPHABET.len(), 32);
    }

    #[test]
    fn test_sha256_hex_is_deterministic() {
        let a = sha256_hex(b"the-same-input");
        let b = sha256_hex(b"the-same-input");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_sha256_hex_differs_for_different_input() {
        assert_ne!(sha256_hex(b"alpha"), sha256_hex(b"bravo"));
    }
}
