//! Password encoding.
//!
//! The gatekeeper model looks the user up *by* encoded password, so the
//! encoding must be deterministic: equal plaintexts map to equal ciphertexts.
//! Key stretching and algorithm choice live behind the [`EncryptionService`]
//! trait and are out of this crate's hands.

use sha2::{Digest, Sha256};

/// One-way, deterministic password encoding.
pub trait EncryptionService: Send + Sync {
    /// Encodes a plaintext password for storage and equality comparison.
    fn encrypted(&self, plaintext: &str) -> String;
}

/// Hex-encoded SHA-256 encoding.
///
/// # Example
///
/// ```rust
/// use keygate::{EncryptionService, Sha256Encryption};
///
/// let encryption = Sha256Encryption;
/// let a = encryption.encrypted("MyPassword1");
/// let b = encryption.encrypted("MyPassword1");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Encryption;

impl EncryptionService for Sha256Encryption {
    fn encrypted(&self, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_is_deterministic() {
        let encryption = Sha256Encryption;
        assert_eq!(encryption.encrypted("secret"), encryption.encrypted("secret"));
    }

    #[test]
    fn test_different_inputs_differ() {
        let encryption = Sha256Encryption;
        assert_ne!(encryption.encrypted("secret"), encryption.encrypted("Secret"));
    }

    #[test]
    fn test_output_is_hex_sha256() {
        let encryption = Sha256Encryption;
        let encoded = encryption.encrypted("anything");
        assert_eq!(encoded.len(), 64);
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_output_never_contains_plaintext() {
        let encryption = Sha256Encryption;
        assert!(!encryption.encrypted("MyPassword1").contains("MyPassword1"));
    }
}
