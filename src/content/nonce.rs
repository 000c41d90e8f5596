//! One-time script tokens for the content-security policy.

use std::fmt;

use rand::Rng;

/// Characters a nonce may contain.
const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Nonce length in characters.
const NONCE_LEN: usize = 32;

/// A one-time random token allow-listing inline script execution for a
/// single content render.
///
/// Sampled from `rand`'s OS-seeded generator. The host environment is
/// assumed trusted and non-adversarial; if surfaces are ever exposed
/// beyond that, switch generation to a CSPRNG-backed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Generate a fresh 32-character alphanumeric nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let text = (0..NONCE_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(text)
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_32_alphanumeric_chars() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.as_str().len(), 32);
        assert!(nonce.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_nonces_differ() {
        // 62^32 values; a collision here means generation is broken.
        assert_ne!(Nonce::generate(), Nonce::generate());
    }
}
