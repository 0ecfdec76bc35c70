//! Per-request nonce generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the `nonce_str` attached to every request.
pub const NONCE_LEN: usize = 24;

/// Generate a random alphanumeric string of `len` characters.
///
/// Draws from the thread-local CSPRNG, so concurrent callers never share
/// generator state.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a fresh request nonce.
pub fn generate() -> String {
    random_string(NONCE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nonce_shape() {
        let nonce = generate();
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_nonces_are_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..64).map(|_| generate()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(seen.insert(nonce), "nonce reused");
            }
        }
        assert_eq!(seen.len(), 8 * 64);
    }

    #[test]
    fn test_zero_length() {
        assert!(random_string(0).is_empty());
    }
}
