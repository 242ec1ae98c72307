//! Blake2b hashing and domain-separated digests.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Digest `payload` under a domain tag.
///
/// The tag is length-prefixed so no (tag, payload) pair can collide with another
/// by shifting bytes across the boundary.
pub fn domain_digest(domain: &str, payload: &[u8]) -> [u8; 32] {
    let len = (domain.len() as u32).to_le_bytes();
    blake2b_256_multi(&[&len, domain.as_bytes(), payload])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello accord");
        let h2 = blake2b_256(b"hello accord");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn domain_separates_identical_payloads() {
        assert_ne!(domain_digest("a", b"payload"), domain_digest("b", b"payload"));
    }

    #[test]
    fn domain_boundary_is_unambiguous() {
        assert_ne!(domain_digest("ab", b"c"), domain_digest("a", b"bc"));
    }
}
