//! Account address derivation from public keys.
//!
//! Address = last 20 bytes of Blake2b-256(public_key), rendered `0x` + lowercase hex.

use accord_types::{Address, PublicKey};

use crate::hash::blake2b_256;

/// Derive the account address owned by an Ed25519 public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let digest = blake2b_256(public_key.as_bytes());
    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&digest[32 - Address::LEN..]);
    Address::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn derivation_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn different_keys_yield_different_addresses() {
        let a = keypair_from_seed(&[1u8; 32]);
        let b = keypair_from_seed(&[2u8; 32]);
        assert_ne!(derive_address(&a.public), derive_address(&b.public));
    }

    #[test]
    fn derived_address_roundtrips_through_text() {
        let kp = keypair_from_seed(&[3u8; 32]);
        let addr = derive_address(&kp.public);
        assert_eq!(Address::parse(&addr.to_string()).unwrap(), addr);
    }
}
