//! Keccak-256 hashing

use chorale_primitives::{Address, H256};
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Streaming Keccak-256 absorber.
///
/// Absorbing input piecewise yields the same digest as hashing the
/// concatenation of the pieces, so callers can hash multi-part input
/// (address, salt, code hash, ...) without materializing an
/// intermediate buffer.
#[derive(Clone, Debug, Default)]
pub struct Keccak {
    inner: Keccak256,
}

impl Keccak {
    /// Create a new absorber
    pub fn new() -> Self {
        Self {
            inner: Keccak256::new(),
        }
    }

    /// Absorb one segment of input
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish absorption and return the 32-byte digest
    pub fn finalize(self) -> H256 {
        H256::from_bytes(self.inner.finalize().into())
    }
}

/// Hash the concatenation of several segments
pub fn keccak256_concat(segments: &[&[u8]]) -> H256 {
    let mut hasher = Keccak::new();
    for segment in segments {
        hasher.update(segment);
    }
    hasher.finalize()
}

/// Domain-separated contract address derivation.
///
/// Hashes `0xff ++ deployer ++ salt ++ code_hash` and keeps the low
/// 20 bytes of the digest.
pub fn derive_address(deployer: &Address, salt: &H256, code_hash: &H256) -> Address {
    let mut hasher = Keccak::new();
    hasher.update(&[0xff]);
    hasher.update(deployer.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(code_hash.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest.as_bytes()[12..]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Published test vectors ====================

    #[test]
    fn test_keccak256_empty() {
        // keccak256("") = 0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470
        let hash = keccak256(&[]);
        assert_eq!(
            hash.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        // keccak256("hello") = 0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8
        let hash = keccak256(b"hello");
        assert_eq!(
            hash.to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak256_single_zero_byte() {
        // keccak256("\x00")
        let hash = keccak256(&[0x00]);
        assert_eq!(
            hash.to_hex(),
            "0xbc36789e7a1e281436464229828f817d6612f7b477d66591ff96a9e064bcc98a"
        );
    }

    #[test]
    fn test_keccak256_quick_brown_fox() {
        let hash = keccak256(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            hash.to_hex(),
            "0x4d741b6f1eb29cb2a9b9911c82f56fa8d73b04959d3d9d222895df6c0b28aa15"
        );
    }

    #[test]
    fn test_keccak256_selector() {
        // keccak256("transfer(address,uint256)") starts with 0xa9059cbb
        let hash = keccak256(b"transfer(address,uint256)");
        assert_eq!(&hash.as_bytes()[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    // ==================== Determinism and sensitivity ====================

    #[test]
    fn test_keccak256_deterministic() {
        let data = b"determinism check";
        assert_eq!(keccak256(data), keccak256(data));
    }

    #[test]
    fn test_keccak256_single_byte_difference() {
        let hash1 = keccak256(&[0x00]);
        let hash2 = keccak256(&[0x01]);
        assert_ne!(hash1, hash2);

        // Most output bytes should differ (avalanche effect)
        let differing = hash1
            .as_bytes()
            .iter()
            .zip(hash2.as_bytes().iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(differing > 20, "only {} bytes differ", differing);
    }

    // ==================== Streaming absorption ====================

    #[test]
    fn test_streaming_matches_one_shot() {
        let data = b"a multi-part input assembled piecewise";
        let one_shot = keccak256(data);

        let mut hasher = Keccak::new();
        hasher.update(&data[..5]);
        hasher.update(&data[5..20]);
        hasher.update(&data[20..]);
        assert_eq!(hasher.finalize(), one_shot);
    }

    #[test]
    fn test_streaming_empty_segments() {
        let mut hasher = Keccak::new();
        hasher.update(&[]);
        hasher.update(b"hello");
        hasher.update(&[]);
        assert_eq!(hasher.finalize(), keccak256(b"hello"));
    }

    #[test]
    fn test_streaming_across_rate_boundary() {
        // 136 bytes is the Keccak-256 rate; split right on it
        let data = vec![0xAB; 200];
        let mut hasher = Keccak::new();
        hasher.update(&data[..136]);
        hasher.update(&data[136..]);
        assert_eq!(hasher.finalize(), keccak256(&data));
    }

    #[test]
    fn test_concat_helper() {
        let digest = keccak256_concat(&[b"foo", b"bar", b"baz"]);
        assert_eq!(digest, keccak256(b"foobarbaz"));
    }

    // ==================== Address derivation ====================

    #[test]
    fn test_derive_address_matches_manual_hash() {
        let deployer = Address::from_bytes([0x11; 20]);
        let salt = H256::from_bytes([0x22; 32]);
        let code_hash = keccak256(b"init code");

        let derived = derive_address(&deployer, &salt, &code_hash);

        let digest = keccak256_concat(&[
            &[0xff],
            deployer.as_bytes(),
            salt.as_bytes(),
            code_hash.as_bytes(),
        ]);
        assert_eq!(derived.as_bytes(), &digest.as_bytes()[12..]);
    }

    #[test]
    fn test_derive_address_deterministic() {
        let deployer = Address::from_bytes([0x33; 20]);
        let salt = H256::ZERO;
        let code_hash = keccak256(&[]);

        assert_eq!(
            derive_address(&deployer, &salt, &code_hash),
            derive_address(&deployer, &salt, &code_hash)
        );
    }

    #[test]
    fn test_derive_address_salt_sensitive() {
        let deployer = Address::from_bytes([0x44; 20]);
        let code_hash = keccak256(b"code");

        let a = derive_address(&deployer, &H256::from_bytes([0x01; 32]), &code_hash);
        let b = derive_address(&deployer, &H256::from_bytes([0x02; 32]), &code_hash);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_address_deployer_sensitive() {
        let salt = H256::from_bytes([0x05; 32]);
        let code_hash = keccak256(b"code");

        let a = derive_address(&Address::from_bytes([0x01; 20]), &salt, &code_hash);
        let b = derive_address(&Address::from_bytes([0x02; 20]), &salt, &code_hash);
        assert_ne!(a, b);
    }
}
