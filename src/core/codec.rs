//! Blob codec primitives: AES-256-GCM sealing and zstd compression
//!
//! Information Hiding:
//! - Nonce generation and ciphertext layout hidden from the pipeline
//! - Compression backend hidden behind compress/decompress
//!
//! Sealed layout: [12 bytes: nonce][N bytes: ciphertext + tag]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use thiserror::Error;

pub const KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Encrypted data too short: {0} bytes")]
    DataTooShort(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

/// Symmetric cipher keyed by the archive secret
#[derive(Clone)]
pub struct Cipher {
    inner: Aes256Gcm,
}

impl Cipher {
    pub fn new(key: &[u8]) -> Result<Self, CodecError> {
        if key.len() != KEY_LENGTH {
            return Err(CodecError::InvalidKeyLength {
                expected: KEY_LENGTH,
                got: key.len(),
            });
        }
        let inner = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CodecError::EncryptionFailed(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        getrandom::getrandom(&mut nonce).map_err(|e| CodecError::RngFailed(e.to_string()))?;

        let ciphertext = self
            .inner
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CodecError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
        if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CodecError::DataTooShort(sealed.len()));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LENGTH);
        self.inner
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| CodecError::DecryptionFailed(e.to_string()))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cipher(<redacted>)")
    }
}

pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>, CodecError> {
    zstd::encode_all(data, level).map_err(|e| CodecError::Compression(format!("zstd encode: {}", e)))
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    zstd::decode_all(data).map_err(|e| CodecError::Compression(format!("zstd decode: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = Cipher::new(KEY).unwrap();
        let sealed = cipher.encrypt(b"transcript body").unwrap();

        assert_eq!(sealed.len(), NONCE_LENGTH + b"transcript body".len() + TAG_LENGTH);
        assert_eq!(cipher.decrypt(&sealed).unwrap(), b"transcript body");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let cipher = Cipher::new(KEY).unwrap();
        let a = cipher.encrypt(b"same").unwrap();
        let b = cipher.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = Cipher::new(KEY).unwrap().encrypt(b"secret").unwrap();
        let other = Cipher::new(b"ffffffffffffffffffffffffffffffff").unwrap();

        let err = other.decrypt(&sealed).unwrap_err();
        assert!(matches!(err, CodecError::DecryptionFailed(_)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = Cipher::new(KEY).unwrap();
        let mut sealed = cipher.encrypt(b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;

        assert!(matches!(
            cipher.decrypt(&sealed),
            Err(CodecError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_short_ciphertext() {
        let cipher = Cipher::new(KEY).unwrap();
        assert!(matches!(
            cipher.decrypt(&[0u8; 10]),
            Err(CodecError::DataTooShort(10))
        ));
    }

    #[test]
    fn test_invalid_key_length() {
        let err = Cipher::new(b"short").unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidKeyLength { expected: 32, got: 5 }
        ));
    }

    #[test]
    fn test_compress_roundtrip() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".repeat(10);
        let packed = compress(&data, DEFAULT_COMPRESSION_LEVEL).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_decompress_garbage() {
        assert!(matches!(
            decompress(b"definitely not zstd"),
            Err(CodecError::Compression(_))
        ));
    }
}
