// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AES-256-GCM session keys.
//
// Blob format:
//   [12 bytes: random IV]
//   [N bytes:  AES-GCM ciphertext (plaintext + 16-byte tag)]

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding;
use crate::error::{CryptoError, Result};

/// AES-256 key size (bytes).
pub const KEY_LEN: usize = 32;
/// AES-GCM IV size (bytes).
pub const IV_LEN: usize = 12;
/// GCM authentication tag size (bytes).
pub const TAG_LEN: usize = 16;
/// Smallest well-formed blob: IV + tag over an empty plaintext.
pub const MIN_BLOB_LEN: usize = IV_LEN + TAG_LEN;

/// A 256-bit AES-GCM key, zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Build a key from exactly [`KEY_LEN`] raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::KeyFormat(format!(
                "symmetric key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(GenericArray::from_slice(&self.0))
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Generate a fresh random AES-256 key.
pub fn generate_symmetric_key() -> SymmetricKey {
    let mut raw = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut raw);
    let key = SymmetricKey(raw);
    raw.zeroize();
    key
}

/// Base64 of the raw key bytes.
pub fn export_symmetric_key(key: &SymmetricKey) -> String {
    encoding::encode(&key.0)
}

/// Inverse of [`export_symmetric_key`].
pub fn import_symmetric_key(encoded: &str) -> Result<SymmetricKey> {
    let mut raw = encoding::decode_key(encoded)?;
    let key = SymmetricKey::from_slice(&raw);
    raw.zeroize();
    key
}

/// Encrypt raw bytes, returning `IV || ciphertext || tag`.
///
/// Every call draws a new IV from the OS RNG.
pub fn seal_bytes(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = key
        .cipher()
        .encrypt(GenericArray::from_slice(&iv), plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt an `IV || ciphertext || tag` blob.
pub fn open_bytes(key: &SymmetricKey, blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(CryptoError::Decryption);
    }

    let (iv, ciphertext) = blob.split_at(IV_LEN);
    key.cipher()
        .decrypt(GenericArray::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::Decryption)
}

/// Encrypt UTF-8 text; returns the base64 blob.
pub fn sym_encrypt(key: &SymmetricKey, plaintext: &str) -> Result<String> {
    let blob = seal_bytes(key, plaintext.as_bytes())?;
    Ok(encoding::encode(&blob))
}

/// Decrypt a base64 blob produced by [`sym_encrypt`].
pub fn sym_decrypt(key: &SymmetricKey, blob_b64: &str) -> Result<String> {
    let blob = encoding::decode_data(blob_b64)?;
    let plaintext = open_bytes(key, &blob)?;
    encoding::into_utf8(plaintext)
}

/// [`sym_decrypt`] for callers that only hold the exported key string.
pub fn sym_decrypt_with_encoded_key(key_b64: &str, blob_b64: &str) -> Result<String> {
    let key = import_symmetric_key(key_b64)?;
    sym_decrypt(&key, blob_b64)
}
