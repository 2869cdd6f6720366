// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RSA-2048 key lifecycle and OAEP/SHA-256 encryption.
//
// Interchange formats:
//   public key:  base64(DER SubjectPublicKeyInfo)
//   private key: base64(DER PKCS#8 PrivateKeyInfo)
//   ciphertext:  base64(raw OAEP output, modulus-sized)

use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use crate::encoding;
use crate::error::{CryptoError, Result};

/// Modulus size for generated keys (bits).
pub const MODULUS_BITS: usize = 2048;
/// SHA-256 digest size (bytes); OAEP spends two of these per block.
pub const OAEP_HASH_LEN: usize = 32;
/// OAEP/SHA-256 plaintext capacity of a 2048-bit key (bytes).
pub const MAX_PLAINTEXT_LEN: usize = MODULUS_BITS / 8 - 2 * OAEP_HASH_LEN - 2;

/// Encryption half of an RSA key pair. Cannot decrypt.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

/// Decryption half of an RSA key pair. Cannot encrypt.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

/// A freshly generated RSA key pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

impl PublicKey {
    /// Modulus size in bytes; also the length of every ciphertext.
    pub fn size(&self) -> usize {
        self.0.size()
    }

    /// Largest plaintext OAEP/SHA-256 can carry under this key.
    pub fn max_plaintext_len(&self) -> usize {
        self.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
    }

    /// Encrypt raw bytes with OAEP/SHA-256.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let max = self.max_plaintext_len();
        if plaintext.len() > max {
            return Err(CryptoError::PlaintextTooLarge {
                max,
                got: plaintext.len(),
            });
        }

        self.0
            .encrypt(&mut OsRng, oaep(), plaintext)
            .map_err(|_| CryptoError::Encryption)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &(self.size() * 8))
            .finish()
    }
}

impl PrivateKey {
    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.0.size()
    }

    /// Decrypt raw OAEP/SHA-256 ciphertext.
    ///
    /// Not constant-time: `rsa` 0.9 is exposed to the Marvin timing attack
    /// (RUSTSEC-2023-0071). Callers that answer network peers must not let
    /// decryption latency be observable, e.g. by replying after a fixed delay.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.0
            .decrypt(oaep(), ciphertext)
            .map_err(|_| CryptoError::Decryption)
    }

    /// The matching encryption key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.to_public_key())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Generate a new RSA-2048 key pair (e = 65537) for OAEP/SHA-256.
///
/// Takes on the order of tens to hundreds of milliseconds; async callers
/// should run it on a blocking thread.
pub fn generate_key_pair() -> Result<KeyPair> {
    let private = RsaPrivateKey::new(&mut OsRng, MODULUS_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public = private.to_public_key();
    debug!(bits = MODULUS_BITS, "generated RSA key pair");

    Ok(KeyPair {
        public: PublicKey(public),
        private: PrivateKey(private),
    })
}

/// Serialize a public key as base64 SPKI.
pub fn export_public_key(key: &PublicKey) -> Result<String> {
    let der = key
        .0
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyFormat(format!("SPKI encoding: {e}")))?;
    Ok(encoding::encode(der.as_bytes()))
}

/// Serialize a private key as base64 PKCS#8. `None` passes through.
pub fn export_private_key(key: Option<&PrivateKey>) -> Result<Option<String>> {
    let Some(key) = key else {
        return Ok(None);
    };

    let der = key
        .0
        .to_pkcs8_der()
        .map_err(|e| CryptoError::KeyFormat(format!("PKCS#8 encoding: {e}")))?;
    Ok(Some(encoding::encode(der.as_bytes())))
}

/// Parse a base64 SPKI RSA public key.
pub fn import_public_key(encoded: &str) -> Result<PublicKey> {
    let der = encoding::decode_key(encoded)?;
    let key = RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CryptoError::KeyFormat(format!("SPKI: {e}")))?;
    check_modulus(key.size())?;
    Ok(PublicKey(key))
}

/// Parse a base64 PKCS#8 RSA private key.
pub fn import_private_key(encoded: &str) -> Result<PrivateKey> {
    let der = encoding::decode_key(encoded)?;
    let key = RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CryptoError::KeyFormat(format!("PKCS#8: {e}")))?;
    check_modulus(key.size())?;
    Ok(PrivateKey(key))
}

fn check_modulus(size_bytes: usize) -> Result<()> {
    if size_bytes * 8 < MODULUS_BITS {
        return Err(CryptoError::KeyFormat(format!(
            "RSA modulus too small: {} bits, need at least {}",
            size_bytes * 8,
            MODULUS_BITS
        )));
    }
    Ok(())
}

/// Encrypt base64 plaintext under a base64 SPKI public key.
pub fn rsa_encrypt(data_b64: &str, public_key_b64: &str) -> Result<String> {
    let key = import_public_key(public_key_b64)?;
    let plaintext = encoding::decode_data(data_b64)?;
    let ciphertext = key.encrypt(&plaintext)?;
    Ok(encoding::encode(&ciphertext))
}

/// Decrypt base64 ciphertext with a live private key, returning UTF-8 text.
pub fn rsa_decrypt(ciphertext_b64: &str, private_key: &PrivateKey) -> Result<String> {
    let ciphertext = encoding::decode_data(ciphertext_b64)?;
    let plaintext = private_key.decrypt(&ciphertext)?;
    encoding::into_utf8(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::sync::OnceLock;

    fn fixture() -> &'static KeyPair {
        static PAIR: OnceLock<KeyPair> = OnceLock::new();
        PAIR.get_or_init(|| generate_key_pair().unwrap())
    }

    #[test]
    fn hello_scenario() {
        let pair = fixture();
        let s = export_public_key(&pair.public).unwrap();

        let ct = rsa_encrypt("aGVsbG8=", &s).unwrap();
        assert_eq!(rsa_decrypt(&ct, &pair.private).unwrap(), "hello");
    }

    #[test]
    fn ciphertext_is_modulus_sized() {
        let pair = fixture();
        let ct = pair.public.encrypt(b"x").unwrap();
        assert_eq!(ct.len(), MODULUS_BITS / 8);
    }

    #[test]
    fn exported_keys_roundtrip() {
        let pair = fixture();
        let public = import_public_key(&export_public_key(&pair.public).unwrap()).unwrap();
        let private_b64 = export_private_key(Some(&pair.private)).unwrap().unwrap();
        let private = import_private_key(&private_b64).unwrap();

        // imported public -> original private
        let ct = public.encrypt(b"via imported public").unwrap();
        assert_eq!(pair.private.decrypt(&ct).unwrap(), b"via imported public");

        // original public -> imported private
        let ct = pair.public.encrypt(b"via imported private").unwrap();
        assert_eq!(private.decrypt(&ct).unwrap(), b"via imported private");

        assert_eq!(private.public_key(), pair.public);
    }

    #[test]
    fn export_private_passes_none_through() {
        assert!(export_private_key(None).unwrap().is_none());
    }

    #[test]
    fn capacity_boundary() {
        let pair = fixture();
        let s = export_public_key(&pair.public).unwrap();
        assert_eq!(pair.public.max_plaintext_len(), MAX_PLAINTEXT_LEN);
        assert_eq!(MAX_PLAINTEXT_LEN, 190);

        let fits = STANDARD.encode(vec![b'a'; MAX_PLAINTEXT_LEN]);
        let ct = rsa_encrypt(&fits, &s).unwrap();
        assert_eq!(
            rsa_decrypt(&ct, &pair.private).unwrap(),
            "a".repeat(MAX_PLAINTEXT_LEN)
        );

        let too_big = STANDARD.encode(vec![b'a'; MAX_PLAINTEXT_LEN + 1]);
        assert!(matches!(
            rsa_encrypt(&too_big, &s),
            Err(CryptoError::PlaintextTooLarge { max: 190, got: 191 })
        ));
    }

    #[test]
    fn wrong_key_fails() {
        let other = generate_key_pair().unwrap();
        let ct = fixture().public.encrypt(b"for someone else").unwrap();
        assert!(matches!(
            other.private.decrypt(&ct),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let pair = fixture();
        let mut ct = pair.public.encrypt(b"integrity").unwrap();
        ct[17] ^= 0x01;
        assert!(matches!(pair.private.decrypt(&ct), Err(CryptoError::Decryption)));
    }

    #[test]
    fn decryption_failures_are_indistinguishable() {
        let pair = fixture();
        let other = generate_key_pair().unwrap();
        let mut tampered = pair.public.encrypt(b"oracle").unwrap();
        tampered[40] ^= 0x10;

        let wrong_key = other.private.decrypt(&pair.public.encrypt(b"oracle").unwrap());
        let corrupted = pair.private.decrypt(&tampered);
        assert_eq!(
            wrong_key.unwrap_err().to_string(),
            corrupted.unwrap_err().to_string()
        );
    }

    #[test]
    fn import_rejects_bad_input() {
        assert!(matches!(
            import_public_key("%%%"),
            Err(CryptoError::KeyFormat(_))
        ));
        assert!(matches!(
            import_public_key(&STANDARD.encode(b"not der at all")),
            Err(CryptoError::KeyFormat(_))
        ));
        assert!(matches!(
            import_private_key(&STANDARD.encode([0u8; 64])),
            Err(CryptoError::KeyFormat(_))
        ));
    }

    #[test]
    fn public_and_private_encodings_are_not_interchangeable() {
        let pair = fixture();
        let public_b64 = export_public_key(&pair.public).unwrap();
        let private_b64 = export_private_key(Some(&pair.private)).unwrap().unwrap();

        assert!(import_private_key(&public_b64).is_err());
        assert!(import_public_key(&private_b64).is_err());
    }

    #[test]
    fn generated_pairs_are_independent() {
        let a = fixture();
        let b = generate_key_pair().unwrap();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn debug_output_hides_private_material() {
        let rendered = format!("{:?}", fixture());
        assert!(rendered.contains("REDACTED"));
        assert!(rendered.contains("2048"));
    }
}
