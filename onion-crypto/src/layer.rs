// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One onion layer: RSA-OAEP wraps a fresh AES-256 key, AES-GCM carries the payload.
//
// Wire format (sender → hop):
//   [k bytes:  RSA-OAEP(raw 32-byte session key), k = recipient modulus size]
//   [12 bytes: AES-GCM IV]
//   [N bytes:  AES-GCM ciphertext (payload + 16-byte tag)]

use tracing::debug;
use zeroize::Zeroize;

use crate::asymmetric::{import_public_key, PrivateKey, PublicKey};
use crate::encoding;
use crate::error::{CryptoError, Result};
use crate::symmetric::{self, generate_symmetric_key, SymmetricKey, MIN_BLOB_LEN};

/// Seal a payload of any size so only the holder of `recipient`'s private key can open it.
pub fn seal_layer(payload: &[u8], recipient: &PublicKey) -> Result<Vec<u8>> {
    let session = generate_symmetric_key();
    let wrapped = recipient.encrypt(session.as_bytes())?;
    let body = symmetric::seal_bytes(&session, payload)?;

    let mut layer = Vec::with_capacity(wrapped.len() + body.len());
    layer.extend_from_slice(&wrapped);
    layer.extend_from_slice(&body);

    debug!(payload_len = payload.len(), layer_len = layer.len(), "sealed layer");
    Ok(layer)
}

/// Peel one layer addressed to `own_key`.
pub fn open_layer(layer: &[u8], own_key: &PrivateKey) -> Result<Vec<u8>> {
    let wrapped_len = own_key.size();
    if layer.len() < wrapped_len + MIN_BLOB_LEN {
        return Err(CryptoError::Decryption);
    }

    let (wrapped, body) = layer.split_at(wrapped_len);
    let mut raw = own_key.decrypt(wrapped)?;
    let session = SymmetricKey::from_slice(&raw).map_err(|_| CryptoError::Decryption);
    raw.zeroize();

    symmetric::open_bytes(&session?, body)
}

/// [`seal_layer`] with a base64 SPKI key in and a base64 layer out.
pub fn seal_layer_encoded(payload: &[u8], recipient_b64: &str) -> Result<String> {
    let recipient = import_public_key(recipient_b64)?;
    Ok(encoding::encode(&seal_layer(payload, &recipient)?))
}

/// [`open_layer`] for a base64 layer.
pub fn open_layer_encoded(layer_b64: &str, own_key: &PrivateKey) -> Result<Vec<u8>> {
    let layer = encoding::decode_data(layer_b64)?;
    open_layer(&layer, own_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asymmetric::{export_public_key, generate_key_pair, KeyPair, MAX_PLAINTEXT_LEN};
    use crate::symmetric::{IV_LEN, TAG_LEN};
    use std::sync::OnceLock;

    fn fixture() -> &'static KeyPair {
        static PAIR: OnceLock<KeyPair> = OnceLock::new();
        PAIR.get_or_init(|| generate_key_pair().unwrap())
    }

    #[test]
    fn seal_open_roundtrip_beyond_rsa_capacity() {
        let pair = fixture();
        let payload: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
        assert!(payload.len() > MAX_PLAINTEXT_LEN);

        let layer = seal_layer(&payload, &pair.public).unwrap();
        assert_eq!(layer.len(), 256 + IV_LEN + payload.len() + TAG_LEN);
        assert_eq!(open_layer(&layer, &pair.private).unwrap(), payload);
    }

    #[test]
    fn encoded_roundtrip() {
        let pair = fixture();
        let recipient = export_public_key(&pair.public).unwrap();

        let layer = seal_layer_encoded(b"next hop: 7", &recipient).unwrap();
        assert_eq!(open_layer_encoded(&layer, &pair.private).unwrap(), b"next hop: 7");
    }

    #[test]
    fn wrong_recipient_fails() {
        let other = generate_key_pair().unwrap();
        let layer = seal_layer(b"not for you", &fixture().public).unwrap();
        assert!(matches!(
            open_layer(&layer, &other.private),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn truncated_layer_fails() {
        let pair = fixture();
        let layer = seal_layer(b"payload", &pair.public).unwrap();
        for cut in [0, 100, 256, 256 + MIN_BLOB_LEN - 1] {
            assert!(matches!(
                open_layer(&layer[..cut], &pair.private),
                Err(CryptoError::Decryption)
            ));
        }
    }

    #[test]
    fn tampered_body_fails() {
        let pair = fixture();
        let mut layer = seal_layer(b"payload", &pair.public).unwrap();
        let last = layer.len() - 1;
        layer[last] ^= 0x80;
        assert!(matches!(
            open_layer(&layer, &pair.private),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn layers_nest() {
        let inner_hop = fixture();
        let outer_hop = generate_key_pair().unwrap();

        let inner = seal_layer(b"core", &inner_hop.public).unwrap();
        let outer = seal_layer(&inner, &outer_hop.public).unwrap();

        let peeled = open_layer(&outer, &outer_hop.private).unwrap();
        assert_eq!(open_layer(&peeled, &inner_hop.private).unwrap(), b"core");
    }
}
