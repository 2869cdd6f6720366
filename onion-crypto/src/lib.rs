// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Onion Crypto — per-hop primitives for the onion routing simulator
//
// Cryptographic stack:
//   Asymmetric: RSA-2048, e = 65537, OAEP/SHA-256 (SPKI / PKCS#8 interchange)
//   Symmetric:  AES-256-GCM, 96-bit random IV
//   Layer:      RSA-OAEP wraps a fresh AES key, AES-GCM carries the payload
//   RNG:        OsRng
//
// Every text-facing input and output is standard padded base64.

pub mod asymmetric;
mod encoding;
pub mod error;
pub mod layer;
pub mod symmetric;

pub use asymmetric::{
    export_private_key, export_public_key, generate_key_pair, import_private_key,
    import_public_key, rsa_decrypt, rsa_encrypt, KeyPair, PrivateKey, PublicKey,
};
pub use error::CryptoError;
pub use layer::{open_layer, open_layer_encoded, seal_layer, seal_layer_encoded};
pub use symmetric::{
    export_symmetric_key, generate_symmetric_key, import_symmetric_key, sym_decrypt,
    sym_decrypt_with_encoded_key, sym_encrypt, SymmetricKey,
};
