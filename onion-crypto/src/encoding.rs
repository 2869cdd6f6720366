// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 (standard alphabet, padded) at the text boundary.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, Result};

pub(crate) fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode key material; failures are key-format errors.
pub(crate) fn decode_key(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CryptoError::KeyFormat(format!("base64: {e}")))
}

/// Decode plaintext or ciphertext payloads.
pub(crate) fn decode_data(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|_| CryptoError::InvalidEncoding)
}

pub(crate) fn into_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| CryptoError::NotUtf8)
}
