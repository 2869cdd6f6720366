// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

/// Failures surfaced by every engine operation.
///
/// `Decryption` deliberately carries no detail: a wrong key, a flipped bit and
/// a truncated blob must be indistinguishable to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key encoding: {0}")]
    KeyFormat(String),

    #[error("decryption failed: authentication failure or data corruption")]
    Decryption,

    #[error("plaintext too large: at most {max} bytes fit under this key, got {got}")]
    PlaintextTooLarge { max: usize, got: usize },

    #[error("encryption failed")]
    Encryption,

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("input is not valid base64")]
    InvalidEncoding,

    #[error("decrypted payload is not valid UTF-8")]
    NotUtf8,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
