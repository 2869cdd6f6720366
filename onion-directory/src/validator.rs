// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request validation at the HTTP boundary.
//!
//! Nothing reaches the [`Registry`](crate::registry::Registry) unless:
//! - the body parsed as the expected JSON shape
//! - `nodeId` fits a [`NodeId`]
//! - `pubKey` is present, bounded in length, and imports as an RSA SPKI key

use crate::config::ValidationConfig;
use crate::registry::NodeId;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Malformed request path: {0}")]
    InvalidPath(String),

    #[error("nodeId {0} is out of range (0..={max})", max = NodeId::MAX)]
    NodeIdOutOfRange(i64),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("pubKey too long: at most {max} characters, got {got}")]
    PublicKeyTooLong { max: usize, got: usize },

    #[error("pubKey is not a usable RSA public key: {0}")]
    InvalidPublicKey(String),
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub node_id: i64,
    #[serde(default)]
    pub pub_key: String,
}

/// Debug provisioning request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub node_id: i64,
}

/// A registration that passed every boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub node_id: NodeId,
    pub pub_key: String,
}

/// Registration request validator.
pub struct NodeValidator {
    config: ValidationConfig,
}

impl NodeValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check that a client-supplied id fits a [`NodeId`].
    pub fn validate_node_id(&self, raw: i64) -> Result<NodeId, ValidationError> {
        NodeId::try_from(raw).map_err(|_| {
            debug!(node_id = raw, "nodeId out of range");
            ValidationError::NodeIdOutOfRange(raw)
        })
    }

    /// Check a base64 SPKI public key without storing anything.
    pub fn validate_public_key(&self, pub_key: &str) -> Result<(), ValidationError> {
        let pub_key = pub_key.trim();
        if pub_key.is_empty() {
            debug!("Missing pubKey parameter");
            return Err(ValidationError::MissingParameter("pubKey"));
        }

        if pub_key.len() > self.config.max_public_key_len {
            debug!(len = pub_key.len(), "pubKey too long");
            return Err(ValidationError::PublicKeyTooLong {
                max: self.config.max_public_key_len,
                got: pub_key.len(),
            });
        }

        onion_crypto::import_public_key(pub_key).map_err(|e| {
            debug!(error = %e, "pubKey rejected");
            ValidationError::InvalidPublicKey(e.to_string())
        })?;

        Ok(())
    }

    /// Validate a full registration request.
    pub fn validate_registration(
        &self,
        req: RegisterRequest,
    ) -> Result<ValidRegistration, ValidationError> {
        let node_id = self.validate_node_id(req.node_id)?;
        self.validate_public_key(&req.pub_key)?;

        Ok(ValidRegistration {
            node_id,
            pub_key: req.pub_key.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onion_crypto::{export_public_key, generate_key_pair};

    fn validator() -> NodeValidator {
        NodeValidator::new(ValidationConfig::default())
    }

    #[test]
    fn accepts_exported_rsa_key() {
        let pair = generate_key_pair().unwrap();
        let pub_key = export_public_key(&pair.public).unwrap();

        let valid = validator()
            .validate_registration(RegisterRequest {
                node_id: 42,
                pub_key: format!("{pub_key}\n"),
            })
            .unwrap();
        assert_eq!(valid.node_id, 42);
        assert_eq!(valid.pub_key, pub_key);
    }

    #[test]
    fn rejects_out_of_range_ids() {
        let v = validator();
        assert_eq!(
            v.validate_node_id(-1),
            Err(ValidationError::NodeIdOutOfRange(-1))
        );
        assert!(v.validate_node_id(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(v.validate_node_id(0), Ok(0));
    }

    #[test]
    fn rejects_missing_and_garbage_keys() {
        let v = validator();
        assert_eq!(
            v.validate_public_key("  "),
            Err(ValidationError::MissingParameter("pubKey"))
        );
        assert!(matches!(
            v.validate_public_key("aGVsbG8="),
            Err(ValidationError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn rejects_oversized_keys() {
        let v = NodeValidator::new(ValidationConfig {
            max_public_key_len: 8,
        });
        assert_eq!(
            v.validate_public_key("AAAAAAAAAAAA"),
            Err(ValidationError::PublicKeyTooLong { max: 8, got: 12 })
        );
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"nodeId": 5, "pubKey": "abc"}"#).unwrap();
        assert_eq!(req.node_id, 5);
        assert_eq!(req.pub_key, "abc");
    }
}
