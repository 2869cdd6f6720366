// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory node registry.
//!
//! Two stores live for the lifetime of the process:
//! 1. Registered nodes (`nodeId` → public key), in registration order
//! 2. Debug key store (`nodeId` → full key pair), only with `debug-keys`
//!
//! Neither supports deletion or expiry.

use crate::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[cfg(feature = "debug-keys")]
use onion_crypto::KeyPair;
#[cfg(feature = "debug-keys")]
use std::collections::HashMap;

/// Node identifier, unique for the lifetime of a registry.
pub type NodeId = u32;

/// A node's public identity as served by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredNode {
    pub node_id: NodeId,
    /// Base64 SPKI RSA public key
    pub pub_key: String,
}

#[derive(Debug, Default)]
struct Nodes {
    /// Registration order
    order: Vec<RegisteredNode>,
    ids: HashSet<NodeId>,
}

/// Thread-safe node registry.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: RwLock<Nodes>,
    /// Private keys for provisioned nodes. Test use only.
    #[cfg(feature = "debug-keys")]
    key_store: RwLock<HashMap<NodeId, KeyPair>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node's public key.
    ///
    /// The duplicate check and the insert happen under one write lock, so of
    /// several concurrent registrations for the same id exactly one succeeds.
    /// A rejected registration leaves the original entry untouched.
    pub async fn register(&self, node_id: NodeId, pub_key: String) -> Result<RegisteredNode> {
        let mut nodes = self.nodes.write().await;
        if !nodes.ids.insert(node_id) {
            warn!(node_id, "Duplicate registration rejected");
            return Err(DirectoryError::DuplicateNode(node_id));
        }

        let node = RegisteredNode { node_id, pub_key };
        nodes.order.push(node.clone());
        info!(node_id, total = nodes.order.len(), "Node registered");

        Ok(node)
    }

    /// All registered nodes in registration order.
    pub async fn list_nodes(&self) -> Vec<RegisteredNode> {
        self.nodes.read().await.order.clone()
    }

    /// Whether `node_id` has been registered.
    pub async fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.read().await.ids.contains(&node_id)
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Generate a key pair for `node_id`, register its public half and keep
    /// the pair in the debug key store.
    ///
    /// Key generation runs on the blocking pool.
    #[cfg(feature = "debug-keys")]
    pub async fn provision_node(&self, node_id: NodeId) -> Result<RegisteredNode> {
        // Skip the expensive keygen for an id that is already taken
        if self.contains(node_id).await {
            warn!(node_id, "Duplicate provisioning rejected");
            return Err(DirectoryError::DuplicateNode(node_id));
        }

        let pair = tokio::task::spawn_blocking(onion_crypto::generate_key_pair)
            .await
            .map_err(|e| DirectoryError::Internal(format!("keygen task failed: {e}")))??;
        let pub_key = onion_crypto::export_public_key(&pair.public)?;

        // Held across registration so a lookup never sees a node without its key
        let mut keys = self.key_store.write().await;
        let node = self.register(node_id, pub_key).await?;
        keys.insert(node_id, pair);

        Ok(node)
    }

    /// Base64 PKCS#8 private key of a provisioned node.
    ///
    /// UNSAFE FOR PRODUCTION: hands out the secret that the whole onion layer
    /// depends on. Compiled only with the `debug-keys` feature.
    #[cfg(feature = "debug-keys")]
    pub async fn debug_get_private_key(&self, node_id: NodeId) -> Result<String> {
        let keys = self.key_store.read().await;
        let pair = keys.get(&node_id).ok_or(DirectoryError::NotFound(node_id))?;

        warn!(node_id, "Private key disclosed via debug lookup");
        onion_crypto::export_private_key(Some(&pair.private))?
            .ok_or(DirectoryError::NotFound(node_id))
    }
}
