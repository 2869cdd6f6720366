// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the node directory.

use crate::config::Config;
use crate::error::Result;
use crate::registry::{NodeId, RegisteredNode, Registry};
use crate::validator::{NodeValidator, RegisterRequest, ValidationError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Shared application state.
pub struct AppState {
    pub registry: Registry,
    pub validator: NodeValidator,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            registry: Registry::new(),
            validator: NodeValidator::new(config.validation.clone()),
            config,
        }
    }
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub status: &'static str,
    pub node_id: NodeId,
}

/// Directory listing.
#[derive(Debug, Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<RegisteredNode>,
}

/// Liveness probe.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive",
        service: "onion-directory",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Register a node's public key.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    debug!(node_id = req.node_id, "Processing registration");

    let valid = state.validator.validate_registration(req)?;
    let node = state.registry.register(valid.node_id, valid.pub_key).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "registered",
            node_id: node.node_id,
        }),
    ))
}

/// List registered nodes in registration order.
pub async fn list_nodes(State(state): State<Arc<AppState>>) -> Json<NodesResponse> {
    Json(NodesResponse {
        nodes: state.registry.list_nodes().await,
    })
}

/// Test-only routes that hand out private keys.
///
/// Mounted under `/debug` only when built with `debug-keys` and
/// `EXPOSE_DEBUG_KEYS` is set. Never enable on a real deployment.
#[cfg(feature = "debug-keys")]
pub mod debug {
    use super::*;
    use crate::validator::ProvisionRequest;
    use axum::{
        extract::{rejection::PathRejection, Path},
        routing::{get, post},
        Router,
    };

    /// Private key disclosure.
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PrivateKeyResponse {
        pub node_id: NodeId,
        pub private_key: String,
    }

    pub fn routes() -> Router<Arc<AppState>> {
        Router::new()
            .route("/nodes", post(provision))
            .route("/nodes/:node_id/private-key", get(private_key))
    }

    /// Generate, register and retain a key pair for a new node.
    pub async fn provision(
        State(state): State<Arc<AppState>>,
        payload: std::result::Result<Json<ProvisionRequest>, JsonRejection>,
    ) -> Result<(StatusCode, Json<RegisteredNode>)> {
        let Json(req) = payload.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
        let node_id = state.validator.validate_node_id(req.node_id)?;

        let node = state.registry.provision_node(node_id).await?;
        Ok((StatusCode::CREATED, Json(node)))
    }

    /// Return a provisioned node's base64 PKCS#8 private key.
    pub async fn private_key(
        State(state): State<Arc<AppState>>,
        path: std::result::Result<Path<NodeId>, PathRejection>,
    ) -> Result<Json<PrivateKeyResponse>> {
        let Path(node_id) = path.map_err(|e| ValidationError::InvalidPath(e.body_text()))?;
        let private_key = state.registry.debug_get_private_key(node_id).await?;
        Ok(Json(PrivateKeyResponse {
            node_id,
            private_key,
        }))
    }
}
