// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Onion Directory
//!
//! The node directory for the onion routing simulator:
//!
//! - Nodes register `{nodeId, pubKey}`; ids are unique, duplicates are rejected
//! - Clients list every registered node in registration order
//! - A liveness probe for health checks
//! - With the `debug-keys` feature and `EXPOSE_DEBUG_KEYS`, test-only routes
//!   that provision nodes and disclose their private keys
//!
//! There is no authentication: any caller may register any id.

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod validator;

pub use config::Config;
pub use error::DirectoryError;
pub use handlers::AppState;
pub use registry::{NodeId, RegisteredNode, Registry};
pub use validator::{NodeValidator, ValidationError};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the directory router.
pub fn router(state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::status))
        .route("/register", post(handlers::register))
        .route("/nodes", get(handlers::list_nodes));

    #[cfg(feature = "debug-keys")]
    let app = if state.config.expose_debug_keys {
        tracing::warn!("Debug key routes mounted under /debug; private keys are exposed");
        app.nest("/debug", handlers::debug::routes())
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
