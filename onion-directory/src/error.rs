// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the node directory.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use onion_crypto::CryptoError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::registry::NodeId;
use crate::validator::ValidationError;

/// Directory error types
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Node {0} is already registered")]
    DuplicateNode(NodeId),

    #[error("Node {0} not found")]
    NotFound(NodeId),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl DirectoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DuplicateNode(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Crypto(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateNode(_) => "DUPLICATE_NODE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Crypto(_) | Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        // Server-side failures keep their detail in the log only
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: self.code(),
            }),
        )
            .into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DirectoryError>;
