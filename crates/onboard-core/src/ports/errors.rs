//! Gateway error taxonomy.
//!
//! Remote failures are classified by kind at the gateway boundary so use
//! cases can pick the right user-facing presentation without inspecting
//! transport details.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kinds a gateway call can produce.
///
/// 网关调用失败类型。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GatewayError {
    /// Resource already claimed (username taken, duplicate account).
    #[error("already taken")]
    Conflict,

    /// Credentials rejected; message is safe to show the user.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Request superseded by a newer one. Never surfaced to the user.
    #[error("request superseded")]
    Cancelled,

    /// Anything else: network error, malformed response, unrecognized
    /// status. Presented as a generic "try again later".
    #[error("unexpected gateway failure: {0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, GatewayError::Conflict)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}
