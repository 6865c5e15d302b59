//! Profile gateway port.
//!
//! Username availability/claim and avatar upload. Check and claim are two
//! distinct remote calls; a claim can fail with `Conflict` even after a
//! successful check (someone else claimed the name in between).

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::ports::GatewayError;
use crate::session::AccountRecord;
use crate::username::Username;

#[async_trait]
pub trait ProfileGatewayPort: Send + Sync {
    /// Check whether a username is currently available.
    async fn check_username(&self, username: &Username) -> Result<bool, GatewayError>;

    /// Claim a username for the current account.
    async fn claim_username(&self, username: &Username) -> Result<AccountRecord, GatewayError>;

    /// Upload the cropped avatar; returns its display URL.
    async fn upload_avatar(&self, image: Bytes) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: ProfileGatewayPort + ?Sized> ProfileGatewayPort for Arc<T> {
    async fn check_username(&self, username: &Username) -> Result<bool, GatewayError> {
        (**self).check_username(username).await
    }

    async fn claim_username(&self, username: &Username) -> Result<AccountRecord, GatewayError> {
        (**self).claim_username(username).await
    }

    async fn upload_avatar(&self, image: Bytes) -> Result<String, GatewayError> {
        (**self).upload_avatar(image).await
    }
}
