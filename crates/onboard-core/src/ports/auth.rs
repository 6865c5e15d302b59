//! Auth gateway port.
//!
//! Seam over the remote authenticate/create-account calls so the mocked
//! transport is swappable for a real HTTP client without touching use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::GatewayError;
use crate::session::AccountRecord;

#[async_trait]
pub trait AuthGatewayPort: Send + Sync {
    /// Authenticate an existing account.
    ///
    /// `Unauthorized` carries the user-facing rejection message.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, GatewayError>;

    /// Create a new account. `Conflict` when the account already exists.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, GatewayError>;
}

#[async_trait]
impl<T: AuthGatewayPort + ?Sized> AuthGatewayPort for Arc<T> {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, GatewayError> {
        (**self).authenticate(email, password).await
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, GatewayError> {
        (**self).create_account(email, password).await
    }
}
