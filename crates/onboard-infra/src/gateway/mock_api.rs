//! Mocked API gateway.
//!
//! Stands in for the remote backend with a fixed artificial latency.
//! Deterministic rules so flows are walkable without a server:
//!
//! - a username is available iff its character count is even and it has
//!   not been claimed during this process lifetime;
//! - `authenticate` succeeds only for the password `"success"`;
//! - `create_account` conflicts on a reused email;
//! - `upload_avatar` returns a fake CDN URL.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use onboard_core::ports::{AuthGatewayPort, GatewayError, ProfileGatewayPort};
use onboard_core::session::AccountRecord;
use onboard_core::username::Username;

const MSG_INCORRECT_CREDENTIALS: &str = "Incorrect email or password";

pub struct MockApiGateway {
    latency: Duration,
    claimed_usernames: Mutex<HashSet<String>>,
    registered_emails: Mutex<HashSet<String>>,
}

impl MockApiGateway {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            claimed_usernames: Mutex::new(HashSet::new()),
            registered_emails: Mutex::new(HashSet::new()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn is_available(&self, username: &Username) -> bool {
        username.as_str().chars().count() % 2 == 0
            && !self.claimed_usernames.lock().await.contains(username.as_str())
    }
}

#[async_trait]
impl AuthGatewayPort for MockApiGateway {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, GatewayError> {
        debug!(email, "mock POST /api/auth");
        self.simulate_latency().await;

        if password == "success" {
            Ok(AccountRecord {
                id: Uuid::new_v4().to_string(),
                username: None,
            })
        } else {
            Err(GatewayError::Unauthorized {
                message: MSG_INCORRECT_CREDENTIALS.into(),
            })
        }
    }

    async fn create_account(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AccountRecord, GatewayError> {
        debug!(email, "mock POST /api/account");
        self.simulate_latency().await;

        let mut registered = self.registered_emails.lock().await;
        if !registered.insert(email.to_lowercase()) {
            return Err(GatewayError::Conflict);
        }
        Ok(AccountRecord {
            id: Uuid::new_v4().to_string(),
            username: None,
        })
    }
}

#[async_trait]
impl ProfileGatewayPort for MockApiGateway {
    async fn check_username(&self, username: &Username) -> Result<bool, GatewayError> {
        debug!(action = "check-username", %username, "mock GET /api/account");
        self.simulate_latency().await;
        Ok(self.is_available(username).await)
    }

    async fn claim_username(&self, username: &Username) -> Result<AccountRecord, GatewayError> {
        debug!(%username, "mock PATCH /api/account");
        self.simulate_latency().await;

        if !self.is_available(username).await {
            // 409 on the wire
            return Err(GatewayError::Conflict);
        }
        self.claimed_usernames
            .lock()
            .await
            .insert(username.as_str().to_string());
        Ok(AccountRecord {
            id: Uuid::new_v4().to_string(),
            username: Some(username.as_str().to_string()),
        })
    }

    async fn upload_avatar(&self, image: Bytes) -> Result<String, GatewayError> {
        debug!(size_bytes = image.len(), "mock POST /api/account/profile-picture");
        self.simulate_latency().await;

        if image.is_empty() {
            return Err(GatewayError::Unexpected("empty image payload".into()));
        }
        Ok(format!(
            "https://cdn.example.invalid/avatars/{}.png",
            Uuid::new_v4()
        ))
    }
}
