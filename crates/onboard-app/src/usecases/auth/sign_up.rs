//! Sign-up use case.
//!
//! A conflict (account already exists) gets its own dialog so the user
//! knows to sign in instead; anything else is the generic failure dialog.

use std::sync::Arc;

use tracing::{info, warn};

use onboard_core::ports::{AuthGatewayPort, GatewayError};
use onboard_core::session::SessionUser;

use crate::messages::{MSG_ACCOUNT_EXISTS, MSG_TRY_AGAIN};
use crate::popup::PopupService;
use crate::session::SessionService;

#[derive(Debug, thiserror::Error)]
pub enum SignUpError {
    #[error("{MSG_ACCOUNT_EXISTS}")]
    AccountExists,
    #[error("sign up failed: {0}")]
    Gateway(String),
    #[error("session persistence failed: {0}")]
    Session(#[from] anyhow::Error),
}

pub struct SignUp {
    auth: Arc<dyn AuthGatewayPort>,
    session: Arc<SessionService>,
    popup: Arc<PopupService>,
}

impl SignUp {
    pub fn new(
        auth: Arc<dyn AuthGatewayPort>,
        session: Arc<SessionService>,
        popup: Arc<PopupService>,
    ) -> Self {
        Self {
            auth,
            session,
            popup,
        }
    }

    pub async fn execute(&self, email: &str, password: &str) -> Result<SessionUser, SignUpError> {
        let busy = self
            .popup
            .placeholder(Some("Creating your account…".into()))
            .await;
        let result = self.auth.create_account(email, password).await;
        self.popup.hide(&busy).await;

        match result {
            Ok(account) => {
                self.session.open_session().await?;
                let user = SessionUser::from(account);
                self.session.replace(user.clone()).await;
                info!("sign-up succeeded");
                Ok(user)
            }
            Err(GatewayError::Conflict) => {
                self.popup.alert(MSG_ACCOUNT_EXISTS).await;
                Err(SignUpError::AccountExists)
            }
            Err(err) => {
                warn!(error = %err, "sign-up failed unexpectedly");
                self.popup.alert(MSG_TRY_AGAIN).await;
                Err(SignUpError::Gateway(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use onboard_core::popup::ModalKind;
    use onboard_core::session::AccountRecord;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MemoryKv(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl onboard_core::ports::KvStorePort for MemoryKv {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.0.lock().await.get(key).cloned())
        }
        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.lock().await.insert(key.into(), value.into());
            Ok(())
        }
        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.0.lock().await.remove(key);
            Ok(())
        }
    }

    struct StubAuth {
        outcome: Result<AccountRecord, GatewayError>,
    }

    #[async_trait]
    impl AuthGatewayPort for StubAuth {
        async fn authenticate(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<AccountRecord, GatewayError> {
            self.outcome.clone()
        }
        async fn create_account(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<AccountRecord, GatewayError> {
            self.outcome.clone()
        }
    }

    fn fixture(
        outcome: Result<AccountRecord, GatewayError>,
    ) -> (SignUp, Arc<SessionService>, Arc<PopupService>) {
        let session = Arc::new(SessionService::new(Arc::new(MemoryKv(Mutex::new(
            HashMap::new(),
        )))));
        let popup = Arc::new(PopupService::new());
        let use_case = SignUp::new(Arc::new(StubAuth { outcome }), session.clone(), popup.clone());
        (use_case, session, popup)
    }

    #[tokio::test]
    async fn sign_up_success_opens_session() {
        let (use_case, session, popup) = fixture(Ok(AccountRecord {
            id: "u-2".into(),
            username: None,
        }));

        let user = use_case.execute("b@example.com", "success").await.unwrap();
        assert_eq!(user.id.as_deref(), Some("u-2"));
        assert!(session.session_id().await.unwrap().is_some());
        assert!(popup.top().await.is_none());
    }

    #[tokio::test]
    async fn sign_up_conflict_gets_specific_dialog() {
        let (use_case, _, popup) = fixture(Err(GatewayError::Conflict));

        let err = use_case.execute("b@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, SignUpError::AccountExists));
        match popup.top().await.unwrap().kind {
            ModalKind::Alert { message, .. } => assert_eq!(message, MSG_ACCOUNT_EXISTS),
            other => panic!("unexpected modal: {other:?}"),
        }
    }
}
