//! Sign-in use case.
//!
//! Queues a busy placeholder for the duration of the gateway call,
//! converts rejections into a dialog, and populates the session on
//! success. No retry policy: failure means the user submits again.

use std::sync::Arc;

use tracing::{info, warn};

use onboard_core::ports::{AuthGatewayPort, GatewayError};
use onboard_core::session::SessionUser;

use crate::messages::{MSG_INCORRECT_CREDENTIALS, MSG_TRY_AGAIN};
use crate::popup::PopupService;
use crate::session::SessionService;

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("{MSG_INCORRECT_CREDENTIALS}")]
    InvalidCredentials,
    #[error("sign in failed: {0}")]
    Gateway(String),
    #[error("session persistence failed: {0}")]
    Session(#[from] anyhow::Error),
}

pub struct SignIn {
    auth: Arc<dyn AuthGatewayPort>,
    session: Arc<SessionService>,
    popup: Arc<PopupService>,
}

impl SignIn {
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

    pub async fn execute(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<SessionUser, SignInError> {
        let busy = self.popup.placeholder(Some("Signing in…".into())).await;
        let result = self.auth.authenticate(email, password).await;
        self.popup.hide(&busy).await;

        match result {
            Ok(account) => {
                let session_id = self.session.open_session().await?;
                if remember {
                    self.session.remember_username(email).await?;
                }
                let user = SessionUser::from(account);
                self.session.replace(user.clone()).await;
                info!(session_id = %session_id, "sign-in succeeded");
                Ok(user)
            }
            Err(GatewayError::Unauthorized { .. }) => {
                self.popup.alert(MSG_INCORRECT_CREDENTIALS).await;
                Err(SignInError::InvalidCredentials)
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed unexpectedly");
                self.popup.alert(MSG_TRY_AGAIN).await;
                Err(SignInError::Gateway(err.to_string()))
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

    fn fixture(outcome: Result<AccountRecord, GatewayError>) -> (SignIn, Arc<SessionService>, Arc<PopupService>) {
        let session = Arc::new(SessionService::new(Arc::new(MemoryKv(Mutex::new(
            HashMap::new(),
        )))));
        let popup = Arc::new(PopupService::new());
        let use_case = SignIn::new(Arc::new(StubAuth { outcome }), session.clone(), popup.clone());
        (use_case, session, popup)
    }

    #[tokio::test]
    async fn sign_in_success_populates_session_and_leaves_no_modal() {
        let (use_case, session, popup) = fixture(Ok(AccountRecord {
            id: "u-1".into(),
            username: None,
        }));

        let user = use_case
            .execute("a@example.com", "success", true)
            .await
            .unwrap();

        assert_eq!(user.id.as_deref(), Some("u-1"));
        assert!(session.session_id().await.unwrap().is_some());
        assert_eq!(
            session.remembered_username().await.unwrap().as_deref(),
            Some("a@example.com")
        );
        assert!(popup.top().await.is_none());
    }

    #[tokio::test]
    async fn sign_in_rejection_queues_credentials_dialog() {
        let (use_case, session, popup) = fixture(Err(GatewayError::Unauthorized {
            message: MSG_INCORRECT_CREDENTIALS.into(),
        }));

        let err = use_case
            .execute("a@example.com", "wrong", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SignInError::InvalidCredentials));
        assert!(session.current().await.is_none());
        assert!(session.session_id().await.unwrap().is_none());

        match popup.top().await.unwrap().kind {
            ModalKind::Alert { message, .. } => assert_eq!(message, MSG_INCORRECT_CREDENTIALS),
            other => panic!("unexpected modal: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_in_unexpected_failure_queues_generic_dialog() {
        let (use_case, _, popup) = fixture(Err(GatewayError::Unexpected("500".into())));

        let err = use_case
            .execute("a@example.com", "success", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SignInError::Gateway(_)));

        match popup.top().await.unwrap().kind {
            ModalKind::Alert { message, .. } => assert_eq!(message, MSG_TRY_AGAIN),
            other => panic!("unexpected modal: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_in_without_remember_skips_remembered_username() {
        let (use_case, session, _) = fixture(Ok(AccountRecord {
            id: "u-1".into(),
            username: None,
        }));

        use_case
            .execute("a@example.com", "success", false)
            .await
            .unwrap();
        assert!(session.remembered_username().await.unwrap().is_none());
    }
}
