//! Application context.
//!
//! Explicitly passed application-state handle replacing ambient singletons:
//! built once at bootstrap from a dependency grouping, torn down on
//! sign-out. `AppDeps` is NOT a builder — just parameter grouping, no
//! defaults, no hidden logic.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use onboard_core::ports::{
    AuthGatewayPort, AvatarCachePort, ImageCodecPort, KvStorePort, ProfileGatewayPort,
};

use crate::popup::PopupService;
use crate::session::SessionService;
use crate::usecases::auth::{SignIn, SignOut, SignUp};
use crate::usecases::wizard::WizardOrchestrator;

/// Application dependency grouping.
///
/// 应用依赖分组（非 Builder，仅参数打包）。
pub struct AppDeps {
    pub auth: Arc<dyn AuthGatewayPort>,
    pub profile: Arc<dyn ProfileGatewayPort>,
    pub codec: Arc<dyn ImageCodecPort>,
    pub avatar_cache: Arc<dyn AvatarCachePort>,
    pub kv: Arc<dyn KvStorePort>,
}

/// Wired application services and use cases.
pub struct AppContext {
    pub popup: Arc<PopupService>,
    pub session: Arc<SessionService>,
    pub wizard: WizardOrchestrator,

    sign_in: SignIn,
    sign_up: SignUp,
    sign_out: SignOut,
}

impl AppContext {
    /// Wire services and use cases from the dependency grouping.
    pub fn init(deps: AppDeps) -> Arc<Self> {
        info!("initializing application context");
        let popup = Arc::new(PopupService::new());
        let session = Arc::new(SessionService::new(deps.kv));

        let wizard = WizardOrchestrator::new(
            deps.profile,
            deps.codec,
            deps.avatar_cache.clone(),
            session.clone(),
            popup.clone(),
        );

        let sign_in = SignIn::new(deps.auth.clone(), session.clone(), popup.clone());
        let sign_up = SignUp::new(deps.auth, session.clone(), popup.clone());
        let sign_out = SignOut::new(session.clone(), popup.clone(), deps.avatar_cache);

        Arc::new(Self {
            popup,
            session,
            wizard,
            sign_in,
            sign_up,
            sign_out,
        })
    }

    pub fn sign_in(&self) -> &SignIn {
        &self.sign_in
    }

    pub fn sign_up(&self) -> &SignUp {
        &self.sign_up
    }

    /// Tear down per-session state. Called on sign-out.
    pub async fn teardown(&self) -> Result<()> {
        info!("tearing down application context");
        self.sign_out.execute().await
    }
}
