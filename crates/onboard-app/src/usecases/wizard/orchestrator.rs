//! Wizard orchestrator.
//!
//! Drives the pure wizard state machine and executes its side effects
//! against the gateway, codec, cache and session ports. The availability
//! check is the only operation with a cancellation contract: a new
//! submission aborts any in-flight check, and a superseded check's
//! resolution produces no state change. Claims and uploads run to
//! completion or failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use onboard_core::avatar::{AvatarPreview, CropSpec, NormalizedImage};
use onboard_core::ports::{
    AvatarCachePort, GatewayError, ImageCodecPort, ProfileGatewayPort,
};
use onboard_core::session::SessionPatch;
use onboard_core::username::Username;
use onboard_core::wizard::{WizardAction, WizardEvent, WizardState, WizardStateMachine};

use crate::messages::{MSG_TRY_AGAIN, MSG_UNREADABLE_IMAGE};
use crate::popup::PopupService;
use crate::session::SessionService;

/// Orchestrator that drives wizard state and side effects.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WizardOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<WizardState>,
    /// Normalized source image held between picking and crop confirm.
    pending_source: Mutex<Option<NormalizedImage>>,

    profile: Arc<dyn ProfileGatewayPort>,
    codec: Arc<dyn ImageCodecPort>,
    avatar_cache: Arc<dyn AvatarCachePort>,
    session: Arc<SessionService>,
    popup: Arc<PopupService>,

    check_task: Mutex<Option<JoinHandle<()>>>,
    check_generation: AtomicU64,
}

impl WizardOrchestrator {
    pub fn new(
        profile: Arc<dyn ProfileGatewayPort>,
        codec: Arc<dyn ImageCodecPort>,
        avatar_cache: Arc<dyn AvatarCachePort>,
        session: Arc<SessionService>,
        popup: Arc<PopupService>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(WizardState::initial()),
                pending_source: Mutex::new(None),
                profile,
                codec,
                avatar_cache,
                session,
                popup,
                check_task: Mutex::new(None),
                check_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Current wizard state snapshot.
    pub async fn state(&self) -> WizardState {
        self.inner.state.lock().await.clone()
    }

    /// The normalized source image awaiting an interactive crop, if any.
    pub async fn picture_source(&self) -> Option<NormalizedImage> {
        self.inner.pending_source.lock().await.clone()
    }

    // === Username step ===

    /// The input text changed: the previous availability result is stale
    /// and any in-flight check no longer reflects UI state.
    pub async fn input_changed(&self) -> WizardState {
        self.supersede_checks().await;
        self.dispatch(WizardEvent::InputChanged).await.0
    }

    /// Submit a candidate for an availability check. Client-side
    /// validation failures never reach the gateway.
    pub async fn submit_username(&self, raw: &str) -> WizardState {
        let (state, actions) = self
            .dispatch(WizardEvent::SubmitCandidate { raw: raw.into() })
            .await;
        if let Some(WizardAction::CheckAvailability { username }) = actions.into_iter().next() {
            self.spawn_check(username).await;
        }
        state
    }

    /// Await the in-flight availability check, if any. An aborted check
    /// resolves to a join error, which is not an error here.
    pub async fn wait_for_check(&self) {
        let handle = self.inner.check_task.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Confirm the checked-and-available candidate: the second, distinct
    /// user action that actually claims the name.
    pub async fn confirm_username(&self) -> WizardState {
        let (state, actions) = self.dispatch(WizardEvent::ConfirmCandidate).await;
        let Some(WizardAction::ClaimUsername { username }) = actions.into_iter().next() else {
            return state;
        };

        let busy = self
            .inner
            .popup
            .placeholder(Some("Claiming username…".into()))
            .await;
        let result = self.inner.profile.claim_username(&username).await;
        self.inner.popup.hide(&busy).await;

        match result {
            Ok(account) => {
                let (state, actions) = self.dispatch(WizardEvent::ClaimSucceeded { account }).await;
                self.run_actions(actions).await;
                state
            }
            Err(error) if error.is_conflict() => {
                // Someone claimed it between check and confirm.
                debug!(%username, "claim lost the race");
                self.dispatch(WizardEvent::ClaimFailed { error }).await.0
            }
            Err(error) => {
                warn!(%error, "claim failed unexpectedly");
                self.inner.popup.alert(MSG_TRY_AGAIN).await;
                self.dispatch(WizardEvent::ClaimFailed { error }).await.0
            }
        }
    }

    // === Profile picture step ===

    /// Normalize a selected file. On failure a dialog is queued and the
    /// user stays on the picker.
    pub async fn attach_picture(&self, bytes: &[u8]) -> WizardState {
        match self.inner.codec.normalize(bytes) {
            Ok(normalized) => {
                debug!(
                    width = normalized.width,
                    height = normalized.height,
                    "picture normalized"
                );
                *self.inner.pending_source.lock().await = Some(normalized);
                self.state().await
            }
            Err(error) => {
                warn!(%error, "picture normalization failed");
                self.inner.popup.alert(MSG_UNREADABLE_IMAGE).await;
                self.dispatch(WizardEvent::PictureRejected).await.0
            }
        }
    }

    /// Apply the crop and cache the resulting blob so a reload before the
    /// final submission still shows it.
    pub async fn confirm_crop(&self, spec: CropSpec) -> WizardState {
        let source = self.inner.pending_source.lock().await.clone();
        let Some(source) = source else {
            return self.state().await;
        };

        match self.inner.codec.crop(&source, &spec) {
            Ok(png) => {
                let preview = AvatarPreview::from_png(png);
                let (state, actions) =
                    self.dispatch(WizardEvent::PictureCropped { preview }).await;
                self.run_actions(actions).await;
                state
            }
            Err(error) => {
                warn!(%error, "crop failed");
                self.inner.popup.alert(MSG_UNREADABLE_IMAGE).await;
                self.dispatch(WizardEvent::PictureRejected).await.0
            }
        }
    }

    /// Restore a previously cached blob on a fresh mount (reload).
    pub async fn restore_cached_avatar(&self) -> WizardState {
        match self.inner.avatar_cache.load().await {
            Ok(Some(blob)) => {
                let preview = AvatarPreview::from_png(blob);
                self.dispatch(WizardEvent::PictureRestored { preview })
                    .await
                    .0
            }
            Ok(None) => self.state().await,
            Err(error) => {
                warn!(%error, "avatar cache load failed");
                self.state().await
            }
        }
    }

    /// Upload the cropped blob. Failure keeps the preview intact; retry is
    /// pressing Continue again.
    pub async fn upload_avatar(&self) -> WizardState {
        let (state, actions) = self.dispatch(WizardEvent::SubmitUpload).await;
        let Some(WizardAction::UploadAvatar { blob }) = actions.into_iter().next() else {
            return state;
        };

        let busy = self
            .inner
            .popup
            .placeholder(Some("Uploading profile picture…".into()))
            .await;
        let result = self.inner.profile.upload_avatar(blob).await;
        self.inner.popup.hide(&busy).await;

        match result {
            Ok(src) => {
                let (state, actions) = self.dispatch(WizardEvent::UploadSucceeded { src }).await;
                self.run_actions(actions).await;
                state
            }
            Err(error) => {
                warn!(%error, "avatar upload failed");
                self.inner.popup.alert(MSG_TRY_AGAIN).await;
                self.dispatch(WizardEvent::UploadFailed { error }).await.0
            }
        }
    }

    /// Advance without an avatar.
    pub async fn skip_picture(&self) -> WizardState {
        let (state, actions) = self.dispatch(WizardEvent::SkipPicture).await;
        self.run_actions(actions).await;
        state
    }

    // === Internals ===

    async fn dispatch(&self, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        let mut guard = self.inner.state.lock().await;
        let (next, actions) = WizardStateMachine::transition(guard.clone(), event);
        *guard = next.clone();
        (next, actions)
    }

    /// Bump the generation and abort any in-flight check so its eventual
    /// resolution is ignored.
    async fn supersede_checks(&self) -> u64 {
        let generation = self.inner.check_generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.inner.check_task.lock().await.take() {
            previous.abort();
        }
        generation
    }

    async fn spawn_check(&self, username: Username) {
        let generation = self.supersede_checks().await;
        let this = self.clone();
        let handle = tokio::spawn(async move {
            let result = this.inner.profile.check_username(&username).await;
            if this.inner.check_generation.load(Ordering::SeqCst) != generation {
                // Superseded while resolving; drop silently.
                return;
            }
            match result {
                Ok(available) => {
                    debug!(%username, available, "availability check resolved");
                    this.dispatch(WizardEvent::CheckResolved {
                        username,
                        available,
                    })
                    .await;
                }
                Err(error) if error.is_cancelled() => {}
                Err(error) => {
                    warn!(%error, "availability check failed");
                    this.inner.popup.alert(MSG_TRY_AGAIN).await;
                }
            }
        });
        *self.inner.check_task.lock().await = Some(handle);
    }

    async fn run_actions(&self, actions: Vec<WizardAction>) {
        for action in actions {
            match action {
                WizardAction::AdoptUsername { account } => {
                    if let Some(username) = account.username.clone() {
                        if let Err(error) = self.inner.session.adopt_username(&username).await {
                            warn!(%error, "failed to persist claimed username");
                        }
                    }
                    self.inner
                        .session
                        .update(SessionPatch {
                            id: Some(account.id),
                            ..Default::default()
                        })
                        .await;
                }
                WizardAction::CacheAvatar { blob } => {
                    if let Err(error) = self.inner.avatar_cache.store(&blob).await {
                        warn!(%error, "avatar cache write failed");
                    }
                }
                WizardAction::AdoptAvatar { src, blob } => {
                    self.inner.session.update(SessionPatch::avatar(src, blob)).await;
                }
                WizardAction::MarkSetupComplete => {
                    if let Err(error) = self.inner.session.mark_setup_complete().await {
                        warn!(%error, "failed to persist setup completion");
                    }
                }
                // Gateway-bound actions are executed by the issuing method.
                other => {
                    warn!(?other, "unexpected wizard action reached run_actions");
                }
            }
        }
    }
}
