//! Profile setup wizard state machine.
//!
//! Defines a pure state transition function for the profile setup flow.
//! Strictly forward: Username → ProfilePicture → Complete, terminal at
//! Complete. Side effects are described as actions and executed by the
//! orchestrator.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarPreview;
use crate::ports::GatewayError;
use crate::session::AccountRecord;
use crate::username::{Availability, Username, UsernameError};

/// Wizard flow state.
///
/// 引导流程状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardState {
    /// Username claim step.
    ///
    /// 用户名认领页。
    ///
    /// `candidate` holds the checked-and-available name, set only by a
    /// gateway response and cleared whenever the input changes.
    Username {
        candidate: Option<Username>,
        availability: Availability,
        error: Option<UsernameStepError>,
    },
    /// Profile picture capture/crop step.
    ///
    /// 头像裁剪页。
    ProfilePicture {
        preview: Option<AvatarPreview>,
        error: Option<PictureStepError>,
    },
    /// Terminal completion step.
    ///
    /// 完成页。
    Complete,
}

impl WizardState {
    /// Entry state of a fresh wizard.
    pub fn initial() -> Self {
        WizardState::Username {
            candidate: None,
            availability: Availability::Unknown,
            error: None,
        }
    }
}

/// Events that drive the wizard flow.
///
/// 驱动引导流程的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// Input text changed; any previous availability result is stale.
    ///
    /// 输入变化，可用性结果作废。
    InputChanged,
    /// User submits a candidate string for an availability check.
    ///
    /// 提交候选用户名。
    SubmitCandidate { raw: String },
    /// Availability check resolved (orchestrator callback).
    ///
    /// 可用性检查返回。
    CheckResolved { username: Username, available: bool },
    /// User confirms the available candidate; distinct from the check.
    ///
    /// 用户确认认领。
    ConfirmCandidate,
    /// Claim succeeded (orchestrator callback).
    ClaimSucceeded { account: AccountRecord },
    /// Claim failed (orchestrator callback).
    ClaimFailed { error: GatewayError },
    /// Crop confirmed; a fresh blob is ready.
    ///
    /// 裁剪完成。
    PictureCropped { preview: AvatarPreview },
    /// Cached blob restored after a reload; no re-cache action.
    ///
    /// 从缓存恢复头像。
    PictureRestored { preview: AvatarPreview },
    /// Selected file could not be normalized; back to the picker.
    PictureRejected,
    /// User presses Continue to upload the cropped avatar.
    SubmitUpload,
    /// Upload succeeded (orchestrator callback).
    UploadSucceeded { src: String },
    /// Upload failed; preview stays intact so retry is just Continue.
    UploadFailed { error: GatewayError },
    /// User skips the picture step.
    SkipPicture,
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardAction {
    /// Issue an availability check, superseding any in-flight one.
    CheckAvailability { username: Username },
    /// Claim the confirmed username.
    ClaimUsername { username: Username },
    /// Persist the claimed username to session storage and context.
    AdoptUsername { account: AccountRecord },
    /// Write the cropped blob to the local avatar cache.
    CacheAvatar { blob: Bytes },
    /// Upload the cropped blob.
    UploadAvatar { blob: Bytes },
    /// Adopt the uploaded avatar into session state.
    AdoptAvatar { src: String, blob: Bytes },
    /// Mark the setup flow completed.
    MarkSetupComplete,
}

/// Inline errors on the username step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UsernameStepError {
    /// Client-side constraint violation; no network call was made.
    Invalid(UsernameError),
    /// "Username is already taken" — from a check or a claim conflict.
    Taken,
    /// Generic remote failure; try again later.
    Remote,
}

/// Errors on the picture step, surfaced as dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PictureStepError {
    UnreadableImage,
    UploadFailed,
}

/// Pure wizard state machine.
///
/// 纯状态机：不包含副作用。
pub struct WizardStateMachine;

impl WizardStateMachine {
    pub fn transition(state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        match (state, event) {
            // === Username step ===
            (WizardState::Username { .. }, WizardEvent::InputChanged) => {
                (WizardState::initial(), Vec::new())
            }
            (WizardState::Username { .. }, WizardEvent::SubmitCandidate { raw }) => {
                match Username::parse(&raw) {
                    Ok(username) => (
                        WizardState::Username {
                            candidate: None,
                            availability: Availability::Unknown,
                            error: None,
                        },
                        vec![WizardAction::CheckAvailability { username }],
                    ),
                    Err(error) => (
                        WizardState::Username {
                            candidate: None,
                            availability: Availability::Unknown,
                            error: Some(UsernameStepError::Invalid(error)),
                        },
                        Vec::new(),
                    ),
                }
            }
            (
                WizardState::Username { .. },
                WizardEvent::CheckResolved {
                    username,
                    available,
                },
            ) => {
                if available {
                    (
                        WizardState::Username {
                            candidate: Some(username),
                            availability: Availability::Available,
                            error: None,
                        },
                        Vec::new(),
                    )
                } else {
                    (
                        WizardState::Username {
                            candidate: None,
                            availability: Availability::Taken,
                            error: Some(UsernameStepError::Taken),
                        },
                        Vec::new(),
                    )
                }
            }
            (
                WizardState::Username {
                    candidate: Some(username),
                    availability: Availability::Available,
                    error,
                },
                WizardEvent::ConfirmCandidate,
            ) => (
                WizardState::Username {
                    candidate: Some(username.clone()),
                    availability: Availability::Available,
                    error,
                },
                vec![WizardAction::ClaimUsername { username }],
            ),
            (WizardState::Username { .. }, WizardEvent::ClaimSucceeded { account }) => (
                WizardState::ProfilePicture {
                    preview: None,
                    error: None,
                },
                vec![WizardAction::AdoptUsername { account }],
            ),
            (
                WizardState::Username {
                    candidate,
                    availability,
                    ..
                },
                WizardEvent::ClaimFailed { error },
            ) => {
                if error.is_conflict() {
                    // Lost the race: re-surface the taken messaging, drop
                    // the provisionally accepted candidate.
                    (
                        WizardState::Username {
                            candidate: None,
                            availability: Availability::Taken,
                            error: Some(UsernameStepError::Taken),
                        },
                        Vec::new(),
                    )
                } else {
                    (
                        WizardState::Username {
                            candidate,
                            availability,
                            error: Some(UsernameStepError::Remote),
                        },
                        Vec::new(),
                    )
                }
            }

            // === Profile picture step ===
            (WizardState::ProfilePicture { .. }, WizardEvent::PictureCropped { preview }) => (
                WizardState::ProfilePicture {
                    preview: Some(preview.clone()),
                    error: None,
                },
                vec![WizardAction::CacheAvatar { blob: preview.png }],
            ),
            (WizardState::ProfilePicture { .. }, WizardEvent::PictureRestored { preview }) => (
                WizardState::ProfilePicture {
                    preview: Some(preview),
                    error: None,
                },
                Vec::new(),
            ),
            (WizardState::ProfilePicture { preview, .. }, WizardEvent::PictureRejected) => (
                WizardState::ProfilePicture {
                    preview,
                    error: Some(PictureStepError::UnreadableImage),
                },
                Vec::new(),
            ),
            (
                WizardState::ProfilePicture {
                    preview: Some(preview),
                    error,
                },
                WizardEvent::SubmitUpload,
            ) => (
                WizardState::ProfilePicture {
                    preview: Some(preview.clone()),
                    error,
                },
                vec![WizardAction::UploadAvatar { blob: preview.png }],
            ),
            (
                WizardState::ProfilePicture {
                    preview: Some(preview),
                    ..
                },
                WizardEvent::UploadSucceeded { src },
            ) => (
                WizardState::Complete,
                vec![
                    WizardAction::AdoptAvatar {
                        src,
                        blob: preview.png,
                    },
                    WizardAction::MarkSetupComplete,
                ],
            ),
            (WizardState::ProfilePicture { preview, .. }, WizardEvent::UploadFailed { .. }) => (
                WizardState::ProfilePicture {
                    preview,
                    error: Some(PictureStepError::UploadFailed),
                },
                Vec::new(),
            ),
            (WizardState::ProfilePicture { .. }, WizardEvent::SkipPicture) => {
                (WizardState::Complete, vec![WizardAction::MarkSetupComplete])
            }

            // Complete is terminal; everything else is a no-op.
            (state, _event) => (state, Vec::new()),
        }
    }
}
