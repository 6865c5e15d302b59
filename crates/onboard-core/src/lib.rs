//! # onboard-core
//!
//! Core domain models and business logic for Onboard.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod avatar;
pub mod popup;
pub mod ports;
pub mod session;
pub mod username;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use avatar::{AvatarFormat, AvatarPreview, CropSpec, NormalizedImage};
pub use popup::{ModalDescriptor, ModalId, ModalKind, ModalStack};
pub use session::{AccountRecord, SessionPatch, SessionUser};
pub use username::{Availability, Username, UsernameError};
pub use wizard::{WizardAction, WizardEvent, WizardState, WizardStateMachine};
