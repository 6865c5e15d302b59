//! Onboard Application Orchestration Layer
//!
//! This crate contains business logic use cases and runtime orchestration.

pub mod context;
pub mod messages;
pub mod popup;
pub mod session;
pub mod usecases;

pub use context::{AppContext, AppDeps};
pub use popup::PopupService;
pub use session::SessionService;
