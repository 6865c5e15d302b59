//! Business logic use cases.

pub mod auth;
pub mod wizard;

pub use auth::{SignIn, SignOut, SignUp};
pub use wizard::WizardOrchestrator;
