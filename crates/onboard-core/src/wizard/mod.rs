//! Profile setup wizard domain module.
//!
//! This module defines the wizard state machine types.

pub mod state_machine;

pub use state_machine::{
    PictureStepError, UsernameStepError, WizardAction, WizardEvent, WizardState,
    WizardStateMachine,
};
