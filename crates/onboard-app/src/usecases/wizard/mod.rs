//! Profile setup wizard orchestration.

pub mod orchestrator;

pub use orchestrator::WizardOrchestrator;
