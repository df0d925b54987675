//! Wizard session runtime: mutable state, the navigation state machine that
//! gates it, and the engine loop wiring renderers and submission
//! collaborators to both.

pub mod engine;
pub mod nav;
pub mod state;

pub use engine::{
    StepAction, StepInteraction, StepView, SubmissionSink, WizardEngine, WizardOutcome,
};
pub use nav::{NavEvent, NavigationController};
pub use state::{RecordSnapshot, WizardState};
