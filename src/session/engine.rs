use std::collections::BTreeMap;

use crate::schema::{FieldError, FieldValue, StepSchema};
use crate::session::nav::{NavEvent, NavigationController};
use crate::session::state::RecordSnapshot;

/// Everything a renderer needs to draw the active step: its schema, the
/// current values, the errors belonging to it (and only to it), and the
/// position within the record.
pub struct StepView<'a> {
    pub step: &'a StepSchema,
    pub values: &'a BTreeMap<String, FieldValue>,
    pub errors: BTreeMap<String, FieldError>,
    pub index: usize,
    pub total: usize,
}

impl StepView<'_> {
    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// A user gesture routed back from the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// A field edit on the active step.
    Edit { field: String, value: FieldValue },
    Previous,
    Next,
    Submit,
    Cancel,
}

/// Renderer contract: draw the active step and report the next gesture.
/// Implemented outside the session core; the CLI ships an interactive and a
/// scripted implementation.
pub trait StepInteraction {
    fn present(&mut self, view: &StepView<'_>) -> StepAction;
}

/// Submission collaborator: receives the final snapshot exactly once, after
/// the last step validates. The engine never awaits a result and never
/// retries.
pub trait SubmissionSink {
    fn deliver(&mut self, snapshot: &RecordSnapshot);
}

/// High-level lifecycle outcome of a wizard run.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    Submitted(RecordSnapshot),
    Cancelled,
}

/// Drives one wizard session: renders the active step, routes edits into
/// state, and lets the controller gate every navigation attempt.
pub struct WizardEngine<'a> {
    controller: &'a mut NavigationController,
}

impl<'a> WizardEngine<'a> {
    pub fn new(controller: &'a mut NavigationController) -> Self {
        Self { controller }
    }

    pub fn run<I, S>(&mut self, interaction: &mut I, sink: &mut S) -> WizardOutcome
    where
        I: StepInteraction,
        S: SubmissionSink,
    {
        loop {
            let action = {
                let view = self.view();
                interaction.present(&view)
            };
            match action {
                StepAction::Edit { field, value } => {
                    let step = self.controller.state().current_step_name().to_string();
                    self.controller.state_mut().set_value(&step, &field, value);
                }
                StepAction::Previous => {
                    self.controller.previous();
                }
                StepAction::Next => {
                    self.controller.next();
                }
                StepAction::Submit => {
                    if let NavEvent::Submitted(snapshot) = self.controller.submit() {
                        sink.deliver(&snapshot);
                        return WizardOutcome::Submitted(snapshot);
                    }
                }
                StepAction::Cancel => return WizardOutcome::Cancelled,
            }
        }
    }

    fn view(&self) -> StepView<'_> {
        let state = self.controller.state();
        let index = state.current_step_index();
        let step = state
            .schema()
            .step(index)
            .expect("engine only runs while a step is active");
        let errors = state
            .errors()
            .iter()
            .filter(|(field, _)| step.field(field.as_str()).is_some())
            .map(|(field, error)| (field.clone(), *error))
            .collect();
        StepView {
            step,
            values: state.step_values(step.name()),
            errors,
            index,
            total: state.schema().step_count(),
        }
    }
}
