use tracing::{debug, info};

use crate::session::state::{RecordSnapshot, WizardState};

/// Outcome of a navigation attempt, reported as data so renderers can
/// re-render without exception plumbing.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    /// The step index changed.
    Moved,
    /// Validation failed; the session stays on the current step with every
    /// failing field annotated in the error map.
    Refused,
    /// The action is not available from the current position.
    Ignored,
    /// The whole record validated; the session is finished.
    Submitted(RecordSnapshot),
}

/// Drives the step state machine: one state per step index plus the
/// terminal submitted state. Owns every step-index transition; renderers
/// only ever write values.
#[derive(Debug)]
pub struct NavigationController {
    state: WizardState,
}

impl NavigationController {
    pub fn new(state: WizardState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Mutable access for value edits. The step index has no public mutator
    /// on [`WizardState`], so transitions still route through here.
    pub fn state_mut(&mut self) -> &mut WizardState {
        &mut self.state
    }

    /// Steps back unconditionally; backward navigation never validates and
    /// never touches error state. No-op on the first step.
    pub fn previous(&mut self) -> NavEvent {
        if self.state.is_submitted() {
            return NavEvent::Ignored;
        }
        let index = self.state.current_step_index();
        if index == 0 {
            return NavEvent::Ignored;
        }
        self.state.set_current_step(index - 1);
        debug!(step = self.state.current_step_name(), "moved to previous step");
        NavEvent::Moved
    }

    /// Validates the active step and advances when it is clean; a failing
    /// step keeps the index and attaches its errors. Not available on the
    /// last step, where submit is the only forward action.
    pub fn next(&mut self) -> NavEvent {
        if self.state.is_submitted() {
            return NavEvent::Ignored;
        }
        let index = self.state.current_step_index();
        if index + 1 >= self.state.schema().step_count() {
            return NavEvent::Ignored;
        }
        if self.validate_active_step() {
            self.state.set_current_step(index + 1);
            debug!(step = self.state.current_step_name(), "advanced to next step");
            NavEvent::Moved
        } else {
            NavEvent::Refused
        }
    }

    /// Final forward action, only available on the last step. Validates it
    /// exactly like `next`; when clean, finishes the session and hands the
    /// full snapshot to the caller, exactly once.
    pub fn submit(&mut self) -> NavEvent {
        if self.state.is_submitted() {
            return NavEvent::Ignored;
        }
        if self.state.current_step_index() + 1 != self.state.schema().step_count() {
            return NavEvent::Ignored;
        }
        if self.validate_active_step() {
            let snapshot = self.state.snapshot();
            self.state.mark_submitted();
            info!(
                session = %snapshot.session,
                record = %snapshot.record,
                "record submitted"
            );
            NavEvent::Submitted(snapshot)
        } else {
            NavEvent::Refused
        }
    }

    /// Runs step validation for the active step and updates the error map
    /// either way: failures replace the step's entries, success clears
    /// them. Returns whether the step was clean.
    fn validate_active_step(&mut self) -> bool {
        let step_name = self.state.current_step_name().to_string();
        let errors = {
            let step = self
                .state
                .schema()
                .step_named(&step_name)
                .expect("active step exists in the schema");
            step.validate(self.state.step_values(&step_name))
        };
        if errors.is_empty() {
            self.state.clear_step_errors(&step_name);
            true
        } else {
            debug!(
                step = %step_name,
                failing = errors.len(),
                "step validation refused navigation"
            );
            self.state.replace_step_errors(&step_name, errors);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::{FieldError, FieldSchema, FieldValue, RecordSchema, StepSchema};
    use crate::session::state::WizardState;

    fn three_step_controller() -> NavigationController {
        let schema = RecordSchema::new(
            "application",
            vec![
                StepSchema::new(
                    "personal",
                    "Personal details",
                    vec![
                        FieldSchema::text("first_name", "First name"),
                        FieldSchema::text("last_name", "Last name").optional(),
                        FieldSchema::email("email", "Email address"),
                    ],
                ),
                StepSchema::new(
                    "position",
                    "Position",
                    vec![FieldSchema::text("role", "Role applied for")],
                ),
                StepSchema::new(
                    "availability",
                    "Availability",
                    vec![
                        FieldSchema::flag("full_time", "Available full time"),
                        FieldSchema::text("notice", "Notice period"),
                    ],
                ),
            ],
        )
        .unwrap();
        NavigationController::new(WizardState::new(Arc::new(schema)))
    }

    fn fill_personal(controller: &mut NavigationController) {
        let state = controller.state_mut();
        state.set_value("personal", "first_name", FieldValue::text("Ada"));
        state.set_value("personal", "email", FieldValue::text("ada@example.com"));
    }

    #[test]
    fn next_refused_on_invalid_step_keeps_index_and_attaches_errors() {
        let mut controller = three_step_controller();
        controller
            .state_mut()
            .set_value("personal", "email", FieldValue::text("a@b"));

        assert_eq!(controller.next(), NavEvent::Refused);
        assert_eq!(controller.state().current_step_index(), 0);
        assert_eq!(
            controller.state().errors().get("first_name"),
            Some(&FieldError::Missing)
        );
        assert_eq!(
            controller.state().errors().get("email"),
            Some(&FieldError::InvalidFormat)
        );
    }

    #[test]
    fn next_on_valid_step_advances_by_one_and_clears_its_errors() {
        let mut controller = three_step_controller();
        assert_eq!(controller.next(), NavEvent::Refused);
        assert!(!controller.state().errors().is_empty());

        fill_personal(&mut controller);
        assert_eq!(controller.next(), NavEvent::Moved);
        assert_eq!(controller.state().current_step_index(), 1);
        assert!(controller.state().errors().is_empty());
    }

    #[test]
    fn previous_is_unconditional_and_never_mutates_errors() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();
        assert_eq!(controller.next(), NavEvent::Refused);
        let errors_before = controller.state().errors().clone();
        assert!(!errors_before.is_empty());

        assert_eq!(controller.previous(), NavEvent::Moved);
        assert_eq!(controller.state().current_step_index(), 0);
        assert_eq!(controller.state().errors(), &errors_before);
    }

    #[test]
    fn previous_is_a_no_op_on_the_first_step() {
        let mut controller = three_step_controller();
        assert_eq!(controller.previous(), NavEvent::Ignored);
        assert_eq!(controller.state().current_step_index(), 0);
    }

    #[test]
    fn next_is_rejected_on_the_last_step() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();
        controller
            .state_mut()
            .set_value("position", "role", FieldValue::text("Engineer"));
        controller.next();
        assert_eq!(controller.state().current_step_index(), 2);

        assert_eq!(controller.next(), NavEvent::Ignored);
        assert_eq!(controller.state().current_step_index(), 2);
    }

    #[test]
    fn submit_is_only_available_on_the_last_step() {
        let mut controller = three_step_controller();
        assert_eq!(controller.submit(), NavEvent::Ignored);

        fill_personal(&mut controller);
        controller.next();
        assert_eq!(controller.submit(), NavEvent::Ignored);
    }

    #[test]
    fn submit_failure_mirrors_next_failure() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();
        controller
            .state_mut()
            .set_value("position", "role", FieldValue::text("Engineer"));
        controller.next();

        assert_eq!(controller.submit(), NavEvent::Refused);
        assert_eq!(controller.state().current_step_index(), 2);
        assert_eq!(
            controller.state().errors().get("notice"),
            Some(&FieldError::Missing)
        );
        assert!(!controller.state().is_submitted());
    }

    #[test]
    fn submit_success_emits_the_last_written_values() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();
        controller
            .state_mut()
            .set_value("position", "role", FieldValue::text("Engineer"));
        controller.next();
        let state = controller.state_mut();
        state.set_value("availability", "full_time", FieldValue::flag(true));
        state.set_value("availability", "notice", FieldValue::text("two weeks"));

        let NavEvent::Submitted(snapshot) = controller.submit() else {
            panic!("expected submission");
        };
        assert!(controller.state().is_submitted());
        assert_eq!(
            controller.state().current_step_index(),
            controller.state().schema().step_count()
        );
        assert_eq!(
            snapshot.values["personal"]["email"],
            FieldValue::text("ada@example.com")
        );
        assert_eq!(
            snapshot.values["availability"]["notice"],
            FieldValue::text("two weeks")
        );

        // Terminal state: every further action is ignored.
        assert_eq!(controller.previous(), NavEvent::Ignored);
        assert_eq!(controller.next(), NavEvent::Ignored);
        assert_eq!(controller.submit(), NavEvent::Ignored);
    }

    #[test]
    fn stale_step_is_revalidated_when_exited_again() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();

        // Go back and break the already-accepted step.
        controller.previous();
        controller
            .state_mut()
            .set_value("personal", "email", FieldValue::text("broken"));

        assert_eq!(controller.next(), NavEvent::Refused);
        assert_eq!(controller.state().current_step_index(), 0);
        assert_eq!(
            controller.state().errors().get("email"),
            Some(&FieldError::InvalidFormat)
        );
    }

    #[test]
    fn moving_between_steps_does_not_revalidate_earlier_ones() {
        let mut controller = three_step_controller();
        fill_personal(&mut controller);
        controller.next();

        // Step 0 is stale-invalid now, but only exiting it re-checks it.
        controller
            .state_mut()
            .set_value("personal", "email", FieldValue::text("broken"));
        controller
            .state_mut()
            .set_value("position", "role", FieldValue::text("Engineer"));
        assert_eq!(controller.next(), NavEvent::Moved);
        assert!(controller.state().errors().is_empty());
    }
}
