use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{FieldError, FieldValue, RecordSchema};

/// Full set of field values across all steps at a single point in time,
/// used as the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub session: Uuid,
    pub record: String,
    pub values: BTreeMap<String, BTreeMap<String, FieldValue>>,
}

/// Mutable state of one wizard session.
///
/// Holds a value for every field the schema declares (defaulted, never
/// absent), the current step index, and the per-field error map. Renderers
/// read and write values; step-index transitions belong exclusively to the
/// [`NavigationController`](crate::session::NavigationController), which is
/// why the index has no public mutator.
#[derive(Debug, Clone)]
pub struct WizardState {
    schema: Arc<RecordSchema>,
    values: BTreeMap<String, BTreeMap<String, FieldValue>>,
    current_step: usize,
    errors: BTreeMap<String, FieldError>,
    session_id: Uuid,
    submitted: bool,
}

impl WizardState {
    /// Creates a fresh session at step 0 with every declared field set to
    /// its kind's default.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema
            .steps()
            .iter()
            .map(|step| {
                let defaults = step
                    .fields()
                    .iter()
                    .map(|field| (field.key().to_string(), field.kind().default_value()))
                    .collect();
                (step.name().to_string(), defaults)
            })
            .collect();

        Self {
            schema,
            values,
            current_step: 0,
            errors: BTreeMap::new(),
            session_id: Uuid::new_v4(),
            submitted: false,
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Index of the active step; equals the step count once submitted.
    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Name of the active step, derived from the fixed step order.
    ///
    /// # Panics
    /// Panics once the session is submitted; there is no active step then.
    pub fn current_step_name(&self) -> &str {
        self.schema
            .step(self.current_step)
            .map(|step| step.name())
            .expect("no active step: session already submitted")
    }

    /// Writes a field value. Runs no validation and touches no error state;
    /// edits only ever change data, navigation owns the error map.
    ///
    /// # Panics
    /// Panics when the step or field name is not declared by the schema, or
    /// when the value's shape does not match the field's declared kind. Both
    /// indicate a schema/renderer mismatch, not bad user input.
    pub fn set_value(&mut self, step: &str, field: &str, value: FieldValue) {
        let declared = self
            .schema
            .step_named(step)
            .unwrap_or_else(|| panic!("unknown step `{step}`"))
            .field(field)
            .unwrap_or_else(|| panic!("unknown field `{field}` in step `{step}`"));
        assert!(
            value.matches_kind(declared.kind()),
            "value written to `{field}` does not match its declared kind"
        );
        let slot = self
            .values
            .get_mut(step)
            .and_then(|fields| fields.get_mut(field))
            .expect("values map covers every declared field");
        *slot = value;
    }

    /// Current value of one field.
    ///
    /// # Panics
    /// Panics when the step or field name is not declared by the schema.
    pub fn value(&self, step: &str, field: &str) -> &FieldValue {
        self.values
            .get(step)
            .and_then(|fields| fields.get(field))
            .unwrap_or_else(|| panic!("unknown field `{field}` in step `{step}`"))
    }

    /// Values of one step, keyed by field.
    ///
    /// # Panics
    /// Panics when the step name is not declared by the schema.
    pub fn step_values(&self, step: &str) -> &BTreeMap<String, FieldValue> {
        self.values
            .get(step)
            .unwrap_or_else(|| panic!("unknown step `{step}`"))
    }

    /// Error map keyed by field name; field keys are unique across the
    /// record, so no step qualifier is needed.
    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    /// Full values mapping, captured for submission.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            session: self.session_id,
            record: self.schema.name().to_string(),
            values: self.values.clone(),
        }
    }

    pub(crate) fn set_current_step(&mut self, index: usize) {
        self.current_step = index;
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.current_step = self.schema.step_count();
        self.submitted = true;
    }

    /// Replaces the error entries belonging to `step`'s fields with the
    /// given failures, leaving other steps' entries untouched.
    pub(crate) fn replace_step_errors(
        &mut self,
        step: &str,
        errors: BTreeMap<String, FieldError>,
    ) {
        self.clear_step_errors(step);
        self.errors.extend(errors);
    }

    pub(crate) fn clear_step_errors(&mut self, step: &str) {
        if let Some(schema_step) = self.schema.step_named(step) {
            for field in schema_step.fields() {
                self.errors.remove(field.key());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, StepSchema};

    fn schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::new(
                "application",
                vec![
                    StepSchema::new(
                        "personal",
                        "Personal details",
                        vec![
                            FieldSchema::text("first_name", "First name"),
                            FieldSchema::email("email", "Email address"),
                        ],
                    ),
                    StepSchema::new(
                        "availability",
                        "Availability",
                        vec![FieldSchema::flag("full_time", "Available full time")],
                    ),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn new_session_defaults_every_declared_field() {
        let state = WizardState::new(schema());
        assert_eq!(state.value("personal", "first_name"), &FieldValue::text(""));
        assert_eq!(state.value("personal", "email"), &FieldValue::text(""));
        assert_eq!(
            state.value("availability", "full_time"),
            &FieldValue::flag(false)
        );
        assert_eq!(state.current_step_index(), 0);
        assert_eq!(state.current_step_name(), "personal");
        assert!(!state.is_submitted());
        assert!(state.errors().is_empty());
    }

    #[test]
    fn edits_are_visible_immediately_and_idempotent() {
        let mut state = WizardState::new(schema());
        state.set_value("personal", "first_name", FieldValue::text("Ada"));
        assert_eq!(
            state.value("personal", "first_name"),
            &FieldValue::text("Ada")
        );

        let before = state.snapshot();
        state.set_value("personal", "first_name", FieldValue::text("Ada"));
        assert_eq!(state.snapshot().values, before.values);
    }

    #[test]
    fn edits_never_touch_error_state() {
        let mut state = WizardState::new(schema());
        state.replace_step_errors(
            "personal",
            [("first_name".to_string(), FieldError::Missing)].into(),
        );
        state.set_value("personal", "first_name", FieldValue::text("Ada"));
        assert_eq!(
            state.errors().get("first_name"),
            Some(&FieldError::Missing)
        );
    }

    #[test]
    fn replace_step_errors_is_scoped_to_the_step() {
        let mut state = WizardState::new(schema());
        state.replace_step_errors(
            "personal",
            [
                ("first_name".to_string(), FieldError::Missing),
                ("email".to_string(), FieldError::InvalidFormat),
            ]
            .into(),
        );
        state.replace_step_errors("availability", BTreeMap::new());
        assert_eq!(state.errors().len(), 2, "other steps' entries survive");

        state.replace_step_errors(
            "personal",
            [("email".to_string(), FieldError::Missing)].into(),
        );
        assert_eq!(state.errors().len(), 1);
        assert_eq!(state.errors().get("email"), Some(&FieldError::Missing));
    }

    #[test]
    fn snapshot_reflects_last_written_values() {
        let mut state = WizardState::new(schema());
        state.set_value("personal", "first_name", FieldValue::text("Ada"));
        state.set_value("personal", "email", FieldValue::text("ada@example.com"));
        state.set_value("availability", "full_time", FieldValue::flag(true));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.record, "application");
        assert_eq!(snapshot.session, state.session_id());
        assert_eq!(
            snapshot.values["personal"]["email"],
            FieldValue::text("ada@example.com")
        );
        assert_eq!(
            snapshot.values["availability"]["full_time"],
            FieldValue::flag(true)
        );
    }

    #[test]
    #[should_panic(expected = "unknown field")]
    fn writing_an_undeclared_field_is_a_contract_violation() {
        let mut state = WizardState::new(schema());
        state.set_value("personal", "nickname", FieldValue::text("Lady"));
    }

    #[test]
    #[should_panic(expected = "unknown step")]
    fn writing_to_an_undeclared_step_is_a_contract_violation() {
        let mut state = WizardState::new(schema());
        state.set_value("references", "first_name", FieldValue::text("x"));
    }

    #[test]
    #[should_panic(expected = "does not match its declared kind")]
    fn kind_mismatched_writes_are_a_contract_violation() {
        let mut state = WizardState::new(schema());
        state.set_value("availability", "full_time", FieldValue::text("yes"));
    }
}
