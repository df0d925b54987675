use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

use super::step::StepSchema;

/// Ordered composition of named steps. The step order is fixed at
/// construction and defines the navigation order of a wizard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RecordDefinition")]
pub struct RecordSchema {
    name: String,
    steps: Vec<StepSchema>,
}

/// Raw wire shape of a wizard definition before invariants are checked.
#[derive(Debug, Clone, Deserialize)]
struct RecordDefinition {
    name: String,
    steps: Vec<StepSchema>,
}

impl TryFrom<RecordDefinition> for RecordSchema {
    type Error = SchemaError;

    fn try_from(definition: RecordDefinition) -> Result<Self, Self::Error> {
        RecordSchema::new(definition.name, definition.steps)
    }
}

impl RecordSchema {
    /// Builds a record schema, enforcing the construction invariants: at
    /// least one step, no empty steps, unique step names, and field keys
    /// unique across the entire record (all values live in one record, so a
    /// key clash in another step is still a clash).
    pub fn new(name: impl Into<String>, steps: Vec<StepSchema>) -> Result<Self, SchemaError> {
        if steps.is_empty() {
            return Err(SchemaError::EmptyRecord);
        }
        let mut step_names = BTreeSet::new();
        let mut field_keys = BTreeSet::new();
        for step in &steps {
            if step.fields().is_empty() {
                return Err(SchemaError::EmptyStep(step.name().to_string()));
            }
            if !step_names.insert(step.name().to_string()) {
                return Err(SchemaError::DuplicateStep(step.name().to_string()));
            }
            for field in step.fields() {
                if !field_keys.insert(field.key().to_string()) {
                    return Err(SchemaError::DuplicateField(field.key().to_string()));
                }
            }
        }
        Ok(Self {
            name: name.into(),
            steps,
        })
    }

    /// Parses a JSON wizard definition, funnelling through the same
    /// invariant checks as [`RecordSchema::new`].
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[StepSchema] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepSchema> {
        self.steps.get(index)
    }

    pub fn step_named(&self, name: &str) -> Option<&StepSchema> {
        self.steps.iter().find(|step| step.name() == name)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
