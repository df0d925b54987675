use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::{FieldError, FieldSchema, FieldValue};

/// One wizard screen: a named, titled, ordered group of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSchema {
    name: String,
    title: String,
    fields: Vec<FieldSchema>,
}

impl StepSchema {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<FieldSchema>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Validates every field independently and collects all failures, so a
    /// renderer can surface the whole step's problems at once. An empty map
    /// means the step is valid.
    pub fn validate(&self, values: &BTreeMap<String, FieldValue>) -> BTreeMap<String, FieldError> {
        let mut errors = BTreeMap::new();
        for field in &self.fields {
            let value = values
                .get(field.key())
                .cloned()
                .unwrap_or_else(|| field.kind().default_value());
            if let Some(error) = field.validate(&value) {
                errors.insert(field.key().to_string(), error);
            }
        }
        errors
    }
}
