//! Declarative wizard schemas: fields grouped into steps, steps composed
//! into one submittable record. Pure data and pure validation; no I/O.

pub mod field;
pub mod record;
pub mod step;

pub use field::{FieldError, FieldKind, FieldSchema, FieldValue};
pub use record::RecordSchema;
pub use step::StepSchema;
