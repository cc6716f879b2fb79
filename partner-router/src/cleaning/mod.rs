//! Allow/skip gating and payload cleaning.
//!
//! - **`policy`**: how a string value is redacted (`TextRedactionPolicy`)
//! - **`rules`**: which fields are removed or redacted (`FieldRule`)
//! - **`cleaner`**: the per-process `CleaningPolicy` combining the allow and
//!   skip lists with the field rules
//!
//! Classifications live in `crate::classification`.

mod cleaner;
mod policy;
mod rules;

pub use cleaner::{normalize_event_id, CleaningPolicy};
pub use policy::{KeepConfig, MaskConfig, TextRedactionPolicy, REDACTED_PLACEHOLDER};
pub use rules::{FieldAction, FieldPath, FieldRule};
