//! fieldwatch core - snapshot a record's fields and report what changed
//!
//! This crate provides:
//! - Record views over any `Serialize` value, plus explicit `RecordFields`
//! - `ChangeTracker`: capture tracked fields once, report changed fields
//!   with their original values
//! - Declarative `TrackerConfig` (TOML-loadable)
//! - The canonical error and logging facilities

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod record;
pub mod tracker;

#[doc(hidden)]
pub use fieldwatch_core_types as core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use config::{TrackerConfig, UncapturedFieldPolicy};
pub use errors::{ExError, ExErrorKind, Result, TrackerError};
pub use record::{to_field_value, FieldValue, RecordFields, NON_FINITE_FLOAT_TAG};
pub use tracker::{render_change_summary, ChangeSet, ChangeTracker, FieldChange, PriorValue};
