//! Field change tracking.
//!
//! Captures a subset of a record's fields once and reports which of them
//! changed on a later instance of the same shape.
//!
//! ## Entry point
//!
//! ```ignore
//! use fieldwatch_core::tracker::ChangeTracker;
//!
//! let tracker = ChangeTracker::new(&record, ["Name", "Age"])?;
//! let changes = tracker.changes(&record)?;
//! let summary = fieldwatch_core::tracker::render_change_summary(&changes);
//! ```
//!
//! ## Guarantees
//!
//! - **Frozen snapshot**: captured values are owned copies and are never
//!   updated after construction.
//! - **Deep equality**: values are compared structurally, element by element.
//! - **Determinism**: change sets are ordered by field name; repeated queries
//!   with the same record give identical results.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{ChangeTracker, Snapshot};
pub use human_summary::render_change_summary;
pub use model::{ChangeSet, FieldChange, FieldDiff, PriorValue};
